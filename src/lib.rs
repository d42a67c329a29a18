//! softbuild - EasyBuild job submission helper for Slurm clusters
//!
//! Resolves the toolchain generation targeted by an easyconfig, derives a
//! deterministic job name, renders a build-job script from the sbatch template
//! and submits it to the target cluster (or runs it locally, or prints the
//! submission command in dry-run mode).

pub mod build;
pub mod config;
pub mod jobs;
pub mod submit;
pub mod template;
pub mod toolchain;
