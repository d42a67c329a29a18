//! Build job orchestration: render the job script, write it to a temporary
//! file, submit it and clean up.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, error};
use tempfile::Builder;

use crate::submit::{SubmitOptions, submit_job_script};
use crate::template;

/// Removes the job script file on drop unless told to keep it.
///
/// A failed removal is logged and otherwise ignored; it never changes the
/// submission outcome.
struct JobFileGuard {
    path: PathBuf,
    keep: bool,
}

impl Drop for JobFileGuard {
    fn drop(&mut self) {
        if self.keep {
            return;
        }

        if let Err(err) = fs::remove_file(&self.path) {
            error!(
                "Failed to remove job file '{}': {}",
                self.path.display(),
                err
            );
        }
    }
}

/// Write a job script to a uniquely named temporary file that survives drop
fn write_job_file(job_script: &str) -> Result<PathBuf> {
    let mut file = Builder::new()
        .prefix("build-job.")
        .suffix(".sh")
        .tempfile()
        .context("Failed to create job script file")?;

    file.write_all(job_script.as_bytes())
        .context("Failed to write job script")?;

    let (_, path) = file.keep().context("Failed to persist job script file")?;
    Ok(path)
}

/// Generate a job script from the build job template and submit it to the
/// target cluster.
///
/// The script file is removed after submission unless `keep_job` is set.
pub fn submit_build_job(
    job_options: &HashMap<String, String>,
    keep_job: bool,
    submit_options: &SubmitOptions,
) -> Result<(i32, String)> {
    let job_script = template::substitute(job_options)?;
    let job_file = write_job_file(&job_script)?;
    debug!("Job script written to {}", job_file.display());

    let _guard = JobFileGuard {
        path: job_file.clone(),
        keep: keep_job,
    };

    submit_job_script(&job_file, submit_options)
}
