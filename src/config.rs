//! Configuration management for softbuild
//!
//! Configuration is layered: system config, then user config, then a local
//! `softbuild.toml`, with later files overriding earlier ones field by field.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::submit::DEFAULT_CLUSTER;

/// Configuration for the softbuild CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftbuildConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Cluster that receives job submissions
    pub cluster: String,

    /// Extra options passed to sbatch on every submission
    pub sub_options: String,

    /// Default options for the build job template; CLI arguments override
    pub job: JobDefaults,
}

impl Default for SoftbuildConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            cluster: DEFAULT_CLUSTER.to_string(),
            sub_options: String::new(),
            job: JobDefaults::default(),
        }
    }
}

/// Default build job template options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDefaults {
    /// Slurm job walltime
    pub walltime: String,

    /// Number of tasks for the build job
    pub tasks: u32,

    /// Memory per CPU, in sbatch notation. Ex: '4G'
    pub mem_per_cpu: String,

    /// Directory for job output files
    pub output_dir: PathBuf,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            walltime: "24:00:00".to_string(),
            tasks: 4,
            mem_per_cpu: "4G".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Locations searched for configuration files, lowest priority first
pub struct ConfigPaths {
    pub system: PathBuf,
    pub user: Option<PathBuf>,
    pub local: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let user = std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/softbuild/config.toml"));

        Self {
            system: PathBuf::from("/etc/softbuild/config.toml"),
            user,
            local: PathBuf::from("softbuild.toml"),
        }
    }

    /// Paths that exist on disk, in load order
    pub fn existing_paths(&self) -> Vec<&PathBuf> {
        let mut paths = Vec::new();

        if self.system.exists() {
            paths.push(&self.system);
        }
        if let Some(user) = &self.user
            && user.exists()
        {
            paths.push(user);
        }
        if self.local.exists() {
            paths.push(&self.local);
        }

        paths
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftbuildConfig {
    /// Load configuration from the standard locations
    pub fn load() -> Result<Self> {
        Self::load_with_paths(&ConfigPaths::new())
    }

    pub fn load_with_paths(paths: &ConfigPaths) -> Result<Self> {
        let files: Vec<PathBuf> = paths.existing_paths().into_iter().cloned().collect();
        Self::load_from_files(&files)
    }

    /// Load and merge configuration files; later files override earlier ones
    pub fn load_from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Table::new();

        for path in paths {
            if !path.exists() {
                continue;
            }

            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let table: toml::Table = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;

            merge_tables(&mut merged, table);
        }

        toml::Value::Table(merged)
            .try_into()
            .context("Invalid configuration")
    }

    /// Validate configuration values, collecting all errors
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.log_level
            ));
        }

        if self.cluster.is_empty() {
            errors.push("cluster must not be empty".to_string());
        }

        if self.job.tasks == 0 {
            errors.push("job.tasks must be greater than 0".to_string());
        }

        if self.job.walltime.is_empty() {
            errors.push("job.walltime must not be empty".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Serialize the configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Generate the default configuration file content
    pub fn generate_default_config() -> String {
        Self::default().to_toml().unwrap_or_default()
    }
}

fn merge_tables(base: &mut toml::Table, other: toml::Table) {
    for (key, value) in other {
        match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut existing)), toml::Value::Table(incoming)) => {
                merge_tables(&mut existing, incoming);
                base.insert(key, toml::Value::Table(existing));
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
