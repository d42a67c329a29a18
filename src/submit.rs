//! Job script submission to the Slurm scheduler

use std::env;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use log::{debug, info};

/// Cluster that receives submissions unless configured otherwise
pub const DEFAULT_CLUSTER: &str = "hydra";

/// Submission parameters for a rendered job script
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Extra options passed to sbatch
    pub sub_options: String,
    /// Name of the cluster to run the job
    pub cluster: String,
    /// Execute the job script locally instead of submitting it
    pub local_exec: bool,
    /// Print the submission command without running it
    pub dry_run: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            sub_options: String::new(),
            cluster: DEFAULT_CLUSTER.to_string(),
            local_exec: false,
            dry_run: false,
        }
    }
}

/// How a job script gets executed.
///
/// Dry-run takes precedence over local execution, which takes precedence over
/// remote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    DryRun,
    Local,
    Remote,
}

impl ExecutionMode {
    pub fn from_options(options: &SubmitOptions) -> Self {
        if options.dry_run {
            ExecutionMode::DryRun
        } else if options.local_exec {
            ExecutionMode::Local
        } else {
            ExecutionMode::Remote
        }
    }
}

/// Get the shell used for the remote submission chain (allows for testing
/// with a fake binary)
fn get_shell_exec() -> String {
    env::var("SOFTBUILD_FAKE_SHELL").unwrap_or_else(|_| "bash".to_string())
}

/// Submit a job script to the target cluster.
///
/// The remote path switches to the target cluster's module context and runs
/// `sbatch --parsable`; each step only runs if the previous one succeeded.
/// Returns the exit code and captured output. A failed submission is surfaced
/// through the exit code, never as an error, and is not retried.
pub fn submit_job_script(job_file: &Path, options: &SubmitOptions) -> Result<(i32, String)> {
    let submit_cmd = [
        "module --force purge".to_string(),
        format!("module load cluster/{}", options.cluster),
        format!(
            "sbatch --parsable {} {}",
            options.sub_options,
            job_file.display()
        ),
    ]
    .join(" && ");

    match ExecutionMode::from_options(options) {
        ExecutionMode::DryRun => {
            let log_msg = format!("(DRY RUN) Job submission command: {}", submit_cmd);
            info!("{}", log_msg);
            Ok((0, log_msg))
        }
        ExecutionMode::Local => {
            debug!("Local execution of job script: {}", job_file.display());
            let job_file_str = job_file.to_string_lossy();
            run_command("bash", &[&job_file_str])
        }
        ExecutionMode::Remote => {
            debug!("Job submission command: {}", submit_cmd);
            let shell = get_shell_exec();
            run_command(&shell, &["-c", &submit_cmd])
        }
    }
}

/// Run a command and capture its exit code and combined output
fn run_command(cmd: &str, args: &[&str]) -> Result<(i32, String)> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {}", cmd))?;

    let return_code = output.status.code().unwrap_or(-1);
    let mut out = String::from_utf8_lossy(&output.stdout).to_string();
    out.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok((return_code, out))
}
