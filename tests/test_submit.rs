//! Tests for job script submission

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use softbuild::submit::{ExecutionMode, SubmitOptions, submit_job_script};
use tempfile::TempDir;

fn write_script(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============== Execution Mode Precedence Tests ==============

#[rstest]
#[case(true, true, ExecutionMode::DryRun)]
#[case(true, false, ExecutionMode::DryRun)]
#[case(false, true, ExecutionMode::Local)]
#[case(false, false, ExecutionMode::Remote)]
fn test_execution_mode_precedence(
    #[case] dry_run: bool,
    #[case] local_exec: bool,
    #[case] expected: ExecutionMode,
) {
    let options = SubmitOptions {
        dry_run,
        local_exec,
        ..Default::default()
    };
    assert_eq!(ExecutionMode::from_options(&options), expected);
}

// ============== Dry Run Tests ==============

#[rstest]
fn test_dry_run_returns_zero_and_echoes_command() {
    let options = SubmitOptions {
        sub_options: "--partition=debug".to_string(),
        cluster: "hydra".to_string(),
        local_exec: false,
        dry_run: true,
    };

    let (ec, out) = submit_job_script(PathBuf::from("/tmp/job.sh").as_path(), &options).unwrap();

    assert_eq!(ec, 0);
    assert!(out.contains("(DRY RUN)"));
    assert!(out.contains("module --force purge"));
    assert!(out.contains("module load cluster/hydra"));
    assert!(out.contains("sbatch --parsable --partition=debug /tmp/job.sh"));
}

#[rstest]
fn test_dry_run_takes_precedence_over_local() {
    let options = SubmitOptions {
        local_exec: true,
        dry_run: true,
        ..Default::default()
    };

    // The job file does not exist; nothing may be executed
    let (ec, out) =
        submit_job_script(PathBuf::from("/nonexistent/job.sh").as_path(), &options).unwrap();

    assert_eq!(ec, 0);
    assert!(out.contains("(DRY RUN)"));
}

// ============== Local Execution Tests ==============

#[rstest]
fn test_local_exec_captures_output() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "job.sh", "#!/bin/bash\necho building software\n");

    let options = SubmitOptions {
        local_exec: true,
        ..Default::default()
    };

    let (ec, out) = submit_job_script(&script, &options).unwrap();

    assert_eq!(ec, 0);
    assert!(out.contains("building software"));
}

#[rstest]
fn test_local_exec_failure_is_returned_not_raised() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "job.sh", "#!/bin/bash\necho build failed >&2\nexit 1\n");

    let options = SubmitOptions {
        local_exec: true,
        ..Default::default()
    };

    let (ec, out) = submit_job_script(&script, &options).unwrap();

    assert_eq!(ec, 1);
    assert!(out.contains("build failed"));
}

// ============== Remote Submission Tests ==============

#[cfg(unix)]
#[rstest]
fn test_remote_submission_runs_compound_command() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();

    // Fake shell that echoes the compound command it was asked to run
    let fake_shell = write_script(&dir, "fake_shell.sh", "#!/bin/bash\necho \"$2\"\nexit 0\n");
    let mut perms = fs::metadata(&fake_shell).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&fake_shell, perms).unwrap();

    unsafe {
        std::env::set_var("SOFTBUILD_FAKE_SHELL", &fake_shell);
    }

    let options = SubmitOptions {
        cluster: "chimera".to_string(),
        ..Default::default()
    };
    let result = submit_job_script(PathBuf::from("/tmp/job.sh").as_path(), &options);

    unsafe {
        std::env::remove_var("SOFTBUILD_FAKE_SHELL");
    }

    let (ec, out) = result.unwrap();
    assert_eq!(ec, 0);
    assert!(out.contains("module --force purge && module load cluster/chimera"));
    assert!(out.contains("sbatch --parsable  /tmp/job.sh"));
}
