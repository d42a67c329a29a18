//! softbuild CLI: submit EasyBuild build jobs to a Slurm cluster

use std::collections::HashMap;

use clap::{Parser, builder::styling};
use env_logger::Builder;
use log::{LevelFilter, error, info, warn};

use softbuild::build::submit_build_job;
use softbuild::config::SoftbuildConfig;
use softbuild::jobs::job_name;
use softbuild::submit::SubmitOptions;
use softbuild::toolchain::ToolchainResolver;

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "softbuild")]
#[command(about = "Submit EasyBuild build jobs to a Slurm cluster", long_about = None)]
#[command(styles = STYLES)]
struct Args {
    /// Path to the easyconfig to build
    #[arg()]
    easyconfig: String,

    /// Toolchain generation, e.g. 2023a (inferred from the easyconfig when omitted)
    #[arg(short, long)]
    toolchain: Option<String>,

    /// Host architecture tag
    #[arg(long, env = "VSC_ARCH_LOCAL", default_value = "")]
    host_arch: String,

    /// Target architecture tag (only part of the job name when it differs from the host)
    #[arg(long)]
    target_arch: Option<String>,

    /// Cluster that receives the job
    #[arg(short, long)]
    cluster: Option<String>,

    /// Extra options passed to sbatch
    #[arg(long)]
    sub_options: Option<String>,

    /// Options passed through to the eb command
    #[arg(long, default_value = "")]
    eb_options: String,

    /// Execute the job script locally instead of submitting it
    #[arg(long, default_value = "false")]
    local: bool,

    /// Print the submission command without running it
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Keep the job script file after submission
    #[arg(long, default_value = "false")]
    keep_job: bool,
}

fn main() {
    let args = Args::parse();

    let config = match SoftbuildConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Invalid configuration: {}", error);
        }
        std::process::exit(1);
    }

    let level = config.log_level.parse().unwrap_or(LevelFilter::Info);
    Builder::from_default_env().filter_level(level).init();

    let resolver = match ToolchainResolver::new() {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error creating toolchain resolver: {}", e);
            std::process::exit(1);
        }
    };

    let toolchain = match resolver.resolve(&args.easyconfig, args.toolchain.as_deref()) {
        Ok(toolchain) => toolchain,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match &toolchain {
        Some(tc) => info!("Toolchain generation: {}", tc),
        None => warn!(
            "No toolchain generation found for easyconfig: {}",
            args.easyconfig
        ),
    }

    let name = job_name(&args.easyconfig, &args.host_arch, args.target_arch.as_deref());
    info!("Job name: {}", name);

    let mut job_options: HashMap<String, String> = HashMap::new();
    job_options.insert("job_name".to_string(), name);
    job_options.insert("walltime".to_string(), config.job.walltime.clone());
    job_options.insert("tasks".to_string(), config.job.tasks.to_string());
    job_options.insert("mem_per_cpu".to_string(), config.job.mem_per_cpu.clone());
    job_options.insert(
        "output_dir".to_string(),
        config.job.output_dir.display().to_string(),
    );
    job_options.insert("eb_options".to_string(), args.eb_options.clone());
    job_options.insert("easyconfig".to_string(), args.easyconfig.clone());

    let submit_options = SubmitOptions {
        sub_options: args.sub_options.unwrap_or(config.sub_options),
        cluster: args.cluster.unwrap_or(config.cluster),
        local_exec: args.local,
        dry_run: args.dry_run,
    };

    match submit_build_job(&job_options, args.keep_job, &submit_options) {
        Ok((return_code, out)) => {
            if !out.is_empty() {
                println!("{}", out.trim_end());
            }
            if return_code != 0 {
                error!("Job submission failed with exit code {}", return_code);
            }
            std::process::exit(return_code);
        }
        Err(e) => {
            eprintln!("Error submitting build job: {}", e);
            std::process::exit(1);
        }
    }
}
