//! Build job script template

use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

/// sbatch template for build jobs.
///
/// Placeholders use `${name}` syntax; every placeholder must be present in
/// the option map passed to [`substitute`]. The option values themselves are
/// opaque pass-through.
pub const BUILD_JOB: &str = r#"#!/bin/bash
#SBATCH --job-name=${job_name}
#SBATCH --output=${output_dir}/%x-%j.out
#SBATCH --error=${output_dir}/%x-%j.err
#SBATCH --time=${walltime}
#SBATCH --nodes=1
#SBATCH --ntasks=${tasks}
#SBATCH --mem-per-cpu=${mem_per_cpu}

eb ${eb_options} ${easyconfig}
"#;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Render the build job template with the given options.
///
/// Fails on the first placeholder without a matching key.
pub fn substitute(job_options: &HashMap<String, String>) -> Result<String> {
    let mut script = String::with_capacity(BUILD_JOB.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(BUILD_JOB) {
        let matched = caps.get(0).expect("capture group 0 always exists");
        let key = &caps[1];

        match job_options.get(key) {
            Some(value) => {
                script.push_str(&BUILD_JOB[last..matched.start()]);
                script.push_str(value);
                last = matched.end();
            }
            None => bail!("unresolved placeholder '{}' in build job template", key),
        }
    }

    script.push_str(&BUILD_JOB[last..]);
    Ok(script)
}
