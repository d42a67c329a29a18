//! Toolchain generation resolution for easyconfig paths

use anyhow::{Result, anyhow};
use log::{debug, error, warn};
use regex::Regex;

/// Shape of a toolchain generation label: a year in the 2010-2029 range
/// followed by an `a` or `b` release suffix.
pub const TOOLCHAIN_FORMAT: &str = r"20[1-2][0-9][ab]";

/// Known sub-toolchains per generation, newest first.
///
/// Fallback lookup walks this table in order; the first generation with a
/// component appearing in the easyconfig path wins.
const SUBTOOLCHAINS: &[(&str, &[&str])] = &[
    (
        "2023a",
        &["GCCcore-12.3.0", "GCC-12.3.0", "intel-compilers-2023.1.0"],
    ),
    (
        "2022b",
        &["GCCcore-12.2.0", "GCC-12.2.0", "intel-compilers-2022.2.1"],
    ),
    (
        "2022a",
        &["GCCcore-11.3.0", "GCC-11.3.0", "intel-compilers-2022.1.0"],
    ),
    (
        "2021b",
        &["GCCcore-11.2.0", "GCC-11.2.0", "intel-compilers-2021.4.0"],
    ),
    (
        "2021a",
        &["GCCcore-10.3.0", "GCC-10.3.0", "intel-compilers-2021.2.0"],
    ),
    (
        "2020b",
        &["GCCcore-10.2.0", "GCC-10.2.0", "iccifort-2020.4.304"],
    ),
    (
        "2020a",
        &["GCCcore-9.3.0", "GCC-9.3.0", "iccifort-2020.1.217"],
    ),
    (
        "2019b",
        &["GCCcore-8.3.0", "GCC-8.3.0", "iccifort-2019.5.281"],
    ),
    (
        "2019a",
        &[
            "GCCcore-8.2.0",
            "GCC-8.2.0-2.31.1",
            "iccifort-2019.1.144-GCC-8.2.0-2.31.1",
        ],
    ),
    (
        "2018b",
        &[
            "GCCcore-7.3.0",
            "GCC-7.3.0-2.30",
            "iccifort-2018.3.222-GCC-7.3.0-2.30",
        ],
    ),
];

/// Resolves toolchain generation labels from easyconfig names
pub struct ToolchainResolver {
    label_regex: Regex,
    exact_regex: Regex,
}

impl ToolchainResolver {
    /// Create a new resolver with pre-compiled label patterns
    pub fn new() -> Result<Self> {
        let label_regex = Regex::new(TOOLCHAIN_FORMAT)?;
        let exact_regex = Regex::new(&format!("^{}$", TOOLCHAIN_FORMAT))?;

        Ok(Self {
            label_regex,
            exact_regex,
        })
    }

    /// Determine the toolchain generation for an easyconfig.
    ///
    /// A valid `user_toolchain` override short-circuits the scan; an invalid
    /// one is an error. Without an override, a single distinct label in the
    /// easyconfig wins. Zero or several distinct labels fall back to the
    /// sub-toolchain table; an easyconfig outside the covered toolchain range
    /// resolves to `None`.
    pub fn resolve(&self, easyconfig: &str, user_toolchain: Option<&str>) -> Result<Option<String>> {
        if let Some(user_tc) = user_toolchain {
            if self.exact_regex.is_match(user_tc) {
                debug!("Toolchain generation: {}", user_tc);
                return Ok(Some(user_tc.to_string()));
            }

            error!("Specified toolchain generation is not valid: {}", user_tc);
            return Err(anyhow!("invalid toolchain generation: {}", user_tc));
        }

        // Long paths may embed the same label several times
        let mut found: Vec<&str> = self
            .label_regex
            .find_iter(easyconfig)
            .map(|m| m.as_str())
            .collect();
        found.sort_unstable();
        found.dedup();

        let generation = if found.len() == 1 {
            Some(found[0].to_string())
        } else {
            if found.len() > 1 {
                warn!(
                    "Multiple toolchain labels in '{}': {}",
                    easyconfig,
                    found.join(", ")
                );
            }

            SUBTOOLCHAINS
                .iter()
                .find(|(_, sub_tc)| sub_tc.iter().any(|tc| easyconfig.contains(tc)))
                .map(|(main_tc, _)| main_tc.to_string())
        };

        debug!("Toolchain generation: {:?}", generation);
        Ok(generation)
    }
}
