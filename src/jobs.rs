//! Job script naming

use std::path::Path;

/// Derive the job script name as `{easyconfig name}-{host_arch}-{target_arch}`.
///
/// The `.eb` suffix is stripped from the easyconfig basename and the target
/// architecture is only appended when it differs from the host architecture.
/// Inputs are assumed pre-sanitized by the caller.
pub fn job_name(easyconfig: &str, host_arch: &str, target_arch: Option<&str>) -> String {
    let base = Path::new(easyconfig)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| easyconfig.to_string());

    let mut name = base.strip_suffix(".eb").unwrap_or(&base).to_string();

    if !host_arch.is_empty() {
        name.push('-');
        name.push_str(host_arch);
    }

    if let Some(target) = target_arch
        && !target.is_empty()
        && target != host_arch
    {
        name.push('-');
        name.push_str(target);
    }

    name
}
