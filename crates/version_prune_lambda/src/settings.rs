use version_prune_core::contract::{
    PruneSettings, DEFAULT_NAME_PATTERN, DEFAULT_VERSIONS_TO_KEEP, DEFAULT_WORKER_POOL_SIZE,
};

pub const VERSIONS_TO_KEEP_VAR: &str = "VERSIONS_TO_KEEP";
pub const FUNCTION_NAME_PATTERN_VAR: &str = "FUNCTION_NAME_PATTERN";
pub const FUNCTION_NAMES_VAR: &str = "FUNCTION_NAMES";
pub const THREAD_POOL_SIZE_VAR: &str = "THREAD_POOL_SIZE";
pub const AWS_REGION_VAR: &str = "THIS_AWS_REGION";
pub const REPORT_PATH_VAR: &str = "VERSION_REPORT_PATH";

pub const DEFAULT_REPORT_PATH: &str = "lambda_versions.csv";

/// Build run settings from the process environment.
pub fn load_prune_settings() -> Result<PruneSettings, String> {
    prune_settings_from_lookup(|name| std::env::var(name).ok())
}

/// Build run settings from an arbitrary variable lookup. Tests supply a map
/// here instead of mutating the process environment.
pub fn prune_settings_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PruneSettings, String> {
    Ok(PruneSettings {
        keep: parse_usize_var(&lookup, VERSIONS_TO_KEEP_VAR, DEFAULT_VERSIONS_TO_KEEP)?,
        name_pattern: lookup(FUNCTION_NAME_PATTERN_VAR)
            .unwrap_or_else(|| DEFAULT_NAME_PATTERN.to_string()),
        function_names: lookup(FUNCTION_NAMES_VAR).unwrap_or_default(),
        worker_pool_size: parse_usize_var(&lookup, THREAD_POOL_SIZE_VAR, DEFAULT_WORKER_POOL_SIZE)?,
    })
}

fn parse_usize_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
) -> Result<usize, String> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("{name} must be a non-negative integer, got '{raw}'")),
    }
}
