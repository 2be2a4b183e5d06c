use serde::{Deserialize, Serialize};

use crate::targets::{split_function_names, NameFilter};

pub const DEFAULT_VERSIONS_TO_KEEP: usize = 3;
pub const DEFAULT_NAME_PATTERN: &str = ".*";
pub const DEFAULT_WORKER_POOL_SIZE: usize = 20;

/// Raw run configuration as supplied by the caller.
///
/// `function_names` is the comma-separated explicit target list; empty means
/// the fleet is discovered through the platform listing instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PruneSettings {
    #[serde(default = "default_versions_to_keep")]
    pub keep: usize,
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
    #[serde(default)]
    pub function_names: String,
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
}

impl Default for PruneSettings {
    fn default() -> Self {
        Self {
            keep: DEFAULT_VERSIONS_TO_KEEP,
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            function_names: String::new(),
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
        }
    }
}

/// Validated run configuration with the name filter compiled and the
/// explicit target list split.
#[derive(Debug, Clone)]
pub struct NormalizedPruneSettings {
    pub keep: usize,
    pub name_filter: NameFilter,
    pub function_names: Vec<String>,
    pub worker_pool_size: usize,
}

/// A failure captured for one target, tagged with its function identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetError {
    pub function_name: String,
    pub message: String,
}

/// Aggregated outcome of one run across every enumerated target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunResult {
    pub targets_processed: usize,
    pub versions_deleted: usize,
    pub errors: Vec<TargetError>,
}

impl RunResult {
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn record_error(&mut self, function_name: impl Into<String>, message: impl Into<String>) {
        self.errors.push(TargetError {
            function_name: function_name.into(),
            message: message.into(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn default_versions_to_keep() -> usize {
    DEFAULT_VERSIONS_TO_KEEP
}

pub fn default_name_pattern() -> String {
    DEFAULT_NAME_PATTERN.to_string()
}

pub fn default_worker_pool_size() -> usize {
    DEFAULT_WORKER_POOL_SIZE
}

pub fn normalize_settings(
    settings: PruneSettings,
) -> Result<NormalizedPruneSettings, ValidationError> {
    if settings.worker_pool_size == 0 {
        return Err(ValidationError::new(
            "worker_pool_size must be a positive integer",
        ));
    }

    let name_filter = NameFilter::new(&settings.name_pattern)?;
    let function_names = split_function_names(&settings.function_names);

    Ok(NormalizedPruneSettings {
        keep: settings.keep,
        name_filter,
        function_names,
        worker_pool_size: settings.worker_pool_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_documented_defaults() {
        let settings = PruneSettings::default();

        assert_eq!(settings.keep, 3);
        assert_eq!(settings.name_pattern, ".*");
        assert!(settings.function_names.is_empty());
        assert_eq!(settings.worker_pool_size, 20);
    }

    #[test]
    fn normalize_settings_rejects_zero_pool_size() {
        let settings = PruneSettings {
            worker_pool_size: 0,
            ..PruneSettings::default()
        };

        let error = normalize_settings(settings).expect_err("settings should fail");
        assert_eq!(error.message(), "worker_pool_size must be a positive integer");
    }

    #[test]
    fn normalize_settings_rejects_invalid_pattern() {
        let settings = PruneSettings {
            name_pattern: "api-(".to_string(),
            ..PruneSettings::default()
        };

        let error = normalize_settings(settings).expect_err("settings should fail");
        assert!(error.message().contains("Invalid function name pattern"));
    }

    #[test]
    fn normalize_settings_splits_explicit_target_list() {
        let settings = PruneSettings {
            function_names: " orders-api, billing-worker ,,payments ".to_string(),
            ..PruneSettings::default()
        };

        let normalized = normalize_settings(settings).expect("settings should pass");
        assert_eq!(
            normalized.function_names,
            vec!["orders-api", "billing-worker", "payments"]
        );
    }

    #[test]
    fn run_result_success_tracks_error_list() {
        let mut result = RunResult::default();
        assert!(result.all_succeeded());

        result.record_error("orders-api", "listing failed");
        assert!(!result.all_succeeded());
        assert_eq!(result.errors[0].function_name, "orders-api");
    }
}
