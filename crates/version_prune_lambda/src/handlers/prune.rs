use serde::{Deserialize, Serialize};
use serde_json::json;
use version_prune_core::contract::{NormalizedPruneSettings, RunResult};
use version_prune_core::retention::{parse_numbered_versions, prunable_versions};

use crate::adapters::function_api::FunctionApi;
use crate::adapters::worker_pool::run_for_each_target;
use crate::handlers::fleet::{enumerate_targets, list_all_version_labels};

/// Invocation response in the platform's proxy-integration shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PruneRunResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: PruneRunBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PruneRunBody {
    pub status: String,
    pub exceptions: Vec<String>,
}

/// Per-function outcome of one resolve-and-delete pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPruneReport {
    pub function_name: String,
    pub numbered_versions: usize,
    pub deleted_versions: Vec<u64>,
    pub failed_deletions: Vec<FailedDeletion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub version: u64,
    pub message: String,
}

/// Resolve one function's deletable versions and delete them one at a time.
///
/// Each deletion failure is captured individually; the remaining versions in
/// the batch are still attempted, so a partial failure never erases the
/// progress already made for this function.
pub fn prune_function(
    api: &impl FunctionApi,
    function_name: &str,
    keep: usize,
) -> Result<FunctionPruneReport, String> {
    let labels = list_all_version_labels(api, function_name)?;
    let numbered = parse_numbered_versions(&labels).map_err(|error| error.to_string())?;
    let prunable = prunable_versions(&numbered, keep);

    if prunable.is_empty() {
        log_prune_info(
            "retention_satisfied",
            json!({
                "function_name": function_name,
                "numbered_versions": numbered.len(),
                "keep": keep,
            }),
        );
        return Ok(FunctionPruneReport {
            function_name: function_name.to_string(),
            numbered_versions: numbered.len(),
            deleted_versions: Vec::new(),
            failed_deletions: Vec::new(),
        });
    }

    let mut deleted_versions = Vec::with_capacity(prunable.len());
    let mut failed_deletions = Vec::new();
    for version in prunable {
        match api.delete_version(function_name, version) {
            Ok(()) => {
                log_prune_info(
                    "version_deleted",
                    json!({
                        "function_name": function_name,
                        "version": version,
                    }),
                );
                deleted_versions.push(version);
            }
            Err(message) => {
                log_prune_error(
                    "version_delete_failed",
                    json!({
                        "function_name": function_name,
                        "version": version,
                        "error": message.clone(),
                    }),
                );
                failed_deletions.push(FailedDeletion { version, message });
            }
        }
    }

    Ok(FunctionPruneReport {
        function_name: function_name.to_string(),
        numbered_versions: numbered.len(),
        deleted_versions,
        failed_deletions,
    })
}

/// Run the full prune cycle: enumerate targets, fan out over the worker
/// pool, and aggregate per-target outcomes into one response.
///
/// Only an enumeration failure short-circuits; per-target failures are
/// collected and reported alongside every sibling's outcome.
pub fn handle_prune_run(
    settings: &NormalizedPruneSettings,
    api: &(impl FunctionApi + Sync),
) -> PruneRunResponse {
    log_prune_info(
        "run_started",
        json!({
            "keep": settings.keep,
            "name_pattern": settings.name_filter.pattern(),
            "explicit_targets": settings.function_names.len(),
            "worker_pool_size": settings.worker_pool_size,
        }),
    );

    let targets = match enumerate_targets(settings, api) {
        Ok(value) => value,
        Err(message) => {
            log_prune_error("enumeration_failed", json!({ "error": message.clone() }));
            return failure_response(vec![message]);
        }
    };

    let outcomes = match run_for_each_target(targets, settings.worker_pool_size, |function_name| {
        prune_function(api, function_name, settings.keep)
    }) {
        Ok(value) => value,
        Err(message) => {
            log_prune_error("worker_pool_failed", json!({ "error": message.clone() }));
            return failure_response(vec![message]);
        }
    };

    let mut result = RunResult::default();
    for outcome in outcomes {
        result.targets_processed += 1;
        match outcome.result {
            Ok(report) => {
                result.versions_deleted += report.deleted_versions.len();
                if !report.failed_deletions.is_empty() {
                    result.record_error(
                        outcome.function_name,
                        describe_failed_deletions(&report),
                    );
                }
            }
            Err(message) => result.record_error(outcome.function_name, message),
        }
    }

    log_prune_info(
        "run_completed",
        json!({
            "targets_processed": result.targets_processed,
            "versions_deleted": result.versions_deleted,
            "errors": result.errors.len(),
        }),
    );

    if result.all_succeeded() {
        return PruneRunResponse {
            status_code: 200,
            body: PruneRunBody {
                status: "OK".to_string(),
                exceptions: Vec::new(),
            },
        };
    }

    failure_response(
        result
            .errors
            .iter()
            .map(|error| format!("Function {}: {}", error.function_name, error.message))
            .collect(),
    )
}

fn describe_failed_deletions(report: &FunctionPruneReport) -> String {
    let failures: Vec<String> = report
        .failed_deletions
        .iter()
        .map(|failure| format!("version {}: {}", failure.version, failure.message))
        .collect();
    format!(
        "failed to delete {} of {} excess versions ({})",
        report.failed_deletions.len(),
        report.failed_deletions.len() + report.deleted_versions.len(),
        failures.join("; ")
    )
}

fn failure_response(exceptions: Vec<String>) -> PruneRunResponse {
    PruneRunResponse {
        status_code: 500,
        body: PruneRunBody {
            status: "Errors occurred".to_string(),
            exceptions,
        },
    }
}

fn log_prune_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "prune_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_prune_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "prune_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
