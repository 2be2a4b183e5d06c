use serde::{Deserialize, Serialize};
use serde_json::json;
use version_prune_core::contract::TargetError;
use version_prune_core::retention::LATEST_VERSION_SENTINEL;

use crate::adapters::function_api::FunctionApi;
use crate::adapters::worker_pool::run_for_each_target;
use crate::handlers::fleet::list_all_version_labels;

/// One row of the fleet report: a function and its published-version count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionCountRow {
    pub function_name: String,
    pub version_count: usize,
}

/// Fleet-wide version census after the counting pass and one retry pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetVersionReport {
    pub rows: Vec<VersionCountRow>,
    pub total_versions: usize,
    pub failed_functions: Vec<TargetError>,
}

/// Count a function's published versions, excluding the `$LATEST` sentinel.
pub fn count_numbered_versions(
    api: &impl FunctionApi,
    function_name: &str,
) -> Result<usize, String> {
    let labels = list_all_version_labels(api, function_name)?;
    Ok(labels
        .iter()
        .filter(|label| label.as_str() != LATEST_VERSION_SENTINEL)
        .count())
}

/// Count versions across every target, retry the failed subset once, and
/// merge retry successes into the rows and the total.
pub fn build_fleet_report(
    targets: Vec<String>,
    pool_size: usize,
    api: &(impl FunctionApi + Sync),
) -> Result<FleetVersionReport, String> {
    let (mut rows, failed) = count_pass(targets, pool_size, api)?;

    let failed_functions = if failed.is_empty() {
        Vec::new()
    } else {
        log_report_info(
            "retrying_failed_functions",
            json!({ "count": failed.len() }),
        );
        let retry_targets = failed
            .iter()
            .map(|error| error.function_name.clone())
            .collect();
        let (retry_rows, still_failed) = count_pass(retry_targets, pool_size, api)?;
        rows.extend(retry_rows);
        still_failed
    };

    for error in &failed_functions {
        log_report_error(
            "function_count_failed",
            json!({
                "function_name": error.function_name.clone(),
                "error": error.message.clone(),
            }),
        );
    }

    let total_versions = rows.iter().map(|row| row.version_count).sum();
    Ok(FleetVersionReport {
        rows,
        total_versions,
        failed_functions,
    })
}

fn count_pass(
    targets: Vec<String>,
    pool_size: usize,
    api: &(impl FunctionApi + Sync),
) -> Result<(Vec<VersionCountRow>, Vec<TargetError>), String> {
    let outcomes = run_for_each_target(targets, pool_size, |function_name| {
        count_numbered_versions(api, function_name)
    })?;

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(version_count) => rows.push(VersionCountRow {
                function_name: outcome.function_name,
                version_count,
            }),
            Err(message) => failed.push(TargetError {
                function_name: outcome.function_name,
                message,
            }),
        }
    }

    Ok((rows, failed))
}

/// Write the tabular report with its `FunctionName,VersionCount` header.
pub fn write_version_report_csv(
    rows: &[VersionCountRow],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(["FunctionName", "VersionCount"])?;
    for row in rows {
        let version_count = row.version_count.to_string();
        wtr.write_record([row.function_name.as_str(), version_count.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

fn log_report_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "fleet_report",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_report_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "fleet_report",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
