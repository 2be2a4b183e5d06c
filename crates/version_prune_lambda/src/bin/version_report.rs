use version_prune_core::contract::normalize_settings;
use version_prune_lambda::adapters::function_api::{FunctionApi, FunctionPage, VersionPage};
use version_prune_lambda::handlers::fleet::enumerate_targets;
use version_prune_lambda::handlers::report::{
    build_fleet_report, write_version_report_csv, FleetVersionReport,
};
use version_prune_lambda::settings::{
    load_prune_settings, AWS_REGION_VAR, DEFAULT_REPORT_PATH, REPORT_PATH_VAR,
};

struct AwsFunctionApi {
    lambda_client: aws_sdk_lambda::Client,
    runtime_handle: tokio::runtime::Handle,
}

impl FunctionApi for AwsFunctionApi {
    fn list_functions(&self, cursor: Option<&str>) -> Result<FunctionPage, String> {
        let client = self.lambda_client.clone();
        let marker = cursor.map(str::to_string);

        self.runtime_handle.block_on(async move {
            let response = client
                .list_functions()
                .set_marker(marker)
                .send()
                .await
                .map_err(|error| format!("failed to list functions: {error}"))?;

            let function_names = response
                .functions()
                .iter()
                .filter_map(|function| function.function_name().map(str::to_string))
                .collect();
            Ok(FunctionPage {
                function_names,
                next_cursor: response.next_marker().map(str::to_string),
            })
        })
    }

    fn list_versions(
        &self,
        function_name: &str,
        cursor: Option<&str>,
    ) -> Result<VersionPage, String> {
        let client = self.lambda_client.clone();
        let function_name = function_name.to_string();
        let marker = cursor.map(str::to_string);

        self.runtime_handle.block_on(async move {
            let response = client
                .list_versions_by_function()
                .function_name(&function_name)
                .set_marker(marker)
                .send()
                .await
                .map_err(|error| {
                    format!("failed to list versions of {function_name}: {error}")
                })?;

            let version_labels = response
                .versions()
                .iter()
                .filter_map(|version| version.version().map(str::to_string))
                .collect();
            Ok(VersionPage {
                version_labels,
                next_cursor: response.next_marker().map(str::to_string),
            })
        })
    }

    fn delete_version(&self, function_name: &str, version: u64) -> Result<(), String> {
        let client = self.lambda_client.clone();
        let function_name = function_name.to_string();

        self.runtime_handle.block_on(async move {
            client
                .delete_function()
                .function_name(&function_name)
                .qualifier(version.to_string())
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    format!("failed to delete version {version} of {function_name}: {error}")
                })
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = load_prune_settings()?;
    let settings = normalize_settings(settings).map_err(|error| error.to_string())?;
    let report_path =
        std::env::var(REPORT_PATH_VAR).unwrap_or_else(|_| DEFAULT_REPORT_PATH.to_string());

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Ok(region) = std::env::var(AWS_REGION_VAR) {
        loader = loader.region(aws_sdk_lambda::config::Region::new(region));
    }
    let api = AwsFunctionApi {
        lambda_client: aws_sdk_lambda::Client::new(&loader.load().await),
        runtime_handle: tokio::runtime::Handle::current(),
    };

    let report: FleetVersionReport =
        tokio::task::spawn_blocking(move || -> Result<FleetVersionReport, String> {
            let targets = enumerate_targets(&settings, &api)?;
            build_fleet_report(targets, settings.worker_pool_size, &api)
        })
        .await??;

    for row in &report.rows {
        println!("{}: {}", row.function_name, row.version_count);
    }
    println!("Total versions: {}", report.total_versions);

    let file = std::fs::File::create(&report_path)?;
    write_version_report_csv(&report.rows, file)
        .map_err(|error| format!("failed to write {report_path}: {error}"))?;
    println!("Report written to {report_path}");

    Ok(())
}
