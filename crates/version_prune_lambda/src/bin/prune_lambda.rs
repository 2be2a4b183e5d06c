use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use version_prune_core::contract::normalize_settings;
use version_prune_lambda::adapters::function_api::{FunctionApi, FunctionPage, VersionPage};
use version_prune_lambda::handlers::prune::{handle_prune_run, PruneRunResponse};
use version_prune_lambda::settings::{load_prune_settings, AWS_REGION_VAR};

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

async fn load_lambda_client() -> aws_sdk_lambda::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Ok(region) = std::env::var(AWS_REGION_VAR) {
        loader = loader.region(aws_sdk_lambda::config::Region::new(region));
    }
    aws_sdk_lambda::Client::new(&loader.load().await)
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<PruneRunResponse, Error> {
    // The trigger payload carries no configuration; the environment does.
    let _ = event;

    let settings = load_prune_settings().map_err(Error::from)?;
    let settings = normalize_settings(settings).map_err(|error| Error::from(error.to_string()))?;

    let api = AwsFunctionApi {
        lambda_client: load_lambda_client().await,
        runtime_handle: tokio::runtime::Handle::current(),
    };

    // The orchestration blocks on every platform call, so it runs off the
    // async workers; the adapter drives SDK futures on the captured handle.
    tokio::task::spawn_blocking(move || handle_prune_run(&settings, &api))
        .await
        .map_err(|error| Error::from(format!("prune worker panicked: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
