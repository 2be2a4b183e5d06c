/// One page of the platform's function listing. An absent cursor means the
/// listing is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPage {
    pub function_names: Vec<String>,
    pub next_cursor: Option<String>,
}

/// One page of a function's published-version listing, labels as returned
/// by the platform (the `$LATEST` sentinel included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPage {
    pub version_labels: Vec<String>,
    pub next_cursor: Option<String>,
}

/// Capability seam to the platform's function-management API.
///
/// Calls block the calling worker for their duration; implementations are
/// shared read-only across the worker pool and must be thread-safe.
pub trait FunctionApi {
    fn list_functions(&self, cursor: Option<&str>) -> Result<FunctionPage, String>;

    fn list_versions(&self, function_name: &str, cursor: Option<&str>)
        -> Result<VersionPage, String>;

    fn delete_version(&self, function_name: &str, version: u64) -> Result<(), String>;
}
