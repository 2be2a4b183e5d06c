use version_prune_core::contract::NormalizedPruneSettings;

use crate::adapters::function_api::FunctionApi;

/// Page through the platform's function listing until the cursor is
/// exhausted and return every function identifier.
pub fn list_all_function_names(api: &impl FunctionApi) -> Result<Vec<String>, String> {
    let mut function_names = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api.list_functions(cursor.as_deref())?;
        function_names.extend(page.function_names);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(function_names)
}

/// Collect every version label of one function across all listing pages.
/// Pages are fetched sequentially; the caller gets the full set or nothing.
pub fn list_all_version_labels(
    api: &impl FunctionApi,
    function_name: &str,
) -> Result<Vec<String>, String> {
    let mut version_labels = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api.list_versions(function_name, cursor.as_deref())?;
        version_labels.extend(page.version_labels);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(version_labels)
}

/// Produce the ordered set of targets for a run: the explicit list when one
/// was supplied, the discovered fleet otherwise, both filtered by name.
pub fn enumerate_targets(
    settings: &NormalizedPruneSettings,
    api: &impl FunctionApi,
) -> Result<Vec<String>, String> {
    let candidates = if settings.function_names.is_empty() {
        list_all_function_names(api)?
    } else {
        settings.function_names.clone()
    };

    Ok(candidates
        .into_iter()
        .filter(|function_name| settings.name_filter.matches(function_name))
        .collect())
}
