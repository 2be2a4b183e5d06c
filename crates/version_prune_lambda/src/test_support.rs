use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::adapters::function_api::{FunctionApi, FunctionPage, VersionPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    Always,
    Once,
}

/// In-memory platform fake with scripted failures and captured calls.
///
/// `page_size` of zero serves every listing in a single page; a positive
/// value chunks listings and hands out the next start index as the cursor.
#[derive(Default)]
pub struct FakeFunctionApi {
    functions: Vec<String>,
    versions: BTreeMap<String, Vec<String>>,
    page_size: usize,
    function_listing_error: Option<String>,
    version_listing_failures: Mutex<BTreeMap<String, FailureMode>>,
    delete_failures: BTreeMap<(String, u64), String>,
    pub deleted: Mutex<Vec<(String, u64)>>,
    pub function_page_cursors: Mutex<Vec<Option<String>>>,
    pub version_page_cursors: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeFunctionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function(mut self, function_name: &str, version_labels: &[&str]) -> Self {
        self.functions.push(function_name.to_string());
        self.versions.insert(
            function_name.to_string(),
            version_labels.iter().map(|label| label.to_string()).collect(),
        );
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_function_listing_error(mut self, message: &str) -> Self {
        self.function_listing_error = Some(message.to_string());
        self
    }

    pub fn with_version_listing_failure(self, function_name: &str, mode: FailureMode) -> Self {
        self.version_listing_failures
            .lock()
            .expect("poisoned mutex")
            .insert(function_name.to_string(), mode);
        self
    }

    pub fn with_delete_failure(mut self, function_name: &str, version: u64, message: &str) -> Self {
        self.delete_failures
            .insert((function_name.to_string(), version), message.to_string());
        self
    }

    pub fn deleted_versions(&self) -> Vec<(String, u64)> {
        self.deleted.lock().expect("poisoned mutex").clone()
    }

    pub fn version_listing_targets(&self) -> Vec<String> {
        self.version_page_cursors
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|(function_name, _)| function_name.clone())
            .collect()
    }

    fn page(&self, items: &[String], cursor: Option<&str>) -> (Vec<String>, Option<String>) {
        let start = cursor
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0)
            .min(items.len());
        let size = if self.page_size == 0 {
            items.len().max(1)
        } else {
            self.page_size
        };
        let end = (start + size).min(items.len());
        let next_cursor = (end < items.len()).then(|| end.to_string());
        (items[start..end].to_vec(), next_cursor)
    }
}

impl FunctionApi for FakeFunctionApi {
    fn list_functions(&self, cursor: Option<&str>) -> Result<FunctionPage, String> {
        self.function_page_cursors
            .lock()
            .expect("poisoned mutex")
            .push(cursor.map(str::to_string));

        if let Some(message) = &self.function_listing_error {
            return Err(message.clone());
        }

        let (function_names, next_cursor) = self.page(&self.functions, cursor);
        Ok(FunctionPage {
            function_names,
            next_cursor,
        })
    }

    fn list_versions(
        &self,
        function_name: &str,
        cursor: Option<&str>,
    ) -> Result<VersionPage, String> {
        self.version_page_cursors
            .lock()
            .expect("poisoned mutex")
            .push((function_name.to_string(), cursor.map(str::to_string)));

        let mut failures = self.version_listing_failures.lock().expect("poisoned mutex");
        match failures.get(function_name).copied() {
            Some(FailureMode::Always) => {
                return Err(format!("listing versions of {function_name} failed"));
            }
            Some(FailureMode::Once) => {
                failures.remove(function_name);
                return Err(format!("listing versions of {function_name} failed"));
            }
            None => {}
        }
        drop(failures);

        let labels = self
            .versions
            .get(function_name)
            .ok_or_else(|| format!("unknown function '{function_name}'"))?;
        let (version_labels, next_cursor) = self.page(labels, cursor);
        Ok(VersionPage {
            version_labels,
            next_cursor,
        })
    }

    fn delete_version(&self, function_name: &str, version: u64) -> Result<(), String> {
        if let Some(message) = self
            .delete_failures
            .get(&(function_name.to_string(), version))
        {
            return Err(message.clone());
        }

        self.deleted
            .lock()
            .expect("poisoned mutex")
            .push((function_name.to_string(), version));
        Ok(())
    }
}
