use regex::Regex;

use crate::contract::{ValidationError, DEFAULT_NAME_PATTERN};

/// Prefix-anchored filter over function identifiers.
///
/// The pattern must match from the start of the identifier but may stop
/// short of its end, so `service-api` scopes a run to every function whose
/// name begins with that prefix. The default pattern matches everything.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: String,
    regex: Regex,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self, ValidationError> {
        // Anchoring via a wrapping group keeps alternations in the caller's
        // pattern scoped to the prefix position.
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|error| {
            ValidationError::new(format!("Invalid function name pattern '{pattern}': {error}"))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn match_all() -> Self {
        Self::new(DEFAULT_NAME_PATTERN).expect("default pattern should compile")
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, function_name: &str) -> bool {
        self.regex.is_match(function_name)
    }
}

/// Split a comma-separated explicit target list, preserving order and
/// dropping empty entries.
pub fn split_function_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
