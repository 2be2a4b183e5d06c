//! AWS-oriented adapters and handlers for fleet version pruning.
//!
//! This crate owns runtime integration details (Lambda entry points, the
//! platform API seam, environment configuration, and the bounded worker
//! pool) and composes the retention rules from `version_prune_core` into
//! full prune and report runs.

pub mod adapters;
pub mod handlers;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;
