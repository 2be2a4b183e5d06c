//! Retention rules and run contracts for pruning published function versions.
//!
//! This crate owns the pure decision logic: which versions of a function are
//! eligible for deletion, which functions are in scope for a run, and how a
//! run's partial failures are aggregated. Platform access and the worker
//! pool live in the companion `version_prune_lambda` crate.

pub mod contract;
pub mod retention;
pub mod targets;
