pub mod function_api;
pub mod worker_pool;
