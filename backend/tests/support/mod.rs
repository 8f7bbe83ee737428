//! Shared helpers for integration tests.

pub mod cluster_skip;

pub use cluster_skip::handle_cluster_setup_failure;
