pub mod config;

/// Common utilities shared across the catalog workspace
///
/// - Configuration loading
/// - Shared test utilities and database helpers

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used test utilities for easier access
#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{
    create_test_connection, generate_unique_id, get_test_database_url, test_connect_options,
};
