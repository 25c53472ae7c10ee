//! Tests to verify that public types can cross thread boundaries.

use staticfs_core::cli::{ExitCode, LogFormat, OutputFormat};
use staticfs_core::{Error, GenerateOptions, ResolvedOptions};

const fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_option_types_are_send_sync() {
    assert_send_sync::<GenerateOptions>();
    assert_send_sync::<ResolvedOptions>();
}

#[test]
fn test_cli_types_are_send_sync() {
    assert_send_sync::<OutputFormat>();
    assert_send_sync::<LogFormat>();
    assert_send_sync::<ExitCode>();
}

#[test]
fn test_error_is_send_sync() {
    assert_send_sync::<Error>();
}
