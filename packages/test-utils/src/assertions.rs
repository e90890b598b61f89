//! Assertions on failed actions
//!
//! Each assertion runs an action that is expected to fail, then checks the
//! error *kind*: the action's error, or any error in its source chain, must
//! downcast to `E`. The first match is the one inspected. Actions may fail
//! with any error type convertible into [`anyhow::Error`].
//!
//! On success the full error is handed back for further inspection. Every
//! unmet expectation panics, failing the enclosing test.

use std::any::type_name;
use std::error::Error as StdError;
use std::future::Future;

use bastion_jwt_client::HttpStatusCodeError;

/// Assert that `action` fails with an `E` carrying `expected_status`
///
/// # Panics
/// If `action` succeeds, fails with another kind of error, or the status differs
pub fn assert_http_status_error<E, T, Er>(
    expected_status: u16,
    action: impl FnOnce() -> Result<T, Er>,
) -> anyhow::Error
where
    E: HttpStatusCodeError + 'static,
    Er: Into<anyhow::Error>,
{
    let error = expect_failure::<E, T>(action().map_err(Into::into));
    check_status::<E>(&error, expected_status);
    error
}

/// Async form of [`assert_http_status_error`]
pub async fn assert_http_status_error_async<E, T, Er>(
    expected_status: u16,
    action: impl Future<Output = Result<T, Er>>,
) -> anyhow::Error
where
    E: HttpStatusCodeError + 'static,
    Er: Into<anyhow::Error>,
{
    let error = expect_failure::<E, T>(action.await.map_err(Into::into));
    check_status::<E>(&error, expected_status);
    error
}

/// Assert that `action` fails with an `E` whose message contains `expected`
///
/// # Panics
/// If `action` succeeds, fails with another kind of error, or the message
/// does not contain `expected`
pub fn assert_error_message_contains<E, T, Er>(
    expected: &str,
    action: impl FnOnce() -> Result<T, Er>,
) -> anyhow::Error
where
    E: StdError + 'static,
    Er: Into<anyhow::Error>,
{
    let error = expect_failure::<E, T>(action().map_err(Into::into));
    check_message::<E>(&error, expected);
    error
}

/// Async form of [`assert_error_message_contains`]
pub async fn assert_error_message_contains_async<E, T, Er>(
    expected: &str,
    action: impl Future<Output = Result<T, Er>>,
) -> anyhow::Error
where
    E: StdError + 'static,
    Er: Into<anyhow::Error>,
{
    let error = expect_failure::<E, T>(action.await.map_err(Into::into));
    check_message::<E>(&error, expected);
    error
}

fn expect_failure<E: StdError + 'static, T>(result: anyhow::Result<T>) -> anyhow::Error {
    let error = match result {
        Ok(_) => panic!(
            "Expected {} to be raised, but nothing was raised",
            type_name::<E>()
        ),
        Err(error) => error,
    };
    // fail early on the wrong kind
    matching_kind::<E>(&error);
    error
}

fn matching_kind<E: StdError + 'static>(error: &anyhow::Error) -> &E {
    match error.chain().find_map(|cause| cause.downcast_ref::<E>()) {
        Some(found) => found,
        None => panic!(
            "Unexpected error type ==> expected: <{}> but was: <{:#}>",
            type_name::<E>(),
            error
        ),
    }
}

fn check_status<E: HttpStatusCodeError + 'static>(error: &anyhow::Error, expected_status: u16) {
    let found = matching_kind::<E>(error);
    assert_eq!(
        found.raw_status_code(),
        expected_status,
        "Unexpected HTTP status code"
    );
}

fn check_message<E: StdError + 'static>(error: &anyhow::Error, expected: &str) {
    let message = matching_kind::<E>(error).to_string();
    assert!(
        message.contains(expected),
        "Error message '{}' does not contain '{}'",
        message,
        expected
    );
}

/// Shorthand for [`assert_http_status_error`] naming only the error kind
#[macro_export]
macro_rules! assert_http_status {
    ($kind:ty, $status:expr, $action:expr) => {
        $crate::assert_http_status_error::<$kind, _, _>($status, $action)
    };
}

/// Shorthand for [`assert_error_message_contains`] naming only the error kind
#[macro_export]
macro_rules! assert_err_contains {
    ($kind:ty, $substr:expr, $action:expr) => {
        $crate::assert_error_message_contains::<$kind, _, _>($substr, $action)
    };
}
