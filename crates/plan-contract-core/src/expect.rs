// crates/plan-contract-core/src/expect.rs
// ============================================================================
// Module: Contract Expectations
// Description: Assertion helpers that return typed failures instead of panicking.
// Purpose: Report endpoint, expectation, and literal values for every mismatch.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Scenario checks never panic. Each helper returns an [`AssertionFailure`]
//! (or a [`ContractError`] when the body must also be decoded) so the caller
//! can propagate with `?` and the fixture cleanup still runs.

use crate::error::AssertionFailure;
use crate::error::ContractError;
use crate::http::ApiResponse;

/// Fails unless `condition` holds.
///
/// # Errors
///
/// Returns [`AssertionFailure`] built from the remaining arguments.
pub fn ensure(
    condition: bool,
    endpoint: &str,
    expectation: &str,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> Result<(), AssertionFailure> {
    if condition {
        return Ok(());
    }
    Err(AssertionFailure::new(endpoint, expectation, expected, actual))
}

/// Fails unless the status equals `expected`.
///
/// # Errors
///
/// Returns [`AssertionFailure`] quoting the actual status and a body preview.
pub fn expect_status(
    response: &ApiResponse,
    expected: u16,
    expectation: &str,
) -> Result<(), AssertionFailure> {
    expect_status_in(response, &[expected], expectation)
}

/// Fails unless the status is one of `allowed`.
///
/// # Errors
///
/// Returns [`AssertionFailure`] quoting the actual status and a body preview.
pub fn expect_status_in(
    response: &ApiResponse,
    allowed: &[u16],
    expectation: &str,
) -> Result<(), AssertionFailure> {
    let actual = response.status_code();
    let expected = allowed.iter().map(u16::to_string).collect::<Vec<_>>().join(" or ");
    ensure(
        allowed.contains(&actual),
        response.endpoint(),
        expectation,
        format!("status {expected}"),
        status_with_body(response),
    )
}

/// Fails unless the status is at least `minimum`.
///
/// # Errors
///
/// Returns [`AssertionFailure`] quoting the actual status and a body preview.
pub fn expect_status_at_least(
    response: &ApiResponse,
    minimum: u16,
    expectation: &str,
) -> Result<(), AssertionFailure> {
    ensure(
        response.status_code() >= minimum,
        response.endpoint(),
        expectation,
        format!("status >= {minimum}"),
        status_with_body(response),
    )
}

/// Fails unless the lower-cased JSON body satisfies every hint group.
///
/// A group is satisfied when the body contains at least one of its needles,
/// so `&[&["slug"], &["unique", "duplicate"]]` reads "slug and (unique or
/// duplicate)". Needles must be lower-case.
///
/// # Errors
///
/// Returns [`ContractError::Decode`] when the body is not JSON and
/// [`ContractError::Assertion`] when a group has no match.
pub fn expect_body_hints(
    response: &ApiResponse,
    groups: &[&[&str]],
    expectation: &str,
) -> Result<(), ContractError> {
    let text = response.json_text_lowercase()?;
    let satisfied = groups.iter().all(|group| group.iter().any(|needle| text.contains(needle)));
    ensure(satisfied, response.endpoint(), expectation, describe_hints(groups), response.preview())?;
    Ok(())
}

/// Renders hint groups as `"a" and one of ["b", "c"]`.
fn describe_hints(groups: &[&[&str]]) -> String {
    let parts: Vec<String> = groups
        .iter()
        .map(|group| match group {
            [single] => format!("body mentioning {single:?}"),
            many => format!("body mentioning one of {many:?}"),
        })
        .collect();
    parts.join(" and ")
}

/// Renders `status N: <body preview>`.
fn status_with_body(response: &ApiResponse) -> String {
    let preview = response.preview();
    if preview.is_empty() {
        return format!("status {}", response.status_code());
    }
    format!("status {}: {preview}", response.status_code())
}
