// ── Response interpretation ──
//
// Turns one (status, body) pair into an `Outcome`. The rules differ per
// operation; the only hard failure is a body that is not JSON records on
// an expected status. Error statuses are read leniently.

use serde_json::Value;
use thiserror::Error;

use crate::model::{Operation, Outcome, RemoteRecord};

/// Fallback failure reason when the appliance sent no `errmsg`.
pub const UNKNOWN_REASON: &str = "unknown";

/// The body was not an array of JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DecodeError(String);

/// Decode a response body into records.
///
/// Empty bodies carry no records. A bare object is accepted as a single
/// record.
pub fn parse_records(body: &str) -> Result<Vec<RemoteRecord>, DecodeError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| DecodeError(format!("invalid JSON: {e}")))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(RemoteRecord::new(map)),
                other => Err(DecodeError(format!(
                    "record {i} is {}, expected an object",
                    kind_of(&other)
                ))),
            })
            .collect(),
        Value::Object(map) => Ok(vec![RemoteRecord::new(map)]),
        other => Err(DecodeError(format!(
            "expected an array of records, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `errmsg` of the first record, if any.
pub fn failure_reason(records: &[RemoteRecord]) -> String {
    records
        .first()
        .and_then(RemoteRecord::errmsg)
        .unwrap_or(UNKNOWN_REASON)
        .to_owned()
}

/// Interpret the response to a primary call.
///
/// | operation | success | on failure |
/// |---|---|---|
/// | create / update | status expected and first record has `ret_oid` | `Failed(errmsg)` |
/// | delete | status expected, body ignored | `Failed(errmsg)` |
/// | read | status expected and at least one record | `NotFound` |
///
/// On an unexpected status the body only supplies the reason, and a body
/// that does not decode yields `"unknown"`.
pub fn interpret(
    op: Operation,
    status: u16,
    body: &str,
    expected: &[u16],
) -> Result<Outcome, DecodeError> {
    if !expected.contains(&status) {
        return Ok(match op {
            Operation::Read => Outcome::NotFound,
            Operation::Create | Operation::Update | Operation::Delete => {
                Outcome::Failed(lenient_reason(body))
            }
        });
    }

    if op == Operation::Delete {
        return Ok(Outcome::Deleted);
    }

    let mut records = parse_records(body)?;

    let outcome = match op {
        Operation::Create | Operation::Update => {
            match records.first().and_then(RemoteRecord::ret_oid) {
                Some(id) if op == Operation::Create => Outcome::Created(id.to_owned()),
                Some(id) => Outcome::Updated(id.to_owned()),
                None => Outcome::Failed(failure_reason(&records)),
            }
        }
        Operation::Read if records.is_empty() => Outcome::NotFound,
        Operation::Read => Outcome::Found(records.swap_remove(0)),
        Operation::Delete => Outcome::Deleted,
    };

    Ok(outcome)
}

/// `errmsg` from a body that may not be JSON at all.
pub fn lenient_reason(body: &str) -> String {
    parse_records(body).map_or_else(|_| UNKNOWN_REASON.to_owned(), |r| failure_reason(&r))
}
