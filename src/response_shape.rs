//! Payload shape checks for service responses
//!
//! Every accessor takes a JSON pointer (`/data/token`) and fails with
//! [`HarnessError::MalformedBody`] naming that pointer when the value is
//! absent or of the wrong type.

use crate::error::{HarnessError, HarnessResult};

use serde_json::{Map, Value};

/// Shape checks over a parsed response body
pub struct ResponseShape;

impl ResponseShape {
    pub fn field<'a>(body: &'a Value, pointer: &str) -> HarnessResult<&'a Value> {
        match body.pointer(pointer) {
            Some(Value::Null) | None => Err(HarnessError::malformed_body(format!(
                "missing field {pointer}"
            ))),
            Some(value) => Ok(value),
        }
    }

    /// A string that is present and not blank.
    pub fn non_empty_str<'a>(body: &'a Value, pointer: &str) -> HarnessResult<&'a str> {
        let value = Self::field(body, pointer)?;
        match value.as_str() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(HarnessError::malformed_body(format!(
                "field {pointer} is empty"
            ))),
            None => Err(HarnessError::malformed_body(format!(
                "field {pointer} is not a string"
            ))),
        }
    }

    pub fn array<'a>(body: &'a Value, pointer: &str) -> HarnessResult<&'a Vec<Value>> {
        Self::field(body, pointer)?.as_array().ok_or_else(|| {
            HarnessError::malformed_body(format!("field {pointer} is not an array"))
        })
    }

    pub fn object<'a>(body: &'a Value, pointer: &str) -> HarnessResult<&'a Map<String, Value>> {
        Self::field(body, pointer)?.as_object().ok_or_else(|| {
            HarnessError::malformed_body(format!("field {pointer} is not an object"))
        })
    }

    /// An identifier the backend may send as a number or a string.
    pub fn identifier(body: &Value, pointer: &str) -> HarnessResult<String> {
        match Self::field(body, pointer)? {
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
            Value::String(_) => Err(HarnessError::malformed_body(format!(
                "field {pointer} is empty"
            ))),
            _ => Err(HarnessError::malformed_body(format!(
                "field {pointer} is not an identifier"
            ))),
        }
    }

    /// An integer field compared against the value the harness sent.
    pub fn expect_integer(body: &Value, pointer: &str, expected: i64) -> HarnessResult<()> {
        let value = Self::field(body, pointer)?;
        // Some backends echo numeric columns back as strings.
        let actual = value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
            .ok_or_else(|| {
                HarnessError::malformed_body(format!("field {pointer} is not an integer"))
            })?;

        if actual != expected {
            return Err(HarnessError::malformed_body(format!(
                "field {pointer} is {actual}, expected {expected}"
            )));
        }
        Ok(())
    }
}
