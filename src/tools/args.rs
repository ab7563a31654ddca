//! Argument extraction for tool parameters.
//!
//! All failures are `InvalidArgument` and happen before any provider call.

use serde_json::Value;

use crate::error::{BridgeError, Result};

fn invalid(msg: String) -> BridgeError {
    BridgeError::InvalidArgument(msg)
}

fn field<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

pub fn required_str<'a>(params: &'a Value, name: &str) -> Result<&'a str> {
    match field(params, name) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(invalid(format!("{} must be a string", name))),
        None => Err(invalid(format!("{} is required", name))),
    }
}

pub fn optional_str<'a>(params: &'a Value, name: &str) -> Result<Option<&'a str>> {
    match field(params, name) {
        Some(_) => required_str(params, name).map(Some),
        None => Ok(None),
    }
}

fn as_integer(value: &Value, name: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| invalid(format!("{} must be an integer", name)))
}

pub fn optional_i32(params: &Value, name: &str, default: i32) -> Result<i32> {
    let Some(value) = field(params, name) else {
        return Ok(default);
    };
    let n = as_integer(value, name)?;
    i32::try_from(n).map_err(|_| invalid(format!("{} is out of range", name)))
}

/// Non-negative integer; absent means missing.
pub fn optional_u32(params: &Value, name: &str) -> Result<Option<u32>> {
    let Some(value) = field(params, name) else {
        return Ok(None);
    };
    let n = as_integer(value, name)?;
    if n < 0 {
        return Err(invalid(format!(
            "{} must be a non-negative integer, got {}",
            name, n
        )));
    }
    u32::try_from(n)
        .map(Some)
        .map_err(|_| invalid(format!("{} is out of range", name)))
}

pub fn required_u32(params: &Value, name: &str) -> Result<u32> {
    optional_u32(params, name)?.ok_or_else(|| invalid(format!("{} is required", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_negative_integers() {
        let params = json!({"beforeLength": 3, "afterLength": -1, "start": "2"});
        assert_eq!(required_u32(&params, "beforeLength").unwrap(), 3);
        assert!(matches!(
            required_u32(&params, "afterLength"),
            Err(BridgeError::InvalidArgument(_))
        ));
        assert!(required_u32(&params, "start").is_err());
        assert!(required_u32(&params, "end").is_err());
        assert_eq!(optional_u32(&params, "end").unwrap(), None);
    }

    #[test]
    fn test_strings_and_defaults() {
        let params = json!({"text": "hi", "newCursorPosition": null});
        assert_eq!(required_str(&params, "text").unwrap(), "hi");
        assert_eq!(optional_i32(&params, "newCursorPosition", 1).unwrap(), 1);
        assert!(required_str(&json!({"text": 5}), "text").is_err());
        assert!(optional_i32(&json!({"n": 1u64 << 40}), "n", 0).is_err());
    }
}
