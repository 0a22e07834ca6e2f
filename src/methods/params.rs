//! Positional parameter extraction.
//!
//! `null` counts as absent everywhere. Empty strings count as absent for
//! string parameters, matching how legacy clients omit values.

use serde_json::Value;

use super::MethodError;
use crate::translator::read_mask::DisplayOptions;

/// The parameter at `index`, `None` when missing or `null`.
pub fn optional(params: &[Value], index: usize) -> Option<&Value> {
    params.get(index).filter(|value| !value.is_null())
}

pub fn required<'a>(
    params: &'a [Value],
    index: usize,
    name: &'static str,
) -> Result<&'a Value, MethodError> {
    optional(params, index).ok_or(MethodError::MissingParameter(name))
}

pub fn optional_str<'a>(
    params: &'a [Value],
    index: usize,
    name: &'static str,
) -> Result<Option<&'a str>, MethodError> {
    match optional(params, index) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(MethodError::invalid(name, "expected a string")),
    }
}

pub fn required_str<'a>(
    params: &'a [Value],
    index: usize,
    name: &'static str,
) -> Result<&'a str, MethodError> {
    optional_str(params, index, name)?.ok_or(MethodError::MissingParameter(name))
}

/// Unsigned 64-bit integer given as a JSON number or a decimal string.
pub fn parse_u64(value: &Value, name: &'static str) -> Result<u64, MethodError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| MethodError::invalid(name, format!("{} is not an unsigned integer", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| MethodError::invalid(name, format!("{:?}: {}", s, e))),
        _ => Err(MethodError::invalid(name, "expected an integer or decimal string")),
    }
}

pub fn optional_u64(
    params: &[Value],
    index: usize,
    name: &'static str,
) -> Result<Option<u64>, MethodError> {
    match optional(params, index) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => parse_u64(value, name).map(Some),
    }
}

pub fn optional_bool(
    params: &[Value],
    index: usize,
    name: &'static str,
) -> Result<Option<bool>, MethodError> {
    match optional(params, index) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(MethodError::invalid(name, "expected a boolean")),
    }
}

/// Display-flag record at `index`; every flag defaults to enabled.
pub fn display_options(params: &[Value], index: usize) -> Result<DisplayOptions, MethodError> {
    DisplayOptions::from_value(params.get(index))
        .ok_or_else(|| MethodError::invalid("options", "expected an object"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let params = vec![json!("0xa11ce"), json!(""), Value::Null, json!(7)];
        assert_eq!(required_str(&params, 0, "address").unwrap(), "0xa11ce");
        assert!(matches!(
            required_str(&params, 1, "address"),
            Err(MethodError::MissingParameter("address"))
        ));
        assert!(matches!(
            required_str(&params, 2, "address"),
            Err(MethodError::MissingParameter("address"))
        ));
        assert!(matches!(
            required_str(&params, 3, "address"),
            Err(MethodError::InvalidParameter { name: "address", .. })
        ));
        assert!(matches!(
            required_str(&params, 9, "address"),
            Err(MethodError::MissingParameter("address"))
        ));
    }

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64(&json!(42), "version").unwrap(), 42);
        assert_eq!(
            parse_u64(&json!("18446744073709551615"), "version").unwrap(),
            u64::MAX
        );
        assert!(parse_u64(&json!(-1), "version").is_err());
        assert!(parse_u64(&json!("abc"), "version").is_err());
        assert!(parse_u64(&json!(1.5), "version").is_err());
        assert!(parse_u64(&json!(true), "version").is_err());
    }

    #[test]
    fn test_optional_values() {
        let params = vec![json!(null), json!("12"), json!(false)];
        assert_eq!(optional_u64(&params, 0, "cursor").unwrap(), None);
        assert_eq!(optional_u64(&params, 1, "cursor").unwrap(), Some(12));
        assert_eq!(optional_bool(&params, 2, "descending").unwrap(), Some(false));
        assert_eq!(optional_bool(&params, 5, "descending").unwrap(), None);
        assert!(optional_bool(&params, 1, "descending").is_err());
    }

    #[test]
    fn test_display_options_rejects_non_objects() {
        let params = vec![json!("0x5"), json!(["showType"])];
        assert!(display_options(&params, 1).is_err());
        assert!(display_options(&params, 2).unwrap().is_enabled("showType"));
    }
}
