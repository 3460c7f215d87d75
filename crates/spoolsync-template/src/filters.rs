//! Filters and tests matching Home Assistant's template extensions
//!
//! Only the conversions generated templates rely on: forgiving `float` and
//! `int` with defaults, `round` with a method, and JSON encoding.

use minijinja::value::{Kwargs, Value};
use minijinja::{Error, ErrorKind};

fn value_to_f64(value: &Value) -> Option<f64> {
    f64::try_from(value.clone())
        .ok()
        .or_else(|| value.as_i64().map(|i| i as f64))
}

fn parse_f64(value: &Value) -> Option<f64> {
    value_to_f64(value).or_else(|| value.as_str()?.trim().parse::<f64>().ok())
}

/// Convert value to float, falling back to `default` (or 0.0)
///
/// Home Assistant states are strings, so numeric strings convert too.
pub fn to_float(value: Value, default: Option<Value>) -> Result<Value, Error> {
    if let Some(f) = parse_f64(&value) {
        return Ok(Value::from(f));
    }
    let fallback = default.as_ref().and_then(value_to_f64).unwrap_or(0.0);
    Ok(Value::from(fallback))
}

/// Convert value to int, truncating floats and float strings
pub fn to_int(value: Value, default: Option<Value>) -> Result<Value, Error> {
    let result = value.as_i64().or_else(|| {
        let s = value.as_str().map(str::trim);
        s.and_then(|s| s.parse::<i64>().ok())
            .or_else(|| parse_f64(&value).map(|f| f as i64))
    });

    match (result, default) {
        (Some(i), _) => Ok(Value::from(i)),
        (None, Some(d)) => Ok(Value::from(
            d.as_i64()
                .or_else(|| value_to_f64(&d).map(|f| f as i64))
                .unwrap_or(0),
        )),
        (None, None) if value.is_undefined() || value.is_none() => Ok(Value::from(0)),
        (None, None) => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot convert '{}' to int", value),
        )),
    }
}

/// Round to `precision` digits using `method` (common, ceil, floor, half)
pub fn round_filter(value: f64, precision: Option<i32>, kwargs: Kwargs) -> Result<f64, Error> {
    let precision = precision.unwrap_or(0);
    let method: String = kwargs
        .get::<Option<String>>("method")?
        .unwrap_or_else(|| "common".to_string());
    kwargs.assert_all_used()?;

    let multiplier = 10_f64.powi(precision);
    let scaled = value * multiplier;

    let rounded = match method.as_str() {
        "ceil" => scaled.ceil(),
        "floor" => scaled.floor(),
        "half" => (scaled * 2.0).round() / 2.0,
        _ => scaled.round(),
    };

    Ok(rounded / multiplier)
}

/// Serialize a value as JSON
pub fn to_json(value: Value) -> Result<String, Error> {
    serde_json::to_string(&value)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("JSON error: {}", e)))
}

/// Check if value is a number or a numeric string
pub fn is_number(value: Value) -> bool {
    parse_f64(&value).is_some()
}

/// Check if value is defined
pub fn is_defined(value: Value) -> bool {
    !value.is_undefined()
}
