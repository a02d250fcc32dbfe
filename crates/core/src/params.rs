//! Pure helper functions for extracting typed parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! These never fail — they always produce a usable value. Range validation
//! belongs to the field constructors, not here.

use glam::DVec3;
use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u64`,
/// then converts to `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Extracts a 3-vector from `params[name]`, returning `default` if missing or malformed.
///
/// Expects a JSON array of exactly three numbers `[x, y, z]`. Partial or
/// mixed-type arrays fall back to the default as a whole; components are
/// never filled in piecewise.
pub fn param_vec3(params: &Value, name: &str, default: DVec3) -> DVec3 {
    let components: Option<Vec<f64>> = params
        .get(name)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_f64).collect());
    match components {
        Some(c) if c.len() == 3 => DVec3::new(c[0], c[1], c[2]),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"brms": 2.5});
        assert!((param_f64(&params, "brms", 1.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"lmax": 10});
        assert!((param_f64(&params, "lmax", 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "brms", 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"brms": "strong"});
        assert!((param_f64(&params, "brms", 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_null_value() {
        let params = json!({"brms": null});
        assert!((param_f64(&params, "brms", 5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "brms", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    // -- param_usize --

    #[test]
    fn param_usize_extracts_existing_integer() {
        let params = json!({"num_modes": 42});
        assert_eq!(param_usize(&params, "num_modes", 0), 42);
    }

    #[test]
    fn param_usize_returns_default_when_key_missing() {
        let params = json!({});
        assert_eq!(param_usize(&params, "num_modes", 10), 10);
    }

    #[test]
    fn param_usize_returns_default_for_float_value() {
        // 2.5 is not a valid u64, so should fall back to default
        let params = json!({"num_modes": 2.5});
        assert_eq!(param_usize(&params, "num_modes", 99), 99);
    }

    #[test]
    fn param_usize_returns_default_for_negative_integer() {
        let params = json!({"num_modes": -1});
        assert_eq!(param_usize(&params, "num_modes", 5), 5);
    }

    // -- param_bool --

    #[test]
    fn param_bool_extracts_true() {
        let params = json!({"axial_constant": true});
        assert!(param_bool(&params, "axial_constant", false));
    }

    #[test]
    fn param_bool_extracts_false() {
        let params = json!({"axial_constant": false});
        assert!(!param_bool(&params, "axial_constant", true));
    }

    #[test]
    fn param_bool_returns_default_when_key_missing() {
        let params = json!({});
        assert!(param_bool(&params, "axial_constant", true));
    }

    #[test]
    fn param_bool_returns_default_for_wrong_type() {
        let params = json!({"axial_constant": 1});
        assert!(!param_bool(&params, "axial_constant", false));
    }

    // -- param_string --

    #[test]
    fn param_string_extracts_existing_string() {
        let params = json!({"kind": "slab"});
        assert_eq!(param_string(&params, "kind", "isotropic"), "slab");
    }

    #[test]
    fn param_string_returns_default_when_key_missing() {
        let params = json!({});
        assert_eq!(param_string(&params, "kind", "isotropic"), "isotropic");
    }

    #[test]
    fn param_string_returns_default_for_wrong_type() {
        let params = json!({"kind": 42});
        assert_eq!(param_string(&params, "kind", "isotropic"), "isotropic");
    }

    #[test]
    fn param_string_handles_empty_string_value() {
        let params = json!({"kind": ""});
        assert_eq!(param_string(&params, "kind", "isotropic"), "");
    }

    // -- param_vec3 --

    #[test]
    fn param_vec3_extracts_three_numbers() {
        let params = json!({"center": [1.0, 2.0, 3.0]});
        let v = param_vec3(&params, "center", DVec3::ZERO);
        assert_eq!(v, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn param_vec3_accepts_integer_components() {
        let params = json!({"center": [1, 2, 3]});
        let v = param_vec3(&params, "center", DVec3::ZERO);
        assert_eq!(v, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn param_vec3_returns_default_when_key_missing() {
        let params = json!({});
        let v = param_vec3(&params, "center", DVec3::splat(9.0));
        assert_eq!(v, DVec3::splat(9.0));
    }

    #[test]
    fn param_vec3_returns_default_for_wrong_length() {
        let params = json!({"center": [1.0, 2.0]});
        let v = param_vec3(&params, "center", DVec3::ZERO);
        assert_eq!(v, DVec3::ZERO);
    }

    #[test]
    fn param_vec3_returns_default_for_mixed_types() {
        // The string component drops out, leaving two numbers: reject whole.
        let params = json!({"center": [1.0, "two", 3.0]});
        let v = param_vec3(&params, "center", DVec3::splat(-1.0));
        assert_eq!(v, DVec3::splat(-1.0));
    }

    #[test]
    fn param_vec3_returns_default_for_scalar_value() {
        let params = json!({"center": 5.0});
        let v = param_vec3(&params, "center", DVec3::ZERO);
        assert_eq!(v, DVec3::ZERO);
    }
}
