//! Schema validation helpers.
//!
//! Configuration is checked against a [`Schema`] before any adapter code
//! runs: presence of required attributes, value types, and the declared
//! [`Validator`]s. Computed-only attributes are skipped since the provider
//! sets them.
//!
//! # Example
//!
//! ```
//! use vpsie_provider::schema::{Schema, Attribute};
//! use vpsie_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("name", Attribute::required_string().with_min_length(1))
//!     .with_attribute("size", Attribute::required_int64());
//!
//! let diagnostics = validate(&schema, &json!({"name": "data", "size": 20}));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"name": "", "size": 20}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("name".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Diagnostic, DiagnosticSeverity, Schema, Validator};
use serde_json::Value;
use std::collections::HashMap;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object").with_detail(format!("Got {}", value_type_name(value))),
            );
            return diagnostics;
        },
    };

    for (name, attr) in &schema.block.attributes {
        validate_attribute(attr, obj.get(name), name, &mut diagnostics);
    }

    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Skip computed-only attributes (provider sets these)
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before {
                for validator in &attr.validators {
                    if let Some(diag) = apply_validator(validator, v, path, attr.flags.sensitive) {
                        diagnostics.push(diag);
                    }
                }
            }
        },
    }
}

fn apply_validator(validator: &Validator, value: &Value, path: &str, sensitive: bool) -> Option<Diagnostic> {
    let s = value.as_str()?;
    match validator {
        Validator::MinLength(min) => {
            let len = s.chars().count();
            (len < *min).then(|| {
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(format!(
                        "Attribute {} string length must be at least {}, got: {}",
                        path, min, len
                    ))
                    .with_attribute(path)
            })
        },
        Validator::OneOf(allowed) => (!allowed.iter().any(|a| a == s)).then(|| {
            let got = if sensitive { "(sensitive value)".to_string() } else { format!("{:?}", s) };
            Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                .with_detail(format!(
                    "Attribute {} value must be one of: {:?}, got: {}",
                    path, allowed, got
                ))
                .with_attribute(path)
        }),
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        },
        AttributeType::Object(attrs) => {
            if let Some(obj) = value.as_object() {
                validate_object_type(attrs, obj, path, diagnostics);
            } else {
                diagnostics.push(type_error(path, "object", value));
            }
        },
    }
}

fn validate_object_type(
    attrs: &HashMap<String, AttributeType>,
    obj: &serde_json::Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for (name, attr_type) in attrs {
        if let Some(value) = obj.get(name) {
            if !value.is_null() {
                let attr_path = format!("{}.{}", path, name);
                validate_attribute_type(attr_type, value, &attr_path, diagnostics);
            }
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            if n.as_i64().is_some() {
                true
            } else if let Some(f) = n.as_f64() {
                // Check if the float is actually an integer
                f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
            } else {
                false
            }
        },
        _ => false,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Error,
        summary: format!("Invalid type for attribute '{}'", path),
        detail: Some(format!(
            "Expected {}, got {}",
            expected,
            value_type_name(got)
        )),
        attribute: Some(path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Schema};
    use serde_json::json;

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        // Valid
        let diagnostics = validate(&schema, &json!({"name": "test"}));
        assert!(diagnostics.is_empty());

        // Missing required
        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("name".to_string()));

        // Null value
        let diagnostics = validate(&schema, &json!({"name": null}));
        assert_eq!(diagnostics.len(), 1);

        // Wrong type
        let diagnostics = validate(&schema, &json!({"name": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_optional_attribute() {
        let schema = Schema::v0().with_attribute("ttl", Attribute::optional_computed_int64());

        let diagnostics = validate(&schema, &json!({"ttl": 300}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"ttl": null}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"ttl": "not a number"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute("identifier", Attribute::computed_string());

        let diagnostics = validate(&schema, &json!({}));
        assert!(diagnostics.is_empty());

        // Even with wrong type, we don't validate computed-only attrs
        let diagnostics = validate(&schema, &json!({"identifier": 123}));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_validate_int64() {
        let schema = Schema::v0().with_attribute("size", Attribute::required_int64());

        let diagnostics = validate(&schema, &json!({"size": 42}));
        assert!(diagnostics.is_empty());

        // Float that's actually an integer
        let diagnostics = validate(&schema, &json!({"size": 42.0}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"size": 42.5}));
        assert_eq!(diagnostics.len(), 1);

        let diagnostics = validate(&schema, &json!({"size": "42"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_bool() {
        let schema = Schema::v0().with_attribute("backup_enabled", Attribute::optional_computed_bool());

        let diagnostics = validate(&schema, &json!({"backup_enabled": true}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"backup_enabled": "true"}));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_validate_min_length() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string().with_min_length(1));

        let diagnostics = validate(&schema, &json!({"name": ""}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("at least 1"));

        let diagnostics = validate(&schema, &json!({"name": "x"}));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_validate_one_of() {
        let schema = Schema::v0()
            .with_attribute("type", Attribute::required_string().with_one_of(["A", "AAAA", "CNAME"]));

        assert!(is_valid(&schema, &json!({"type": "CNAME"})));

        let diagnostics = validate(&schema, &json!({"type": "PTR"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].detail.as_deref().unwrap().contains("\"PTR\""));
    }

    #[test]
    fn test_validator_hides_sensitive_value() {
        let schema = Schema::v0().with_attribute(
            "secret",
            Attribute::required_string().sensitive().with_one_of(["a", "b"]),
        );

        let diagnostics = validate(&schema, &json!({"secret": "hunter2"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].detail.as_deref().unwrap().contains("hunter2"));
    }

    #[test]
    fn test_validators_skipped_on_type_error() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string().with_min_length(3));

        let diagnostics = validate(&schema, &json!({"name": 1}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_object_list() {
        let schema = Schema::v0().with_attribute(
            "records",
            Attribute::new(
                AttributeType::list(AttributeType::object([("ttl", AttributeType::Int64)])),
                AttributeFlags::optional(),
            ),
        );

        let diagnostics = validate(&schema, &json!({"records": [{"ttl": 60}, {"ttl": null}]}));
        assert!(diagnostics.is_empty());

        let diagnostics = validate(&schema, &json!({"records": [{"ttl": 60}, {"ttl": "x"}]}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("records.1.ttl".to_string()));
    }

    #[test]
    fn test_validate_result_and_non_object() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate_result(&schema, &json!({"name": "ok"})).is_ok());
        let err = validate_result(&schema, &json!({})).unwrap_err();
        assert_eq!(err.len(), 1);

        let diagnostics = validate(&schema, &json!("scalar"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Expected object");
    }
}
