//! Schema Validator — checks AI-returned JSON payloads against declarative schemas.
//!
//! The remote analysis service returns semi-structured JSON; nothing downstream
//! may trust a payload until it has passed its schema here. One recursive
//! evaluator covers flat schemas, nested object schemas, map-of-object schemas
//! (evaluation scores keyed by category), and string-element checks on arrays.
//!
//! Errors accumulate — every declared field is checked even after an earlier
//! one fails, so a single pass reports all problems at once.

use serde_json::Value;

pub mod schemas;

/// Length constraint on an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Any,
    Exactly(usize),
    AtLeast(usize),
}

/// Per-element constraint on an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRule {
    String,
}

/// Declared kind of a single schema field.
#[derive(Debug, Clone)]
pub enum FieldRule {
    String,
    Number,
    Array {
        length: LengthRule,
        element: Option<ElementRule>,
    },
    /// Nested object validated against its own schema.
    Object(Schema),
    /// Object whose values are all validated against the same schema,
    /// whatever keys are present. Used for per-category evaluation scores.
    MapOf(Schema),
}

/// One named field in a schema. Declaration order is the order errors are
/// reported in.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub rule: FieldRule,
}

/// An ordered set of field rules.
#[derive(Debug, Clone)]
pub struct Schema(pub Vec<Field>);

/// Outcome of validating one payload. `is_valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// All violations joined into the single user-facing message the
    /// orchestrating caller displays.
    pub fn message(&self) -> String {
        self.errors.join(", ")
    }
}

/// Validates `candidate` against `schema`.
///
/// Schema-driven: extra fields on the candidate are silently ignored. A
/// candidate that is not an object at all reports every schema field as
/// missing. A missing field produces exactly one error and no further checks
/// on that field.
pub fn validate(schema: &Schema, candidate: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    check_fields(schema, candidate, "", &mut errors);
    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_fields(schema: &Schema, value: &Value, prefix: &str, errors: &mut Vec<String>) {
    for field in &schema.0 {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        // Value::get is None on non-objects too, so a scalar where an object
        // was expected reports every declared field as missing.
        match value.get(field.name) {
            None => errors.push(format!("Missing property: {path}")),
            Some(v) => check_rule(&field.rule, v, &path, errors),
        }
    }
}

fn check_rule(rule: &FieldRule, value: &Value, path: &str, errors: &mut Vec<String>) {
    match rule {
        FieldRule::String => {
            if !value.is_string() {
                errors.push(type_error(path, "string", value));
            }
        }
        FieldRule::Number => {
            if !value.is_number() {
                errors.push(type_error(path, "number", value));
            }
        }
        FieldRule::Array { length, element } => match value.as_array() {
            // Length is only evaluated once the array check passed.
            None => errors.push(type_error(path, "array", value)),
            Some(items) => {
                match *length {
                    LengthRule::Exactly(n) if items.len() != n => errors.push(format!(
                        "Invalid length for {path}: expected {n} items, got {}",
                        items.len()
                    )),
                    LengthRule::AtLeast(n) if items.len() < n => errors.push(format!(
                        "Invalid length for {path}: expected at least {n} items, got {}",
                        items.len()
                    )),
                    _ => {}
                }
                if let Some(ElementRule::String) = element {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            errors.push(type_error(&format!("{path}[{i}]"), "string", item));
                        }
                    }
                }
            }
        },
        FieldRule::Object(inner) => {
            if value.is_object() {
                check_fields(inner, value, path, errors);
            } else {
                errors.push(type_error(path, "object", value));
            }
        }
        FieldRule::MapOf(inner) => match value.as_object() {
            None => errors.push(type_error(path, "object", value)),
            Some(map) => {
                for (key, entry) in map {
                    let entry_path = format!("{path}.{key}");
                    if entry.is_object() {
                        check_fields(inner, entry, &entry_path, errors);
                    } else {
                        errors.push(type_error(&entry_path, "object", entry));
                    }
                }
            }
        },
    }
}

fn type_error(path: &str, expected: &str, actual: &Value) -> String {
    format!(
        "Invalid type for {path}: expected {expected}, got {}",
        type_name(actual)
    )
}

/// Runtime type name reported in mismatch messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
