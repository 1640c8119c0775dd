//! Request payload validation against declared shapes.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

/// Must contain at least one non-whitespace character.
const NON_BLANK: &str = r"\S";

/// Compiled shape patterns, keyed by their source text.
static PATTERNS: LazyLock<Mutex<HashMap<&'static str, Regex>>> = LazyLock::new(Default::default);

fn compiled(pattern: &'static str) -> Result<Regex, regex::Error> {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    cache.insert(pattern, re.clone());
    Ok(re)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

/// Constraint set for one named field of a shape.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    pub max_length: Option<usize>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub pattern: Option<&'static str>,
}

impl FieldRule {
    pub const fn string(name: &'static str) -> Self {
        FieldRule {
            name,
            kind: FieldKind::String,
            nullable: false,
            max_length: None,
            minimum: None,
            maximum: None,
            pattern: None,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        FieldRule {
            kind: FieldKind::Integer,
            ..FieldRule::string(name)
        }
    }

    pub const fn nullable(self) -> Self {
        FieldRule { nullable: true, ..self }
    }

    pub const fn max_length(self, n: usize) -> Self {
        FieldRule { max_length: Some(n), ..self }
    }

    pub const fn range(self, min: i64, max: i64) -> Self {
        FieldRule {
            minimum: Some(min),
            maximum: Some(max),
            ..self
        }
    }

    pub const fn pattern(self, re: &'static str) -> Self {
        FieldRule { pattern: Some(re), ..self }
    }
}

/// Named set of field rules describing a request payload.
#[derive(Clone, Debug)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

pub const CATEGORY_SHAPE: Shape = Shape {
    name: "category",
    fields: &[FieldRule::string("category_name").max_length(128).pattern(NON_BLANK)],
};

pub const GOOD_SHAPE: Shape = Shape {
    name: "good",
    fields: &[
        FieldRule::string("product_name").max_length(128).pattern(NON_BLANK),
        FieldRule::integer("category_id").range(1, i32::MAX as i64),
        FieldRule::integer("price").nullable().range(0, i32::MAX as i64),
    ],
};

pub const GOOD_UPDATE_SHAPE: Shape = Shape {
    name: "good_update",
    fields: &[FieldRule::string("product_name").max_length(128).pattern(NON_BLANK)],
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Report fields that are absent, null, or an empty string.
pub fn require_fields(body: &Map<String, Value>, fields: &[&str]) -> Result<(), Vec<Violation>> {
    let missing: Vec<Violation> = fields
        .iter()
        .filter(|f| match body.get(**f) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .map(|f| Violation::new(*f, "is required"))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Shallow structural check of `value` against `shape`.
/// Unknown fields are ignored and absent fields are not reported; presence is `require_fields`' job.
pub fn validate(shape: &Shape, value: &Value) -> Result<(), Vec<Violation>> {
    let Value::Object(obj) = value else {
        return Err(vec![Violation::new("", format!("{} must be a JSON object", shape.name))]);
    };
    let mut violations = Vec::new();
    for rule in shape.fields {
        if let Some(v) = obj.get(rule.name) {
            validate_field(rule, v, &mut violations);
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn validate_field(rule: &FieldRule, v: &Value, out: &mut Vec<Violation>) {
    let col = rule.name;
    if v.is_null() {
        if !rule.nullable {
            out.push(Violation::new(col, "must not be null"));
        }
        return;
    }
    match rule.kind {
        FieldKind::String => {
            let Some(s) = v.as_str() else {
                out.push(Violation::new(col, "must be a string"));
                return;
            };
            if let Some(max) = rule.max_length {
                if s.chars().count() > max {
                    out.push(Violation::new(col, format!("must be at most {} characters", max)));
                }
            }
            if let Some(pattern) = rule.pattern {
                match compiled(pattern) {
                    Ok(re) if !re.is_match(s) => {
                        out.push(Violation::new(col, "does not match required pattern"));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(field = col, error = %e, "invalid pattern in shape");
                        out.push(Violation::new(col, "cannot be checked"));
                    }
                }
            }
        }
        FieldKind::Integer => {
            let Some(n) = v.as_i64() else {
                out.push(Violation::new(col, "must be an integer"));
                return;
            };
            if let Some(min) = rule.minimum {
                if n < min {
                    out.push(Violation::new(col, format!("must be at least {}", min)));
                }
            }
            if let Some(max) = rule.maximum {
                if n > max {
                    out.push(Violation::new(col, format!("must be at most {}", max)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Result<(), Vec<Violation>>) -> Vec<String> {
        v.err().unwrap_or_default().into_iter().map(|v| v.field).collect()
    }

    #[test]
    fn category_accepts_plain_name_and_ignores_extras() {
        assert!(validate(&CATEGORY_SHAPE, &json!({"category_name": "Dairy", "colour": "white"})).is_ok());
    }

    #[test]
    fn absent_fields_are_not_validation_errors() {
        assert!(validate(&GOOD_SHAPE, &json!({})).is_ok());
    }

    #[test]
    fn bare_string_is_not_a_payload() {
        let err = validate(&CATEGORY_SHAPE, &json!("Dairy")).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "");
        assert_eq!(err[0].message, "category must be a JSON object");
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let ok = "é".repeat(128);
        assert!(validate(&CATEGORY_SHAPE, &json!({ "category_name": ok })).is_ok());
        let long = "a".repeat(129);
        let err = validate(&CATEGORY_SHAPE, &json!({ "category_name": long })).unwrap_err();
        assert_eq!(err[0].message, "must be at most 128 characters");
    }

    #[test]
    fn blank_name_fails_pattern() {
        let err = validate(&CATEGORY_SHAPE, &json!({"category_name": "   "})).unwrap_err();
        assert_eq!(err[0].message, "does not match required pattern");
    }

    #[test]
    fn patterns_are_compiled_once() {
        let first = compiled(NON_BLANK).unwrap();
        let second = compiled(NON_BLANK).unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert!(PATTERNS.lock().unwrap().contains_key(NON_BLANK));
        assert!(compiled("(unclosed").is_err());
        assert!(!PATTERNS.lock().unwrap().contains_key("(unclosed"));
    }

    #[test]
    fn collects_every_violation() {
        let v = validate(
            &GOOD_SHAPE,
            &json!({"product_name": 5, "category_id": "3", "price": -1}),
        );
        assert_eq!(fields(v), vec!["product_name", "category_id", "price"]);
    }

    #[test]
    fn price_may_be_null_but_category_id_may_not() {
        assert!(validate(&GOOD_SHAPE, &json!({"product_name": "Milk", "category_id": 1, "price": null})).is_ok());
        let err = validate(&GOOD_SHAPE, &json!({"category_id": null})).unwrap_err();
        assert_eq!(err[0].message, "must not be null");
    }

    #[test]
    fn integers_reject_fractions_and_overflow() {
        let err = validate(&GOOD_SHAPE, &json!({"price": 1.5})).unwrap_err();
        assert_eq!(err[0].message, "must be an integer");
        let err = validate(&GOOD_SHAPE, &json!({"category_id": 3_000_000_000i64})).unwrap_err();
        assert_eq!(err[0].message, format!("must be at most {}", i32::MAX));
        let err = validate(&GOOD_SHAPE, &json!({"category_id": 0})).unwrap_err();
        assert_eq!(err[0].message, "must be at least 1");
    }

    #[test]
    fn require_fields_treats_null_and_empty_as_missing() {
        let body = json!({"product_name": "", "category_id": null, "price": 0});
        let Value::Object(map) = body else { unreachable!() };
        let err = require_fields(&map, &["product_name", "category_id", "price"]).unwrap_err();
        assert_eq!(
            err,
            vec![
                Violation::new("product_name", "is required"),
                Violation::new("category_id", "is required"),
            ]
        );
    }
}
