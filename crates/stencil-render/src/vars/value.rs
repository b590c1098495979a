//! Typed variable values and string coercion.
//!
//! Structured sources (JSON, YAML) arrive already typed. Untyped sources
//! (`.env` files, inline `key=value` tokens) arrive as strings and go through
//! [`coerce`] or [`coerce_inline`], the only two places that guess types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Words that coerce to `true` (compared case-insensitively).
pub const TRUTHY: &[&str] = &["true", "t", "yes", "y", "1"];

/// Words that coerce to `false` (compared case-insensitively).
pub const FALSY: &[&str] = &["false", "f", "no", "n", "0"];

/// A variable value as seen by templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// Applies [`coerce`] to string values; every other variant passes through.
    pub fn coerced(self) -> Self {
        match self {
            Value::String(s) => coerce(&s),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

/// Returns true when `s` is in the truthy vocabulary.
///
/// Anything else, including the empty string, is false.
pub fn is_truthy(s: &str) -> bool {
    TRUTHY.iter().any(|word| word.eq_ignore_ascii_case(s))
}

fn is_falsy(s: &str) -> bool {
    FALSY.iter().any(|word| word.eq_ignore_ascii_case(s))
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Digits with exactly one `.` somewhere, e.g. `3.14`, `.5`, `5.`.
fn is_simple_decimal(s: &str) -> bool {
    s.matches('.').count() == 1 && all_digits(&s.replacen('.', "", 1))
}

fn parse_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if all_digits(digits) {
        s.parse().ok()
    } else {
        None
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    if is_simple_decimal(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// Converts a raw string into its most specific [`Value`].
///
/// Precedence: boolean vocabulary, then integer (digits with an optional
/// leading `-`), then float (exactly one `.`, otherwise digits), then the
/// string itself. Integers that overflow `i64` stay strings.
pub fn coerce(raw: &str) -> Value {
    if is_truthy(raw) {
        return Value::Bool(true);
    }
    if is_falsy(raw) {
        return Value::Bool(false);
    }
    if let Some(n) = parse_integer(raw) {
        return Value::Integer(n);
    }
    if let Some(f) = parse_decimal(raw) {
        return Value::Float(f);
    }
    Value::String(raw.to_string())
}

/// Reduced coercion for inline `key=value` tokens.
///
/// Only the `true`/`false` literals become booleans, so `1` is an integer
/// here and `-7` stays a string.
pub fn coerce_inline(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if all_digits(raw) {
        if let Ok(n) = raw.parse() {
            return Value::Integer(n);
        }
    }
    if let Some(f) = parse_decimal(raw) {
        return Value::Float(f);
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truthy_vocabulary() {
        for raw in ["true", "True", "TRUE", "t", "yes", "Y", "1"] {
            assert_eq!(coerce(raw), Value::Bool(true), "{raw}");
        }
    }

    #[test]
    fn test_falsy_vocabulary() {
        for raw in ["false", "False", "f", "no", "N", "0"] {
            assert_eq!(coerce(raw), Value::Bool(false), "{raw}");
        }
    }

    #[test]
    fn test_integers() {
        assert_eq!(coerce("42"), Value::Integer(42));
        assert_eq!(coerce("-7"), Value::Integer(-7));
        assert_eq!(coerce("007"), Value::Integer(7));
    }

    #[test]
    fn test_floats() {
        assert_eq!(coerce("3.14"), Value::Float("3.14".parse().unwrap()));
        assert_eq!(coerce(".5"), Value::Float(0.5));
        assert_eq!(coerce("5."), Value::Float(5.0));
    }

    #[test]
    fn test_strings_stay_strings() {
        assert_eq!(coerce("3.14.15"), Value::from("3.14.15"));
        assert_eq!(coerce("abc"), Value::from("abc"));
        assert_eq!(coerce(""), Value::from(""));
        assert_eq!(coerce("-"), Value::from("-"));
        assert_eq!(coerce("."), Value::from("."));
        assert_eq!(coerce("--1"), Value::from("--1"));
        assert_eq!(coerce("1e5"), Value::from("1e5"));
    }

    #[test]
    fn test_integer_overflow_stays_string() {
        let huge = "99999999999999999999999";
        assert_eq!(coerce(huge), Value::from(huge));
    }

    #[test]
    fn test_coerced_passes_non_strings_through() {
        assert_eq!(Value::Integer(3).coerced(), Value::Integer(3));
        assert_eq!(Value::from("yes").coerced(), Value::Bool(true));
        let seq = Value::Sequence(vec![Value::from("1")]);
        assert_eq!(seq.clone().coerced(), seq);
    }

    #[test]
    fn test_inline_rules_are_reduced() {
        assert_eq!(coerce_inline("True"), Value::Bool(true));
        assert_eq!(coerce_inline("false"), Value::Bool(false));
        assert_eq!(coerce_inline("1"), Value::Integer(1));
        assert_eq!(coerce_inline("yes"), Value::from("yes"));
        assert_eq!(coerce_inline("-7"), Value::from("-7"));
        assert_eq!(coerce_inline("2.5"), Value::Float(2.5));
    }

    #[test]
    fn test_serializes_untagged() {
        let mut map = BTreeMap::new();
        map.insert("on".to_string(), Value::Bool(true));
        map.insert("n".to_string(), Value::Integer(2));
        let json = serde_json::to_string(&Value::Mapping(map)).unwrap();
        assert_eq!(json, r#"{"n":2,"on":true}"#);
    }

    proptest! {
        #[test]
        fn prop_positive_integers_coerce(n in 2i64..i64::MAX) {
            prop_assert_eq!(coerce(&n.to_string()), Value::Integer(n));
        }

        #[test]
        fn prop_negative_integers_coerce(n in i64::MIN..0i64) {
            prop_assert_eq!(coerce(&n.to_string()), Value::Integer(n));
        }

        #[test]
        fn prop_alphabetic_words_outside_vocabulary_stay_strings(s in "[a-z]{2,12}") {
            prop_assume!(!is_truthy(&s) && !is_falsy(&s));
            prop_assert_eq!(coerce(&s), Value::String(s.clone()));
        }

        #[test]
        fn prop_coerce_never_panics(s in "\\PC*") {
            let _ = coerce(&s);
            let _ = coerce_inline(&s);
        }
    }
}
