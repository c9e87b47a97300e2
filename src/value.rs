use std::fmt;

use crate::util::{integer_prefix, real_prefix};

/// A single scalar payload read from the right-hand side of a `key=value` row.
///
/// The payload is kept verbatim. Typed accessors parse on demand; the `get_*` forms fall back
/// to zero when the payload doesn't start with a number, the `parse_*` forms report that as
/// `None`.
///
/// An empty `Value` (see [`Value::default`]) is what lookups return for missing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Value {
    raw: String,
}

impl Value {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The raw payload.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Parses the leading integer of the payload. Values outside the `i32` range are `None`.
    #[must_use]
    pub fn parse_int(&self) -> Option<i32> {
        integer_prefix(&self.raw)?.parse().ok()
    }

    #[must_use]
    pub fn parse_long(&self) -> Option<i64> {
        integer_prefix(&self.raw)?.parse().ok()
    }

    #[must_use]
    pub fn parse_real(&self) -> Option<f64> {
        real_prefix(&self.raw)?.parse().ok()
    }

    #[must_use]
    pub fn get_int(&self) -> i32 {
        self.parse_int().unwrap_or_default()
    }

    #[must_use]
    pub fn get_long(&self) -> i64 {
        self.parse_long().unwrap_or_default()
    }

    #[must_use]
    pub fn get_real(&self) -> f64 {
        self.parse_real().unwrap_or_default()
    }

    /// Only the exact payloads `1` and `true` are truthy.
    #[must_use]
    pub fn get_bool(&self) -> bool {
        matches!(self.raw.as_str(), "1" | "true")
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self { raw: value }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self {
            raw: value.to_owned(),
        }
    }
}

impl AsRef<str> for Value {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.raw == *other
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.get_int() == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.get_long() == *other
    }
}

impl PartialEq<f64> for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &f64) -> bool {
        self.get_real() == *other
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.get_bool() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_payload_is_verbatim() {
        let value = Value::from("  spaced out  ");
        assert_eq!(value.get(), "  spaced out  ");
        assert_eq!(value.to_string(), "  spaced out  ");
    }

    #[test]
    fn default_is_empty() {
        let value = Value::default();
        assert!(value.is_empty());
        assert_eq!(value.get(), "");
        assert_eq!(value.get_int(), 0);
        assert!(!value.get_bool());
    }

    #[test]
    fn numbers_from_leading_content() {
        let value = Value::from("5432");
        assert_eq!(value.get_int(), 5432);
        assert_eq!(value.get_long(), 5432);
        assert!((value.get_real() - 5432.0).abs() < f64::EPSILON);

        assert_eq!(Value::from("42px").get_int(), 42);
        assert!((Value::from("0.75 ratio").get_real() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_falls_back_to_zero() {
        let value = Value::from("abc");
        assert_eq!(value.parse_int(), None);
        assert_eq!(value.get_int(), 0);
        assert_eq!(value.get_long(), 0);
        assert!(value.get_real().abs() < f64::EPSILON);
    }

    #[test]
    fn int_out_of_range_falls_back_to_zero() {
        let value = Value::from("3000000000");
        assert_eq!(value.parse_int(), None);
        assert_eq!(value.get_int(), 0);
        assert_eq!(value.get_long(), 3_000_000_000);
    }

    #[test]
    fn bool_is_case_sensitive() {
        assert!(Value::from("1").get_bool());
        assert!(Value::from("true").get_bool());

        for payload in ["TRUE", "True", "yes", "on", "0", "false", "", " true"] {
            assert!(!Value::from(payload).get_bool(), "{payload:?}");
        }
    }

    #[test]
    fn equality_coerces_through_conversions() {
        let port = Value::from("5432");
        assert_eq!(port, "5432");
        assert_eq!(port, String::from("5432"));
        assert_eq!(port, 5432_i32);
        assert_eq!(port, 5432_i64);
        assert_eq!(port, 5432.0_f64);
        assert_eq!(port, Value::from("5432"));
        assert_ne!(port, Value::from("5432 "));

        assert_eq!(Value::from("true"), true);
        assert_eq!(Value::from("nope"), false);
        assert_eq!(Value::from("nope"), 0_i32);
    }
}
