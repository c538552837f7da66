//! Conversions between [`Value`] and plain data.

use super::{Attributes, Instance, RegExp, Value};
use crate::utils::format_iso8601;
use chrono::{DateTime, Utc};

impl Value {
    /// Plain-data form of this value.
    ///
    /// Dates become ISO 8601 strings, regular expressions `/source/flags`
    /// strings, and instances their own plain-data form. `Undefined`
    /// becomes `null` here; inside objects the key is dropped instead.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => attributes_to_json(map),
            Self::Date(dt) => serde_json::Value::String(format_iso8601(dt)),
            Self::RegExp(re) => serde_json::Value::String(re.to_string()),
            Self::Instance(instance) => instance.to_json(),
        }
    }
}

/// Plain-data form of an attribute map; `Undefined` entries are dropped.
#[must_use]
pub fn attributes_to_json(attributes: &Attributes) -> serde_json::Value {
    serde_json::Value::Object(
        attributes
            .iter()
            .filter(|(_, v)| !v.is_undefined())
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

/// Builds an attribute map from a JSON object.
///
/// Anything other than an object yields an empty map.
#[must_use]
pub fn attributes_from_json(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        _ => Attributes::new(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            obj @ serde_json::Value::Object(_) => Self::Object(attributes_from_json(obj)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Attributes> for Value {
    fn from(value: Attributes) -> Self {
        Self::Object(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<RegExp> for Value {
    fn from(value: RegExp) -> Self {
        Self::RegExp(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Self::Instance(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_round_trip_keeps_order() {
        let attrs = attributes_from_json(json!({"z": 1, "a": "x", "m": [true, null]}));
        let keys: Vec<_> = attrs.keys().cloned().collect();

        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(attributes_to_json(&attrs), json!({"z": 1, "a": "x", "m": [true, null]}));
    }

    #[test]
    fn test_whole_numbers_serialize_as_integers() {
        assert_eq!(Value::from(412).to_json(), json!(412));
        assert_eq!(Value::from(2.5).to_json(), json!(2.5));
        assert_eq!(Value::from(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_undefined_is_dropped_from_objects() {
        let mut attrs = Attributes::new();
        attrs.insert("published".to_string(), Value::Undefined);
        attrs.insert("title".to_string(), Value::from("Dune"));

        assert_eq!(attributes_to_json(&attrs), json!({"title": "Dune"}));
        assert_eq!(Value::Array(vec![Value::Undefined]).to_json(), json!([null]));
    }

    #[test]
    fn test_non_object_json_yields_empty_attributes() {
        assert!(attributes_from_json(json!([1, 2])).is_empty());
        assert!(attributes_from_json(json!("text")).is_empty());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
