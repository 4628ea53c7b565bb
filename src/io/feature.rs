use geo::Geometry;
use serde_json::{Map, Value};

/// A single record of a vector layer: an optional geometry plus its attribute table row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub geometry: Option<Geometry<f64>>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry<f64>>, properties: Map<String, Value>) -> Self {
        Self { geometry, properties }
    }

    /// Get a raw attribute value, treating JSON null as absent.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|value| !value.is_null())
    }

    /// Get a numeric attribute; numeric strings are accepted.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a non-negative integer attribute; integral floats and numeric strings are accepted.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64().filter(|v| *v >= 0.0 && v.fract() == 0.0).map(|v| v as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a non-empty text attribute.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(properties: Value) -> Feature {
        Feature::new(None, properties.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn numeric_accessors_accept_strings_and_floats() {
        let f = feature(json!({ "a": 3, "b": "4.5", "c": 7.0, "d": -1, "e": "x" }));
        assert_eq!(f.get_u64("a"), Some(3));
        assert_eq!(f.get_f64("b"), Some(4.5));
        assert_eq!(f.get_u64("c"), Some(7));
        assert_eq!(f.get_u64("d"), None);
        assert_eq!(f.get_f64("e"), None);
        assert_eq!(f.get_f64("missing"), None);
    }

    #[test]
    fn null_and_blank_values_are_absent() {
        let f = feature(json!({ "a": null, "b": "  ", "c": " park " }));
        assert!(f.get("a").is_none());
        assert_eq!(f.get_str("b"), None);
        assert_eq!(f.get_str("c"), Some("park"));
    }
}
