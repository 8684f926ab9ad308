use serde_json::{Map, Value};

/// Open, string-keyed payload accepted by the prediction endpoint.
///
/// No key is required. The recognised keys are [`InputRecord::VALUE`],
/// [`InputRecord::EMAIL`] and [`InputRecord::NAME`]; anything else is carried along
/// untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputRecord {
    fields: Map<String, Value>,
}

impl InputRecord {
    pub const VALUE: &'static str = "value";
    pub const EMAIL: &'static str = "email";
    pub const NAME: &'static str = "name";

    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, returning `None` when it is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Raw `value` entry as supplied by the caller.
    pub fn value(&self) -> Option<&Value> {
        self.get(Self::VALUE)
    }
}

/// Lenient numeric conversion used for the `value` field.
///
/// Numbers convert directly, strings are trimmed and parsed, booleans map to 1 and 0.
/// Null, arrays, objects and NaN are rejected.
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }?;

    if number.is_nan() {
        None
    } else {
        Some(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_only_accepts_objects() {
        assert!(InputRecord::from_value(json!({})).is_some());
        assert!(InputRecord::from_value(json!([1, 2])).is_none());
        assert!(InputRecord::from_value(Value::Null).is_none());
        assert!(InputRecord::from_value(json!("value")).is_none());
    }

    #[test]
    fn as_number_is_lenient_with_strings_and_booleans() {
        assert_eq!(as_number(&json!(42)), Some(42.0));
        assert_eq!(as_number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(as_number(&json!(true)), Some(1.0));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!("NaN")), None);
        assert_eq!(as_number(&Value::Null), None);
        assert_eq!(as_number(&json!([50])), None);
    }

    #[test]
    fn builder_keeps_unrecognised_keys() {
        let record = InputRecord::new()
            .with(InputRecord::VALUE, 10)
            .with("extra", "kept");
        assert_eq!(record.get("extra"), Some(&json!("kept")));
        assert_eq!(record.value(), Some(&json!(10)));
    }
}
