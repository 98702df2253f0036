use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shape::value_type_name;

/// Error type for answer access operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for key: {0}")]
    Missing(String),

    #[error("Type mismatch at key '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Could not deserialize answers: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// The running answer record threaded through questions and surveys.
///
/// Keys keep insertion order. Merging is shallow and right-biased: a later
/// answer for the same key replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: Map<String, Value>,
}

impl Answers {
    /// Create a new empty answer record.
    pub fn new() -> Self {
        Self { values: Map::new() }
    }

    /// Insert an answer, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get the answer for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check if an answer exists for a key.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over all key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Iterate over the answered keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow, right-biased merge: keys from `other` overwrite keys in `self`.
    pub fn merge(&mut self, other: Answers) {
        self.values.extend(other.values);
    }

    /// Borrow the underlying JSON map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Convert into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    // === Convenience accessors ===

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, AnswerError> {
        let value = self
            .get(key)
            .ok_or_else(|| AnswerError::Missing(key.to_string()))?;
        extract(value).ok_or_else(|| AnswerError::TypeMismatch {
            key: key.to_string(),
            expected,
            actual: value_type_name(value),
        })
    }

    /// Get a string answer.
    pub fn get_string(&self, key: &str) -> Result<&str, AnswerError> {
        self.typed(key, "string", Value::as_str)
    }

    /// Get a numeric answer as a float.
    pub fn get_number(&self, key: &str) -> Result<f64, AnswerError> {
        self.typed(key, "number", Value::as_f64)
    }

    /// Get an integral numeric answer.
    pub fn get_int(&self, key: &str) -> Result<i64, AnswerError> {
        self.typed(key, "integer", Value::as_i64)
    }

    /// Get a boolean answer.
    pub fn get_bool(&self, key: &str) -> Result<bool, AnswerError> {
        self.typed(key, "boolean", Value::as_bool)
    }

    /// Get a list answer (as produced by `checkbox`).
    pub fn get_list(&self, key: &str) -> Result<&[Value], AnswerError> {
        self.typed(key, "array", |v| v.as_array().map(Vec::as_slice))
    }

    /// Deserialize a single answer into a typed value.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, AnswerError> {
        let value = self
            .get(key)
            .ok_or_else(|| AnswerError::Missing(key.to_string()))?;
        Ok(T::deserialize(value)?)
    }

    /// Deserialize the whole record into a caller-defined typed struct.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, AnswerError> {
        Ok(serde_json::from_value(self.into_value())?)
    }
}

impl From<Map<String, Value>> for Answers {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl TryFrom<Value> for Answers {
    type Error = AnswerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(AnswerError::TypeMismatch {
                key: String::new(),
                expected: "object",
                actual: value_type_name(&other),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for (key, value) in iter {
            answers.insert(key, value);
        }
        answers
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Answers {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Answers {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_and_get() {
        let mut answers = Answers::new();
        answers.insert("name", "Alice");
        answers.insert("age", 30);

        assert_eq!(answers.get_string("name").unwrap(), "Alice");
        assert_eq!(answers.get_int("age").unwrap(), 30);
        assert_eq!(answers.get_number("age").unwrap(), 30.0);
    }

    #[test]
    fn merge_is_right_biased() {
        let mut answers = Answers::from_iter([("x", 1), ("y", 1)]);
        answers.merge(Answers::new().with("x", 2));

        assert_eq!(answers.get("x"), Some(&json!(2)));
        assert_eq!(answers.get("y"), Some(&json!(1)));
        assert_eq!(answers.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn type_mismatch_error() {
        let answers = Answers::new().with("age", 30);

        let result = answers.get_string("age");
        assert!(matches!(
            result,
            Err(AnswerError::TypeMismatch {
                expected: "string",
                actual: "number",
                ..
            })
        ));
        assert!(matches!(
            answers.get_bool("smoke"),
            Err(AnswerError::Missing(key)) if key == "smoke"
        ));
    }

    #[test]
    fn list_answers() {
        let answers = Answers::new().with("apparel", json!(["hats", "shoes"]));
        let list = answers.get_list("apparel").unwrap();
        assert_eq!(list, &[json!("hats"), json!("shoes")]);

        let typed: Vec<String> = answers.get_as("apparel").unwrap();
        assert_eq!(typed, vec!["hats".to_string(), "shoes".to_string()]);
    }

    #[test]
    fn into_typed_record() {
        #[derive(Deserialize)]
        struct Profile {
            name: String,
            smoke: bool,
        }

        let answers = Answers::try_from(json!({ "name": "Bob", "smoke": false })).unwrap();
        let profile: Profile = answers.into_record().unwrap();
        assert_eq!(profile.name, "Bob");
        assert!(!profile.smoke);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Answers::try_from(json!([1, 2])).is_err());
    }
}
