//! Named arguments handed to a factory at resolution time.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A map of named values passed through `make_with` to the binding's factory.
///
/// The container never inspects or modifies the map; factories receive
/// exactly what the caller supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
  values: BTreeMap<String, Value>,
}

impl Parameters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.values.insert(name.into(), value.into())
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  pub fn get_str(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(Value::as_str)
  }

  pub fn get_i64(&self, name: &str) -> Option<i64> {
    self.get(name).and_then(Value::as_i64)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// Deserializes the whole map into `T`, treating it as a JSON object.
  pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
    let object: Map<String, Value> = self
      .values
      .iter()
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect();
    serde_json::from_value(Value::Object(object))
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}
