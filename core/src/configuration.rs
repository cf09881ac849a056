use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

/// One configuration file, registered in the container as `config.<name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
  name: String,
  values: Mapping,
}

impl Configuration {
  pub fn new(name: impl Into<String>, values: Mapping) -> Self {
    Self {
      name: name.into(),
      values,
    }
  }

  /// The file stem this configuration was loaded from.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.values.get(key)
  }

  pub fn values(&self) -> &Mapping {
    &self.values
  }

  /// Deserializes the whole mapping into a typed struct.
  pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_value(Value::Mapping(self.values.clone()))
  }
}
