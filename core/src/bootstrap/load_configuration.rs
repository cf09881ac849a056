use super::Bootstrapper;
use crate::configuration::Configuration;
use crate::error::{Error, Result};
use crate::plugin::Plugin;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads every `*.yaml` / `*.yml` file in the config directory and registers
/// each as a [`Configuration`] instance under `config.<file stem>`.
///
/// Not part of the default kernel; add it with `Kernel::with_bootstrappers`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadConfiguration;

impl LoadConfiguration {
  fn files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source: std::io::Error| Error::Read {
      path: dir.to_path_buf(),
      source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
      let path = entry.map_err(read_err)?.path();
      let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
      if is_yaml && path.is_file() {
        files.push(path);
      }
    }
    files.sort();
    Ok(files)
  }

  fn load(&self, path: &Path) -> Result<Configuration> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let document: Value = serde_yaml::from_str(&text).map_err(|source| Error::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let values = match document {
      Value::Mapping(values) => values,
      other => {
        return Err(Error::InvalidConfiguration {
          path: path.to_path_buf(),
          found: yaml_type(&other),
        })
      }
    };

    let name = path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default();
    Ok(Configuration::new(name, values))
  }
}

fn yaml_type(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Sequence(_) => "sequence",
    Value::Mapping(_) => "mapping",
    Value::Tagged(_) => "tagged value",
  }
}

impl Bootstrapper for LoadConfiguration {
  fn bootstrap(&self, plugin: &Plugin) -> Result<()> {
    let dir = plugin.config_path("");
    if !dir.is_dir() {
      tracing::debug!(path = %dir.display(), "no config directory");
      return Ok(());
    }

    for path in self.files(&dir)? {
      let config = self.load(&path)?;
      let id = format!("config.{}", config.name());
      tracing::debug!(config = %id, path = %path.display(), "configuration loaded");
      plugin.container().instance(id, Arc::new(config));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yaml_type_names() {
    assert_eq!(yaml_type(&Value::Null), "null");
    assert_eq!(yaml_type(&Value::Sequence(Vec::new())), "sequence");
    assert_eq!(yaml_type(&Value::String("x".into())), "string");
  }
}
