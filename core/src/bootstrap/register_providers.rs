use super::Bootstrapper;
use crate::error::{Error, Result};
use crate::plugin::Plugin;
use crate::providers::default_providers;
use serde_yaml::Value;
use std::path::Path;

/// File under the bootstrap directory listing extra provider names.
pub const PROVIDERS_FILE: &str = "providers.yaml";

/// Registers the default providers that were not excluded, followed by the
/// ones listed in `<bootstrap>/providers.yaml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterServiceProviders;

impl RegisterServiceProviders {
  fn merge(&self, plugin: &Plugin) -> Result<Vec<String>> {
    let excluded = plugin.excluded_providers();
    let mut providers: Vec<String> = default_providers()
      .into_iter()
      .filter(|name| !excluded.contains(name))
      .collect();

    let path = plugin.bootstrap_path(PROVIDERS_FILE);
    if path.is_file() {
      providers.extend(configured(plugin, &path)?);
    }
    Ok(providers)
  }
}

fn configured(plugin: &Plugin, path: &Path) -> Result<Vec<String>> {
  let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let document: Value = serde_yaml::from_str(&text).map_err(|source| Error::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let Value::Sequence(entries) = document else {
    tracing::warn!(path = %path.display(), "providers file is not a list; ignoring it");
    return Ok(Vec::new());
  };

  let mut names = Vec::with_capacity(entries.len());
  for entry in entries {
    match entry.as_str() {
      Some(name) if plugin.catalog().contains(name) => names.push(name.to_owned()),
      Some(name) => tracing::warn!(provider = name, "unknown service provider in providers file"),
      None => tracing::warn!(entry = ?entry, "ignoring non-string entry in providers file"),
    }
  }
  Ok(names)
}

impl Bootstrapper for RegisterServiceProviders {
  fn bootstrap(&self, plugin: &Plugin) -> Result<()> {
    let providers = self.merge(plugin)?;
    plugin.register_configured_providers(providers.as_slice())
  }
}
