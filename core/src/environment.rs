//! Environment type and runtime flag detection.

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Variable holding the environment type.
pub const ENVIRONMENT_TYPE_VAR: &str = "WP_ENVIRONMENT_TYPE";

/// The deployment stage the plugin runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
  Production,
  Staging,
  Development,
  Local,
}

impl EnvironmentType {
  pub const ALL: [EnvironmentType; 4] = [
    EnvironmentType::Production,
    EnvironmentType::Staging,
    EnvironmentType::Development,
    EnvironmentType::Local,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      EnvironmentType::Production => "production",
      EnvironmentType::Staging => "staging",
      EnvironmentType::Development => "development",
      EnvironmentType::Local => "local",
    }
  }

  /// Human-readable name.
  pub fn label(self) -> &'static str {
    match self {
      EnvironmentType::Production => "Production",
      EnvironmentType::Staging => "Staging",
      EnvironmentType::Development => "Development",
      EnvironmentType::Local => "Local",
    }
  }

  /// True if `self` is any of `types`.
  pub fn is(self, types: &[EnvironmentType]) -> bool {
    types.contains(&self)
  }
}

impl FromStr for EnvironmentType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    EnvironmentType::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| Error::InvalidEnvironment(s.to_string()))
  }
}

impl fmt::Display for EnvironmentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Looks up a variable by name.
pub type VariableSource = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the environment type and runtime flags from a variable source.
///
/// The environment type is read once and cached. Flags are read on every
/// call; a missing variable is `false`.
pub struct Environment {
  source: VariableSource,
  environment_type: OnceCell<EnvironmentType>,
}

impl Environment {
  /// Reads from the process environment.
  pub fn from_process() -> Self {
    Self::from_source(|name| std::env::var(name).ok())
  }

  pub fn from_source<F>(source: F) -> Self
  where
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
  {
    Self {
      source: Arc::new(source),
      environment_type: OnceCell::new(),
    }
  }

  /// Reads from a fixed map. Mostly useful in tests.
  pub fn from_map<I, K, V>(vars: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let vars: HashMap<String, String> = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    Self::from_source(move |name| vars.get(name).cloned())
  }

  /// The environment type, defaulting to production when unset or empty.
  /// Unlike `wp_get_environment_type()`, an unrecognised value is an error
  /// rather than production.
  pub fn environment_type(&self) -> Result<EnvironmentType> {
    self
      .environment_type
      .get_or_try_init(|| match (self.source)(ENVIRONMENT_TYPE_VAR) {
        Some(value) if !value.trim().is_empty() => value.trim().parse(),
        _ => Ok(EnvironmentType::Production),
      })
      .copied()
  }

  fn is_type(&self, expected: EnvironmentType) -> bool {
    self.environment_type().is_ok_and(|t| t == expected)
  }

  pub fn is_production(&self) -> bool {
    self.is_type(EnvironmentType::Production)
  }

  pub fn is_staging(&self) -> bool {
    self.is_type(EnvironmentType::Staging)
  }

  pub fn is_development(&self) -> bool {
    self.is_type(EnvironmentType::Development)
  }

  pub fn is_local(&self) -> bool {
    self.is_type(EnvironmentType::Local)
  }

  fn flag(&self, name: &str) -> bool {
    (self.source)(name).is_some_and(|value| {
      matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
      )
    })
  }

  pub fn is_debug(&self) -> bool {
    self.flag("WP_DEBUG")
  }

  pub fn is_debug_display(&self) -> bool {
    self.flag("WP_DEBUG_DISPLAY")
  }

  pub fn is_debug_log(&self) -> bool {
    self.flag("WP_DEBUG_LOG")
  }

  pub fn is_script_debug(&self) -> bool {
    self.flag("SCRIPT_DEBUG")
  }

  pub fn is_admin(&self) -> bool {
    self.flag("WP_ADMIN")
  }

  pub fn is_ajax(&self) -> bool {
    self.flag("DOING_AJAX")
  }

  pub fn is_cli(&self) -> bool {
    self.flag("WP_CLI")
  }

  pub fn is_cron(&self) -> bool {
    self.flag("DOING_CRON")
  }

  pub fn is_rest(&self) -> bool {
    self.flag("REST_REQUEST")
  }

  pub fn is_xml_rpc(&self) -> bool {
    self.flag("XMLRPC_REQUEST")
  }

  pub fn is_importing(&self) -> bool {
    self.flag("WP_IMPORTING")
  }

  pub fn is_installing(&self) -> bool {
    self.flag("WP_INSTALLING")
  }

  pub fn is_multisite(&self) -> bool {
    self.flag("MULTISITE")
  }
}

impl fmt::Debug for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Environment")
      .field("environment_type", &self.environment_type.get())
      .finish_non_exhaustive()
  }
}
