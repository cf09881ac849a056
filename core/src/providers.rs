//! The catalog of service providers a plugin can register by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use trellis_container::ServiceProvider;

pub type ProviderFactory = Arc<dyn Fn() -> Arc<dyn ServiceProvider> + Send + Sync>;

/// Provider names registered for every plugin unless excluded. Empty for now.
pub fn default_providers() -> Vec<String> {
  Vec::new()
}

/// Maps provider names to constructors.
#[derive(Clone, Default)]
pub struct ProviderCatalog {
  factories: HashMap<String, ProviderFactory>,
}

impl ProviderCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with<F, P>(mut self, name: impl Into<String>, factory: F) -> Self
  where
    F: Fn() -> P + Send + Sync + 'static,
    P: ServiceProvider + 'static,
  {
    self.insert(name, factory);
    self
  }

  /// Adds a provider built with `P::default()`.
  pub fn with_default<P>(self, name: impl Into<String>) -> Self
  where
    P: ServiceProvider + Default + 'static,
  {
    self.with(name, P::default)
  }

  pub fn insert<F, P>(&mut self, name: impl Into<String>, factory: F)
  where
    F: Fn() -> P + Send + Sync + 'static,
    P: ServiceProvider + 'static,
  {
    let factory: ProviderFactory = Arc::new(move || Arc::new(factory()) as Arc<dyn ServiceProvider>);
    self.factories.insert(name.into(), factory);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.factories.contains_key(name)
  }

  /// Builds a fresh provider, or `None` for an unknown name.
  pub fn create(&self, name: &str) -> Option<Arc<dyn ServiceProvider>> {
    self.factories.get(name).map(|factory| factory())
  }

  /// Known names, sorted.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }
}

impl fmt::Debug for ProviderCatalog {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProviderCatalog").field("names", &self.names()).finish()
  }
}
