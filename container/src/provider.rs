//! Service providers group related registrations.

use crate::container::Container;
use crate::error::Result;

/// A unit of registration.
///
/// `register` should only bind things. `boot` runs after every provider has
/// registered, so it may resolve services bound by other providers.
pub trait ServiceProvider: Send + Sync {
  /// Registers services with the container.
  fn register(&self, _container: &Container) -> Result<()> {
    Ok(())
  }

  /// Bootstraps any services registered by this provider.
  fn boot(&self, _container: &Container) -> Result<()> {
    Ok(())
  }

  /// The identifiers this provider binds.
  fn provides(&self) -> Vec<String> {
    Vec::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Empty;
  impl ServiceProvider for Empty {}

  #[test]
  fn defaults_do_nothing() {
    let container = Container::new();
    let provider = Empty;

    provider.register(&container).unwrap();
    provider.boot(&container).unwrap();

    assert!(provider.provides().is_empty());
    assert!(format!("{:?}", container).contains("bindings: []"));
  }
}
