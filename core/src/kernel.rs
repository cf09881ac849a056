use crate::bootstrap::{BootServiceProviders, Bootstrapper, RegisterServiceProviders};
use crate::error::Result;
use crate::plugin::Plugin;
use std::fmt;
use std::sync::Arc;

/// Runs the bootstrap sequence for a plugin.
///
/// The plugin resolves its kernel from the container under
/// [`keys::KERNEL`](crate::keys::KERNEL), so rebinding that identifier before
/// boot swaps the sequence.
pub struct Kernel {
  bootstrappers: Vec<Arc<dyn Bootstrapper>>,
}

impl Default for Kernel {
  fn default() -> Self {
    Self::with_bootstrappers(vec![
      Arc::new(RegisterServiceProviders),
      Arc::new(BootServiceProviders),
    ])
  }
}

impl Kernel {
  pub fn with_bootstrappers(bootstrappers: Vec<Arc<dyn Bootstrapper>>) -> Self {
    Self { bootstrappers }
  }

  pub fn bootstrappers(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.bootstrappers.iter().map(|b| b.name())
  }

  /// Runs every bootstrapper in order, stopping at the first error.
  pub fn bootstrap(&self, plugin: &Plugin) -> Result<()> {
    for bootstrapper in &self.bootstrappers {
      tracing::debug!(bootstrapper = bootstrapper.name(), plugin = plugin.name(), "running bootstrapper");
      bootstrapper.bootstrap(plugin)?;
    }
    Ok(())
  }
}

impl fmt::Debug for Kernel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Kernel")
      .field("bootstrappers", &self.bootstrappers().collect::<Vec<_>>())
      .finish()
  }
}
