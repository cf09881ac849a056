use super::Bootstrapper;
use crate::error::{Error, Result};
use crate::plugin::Plugin;

/// Boots every registered provider, in registration order.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootServiceProviders;

impl Bootstrapper for BootServiceProviders {
  fn bootstrap(&self, plugin: &Plugin) -> Result<()> {
    for (name, provider) in plugin.providers() {
      tracing::debug!(provider = %name, "booting service provider");
      provider
        .boot(plugin.container())
        .map_err(|source| Error::Provider { name, source })?;
    }
    Ok(())
  }
}
