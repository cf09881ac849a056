//! Steps the kernel runs, in order, when a plugin boots.

mod boot_providers;
mod load_configuration;
mod register_providers;

pub use boot_providers::BootServiceProviders;
pub use load_configuration::LoadConfiguration;
pub use register_providers::{RegisterServiceProviders, PROVIDERS_FILE};

use crate::error::Result;
use crate::plugin::Plugin;

/// A single bootstrap step.
pub trait Bootstrapper: Send + Sync {
  fn bootstrap(&self, plugin: &Plugin) -> Result<()>;

  /// Name used in log events.
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }
}
