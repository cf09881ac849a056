//! # Trellis Core
//!
//! The plugin lifecycle built on [`trellis_container`] and [`trellis_hooks`].
//!
//! A [`Plugin`] owns a container, detects its [`Environment`], and boots once
//! the `plugins_loaded` hook fires. Booting resolves the [`Kernel`] from the
//! container and runs its bootstrappers: by default registering the configured
//! service providers, then booting them.
//!
//! ```
//! use std::sync::Arc;
//! use trellis_container::{Concrete, Container, ServiceProvider};
//! use trellis_core::{Environment, Plugin, PluginManifest, ProviderCatalog};
//! use trellis_hooks::Hooks;
//!
//! #[derive(Default)]
//! struct Greeter;
//!
//! impl ServiceProvider for Greeter {
//!   fn register(&self, container: &Container) -> trellis_container::Result<()> {
//!     container.singleton("greeting", Concrete::factory(|_, _| Ok(String::from("hello"))));
//!     Ok(())
//!   }
//! }
//!
//! let plugin = Plugin::with_environment(
//!   PluginManifest {
//!     name: "Demo".into(),
//!     version: "1.0.0".into(),
//!     file: "/srv/plugins/demo/demo.php".into(),
//!   },
//!   ProviderCatalog::new().with_default::<Greeter>("greeter"),
//!   Environment::from_map([("WP_ENVIRONMENT_TYPE", "local")]),
//! )
//! .unwrap();
//!
//! let hooks = Hooks::new();
//! plugin.run(&hooks);
//! plugin.register("greeter").unwrap();
//! hooks.do_action("plugins_loaded", &[]);
//!
//! assert!(plugin.is_booted());
//! let greeting = plugin.container().make_as::<String>("greeting").unwrap();
//! assert_eq!(*greeting, "hello");
//! ```

pub mod bootstrap;
mod configuration;
mod environment;
pub mod error;
mod kernel;
pub mod keys;
mod plugin;
mod providers;

pub use crate::bootstrap::{
  BootServiceProviders, Bootstrapper, LoadConfiguration, RegisterServiceProviders, PROVIDERS_FILE,
};
pub use crate::configuration::Configuration;
pub use crate::environment::{Environment, EnvironmentType, VariableSource, ENVIRONMENT_TYPE_VAR};
pub use crate::error::{Error, Result};
pub use crate::kernel::Kernel;
pub use crate::plugin::{Plugin, PluginInfo, PluginManifest, PLUGINS_LOADED};
pub use crate::providers::{default_providers, ProviderCatalog, ProviderFactory};
