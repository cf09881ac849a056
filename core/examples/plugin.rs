//! Boots a plugin from a temporary directory with a providers file and a
//! config directory. Run with `RUST_LOG=debug` to see the lifecycle events.

use serde::Deserialize;
use std::sync::Arc;
use trellis_container::{Concrete, Container, ServiceProvider};
use trellis_core::{
  BootServiceProviders, Configuration, Environment, Kernel, LoadConfiguration, Plugin, PluginManifest,
  ProviderCatalog, RegisterServiceProviders,
};
use trellis_hooks::Hooks;

#[derive(Debug, Deserialize)]
struct Mail {
  from: String,
}

struct Mailer {
  from: String,
}

#[derive(Default)]
struct MailServiceProvider;

impl ServiceProvider for MailServiceProvider {
  fn register(&self, container: &Container) -> trellis_container::Result<()> {
    container.singleton(
      "mailer",
      Concrete::factory(|c, _| {
        let config = c.make_as::<Configuration>("config.mail")?;
        let mail: Mail = config
          .deserialize()
          .map_err(|err| trellis_container::Error::build("mailer", err))?;
        Ok(Mailer { from: mail.from })
      }),
    );
    Ok(())
  }

  fn provides(&self) -> Vec<String> {
    vec!["mailer".into()]
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let dir = tempfile::tempdir()?;
  std::fs::create_dir_all(dir.path().join("bootstrap"))?;
  std::fs::create_dir_all(dir.path().join("config"))?;
  std::fs::write(dir.path().join("bootstrap/providers.yaml"), "- mail\n")?;
  std::fs::write(dir.path().join("config/mail.yaml"), "from: noreply@example.com\n")?;

  let plugin = Plugin::with_environment(
    PluginManifest {
      name: "Demo".into(),
      version: "1.0.0".into(),
      file: dir.path().join("demo.php"),
    },
    ProviderCatalog::new().with_default::<MailServiceProvider>("mail"),
    Environment::from_map([("WP_ENVIRONMENT_TYPE", "local"), ("WP_DEBUG", "1")]),
  )?;

  plugin.container().singleton(
    trellis_core::keys::KERNEL,
    Concrete::factory(|_, _| {
      Ok(Kernel::with_bootstrappers(vec![
        Arc::new(LoadConfiguration),
        Arc::new(RegisterServiceProviders),
        Arc::new(BootServiceProviders),
      ]))
    }),
  );

  let hooks = Hooks::new();
  plugin.run(&hooks);
  hooks.do_action("plugins_loaded", &[]);

  let mailer = plugin.container().make_as::<Mailer>("mailer")?;
  println!(
    "{} {} ({}, debug: {}) sends mail from {}",
    plugin.name(),
    plugin.version(),
    plugin.environment().label(),
    plugin.env().is_debug(),
    mailer.from
  );
  Ok(())
}
