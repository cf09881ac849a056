#![allow(dead_code)]

use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trellis_container::{Container, ServiceProvider};
use trellis_core::{Environment, Plugin, PluginManifest, ProviderCatalog};

pub type Log = Arc<Mutex<Vec<String>>>;

/// Records `register:<name>` and `boot:<name>` into a shared log.
pub struct Spy {
  pub name: &'static str,
  pub log: Log,
}

impl ServiceProvider for Spy {
  fn register(&self, container: &Container) -> trellis_container::Result<()> {
    self.log.lock().push(format!("register:{}", self.name));
    container.instance(format!("spy.{}", self.name), Arc::new(self.name));
    Ok(())
  }

  fn boot(&self, _container: &Container) -> trellis_container::Result<()> {
    self.log.lock().push(format!("boot:{}", self.name));
    Ok(())
  }
}

/// A catalog with a spy for each of `names`, all writing to one log.
pub fn spies(names: &[&'static str]) -> (ProviderCatalog, Log) {
  let log: Log = Arc::new(Mutex::new(Vec::new()));
  let mut catalog = ProviderCatalog::new();
  for &name in names {
    let log = Arc::clone(&log);
    catalog.insert(name, move || Spy {
      name,
      log: Arc::clone(&log),
    });
  }
  (catalog, log)
}

pub fn manifest(dir: &Path) -> PluginManifest {
  PluginManifest {
    name: "Test Plugin".into(),
    version: "1.0.0".into(),
    file: dir.join("test-plugin.php"),
  }
}

/// Routes `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub fn plugin(dir: &Path, catalog: ProviderCatalog) -> Arc<Plugin> {
  init_tracing();
  Plugin::with_environment(manifest(dir), catalog, Environment::from_map([("WP_ENVIRONMENT_TYPE", "development")]))
    .expect("plugin")
}

pub fn write(path: &Path, contents: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, contents).unwrap();
}

pub fn logs(log: &Log) -> Vec<String> {
  log.lock().clone()
}
