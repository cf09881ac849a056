//! The plugin: owns a container, its service providers and its boot state.

use crate::environment::{Environment, EnvironmentType};
use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::keys;
use crate::providers::ProviderCatalog;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trellis_container::{Concrete, Container, ServiceProvider};
use trellis_hooks::{Hooks, DEFAULT_PRIORITY};

/// Hook the plugin boots on.
pub const PLUGINS_LOADED: &str = "plugins_loaded";

/// Identifies a plugin. `file` is the plugin's main file; its directory becomes
/// the base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
  pub name: String,
  pub version: String,
  pub file: PathBuf,
}

/// What the container knows about its plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
  pub name: String,
  pub version: String,
  pub base_path: PathBuf,
  pub environment: EnvironmentType,
}

pub struct Plugin {
  manifest: PluginManifest,
  base_path: PathBuf,
  bootstrap_path: RwLock<Option<PathBuf>>,
  container: Arc<Container>,
  environment: Arc<Environment>,
  environment_type: EnvironmentType,
  catalog: ProviderCatalog,
  providers: Mutex<Vec<(String, Arc<dyn ServiceProvider>)>>,
  excluded: Mutex<Vec<String>>,
  register_lock: Mutex<()>,
  boot_lock: Mutex<()>,
  booted: AtomicBool,
}

impl Plugin {
  /// Creates a plugin reading its environment from the process.
  pub fn new(manifest: PluginManifest, catalog: ProviderCatalog) -> Result<Arc<Self>> {
    Self::with_environment(manifest, catalog, Environment::from_process())
  }

  /// Creates a plugin with its own container and registers the base
  /// bindings. Fails if the environment type is not recognised.
  pub fn with_environment(
    manifest: PluginManifest,
    catalog: ProviderCatalog,
    environment: Environment,
  ) -> Result<Arc<Self>> {
    let environment_type = environment.environment_type()?;
    let base_path = manifest
      .file
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_default();

    let plugin = Self {
      manifest,
      base_path,
      bootstrap_path: RwLock::new(None),
      container: Arc::new(Container::new()),
      environment: Arc::new(environment),
      environment_type,
      catalog,
      providers: Mutex::new(Vec::new()),
      excluded: Mutex::new(Vec::new()),
      register_lock: Mutex::new(()),
      boot_lock: Mutex::new(()),
      booted: AtomicBool::new(false),
    };
    plugin.register_base_bindings();

    tracing::info!(
      plugin = %plugin.manifest.name,
      version = %plugin.manifest.version,
      environment = %environment_type,
      "plugin created"
    );
    Ok(Arc::new(plugin))
  }

  fn register_base_bindings(&self) {
    self.container.instance(
      keys::PLUGIN,
      Arc::new(PluginInfo {
        name: self.manifest.name.clone(),
        version: self.manifest.version.clone(),
        base_path: self.base_path.clone(),
        environment: self.environment_type,
      }),
    );
    self.container.instance(keys::ENVIRONMENT, self.environment.clone());
    self
      .container
      .singleton(keys::KERNEL, Concrete::factory(|_, _| Ok(Kernel::default())));
  }

  pub fn name(&self) -> &str {
    &self.manifest.name
  }

  pub fn version(&self) -> &str {
    &self.manifest.version
  }

  pub fn manifest(&self) -> &PluginManifest {
    &self.manifest
  }

  pub fn environment(&self) -> EnvironmentType {
    self.environment_type
  }

  pub fn env(&self) -> &Environment {
    &self.environment
  }

  pub fn container(&self) -> &Arc<Container> {
    &self.container
  }

  pub fn catalog(&self) -> &ProviderCatalog {
    &self.catalog
  }

  // --- Paths ---

  pub fn base_path(&self, path: &str) -> PathBuf {
    join(&self.base_path, path)
  }

  /// `<base>/bootstrap` unless overridden with [`Plugin::set_bootstrap_path`].
  pub fn bootstrap_path(&self, path: &str) -> PathBuf {
    match self.bootstrap_path.read().as_deref() {
      Some(custom) => join(custom, path),
      None => join(&self.base_path("bootstrap"), path),
    }
  }

  /// Overrides the bootstrap directory. An empty path restores the default.
  pub fn set_bootstrap_path(&self, path: impl Into<PathBuf>) {
    let path = path.into();
    *self.bootstrap_path.write() = (!path.as_os_str().is_empty()).then_some(path);
  }

  pub fn config_path(&self, path: &str) -> PathBuf {
    join(&self.base_path("config"), path)
  }

  // --- Service providers ---

  /// Registers the provider the catalog knows as `name`.
  ///
  /// Already registered names are skipped, as are names the catalog does not
  /// know. A provider registered after boot is booted straight away.
  /// Registrations are serialised, so a provider runs `register` at most once.
  pub fn register(&self, name: &str) -> Result<()> {
    let _registering = self.register_lock.lock();
    if self.provider(name).is_some() {
      return Ok(());
    }
    let Some(provider) = self.catalog.create(name) else {
      tracing::warn!(provider = name, "unknown service provider; skipping");
      return Ok(());
    };

    provider
      .register(&self.container)
      .map_err(|source| provider_error(name, source))?;
    self.providers.lock().push((name.to_owned(), Arc::clone(&provider)));
    tracing::debug!(provider = name, "service provider registered");

    if self.is_booted() {
      provider
        .boot(&self.container)
        .map_err(|source| provider_error(name, source))?;
    }
    Ok(())
  }

  pub fn register_configured_providers<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
    names.iter().try_for_each(|name| self.register(name.as_ref()))
  }

  /// Excludes default providers from registration. Adds to earlier exclusions.
  pub fn exclude_providers<I, S>(&self, names: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.excluded.lock().extend(names.into_iter().map(Into::into));
  }

  pub fn excluded_providers(&self) -> Vec<String> {
    self.excluded.lock().clone()
  }

  pub fn provider(&self, name: &str) -> Option<Arc<dyn ServiceProvider>> {
    self
      .providers
      .lock()
      .iter()
      .find(|(registered, _)| registered == name)
      .map(|(_, provider)| Arc::clone(provider))
  }

  /// Registered providers in registration order.
  pub fn providers(&self) -> Vec<(String, Arc<dyn ServiceProvider>)> {
    self.providers.lock().clone()
  }

  // --- Lifecycle ---

  /// Boots the plugin once `plugins_loaded` fires.
  pub fn run(self: &Arc<Self>, hooks: &Hooks) {
    let plugin = Arc::clone(self);
    hooks.add_action(
      PLUGINS_LOADED,
      move |_| {
        if let Err(err) = plugin.on_plugins_loaded() {
          tracing::error!(plugin = %plugin.name(), error = %err, "plugin failed to boot");
        }
      },
      DEFAULT_PRIORITY,
      0,
    );
  }

  pub fn on_plugins_loaded(&self) -> Result<()> {
    self.boot()
  }

  /// Resolves the kernel and runs it. Does nothing once booted; a failed boot
  /// may be retried.
  pub fn boot(&self) -> Result<()> {
    let _boot = self.boot_lock.lock();
    if self.is_booted() {
      return Ok(());
    }

    let kernel = self.container.make_as::<Kernel>(keys::KERNEL)?;
    kernel.bootstrap(self)?;

    self.booted.store(true, Ordering::Release);
    tracing::info!(plugin = %self.manifest.name, "plugin booted");
    Ok(())
  }

  pub fn is_booted(&self) -> bool {
    self.booted.load(Ordering::Acquire)
  }
}

impl std::fmt::Debug for Plugin {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let providers: Vec<String> = self.providers.lock().iter().map(|(name, _)| name.clone()).collect();
    f.debug_struct("Plugin")
      .field("name", &self.manifest.name)
      .field("version", &self.manifest.version)
      .field("base_path", &self.base_path)
      .field("environment", &self.environment_type)
      .field("providers", &providers)
      .field("booted", &self.is_booted())
      .finish()
  }
}

fn provider_error(name: &str, source: trellis_container::Error) -> Error {
  Error::Provider {
    name: name.to_owned(),
    source,
  }
}

/// Appends `path` to `base` after trimming separators from both ends.
fn join(base: &Path, path: &str) -> PathBuf {
  let path = path.trim_matches(|c| c == '/' || c == MAIN_SEPARATOR);
  if path.is_empty() {
    base.to_path_buf()
  } else {
    base.join(path)
  }
}
