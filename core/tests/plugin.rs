mod common;

use common::{logs, manifest, plugin, spies, write};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use trellis_container::{Concrete, Container, ServiceProvider};
use trellis_core::{keys, Environment, EnvironmentType, Error, Kernel, Plugin, PluginInfo, ProviderCatalog};
use trellis_hooks::Hooks;

#[test]
fn name_version_and_environment() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  assert_eq!(plugin.name(), "Test Plugin");
  assert_eq!(plugin.version(), "1.0.0");
  assert_eq!(plugin.environment(), EnvironmentType::Development);
  assert!(plugin.env().is_development());
}

#[test]
fn unknown_environment_type_fails_construction() {
  let dir = TempDir::new().unwrap();
  let err = Plugin::with_environment(
    manifest(dir.path()),
    ProviderCatalog::new(),
    Environment::from_map([("WP_ENVIRONMENT_TYPE", "qa")]),
  )
  .unwrap_err();

  assert!(matches!(err, Error::InvalidEnvironment(ref v) if v == "qa"));
}

#[test]
fn base_bindings_are_registered() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());
  let container = plugin.container();

  let info = container.make_as::<PluginInfo>(keys::PLUGIN).unwrap();
  assert_eq!(info.name, "Test Plugin");
  assert_eq!(info.base_path, dir.path());
  assert_eq!(info.environment, EnvironmentType::Development);

  assert!(container.is_resolved(keys::PLUGIN));
  assert!(container.is_shared(keys::KERNEL));
  assert!(!container.is_resolved(keys::KERNEL));

  let env = container.make_as::<Environment>(keys::ENVIRONMENT).unwrap();
  assert!(env.is_development());
}

#[test]
fn container_is_the_same_on_every_call() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());
  assert!(Arc::ptr_eq(plugin.container(), plugin.container()));
}

// --- Paths ---

#[test]
fn base_path_is_the_directory_of_the_main_file() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  assert_eq!(plugin.base_path(""), dir.path());
  assert_eq!(plugin.base_path("src/lib"), dir.path().join("src/lib"));
}

#[test]
fn base_path_ignores_trailing_slashes_in_the_file_path() {
  let plugin = Plugin::with_environment(
    trellis_core::PluginManifest {
      name: "Slashes".into(),
      version: "0.1.0".into(),
      file: PathBuf::from("/srv/plugins/slashes//plugin.php"),
    },
    ProviderCatalog::new(),
    Environment::from_map(Vec::<(String, String)>::new()),
  )
  .unwrap();

  assert_eq!(plugin.base_path(""), PathBuf::from("/srv/plugins/slashes"));
  assert_eq!(plugin.base_path("assets"), PathBuf::from("/srv/plugins/slashes/assets"));
}

#[test]
fn relative_paths_have_separators_trimmed() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());
  let expected = dir.path().join("config");

  assert_eq!(plugin.base_path("/config"), expected);
  assert_eq!(plugin.base_path("config/"), expected);
  assert_eq!(plugin.base_path("/config/"), expected);
  assert_eq!(plugin.base_path("/"), dir.path());
}

#[test]
fn bootstrap_and_config_paths() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  assert_eq!(plugin.bootstrap_path(""), dir.path().join("bootstrap"));
  assert_eq!(plugin.bootstrap_path("providers.yaml"), dir.path().join("bootstrap/providers.yaml"));
  assert_eq!(plugin.config_path("app.yaml"), dir.path().join("config/app.yaml"));

  plugin.set_bootstrap_path("/etc/trellis");
  assert_eq!(plugin.bootstrap_path("providers.yaml"), PathBuf::from("/etc/trellis/providers.yaml"));

  plugin.set_bootstrap_path("");
  assert_eq!(plugin.bootstrap_path(""), dir.path().join("bootstrap"));
}

// --- Providers ---

#[test]
fn register_runs_the_provider_once() {
  let dir = TempDir::new().unwrap();
  let (catalog, log) = spies(&["mail"]);
  let plugin = plugin(dir.path(), catalog);

  plugin.register("mail").unwrap();
  plugin.register("mail").unwrap();

  assert_eq!(logs(&log), vec!["register:mail"]);
  assert!(plugin.provider("mail").is_some());
  assert!(plugin.container().bound("spy.mail"));
}

#[test]
fn unknown_providers_are_skipped() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  plugin.register("missing").unwrap();

  assert!(plugin.provider("missing").is_none());
  assert!(plugin.providers().is_empty());
}

#[test]
fn providers_keep_registration_order() {
  let dir = TempDir::new().unwrap();
  let (catalog, _) = spies(&["a", "b", "c"]);
  let plugin = plugin(dir.path(), catalog);

  plugin.register_configured_providers(&["c", "a", "b", "a"]).unwrap();

  let names: Vec<String> = plugin.providers().into_iter().map(|(name, _)| name).collect();
  assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn providers_registered_after_boot_are_booted_immediately() {
  let dir = TempDir::new().unwrap();
  let (catalog, log) = spies(&["late"]);
  let plugin = plugin(dir.path(), catalog);

  plugin.boot().unwrap();
  plugin.register("late").unwrap();

  assert_eq!(logs(&log), vec!["register:late", "boot:late"]);
}

#[test]
fn exclusions_accumulate() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  plugin.exclude_providers(["a"]);
  plugin.exclude_providers(vec!["b".to_string(), "c".to_string()]);

  assert_eq!(plugin.excluded_providers(), vec!["a", "b", "c"]);
}

#[test]
fn provider_errors_name_the_provider() {
  struct Broken;
  impl ServiceProvider for Broken {
    fn register(&self, _: &Container) -> trellis_container::Result<()> {
      Err(trellis_container::Error::build("broken", "missing credentials"))
    }
  }

  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new().with("broken", || Broken));

  let err = plugin.register("broken").unwrap_err();
  assert!(matches!(err, Error::Provider { ref name, .. } if name == "broken"));
  assert!(plugin.provider("broken").is_none());
}

// --- Lifecycle ---

#[test]
fn is_booted_only_after_plugins_loaded() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  assert!(!plugin.is_booted());
  plugin.on_plugins_loaded().unwrap();
  assert!(plugin.is_booted());
  assert!(plugin.container().is_resolved(keys::KERNEL));
}

#[test]
fn booting_twice_runs_the_kernel_once() {
  let dir = TempDir::new().unwrap();
  let (catalog, log) = spies(&["mail"]);
  let plugin = plugin(dir.path(), catalog);
  write(&plugin.bootstrap_path("providers.yaml"), "- mail\n");

  plugin.on_plugins_loaded().unwrap();
  plugin.on_plugins_loaded().unwrap();

  assert_eq!(logs(&log), vec!["register:mail", "boot:mail"]);
}

#[test]
fn run_boots_when_plugins_loaded_fires() {
  let dir = TempDir::new().unwrap();
  let (catalog, log) = spies(&["mail", "cache"]);
  let plugin = plugin(dir.path(), catalog);
  write(&plugin.bootstrap_path("providers.yaml"), "- mail\n- cache\n");

  let hooks = Hooks::new();
  plugin.run(&hooks);
  assert!(hooks.has_action("plugins_loaded"));
  assert!(!plugin.is_booted());

  hooks.do_action("plugins_loaded", &[]);

  assert!(plugin.is_booted());
  assert_eq!(logs(&log), vec!["register:mail", "register:cache", "boot:mail", "boot:cache"]);
}

#[test]
fn a_rebound_kernel_is_used_for_boot() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());

  plugin
    .container()
    .singleton(keys::KERNEL, Concrete::factory(|_, _| Ok(Kernel::with_bootstrappers(Vec::new()))));
  plugin.boot().unwrap();

  let kernel = plugin.container().make_as::<Kernel>(keys::KERNEL).unwrap();
  assert_eq!(kernel.bootstrappers().count(), 0);
  assert!(plugin.is_booted());
}

#[test]
fn a_failed_boot_can_be_retried() {
  let dir = TempDir::new().unwrap();
  let plugin = plugin(dir.path(), ProviderCatalog::new());
  write(&plugin.bootstrap_path("providers.yaml"), "- [unterminated\n");

  assert!(matches!(plugin.boot().unwrap_err(), Error::Parse { .. }));
  assert!(!plugin.is_booted());

  write(&plugin.bootstrap_path("providers.yaml"), "[]\n");
  plugin.boot().unwrap();
  assert!(plugin.is_booted());
}

#[test]
#[serial_test::serial]
fn new_reads_the_environment_type_from_the_process() {
  let dir = TempDir::new().unwrap();
  std::env::set_var("WP_ENVIRONMENT_TYPE", "staging");
  let plugin = Plugin::new(manifest(dir.path()), ProviderCatalog::new());
  std::env::remove_var("WP_ENVIRONMENT_TYPE");

  assert_eq!(plugin.unwrap().environment(), EnvironmentType::Staging);
}

#[test]
fn concurrent_registration_of_one_name_runs_the_provider_once() {
  let dir = TempDir::new().unwrap();
  let (catalog, log) = spies(&["mail"]);
  let plugin = plugin(dir.path(), catalog);

  std::thread::scope(|scope| {
    for _ in 0..16 {
      let plugin = &plugin;
      scope.spawn(move || plugin.register("mail").unwrap());
    }
  });

  assert_eq!(logs(&log), vec!["register:mail"]);
  assert_eq!(plugin.providers().len(), 1);
}
