//! The main `Container` struct and its associated methods.

use crate::concrete::{Concrete, Construct};
use crate::core::{Binding, BuildGuard, Constructor, Instance, State};
use crate::error::{Error, Result};
use crate::parameters::Parameters;
use parking_lot::ReentrantMutex;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// Returns the conventional identifier for a type: its fully-qualified name.
pub fn key_of<T: ?Sized + Any>() -> &'static str {
  std::any::type_name::<T>()
}

/// The service container.
///
/// Holds bindings, cached shared instances, the set of identifiers resolved
/// so far, and the build stack of the resolution in progress. Factories
/// receive the container and may resolve further services from it.
///
/// All state sits behind one reentrant lock: a thread that is resolving can
/// re-enter from inside a factory, other threads wait until the outermost
/// `make` returns.
pub struct Container {
  state: ReentrantMutex<RefCell<State>>,
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self {
      state: ReentrantMutex::new(RefCell::new(State::default())),
    }
  }

  // --- Registration ---

  /// Registers a binding, replacing any previous binding for `id` and
  /// dropping its cached instance.
  pub fn bind(&self, id: impl Into<String>, concrete: impl Into<Concrete>, shared: bool) {
    let id = id.into();
    let factory = concrete.into().into_factory(&id);

    let guard = self.state.lock();
    let mut state = guard.borrow_mut();
    state.instances.remove(&id);
    tracing::debug!(id = %id, shared, "binding registered");
    state.bindings.insert(id, Binding { factory, shared });
  }

  /// Registers a binding unless `id` is already bound or has an instance.
  pub fn bind_if(&self, id: impl Into<String>, concrete: impl Into<Concrete>, shared: bool) {
    let id = id.into();
    let _guard = self.state.lock();
    if !self.bound(&id) {
      self.bind(id, concrete, shared);
    }
  }

  /// Registers a shared binding: built once, then served from the cache.
  pub fn singleton(&self, id: impl Into<String>, concrete: impl Into<Concrete>) {
    self.bind(id, concrete, true);
  }

  pub fn singleton_if(&self, id: impl Into<String>, concrete: impl Into<Concrete>) {
    self.bind_if(id, concrete, true);
  }

  /// Stores an existing object as the shared instance for `id`.
  ///
  /// The binding table is not consulted or changed; the instance simply
  /// takes precedence over it.
  pub fn instance(&self, id: impl Into<String>, object: Instance) {
    let id = id.into();
    let guard = self.state.lock();
    tracing::debug!(id = %id, "instance registered");
    guard.borrow_mut().instances.insert(id, object);
  }

  /// Makes a type known to the container under `id`.
  pub fn define<F>(&self, id: impl Into<String>, constructor: F)
  where
    F: Fn(&Parameters) -> Result<Instance> + Send + Sync + 'static,
  {
    let id = id.into();
    let constructor: Constructor = Arc::new(constructor);
    let guard = self.state.lock();
    tracing::debug!(id = %id, "constructor defined");
    guard.borrow_mut().constructors.insert(id, constructor);
  }

  /// Makes `T` known to the container under [`key_of::<T>()`](key_of).
  pub fn define_type<T: Construct>(&self) {
    self.define(key_of::<T>(), |parameters| {
      let object: Instance = Arc::new(T::construct(parameters)?);
      Ok(object)
    });
  }

  pub fn is_defined(&self, id: &str) -> bool {
    self.state.lock().borrow().constructors.contains_key(id)
  }

  // --- Resolution ---

  /// Resolves `id` with no parameters.
  pub fn make(&self, id: &str) -> Result<Instance> {
    self.make_with(id, &Parameters::new())
  }

  /// Resolves `id`, passing `parameters` through to its factory.
  ///
  /// # Errors
  ///
  /// - [`Error::CircularReference`] if `id` is already being built further up
  ///   the current call chain.
  /// - [`Error::NotBound`] if `id` has neither an instance nor a binding.
  /// - Whatever the factory itself returns, unchanged.
  pub fn make_with(&self, id: &str, parameters: &Parameters) -> Result<Instance> {
    let guard = self.state.lock();

    let cached = guard.borrow().instances.get(id).cloned();
    if let Some(object) = cached {
      tracing::trace!(id, "served from instance cache");
      return Ok(object);
    }

    let _building = BuildGuard::enter(&guard, id)?;

    let factory = guard
      .borrow()
      .bindings
      .get(id)
      .map(|binding| Arc::clone(&binding.factory))
      .ok_or_else(|| Error::NotBound { id: id.to_owned() })?;

    // No borrow is held here: the factory may call back into the container.
    let object = factory(self, parameters)?;

    let mut state = guard.borrow_mut();
    if state.is_shared(id) {
      state.instances.insert(id.to_owned(), Arc::clone(&object));
    }
    state.resolved.insert(id.to_owned());
    Ok(object)
  }

  /// Resolves `id` and downcasts it to `T`.
  pub fn make_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
    self.make_as_with(id, &Parameters::new())
  }

  pub fn make_as_with<T: Any + Send + Sync>(&self, id: &str, parameters: &Parameters) -> Result<Arc<T>> {
    self
      .make_with(id, parameters)?
      .downcast::<T>()
      .map_err(|_| Error::TypeMismatch {
        id: id.to_owned(),
        expected: std::any::type_name::<T>(),
      })
  }

  /// Builds the defined type `id` directly, bypassing bindings.
  pub(crate) fn construct(&self, id: &str, parameters: &Parameters) -> Result<Instance> {
    let constructor = self
      .state
      .lock()
      .borrow()
      .constructors
      .get(id)
      .cloned()
      .ok_or_else(|| Error::TargetNotFound { target: id.to_owned() })?;
    constructor(parameters)
  }

  // --- Introspection ---

  /// True if `id` has a binding or a cached instance.
  pub fn bound(&self, id: &str) -> bool {
    self.state.lock().borrow().bound(id)
  }

  /// True if `id` has a cached instance or a shared binding.
  pub fn is_shared(&self, id: &str) -> bool {
    self.state.lock().borrow().is_shared(id)
  }

  /// True once `id` has been built at least once, or if it has an instance.
  ///
  /// Introspection only. Rebinding does not reset it.
  pub fn is_resolved(&self, id: &str) -> bool {
    self.state.lock().borrow().is_resolved(id)
  }

  /// Forgets every binding, instance, and resolved marker. Defined types
  /// are kept.
  pub fn flush(&self) {
    let guard = self.state.lock();
    let mut state = guard.borrow_mut();
    state.bindings.clear();
    state.instances.clear();
    state.resolved.clear();
    tracing::debug!("container flushed");
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let guard = self.state.lock();
    let state = guard.try_borrow();
    match state {
      Ok(state) => {
        let mut bindings: Vec<&String> = state.bindings.keys().collect();
        bindings.sort();
        let mut instances: Vec<&String> = state.instances.keys().collect();
        instances.sort();
        f.debug_struct("Container")
          .field("bindings", &bindings)
          .field("instances", &instances)
          .field("build_stack", &state.build_stack)
          .finish()
      }
      Err(_) => f.debug_struct("Container").finish_non_exhaustive(),
    }
  }
}
