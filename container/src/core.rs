//! Core, non-public data structures for the container.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::parameters::Parameters;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A resolved service. Identity comparisons use `Arc::ptr_eq`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// The closure stored for every binding.
pub type Factory = Arc<dyn Fn(&Container, &Parameters) -> Result<Instance> + Send + Sync>;

/// Builds a known type directly from parameters, without any container access.
pub type Constructor = Arc<dyn Fn(&Parameters) -> Result<Instance> + Send + Sync>;

pub(crate) struct Binding {
  pub(crate) factory: Factory,
  pub(crate) shared: bool,
}

/// Everything the container mutates. Guarded as a whole by the container's
/// reentrant lock.
#[derive(Default)]
pub(crate) struct State {
  pub(crate) bindings: HashMap<String, Binding>,
  pub(crate) instances: HashMap<String, Instance>,
  pub(crate) resolved: HashSet<String>,
  pub(crate) build_stack: Vec<String>,
  pub(crate) constructors: HashMap<String, Constructor>,
}

impl State {
  pub(crate) fn bound(&self, id: &str) -> bool {
    self.bindings.contains_key(id) || self.instances.contains_key(id)
  }

  pub(crate) fn is_shared(&self, id: &str) -> bool {
    self.instances.contains_key(id) || self.bindings.get(id).is_some_and(|b| b.shared)
  }

  pub(crate) fn is_resolved(&self, id: &str) -> bool {
    self.resolved.contains(id) || self.instances.contains_key(id)
  }
}

/// An RAII guard over one entry of the build stack.
///
/// Entering fails if the identifier is already being built further up the
/// current call chain. Dropping the guard pops the entry, whether the build
/// succeeded, returned an error, or unwound.
pub(crate) struct BuildGuard<'a> {
  state: &'a RefCell<State>,
}

impl<'a> BuildGuard<'a> {
  pub(crate) fn enter(state: &'a RefCell<State>, id: &str) -> Result<Self> {
    let mut inner = state.borrow_mut();
    if inner.build_stack.iter().any(|entry| entry == id) {
      let mut chain = inner.build_stack.clone();
      chain.push(id.to_owned());
      return Err(Error::CircularReference {
        id: id.to_owned(),
        chain,
      });
    }
    inner.build_stack.push(id.to_owned());
    tracing::trace!(id, depth = inner.build_stack.len(), "build stack push");
    Ok(Self { state })
  }
}

impl Drop for BuildGuard<'_> {
  fn drop(&mut self) {
    let popped = self.state.borrow_mut().build_stack.pop();
    tracing::trace!(id = ?popped, "build stack pop");
  }
}
