//! What a binding resolves to.

use crate::container::Container;
use crate::core::{Factory, Instance};
use crate::error::Result;
use crate::parameters::Parameters;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The concrete side of a binding.
#[derive(Clone, Default)]
pub enum Concrete {
  /// Resolve the identifier by constructing the type defined under the same
  /// identifier.
  #[default]
  SelfBound,
  /// Resolve through another identifier: made from the container if it is
  /// bound there, otherwise constructed if it is a defined type.
  Target(String),
  /// Call the factory on every build.
  Factory(Factory),
}

impl Concrete {
  /// Wraps a closure that builds a `T`. The result is placed in a fresh `Arc`.
  ///
  /// A closure that already returns an [`Instance`] (for example one that
  /// forwards to `make`) should use [`Concrete::raw`] instead, or the
  /// instance would be wrapped twice.
  pub fn factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container, &Parameters) -> Result<T> + Send + Sync + 'static,
  {
    Concrete::Factory(Arc::new(move |container: &Container, parameters: &Parameters| -> Result<Instance> {
      let object: Instance = Arc::new(factory(container, parameters)?);
      Ok(object)
    }))
  }

  /// Wraps a closure that returns an already type-erased instance.
  pub fn raw<F>(factory: F) -> Self
  where
    F: Fn(&Container, &Parameters) -> Result<Instance> + Send + Sync + 'static,
  {
    Concrete::Factory(Arc::new(factory))
  }

  pub fn target(target: impl Into<String>) -> Self {
    Concrete::Target(target.into())
  }

  /// Turns the concrete into the factory stored for `id`.
  pub(crate) fn into_factory(self, id: &str) -> Factory {
    match self {
      Concrete::SelfBound => target_factory(id.to_owned(), id.to_owned()),
      Concrete::Target(target) => target_factory(id.to_owned(), target),
      Concrete::Factory(factory) => factory,
    }
  }
}

impl From<&str> for Concrete {
  fn from(target: &str) -> Self {
    Concrete::Target(target.to_owned())
  }
}

impl From<String> for Concrete {
  fn from(target: String) -> Self {
    Concrete::Target(target)
  }
}

impl From<Factory> for Concrete {
  fn from(factory: Factory) -> Self {
    Concrete::Factory(factory)
  }
}

impl fmt::Debug for Concrete {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Concrete::SelfBound => write!(f, "SelfBound"),
      Concrete::Target(target) => write!(f, "Target({})", target),
      Concrete::Factory(_) => write!(f, "Factory(..)"),
    }
  }
}

/// The factory behind a string target. Resolution is deferred to build time,
/// so a missing target is only reported once the binding is made.
fn target_factory(id: String, target: String) -> Factory {
  Arc::new(move |container: &Container, parameters: &Parameters| -> Result<Instance> {
    if id == target {
      return container.construct(&target, parameters);
    }
    if container.bound(&target) {
      return container.make_with(&target, parameters);
    }
    container.construct(&target, parameters)
  })
}

/// A type that can be built from parameters alone.
///
/// Defining a type with [`Container::define_type`] makes it "known" to the
/// container, so self-bound and string-target bindings can construct it.
pub trait Construct: Any + Send + Sync + Sized {
  fn construct(parameters: &Parameters) -> Result<Self>;
}
