use thiserror::Error;

/// Errors raised while registering or resolving services.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Target [{id}] is not bound in the container. Did you forget to call bind() or singleton()?")]
  NotBound { id: String },

  #[error("Target class [{target}] does not exist.")]
  TargetNotFound { target: String },

  #[error("Circular dependency detected for [{id}]. Resolution chain: {}.", chain.join(" -> "))]
  CircularReference {
    id: String,
    /// Every identifier on the build stack, followed by the repeated one.
    chain: Vec<String>,
  },

  #[error("Service [{id}] does not hold a value of type {expected}")]
  TypeMismatch { id: String, expected: &'static str },

  #[error("Invalid parameters for [{id}]: {message}")]
  InvalidParameters { id: String, message: String },

  #[error("Failed to build [{id}]: {message}")]
  Build { id: String, message: String },
}

impl Error {
  /// True for the two binding-resolution failures: an unbound identifier, or
  /// a target that is neither bound nor defined.
  pub fn is_binding_resolution(&self) -> bool {
    matches!(self, Error::NotBound { .. } | Error::TargetNotFound { .. })
  }

  pub fn is_circular_reference(&self) -> bool {
    matches!(self, Error::CircularReference { .. })
  }

  /// Wraps an arbitrary failure raised inside a factory.
  pub fn build(id: impl Into<String>, err: impl std::fmt::Display) -> Self {
    Error::Build {
      id: id.into(),
      message: err.to_string(),
    }
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
