use std::path::PathBuf;
use thiserror::Error;

/// The main error type for `trellis_core`.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Container(#[from] trellis_container::Error),

  #[error("Invalid environment type '{0}'. Expected one of: production, staging, development, local")]
  InvalidEnvironment(String),

  #[error("Failed to read '{}': {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse '{}': {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Configuration file \"{}\" must contain a mapping, {found} found.", path.display())]
  InvalidConfiguration { path: PathBuf, found: &'static str },

  #[error("Service provider '{name}' failed: {source}")]
  Provider {
    name: String,
    #[source]
    source: trellis_container::Error,
  },
}

/// A specialized `Result` type for `trellis_core` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
