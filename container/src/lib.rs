//! # Trellis Container
//!
//! A small, reentrant Inversion of Control (IoC) container keyed by string
//! identifiers.
//!
//! ## Core Concepts
//!
//! - **Binding**: a factory plus a `shared` flag registered under an identifier.
//! - **Shared**: a binding built once and then served from the instance cache.
//! - **Instance**: an existing object registered directly. Always shared, and
//!   counts as resolved immediately.
//! - **Build stack**: the chain of identifiers being resolved right now. An
//!   identifier appearing twice in it is a circular dependency and fails
//!   resolution with the full chain in the error.
//!
//! The container never inspects constructors. Anything with dependencies needs
//! a factory closure, which receives the container and may resolve further
//! services from it.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use trellis_container::{params, Concrete, Container};
//!
//! struct Config {
//!   dsn: String,
//! }
//!
//! struct Database {
//!   dsn: String,
//! }
//!
//! let container = Container::new();
//!
//! container.instance("config", Arc::new(Config { dsn: "sqlite::memory:".into() }));
//! container.singleton(
//!   "db",
//!   Concrete::factory(|c, _| {
//!     let config = c.make_as::<Config>("config")?;
//!     Ok(Database { dsn: config.dsn.clone() })
//!   }),
//! );
//!
//! let db = container.make_as::<Database>("db").unwrap();
//! assert_eq!(db.dsn, "sqlite::memory:");
//! assert!(Arc::ptr_eq(&db, &container.make_as::<Database>("db").unwrap()));
//!
//! container.bind("greeting", Concrete::factory(|_, p| {
//!   Ok(format!("hello {}", p.get_str("name").unwrap_or("world")))
//! }), false);
//! let greeting = container.make_as_with::<String>("greeting", &params! { "name" => "trellis" }).unwrap();
//! assert_eq!(*greeting, "hello trellis");
//! ```

mod concrete;
mod container;
mod core;
pub mod error;
mod macros;
mod parameters;
pub mod provider;

pub use crate::concrete::{Concrete, Construct};
pub use crate::container::{key_of, Container};
pub use crate::core::{Constructor, Factory, Instance};
pub use crate::error::{Error, Result};
pub use crate::parameters::Parameters;
pub use crate::provider::ServiceProvider;
