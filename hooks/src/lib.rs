//! # Trellis Hooks
//!
//! An in-process registry of named **actions** (callbacks fired for their side
//! effects) and **filters** (callbacks that transform a value in turn).
//!
//! ```
//! use serde_json::json;
//! use trellis_hooks::{Hooks, DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY};
//!
//! let hooks = Hooks::new();
//! hooks.add_filter("the_title", |title, _| {
//!   json!(format!("[{}]", title.as_str().unwrap_or_default()))
//! }, DEFAULT_PRIORITY, DEFAULT_ACCEPTED_ARGS);
//!
//! assert_eq!(hooks.apply_filters("the_title", json!("Hello"), &[]), json!("[Hello]"));
//! assert_eq!(hooks.did_filter("the_title"), 1);
//! ```

mod hooks;
mod registry;

pub use crate::hooks::{
  ActionCallback, FilterCallback, Hooks, DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY,
};
pub use crate::registry::CallbackId;
