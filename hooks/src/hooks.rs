//! The `Hooks` registry.

use crate::registry::{CallbackId, Registered, Table};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Priority used when a caller has no preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Number of arguments a callback receives when a caller has no preference.
pub const DEFAULT_ACCEPTED_ARGS: usize = 1;

pub type ActionCallback = Arc<dyn Fn(&[Value]) + Send + Sync>;
pub type FilterCallback = Arc<dyn Fn(Value, &[Value]) -> Value + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
  Action,
  Filter,
}

#[derive(Default)]
struct Dispatch {
  fired: HashMap<(Kind, String), usize>,
  in_flight: Vec<(Kind, String)>,
}

/// A registry of named actions and filters.
///
/// Callbacks run in ascending priority order, and in registration order
/// within one priority. Hooks may be fired from inside a callback; no lock is
/// held while callbacks run.
#[derive(Default)]
pub struct Hooks {
  actions: RwLock<Table<ActionCallback>>,
  filters: RwLock<Table<FilterCallback>>,
  dispatch: Mutex<Dispatch>,
  next_id: AtomicU64,
}

/// Marks a hook as running for as long as it is alive.
struct InFlight<'a> {
  dispatch: &'a Mutex<Dispatch>,
  kind: Kind,
  name: &'a str,
}

impl<'a> InFlight<'a> {
  fn enter(dispatch: &'a Mutex<Dispatch>, kind: Kind, name: &'a str) -> Self {
    let mut state = dispatch.lock();
    *state.fired.entry((kind, name.to_owned())).or_default() += 1;
    state.in_flight.push((kind, name.to_owned()));
    Self { dispatch, kind, name }
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    let mut state = self.dispatch.lock();
    if let Some(at) = state
      .in_flight
      .iter()
      .rposition(|(kind, name)| *kind == self.kind && name == self.name)
    {
      state.in_flight.remove(at);
    }
  }
}

impl Hooks {
  pub fn new() -> Self {
    Self::default()
  }

  fn next_id(&self) -> CallbackId {
    CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed))
  }

  // --- Actions ---

  /// Adds a callback to run when `name` fires. The callback receives at most
  /// `accepted_args` of the arguments passed to [`Hooks::do_action`].
  pub fn add_action<F>(&self, name: &str, callback: F, priority: i32, accepted_args: usize) -> CallbackId
  where
    F: Fn(&[Value]) + Send + Sync + 'static,
  {
    let id = self.next_id();
    tracing::debug!(hook = name, priority, "action added");
    self.actions.write().add(
      name,
      Registered {
        id,
        priority,
        accepted_args,
        callback: Arc::new(callback),
      },
    );
    id
  }

  /// Runs every callback registered for `name`.
  pub fn do_action(&self, name: &str, args: &[Value]) {
    let callbacks = self.actions.read().snapshot(name);
    let _running = InFlight::enter(&self.dispatch, Kind::Action, name);
    tracing::trace!(hook = name, callbacks = callbacks.len(), "doing action");
    for (accepted_args, callback) in callbacks {
      callback(&args[..accepted_args.min(args.len())]);
    }
  }

  /// How many times `name` has fired.
  pub fn did_action(&self, name: &str) -> usize {
    self.fired(Kind::Action, name)
  }

  /// Whether `name` is running; with `None`, whether any action is.
  pub fn doing_action(&self, name: Option<&str>) -> bool {
    self.doing(Kind::Action, name)
  }

  /// Whether `name` has any callbacks.
  pub fn has_action(&self, name: &str) -> bool {
    self.actions.read().has_any(name)
  }

  /// The priority `id` is registered at for `name`, if it is registered.
  pub fn action_priority(&self, name: &str, id: CallbackId) -> Option<i32> {
    self.actions.read().priority_of(name, id)
  }

  /// Removes `id` from `name`. Fails unless `priority` matches the one it was
  /// added with.
  pub fn remove_action(&self, name: &str, id: CallbackId, priority: i32) -> bool {
    self.actions.write().remove(name, id, priority)
  }

  // --- Filters ---

  /// Adds a callback that transforms the value passed through `name`. The
  /// callback receives the value plus at most `accepted_args - 1` of the
  /// extra arguments passed to [`Hooks::apply_filters`].
  pub fn add_filter<F>(&self, name: &str, callback: F, priority: i32, accepted_args: usize) -> CallbackId
  where
    F: Fn(Value, &[Value]) -> Value + Send + Sync + 'static,
  {
    let id = self.next_id();
    tracing::debug!(hook = name, priority, "filter added");
    self.filters.write().add(
      name,
      Registered {
        id,
        priority,
        accepted_args,
        callback: Arc::new(callback),
      },
    );
    id
  }

  /// Threads `value` through every callback registered for `name`.
  pub fn apply_filters(&self, name: &str, value: Value, args: &[Value]) -> Value {
    let callbacks = self.filters.read().snapshot(name);
    let _running = InFlight::enter(&self.dispatch, Kind::Filter, name);
    callbacks.into_iter().fold(value, |value, (accepted_args, callback)| {
      let extra = accepted_args.saturating_sub(1).min(args.len());
      callback(value, &args[..extra])
    })
  }

  pub fn did_filter(&self, name: &str) -> usize {
    self.fired(Kind::Filter, name)
  }

  pub fn doing_filter(&self, name: Option<&str>) -> bool {
    self.doing(Kind::Filter, name)
  }

  pub fn has_filter(&self, name: &str) -> bool {
    self.filters.read().has_any(name)
  }

  pub fn filter_priority(&self, name: &str, id: CallbackId) -> Option<i32> {
    self.filters.read().priority_of(name, id)
  }

  pub fn remove_filter(&self, name: &str, id: CallbackId, priority: i32) -> bool {
    self.filters.write().remove(name, id, priority)
  }

  // --- Internals ---

  fn fired(&self, kind: Kind, name: &str) -> usize {
    self
      .dispatch
      .lock()
      .fired
      .get(&(kind, name.to_owned()))
      .copied()
      .unwrap_or(0)
  }

  fn doing(&self, kind: Kind, name: Option<&str>) -> bool {
    self
      .dispatch
      .lock()
      .in_flight
      .iter()
      .any(|(k, n)| *k == kind && name.map_or(true, |name| n == name))
  }
}
