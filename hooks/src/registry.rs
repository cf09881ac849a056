//! Priority-ordered callback tables, shared by actions and filters.

use std::collections::HashMap;

/// Handle returned when a callback is added; used to query or remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub(crate) u64);

pub(crate) struct Registered<C> {
  pub(crate) id: CallbackId,
  pub(crate) priority: i32,
  pub(crate) accepted_args: usize,
  pub(crate) callback: C,
}

/// Callbacks per hook name, kept sorted by ascending priority. Callbacks with
/// equal priority keep their registration order.
pub(crate) struct Table<C> {
  hooks: HashMap<String, Vec<Registered<C>>>,
}

impl<C> Default for Table<C> {
  fn default() -> Self {
    Self {
      hooks: HashMap::new(),
    }
  }
}

impl<C: Clone> Table<C> {
  pub(crate) fn add(&mut self, name: &str, entry: Registered<C>) {
    let list = self.hooks.entry(name.to_owned()).or_default();
    let at = list.partition_point(|existing| existing.priority <= entry.priority);
    list.insert(at, entry);
  }

  /// Clones out the callbacks for `name` so they can run without the table
  /// being locked.
  pub(crate) fn snapshot(&self, name: &str) -> Vec<(usize, C)> {
    self
      .hooks
      .get(name)
      .map(|list| {
        list
          .iter()
          .map(|entry| (entry.accepted_args, entry.callback.clone()))
          .collect()
      })
      .unwrap_or_default()
  }

  pub(crate) fn has_any(&self, name: &str) -> bool {
    self.hooks.get(name).is_some_and(|list| !list.is_empty())
  }

  pub(crate) fn priority_of(&self, name: &str, id: CallbackId) -> Option<i32> {
    self
      .hooks
      .get(name)?
      .iter()
      .find(|entry| entry.id == id)
      .map(|entry| entry.priority)
  }

  /// Removes `id` from `name`, but only if it was added at `priority`.
  pub(crate) fn remove(&mut self, name: &str, id: CallbackId, priority: i32) -> bool {
    let Some(list) = self.hooks.get_mut(name) else {
      return false;
    };
    let Some(at) = list
      .iter()
      .position(|entry| entry.id == id && entry.priority == priority)
    else {
      return false;
    };
    list.remove(at);
    if list.is_empty() {
      self.hooks.remove(name);
    }
    true
  }
}
