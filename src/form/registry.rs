//! Field registry: the single source of truth for field state
//!
//! Each field lives in its own `watch` channel so observers can subscribe
//! to exactly the path they render and are only woken by real changes.

use super::field::FieldState;
use super::path::FieldPath;
use super::value::FormValues;
use std::collections::BTreeMap;
use tokio::sync::watch;

#[derive(Debug)]
pub struct FieldRegistry {
    fields: BTreeMap<FieldPath, watch::Sender<FieldState>>,
}

impl FieldRegistry {
    /// Register one field per default value
    pub fn from_defaults(defaults: &FormValues) -> Self {
        let fields = defaults
            .iter()
            .map(|(path, value)| {
                let (tx, _rx) = watch::channel(FieldState::new(value.clone()));
                (path.clone(), tx)
            })
            .collect();
        Self { fields }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Clone of the current state of a field
    pub fn state(&self, path: &str) -> Option<FieldState> {
        self.fields.get(path).map(|tx| tx.borrow().clone())
    }

    /// Read a field's state without cloning it
    pub fn with_state<R>(&self, path: &str, f: impl FnOnce(&FieldState) -> R) -> Option<R> {
        self.fields.get(path).map(|tx| f(&tx.borrow()))
    }

    /// Mutate a field in place. The closure reports whether it changed
    /// anything; subscribers are only notified when it did.
    ///
    /// Returns `None` for unknown paths.
    pub fn update(&self, path: &str, f: impl FnOnce(&mut FieldState) -> bool) -> Option<bool> {
        self.fields.get(path).map(|tx| tx.send_if_modified(f))
    }

    /// Apply the same mutation to every field
    pub fn update_all(&self, mut f: impl FnMut(&FieldPath, &mut FieldState) -> bool) {
        for (path, tx) in &self.fields {
            tx.send_if_modified(|state| f(path, state));
        }
    }

    pub fn subscribe(&self, path: &str) -> Option<watch::Receiver<FieldState>> {
        self.fields.get(path).map(watch::Sender::subscribe)
    }

    /// Current values of every field
    pub fn snapshot(&self) -> FormValues {
        self.fields
            .iter()
            .map(|(path, tx)| (path.clone(), tx.borrow().value.clone()))
            .collect()
    }
}
