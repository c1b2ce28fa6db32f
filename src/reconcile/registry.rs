//! Handler registry: which event handlers the reconciler has attached where.
//!
//! Hosts offer no way to enumerate listeners, so the reconciler keeps its own
//! table. Entries are keyed by host handle and hold no node storage. The
//! reconciler removes an element's entry when the element is discarded, and
//! an element whose last handler is detached loses its entry immediately.

use std::hash::Hash;

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::event::EventHandler;

type Bindings = FxHashMap<CompactString, EventHandler>;

/// Per-reconciler table of `element -> event name -> handler`.
#[derive(Debug, Clone)]
pub struct HandlerRegistry<N> {
    entries: FxHashMap<N, Bindings>,
}

impl<N> Default for HandlerRegistry<N> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<N: Eq + Hash + Clone> HandlerRegistry<N> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler bound to `event` on `node`.
    pub fn get(&self, node: &N, event: &str) -> Option<&EventHandler> {
        self.entries.get(node)?.get(event)
    }

    /// Whether `node` has any recorded handlers.
    pub fn contains(&self, node: &N) -> bool {
        self.entries.contains_key(node)
    }

    /// Event names recorded for `node`, sorted for determinism.
    pub fn events(&self, node: &N) -> Vec<CompactString> {
        let mut events: Vec<_> = self
            .entries
            .get(node)
            .map(|bindings| bindings.keys().cloned().collect())
            .unwrap_or_default();
        events.sort_unstable();
        events
    }

    /// Snapshot of all `(event, handler)` pairs recorded for `node`.
    pub fn bindings(&self, node: &N) -> Vec<(CompactString, EventHandler)> {
        self.entries
            .get(node)
            .map(|bindings| {
                bindings
                    .iter()
                    .map(|(event, handler)| (event.clone(), handler.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Record `handler` for `event` on `node`, returning the previous one.
    pub fn insert(
        &mut self,
        node: N,
        event: impl Into<CompactString>,
        handler: EventHandler,
    ) -> Option<EventHandler> {
        self.entries.entry(node).or_default().insert(event.into(), handler)
    }

    /// Forget the handler for `event` on `node`.
    ///
    /// Drops the element's entry once it has no handlers left.
    pub fn remove(&mut self, node: &N, event: &str) -> Option<EventHandler> {
        let bindings = self.entries.get_mut(node)?;
        let removed = bindings.remove(event);
        if bindings.is_empty() {
            self.entries.remove(node);
        }
        removed
    }

    /// Number of elements with at least one handler.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no element has handlers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of recorded handlers.
    pub fn handler_count(&self) -> usize {
        self.entries.values().map(FxHashMap::len).sum()
    }

    /// Keep only the elements for which `keep` returns true.
    ///
    /// Returns how many element entries were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&N) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|node, _| keep(node));
        before - self.entries.len()
    }
}
