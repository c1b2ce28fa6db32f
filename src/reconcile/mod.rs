//! In-place reconciliation of a live tree against a description tree.
//!
//! # Algorithm
//!
//! For each container, a single left-to-right pass with a cursor over the
//! live children:
//!
//! 1. Text descriptions reuse the node at the cursor if it is a text node,
//!    otherwise a new text node is created.
//! 2. Element descriptions scan forward from the cursor (never from the
//!    start) for the first element with the same tag and the same key. A hit
//!    is reused and moved into place; a miss creates a new element.
//! 3. Attributes are synchronized, then children recursively.
//! 4. The node is inserted before the cursor unless it already is the cursor;
//!    the cursor advances past it.
//! 5. Every live sibling left after the cursor is removed.
//!
//! # Complexity
//!
//! - Worst case: O(n * m) per child list (n live, m described) from the scan
//! - Common case: O(n) when live order already matches description order
//!
//! # Focus
//!
//! The active element is recorded before a pass and refocused afterwards if
//! it is still connected but lost focus (relocated nodes lose focus in most
//! hosts). A newly created element marked `autofocus` takes precedence.

mod attrs;
mod registry;

#[cfg(test)]
mod tests;

pub use registry::HandlerRegistry;

use std::fmt;

use tracing::{debug, debug_span, trace};

use crate::config::ReconcileConfig;
use crate::host::{FocusOptions, Host, NodeKind};
use crate::node::{Element, IntoChildren, Node, Text};

// =============================================================================
// Stats
// =============================================================================

/// Statistics from a reconciliation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Elements created because no candidate matched
    pub elements_created: usize,
    /// Elements reused in place or after a move
    pub elements_reused: usize,
    /// Reused elements that had to be relocated
    pub elements_moved: usize,
    /// Text nodes created
    pub text_created: usize,
    /// Text nodes whose content changed
    pub text_updated: usize,
    /// Unclaimed live nodes removed
    pub nodes_removed: usize,
    /// Attribute or property writes
    pub attrs_set: usize,
    /// Attribute or property removals
    pub attrs_removed: usize,
    /// Event listeners attached
    pub handlers_attached: usize,
    /// Event listeners detached
    pub handlers_detached: usize,
}

impl ReconcileStats {
    /// Check if the pass changed the live tree at all.
    ///
    /// Attribute writes are not counted: most are unconditional re-applies.
    pub fn has_structural_changes(&self) -> bool {
        self.elements_created > 0
            || self.elements_moved > 0
            || self.text_created > 0
            || self.text_updated > 0
            || self.nodes_removed > 0
    }
}

// =============================================================================
// Reconciler
// =============================================================================

/// Synchronizes live children of a container with a list of descriptions.
///
/// Owns the handler registry and the transient focus target, so independent
/// roots on one document each get their own reconciler and never interfere.
/// Calls against overlapping subtrees must not interleave.
///
/// ```
/// use clobber::prelude::*;
///
/// let mut doc = MemoryDocument::new();
/// let root = doc.create_root("div").unwrap();
/// let mut reconciler = Reconciler::new();
///
/// reconciler.reconcile(&mut doc, &root, h!("p", "Hello, World!")).unwrap();
/// let p = doc.child(root, 0).unwrap();
/// assert_eq!(doc.tag(p), Some("p"));
/// assert_eq!(doc.text_content(p), "Hello, World!");
/// ```
pub struct Reconciler<H: Host> {
    config: ReconcileConfig,
    registry: HandlerRegistry<H::Node>,
    focus_target: Option<H::Node>,
    stats: ReconcileStats,
}

impl<H: Host> fmt::Debug for Reconciler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("focus_target", &self.focus_target)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Default for Reconciler<H> {
    fn default() -> Self {
        Self::with_config(ReconcileConfig::default())
    }
}

impl<H: Host> Reconciler<H> {
    /// Create a reconciler with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler with a custom config.
    pub fn with_config(config: ReconcileConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::new(),
            focus_target: None,
            stats: ReconcileStats::default(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Handlers this reconciler has attached.
    pub fn registry(&self) -> &HandlerRegistry<H::Node> {
        &self.registry
    }

    /// Drop registry entries for elements the host has released.
    ///
    /// Another reconciler (or the caller) may remove and release a subtree
    /// holding elements this reconciler bound handlers to. Runs at the start
    /// of every [`reconcile`](Self::reconcile); returns the number of
    /// elements dropped.
    pub fn prune(&mut self, host: &H) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        let pruned = self
            .registry
            .retain(|node| host.kind(node) == NodeKind::Element);
        if pruned > 0 {
            debug!(pruned, "dropped handlers of released elements");
        }
        pruned
    }

    /// Detach every handler this reconciler bound inside `root`.
    ///
    /// For subtrees the caller is about to remove itself, such as a
    /// container that is being unmounted.
    pub fn forget(&mut self, host: &mut H, root: &H::Node) -> Result<(), H::Error> {
        if self.registry.is_empty() {
            return Ok(());
        }
        self.forget_subtree(host, root)
    }

    /// Update the children of `container` to match `children`.
    ///
    /// Accepts a single description or a list. Host errors propagate
    /// unchanged; the live tree is then left partially updated but valid.
    pub fn reconcile(
        &mut self,
        host: &mut H,
        container: &H::Node,
        children: impl IntoChildren,
    ) -> Result<ReconcileStats, H::Error> {
        let children = children.into_children();
        let span = debug_span!("reconcile", ?container, children = children.len());
        let _guard = span.enter();

        self.stats = ReconcileStats::default();
        self.prune(host);
        self.focus_target = if self.config.restore_focus {
            host.active_element()
        } else {
            None
        };

        let result = self.update_children(host, container, &children);
        let focus_target = self.focus_target.take();
        result?;

        if let Some(target) = focus_target {
            self.restore_focus(host, &target)?;
        }

        let stats = std::mem::take(&mut self.stats);
        debug!(?stats, "reconcile complete");
        Ok(stats)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    fn update_children(
        &mut self,
        host: &mut H,
        parent: &H::Node,
        children: &[Node],
    ) -> Result<(), H::Error> {
        let mut cursor = host.first_child(parent);
        for child in children {
            cursor = self.update(host, parent, child, cursor)?;
        }

        // Remove any trailing nodes
        while let Some(target) = cursor {
            cursor = host.next_sibling(&target);
            self.discard(host, parent, &target)?;
        }
        Ok(())
    }

    /// Bring one description into place at `cursor`, returning the new cursor.
    fn update(
        &mut self,
        host: &mut H,
        parent: &H::Node,
        node: &Node,
        cursor: Option<H::Node>,
    ) -> Result<Option<H::Node>, H::Error> {
        let live = match node {
            Node::Text(text) => self.update_text(host, text, cursor.as_ref())?,
            Node::Element(element) => self.update_element(host, element, cursor.as_ref())?,
        };

        if cursor.as_ref() != Some(&live) {
            host.insert_before(parent, &live, cursor.as_ref())?;
        }

        Ok(host.next_sibling(&live))
    }

    fn update_text(
        &mut self,
        host: &mut H,
        text: &Text,
        cursor: Option<&H::Node>,
    ) -> Result<H::Node, H::Error> {
        match cursor {
            Some(live) if host.kind(live) == NodeKind::Text => {
                if host.text(live).as_deref() != Some(text.as_str()) {
                    host.set_text(live, text.as_str())?;
                    self.stats.text_updated += 1;
                }
                Ok(live.clone())
            }
            _ => {
                self.stats.text_created += 1;
                host.create_text(text.as_str())
            }
        }
    }

    fn update_element(
        &mut self,
        host: &mut H,
        element: &Element,
        cursor: Option<&H::Node>,
    ) -> Result<H::Node, H::Error> {
        let key = element.key_value(&self.config.key_attr);

        let mut candidate = cursor.cloned();
        while let Some(live) = &candidate {
            if self.is_match(host, live, element, key.as_deref()) {
                break;
            }
            candidate = host.next_sibling(live);
        }

        let live = match candidate {
            Some(live) => {
                self.stats.elements_reused += 1;
                if cursor != Some(&live) {
                    self.stats.elements_moved += 1;
                    trace!(?live, tag = %element.tag, "moving matched element");
                }
                live
            }
            None => {
                let live = host.create_element(&element.tag)?;
                self.stats.elements_created += 1;
                trace!(?live, tag = %element.tag, key = ?key, "created element");
                if element.wants_autofocus() {
                    self.focus_target = Some(live.clone());
                }
                live
            }
        };

        self.update_attributes(host, &live, &element.attrs)?;
        self.update_children(host, &live, &element.children)?;
        Ok(live)
    }

    /// Same tag, and same key. A live element without the key attribute
    /// matches only an unkeyed description; one carrying it, even empty,
    /// matches only that key.
    fn is_match(&self, host: &H, live: &H::Node, element: &Element, key: Option<&str>) -> bool {
        if host.kind(live) != NodeKind::Element {
            return false;
        }
        if host.local_name(live).as_deref() != Some(element.tag.as_str()) {
            return false;
        }
        host.get_attribute(live, &self.config.key_attr).as_deref() == key
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Removal
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove an unclaimed node, dropping every handler binding in its subtree.
    fn discard(&mut self, host: &mut H, parent: &H::Node, node: &H::Node) -> Result<(), H::Error> {
        trace!(?node, "removing unclaimed node");
        if !self.registry.is_empty() {
            self.forget_subtree(host, node)?;
        }
        host.remove_child(parent, node)?;
        host.release(node);
        self.stats.nodes_removed += 1;
        Ok(())
    }

    fn forget_subtree(&mut self, host: &mut H, root: &H::Node) -> Result<(), H::Error> {
        let mut stack = vec![root.clone()];
        while let Some(current) = stack.pop() {
            if self.registry.contains(&current) {
                for (event, handler) in self.registry.bindings(&current) {
                    host.remove_event_listener(&current, &event, &handler)?;
                    self.registry.remove(&current, &event);
                    self.stats.handlers_detached += 1;
                }
            }

            let mut child = host.first_child(&current);
            while let Some(node) = child {
                child = host.next_sibling(&node);
                stack.push(node);
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────────

    fn restore_focus(&mut self, host: &mut H, target: &H::Node) -> Result<(), H::Error> {
        if host.kind(target) != NodeKind::Element || !host.is_connected(target) {
            return Ok(());
        }
        if host.active_element().as_ref() == Some(target) {
            return Ok(());
        }
        trace!(?target, "restoring focus");
        let options = FocusOptions {
            prevent_scroll: self.config.prevent_scroll,
        };
        host.focus(target, options)
    }
}
