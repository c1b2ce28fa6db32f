//! Host document capability interface.
//!
//! The reconciler never owns live nodes. It drives a [`Host`] through the
//! small set of operations below, addressing nodes by the host's own handle
//! type. Host failures are returned as `Self::Error` and propagated unchanged
//! by the reconciler.

use std::fmt;
use std::hash::Hash;

use compact_str::CompactString;

use crate::attr::AttrKey;
use crate::event::EventHandler;

/// Coarse classification of a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An element with a local name, attributes and children
    Element,
    /// A text node
    Text,
    /// Anything else (comments, the document itself, ...)
    Other,
}

/// Value assigned to a live IDL property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// String value
    Str(CompactString),
    /// Boolean value
    Bool(bool),
    /// `null`
    Null,
}

impl PropValue {
    /// Truthiness as a host script would see it.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Null => false,
        }
    }
}

/// Options for [`Host::focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusOptions {
    /// Do not scroll the focused node into view.
    pub prevent_scroll: bool,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self { prevent_scroll: true }
    }
}

/// Capabilities the reconciler consumes from a host document.
///
/// Read operations are infallible and answer `None`/`false` for handles the
/// host no longer recognises. Mutations may fail with `Self::Error`.
pub trait Host {
    /// Handle to a live node. Must be cheap to clone and comparable by identity.
    type Node: Clone + Eq + Hash + fmt::Debug;

    /// Error raised by mutating operations.
    type Error: std::error::Error;

    // ─────────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a detached element with the given tag.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Create a detached text node. Content is literal text, never markup.
    fn create_text(&mut self, content: &str) -> Result<Self::Node, Self::Error>;

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Classify a node. Released or unknown handles are [`NodeKind::Other`].
    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// Local name of an element, `None` for other nodes.
    fn local_name(&self, node: &Self::Node) -> Option<CompactString>;

    /// Content of a text node.
    fn text(&self, node: &Self::Node) -> Option<String>;

    /// Replace the content of a text node.
    fn set_text(&mut self, node: &Self::Node, content: &str) -> Result<(), Self::Error>;

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes and properties
    // ─────────────────────────────────────────────────────────────────────────

    /// Names of all attributes currently present on an element.
    fn attribute_names(&self, node: &Self::Node) -> Vec<AttrKey>;

    /// Value of a named attribute.
    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether a named attribute is present.
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Set a named attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
        -> Result<(), Self::Error>;

    /// Remove a named attribute. Removing an absent attribute is not an error.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

    /// Whether the element exposes `name` as a writable IDL property.
    fn has_property(&self, node: &Self::Node, name: &str) -> bool;

    /// Current value of an IDL property, in string form.
    fn get_property(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Assign an IDL property.
    fn set_property(&mut self, node: &Self::Node, name: &str, value: PropValue)
        -> Result<(), Self::Error>;

    /// Replace the element's whole inline style. Empty clears it.
    fn set_style_text(&mut self, node: &Self::Node, css: &str) -> Result<(), Self::Error>;

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach a listener for `event`.
    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), Self::Error>;

    /// Detach a listener previously attached with the same event and handler.
    fn remove_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), Self::Error>;

    // ─────────────────────────────────────────────────────────────────────────
    // Tree structure
    // ─────────────────────────────────────────────────────────────────────────

    /// First child of a node.
    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Next sibling of a node.
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Insert `node` into `parent` before `reference`, or append when
    /// `reference` is `None`. A node that is already attached is moved.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        node: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), Self::Error>;

    /// Append `node` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, node: &Self::Node) -> Result<(), Self::Error> {
        self.insert_before(parent, node, None)
    }

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Put `new` where `old` is and detach `old`.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new: &Self::Node,
        old: &Self::Node,
    ) -> Result<(), Self::Error> {
        self.insert_before(parent, new, Some(old))?;
        self.remove_child(parent, old)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Focus and lifetime
    // ─────────────────────────────────────────────────────────────────────────

    /// The node that currently holds focus.
    fn active_element(&self) -> Option<Self::Node>;

    /// Move focus to `node`.
    fn focus(&mut self, node: &Self::Node, options: FocusOptions) -> Result<(), Self::Error>;

    /// Whether the node is attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Called once the reconciler has removed `node` and holds no further
    /// references to it. Hosts that own node storage may reclaim it.
    fn release(&mut self, node: &Self::Node) {
        let _ = node;
    }
}
