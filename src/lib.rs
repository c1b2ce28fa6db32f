//! clobber - In-place virtual DOM reconciler
//!
//! Describe the children of a container as a tree of plain values, then let
//! [`Reconciler::reconcile`] mutate the live tree in place until it matches.
//! Repeated passes with the same description are no-ops apart from
//! attribute re-application.
//!
//! ## Core Concepts
//!
//! **Descriptions**: [`Element`], [`Text`] and [`Node`] are inert values built
//! with [`h`], [`h_with`] or the [`h!`] macro. An element carries its tag,
//! ordered attributes (strings, booleans, event handlers) and children.
//!
//! **Hosts**: the live tree is reached through the [`Host`] trait. The crate
//! ships [`MemoryDocument`], an arena-backed headless document with focus,
//! text cursors and event dispatch.
//!
//! **Matching**: siblings are matched by tag and by the `x-bdc-key`
//! attribute in a single forward scan, so keyed rows keep their identity
//! (and any state a user gave them) across reorders.
//!
//! ## Modules
//! - `node`: description types and builders
//! - `attr`: attribute values and helpers
//! - `event`: events and handler identity
//! - `host`: the live-tree capability trait
//! - `reconcile`: the reconciler and its handler registry
//! - `dom`: the in-memory host
//!
//! ## Usage
//!
//! ```
//! use clobber::prelude::*;
//!
//! let mut doc = MemoryDocument::new();
//! let root = doc.create_root("div").unwrap();
//! let mut reconciler = Reconciler::new();
//!
//! fn view(items: &[&str]) -> Element {
//!     h!("ul", items
//!         .iter()
//!         .map(|item| h!("li", { "x-bdc-key" => *item }, *item))
//!         .collect::<Vec<_>>())
//! }
//!
//! reconciler.reconcile(&mut doc, &root, view(&["a", "b"])).unwrap();
//! let ul = doc.child(root, 0).unwrap();
//! let b = doc.child(ul, 1).unwrap();
//!
//! let stats = reconciler.reconcile(&mut doc, &root, view(&["b", "a"])).unwrap();
//! assert_eq!(doc.child(ul, 0), Some(b));
//! assert_eq!(stats.elements_created, 0);
//! ```

mod macros;

/// Attribute values and helpers
pub mod attr;

/// Reconciler configuration
pub mod config;

/// Arena-backed in-memory document
pub mod dom;

/// Error types
pub mod error;

/// Events and handlers
pub mod event;

/// Live-tree capability trait
pub mod host;

/// Node description types: Element, Node, Text
pub mod node;

/// Prelude for common imports
pub mod prelude;

/// Reconciliation
pub mod reconcile;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{h, h_with, Children, Element, IntoChildren, Node, Text};

// Attribute types
pub use attr::{AttrKey, AttrValue, Attrs, AttrsExt, Tag, KEY_ATTR};

// Events
pub use event::{handler, Event, EventHandler};

// Host
pub use host::{FocusOptions, Host, NodeKind, PropValue};

// Reconciler
pub use config::ReconcileConfig;
pub use reconcile::{HandlerRegistry, ReconcileStats, Reconciler};

// In-memory host
pub use dom::{MemoryDocument, NodeId};

// Error types
pub use error::{DomError, DomResult};
