//! Prelude module for common imports.
//!
//! ```
//! use clobber::prelude::*;
//! ```

// Builders (function and macro)
pub use crate::h;
pub use crate::node::h_with;

// Node types
pub use crate::node::{Children, Element, IntoChildren, Node, Text};

// Attributes
pub use crate::attr::{AttrKey, AttrValue, Attrs, AttrsExt, KEY_ATTR};

// Events
pub use crate::event::{handler, Event, EventHandler};

// Host
pub use crate::host::{FocusOptions, Host, NodeKind, PropValue};

// Reconciler
pub use crate::config::ReconcileConfig;
pub use crate::reconcile::{ReconcileStats, Reconciler};

// In-memory host
pub use crate::dom::{MemoryDocument, NodeId};

// Error
pub use crate::error::{DomError, DomResult};
