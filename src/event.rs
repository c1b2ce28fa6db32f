//! Event handlers and the events passed to them.
//!
//! Handlers are plain reference-counted closures. Two handlers are the same
//! listener if and only if they share the same allocation, which mirrors how
//! a host document identifies listeners for removal.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;

// =============================================================================
// Event
// =============================================================================

/// Event delivered to handlers during dispatch.
#[derive(Debug)]
pub struct Event {
    kind: CompactString,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create an event of the given type (e.g. `"click"`).
    pub fn new(kind: impl Into<CompactString>) -> Self {
        Self {
            kind: kind.into(),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Event type name, without the `on` prefix.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Ask the host to skip its default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether any handler called [`Event::prevent_default`].
    #[inline]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop the event from bubbling to further ancestors.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether any handler called [`Event::stop_propagation`].
    #[inline]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

// =============================================================================
// EventHandler
// =============================================================================

/// Reference-counted event callback.
///
/// Cloning is cheap and preserves identity: a clone is the same listener as
/// its original.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    /// Wrap a closure as a handler.
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    #[inline]
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Whether both handles refer to the same closure.
    #[inline]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for EventHandler {}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Shorthand for [`EventHandler::new`].
pub fn handler(f: impl Fn(&Event) + 'static) -> EventHandler {
    EventHandler::new(f)
}
