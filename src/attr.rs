//! Attribute system for description elements
//!
//! Attributes are stored as `Vec<(AttrKey, AttrValue)>` with set-semantics on
//! keys: setting an existing key replaces its value. Order is irrelevant to
//! reconciliation.

use compact_str::{CompactString, ToCompactString};

use crate::event::EventHandler;

/// Attribute name
pub type AttrKey = CompactString;

/// Element tag name
pub type Tag = CompactString;

/// Element attributes as key-value pairs
pub type Attrs = Vec<(AttrKey, AttrValue)>;

/// Default attribute carrying a sibling identity hint.
pub const KEY_ATTR: &str = "x-bdc-key";

/// Prefix that marks an attribute key as an event handler.
pub const EVENT_PREFIX: &str = "on";

/// Event type named by an `on*` key (`onclick` -> `click`).
///
/// Returns `None` for plain attribute keys.
#[inline]
pub fn event_name(key: &str) -> Option<&str> {
    key.strip_prefix(EVENT_PREFIX)
}

// =============================================================================
// AttrValue
// =============================================================================

/// Target value for an attribute, property or event binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// String value
    Str(CompactString),
    /// Boolean attribute: present (empty value) or absent
    Bool(bool),
    /// Event listener (only meaningful under an `on*` key)
    Handler(EventHandler),
    /// Explicitly absent
    Null,
}

impl AttrValue {
    /// Check if this value is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the handler payload, if this is a `Handler`.
    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            Self::Handler(h) => Some(h),
            _ => None,
        }
    }

    /// Truthiness: non-empty strings, `true`, and handlers.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Handler(_) => true,
            Self::Null => false,
        }
    }

    /// String form written to the host.
    ///
    /// `Bool` renders as `"true"`/`"false"`; handlers and `Null` have none.
    pub fn to_attr_string(&self) -> Option<CompactString> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_compact_string()),
            Self::Handler(_) | Self::Null => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        Self::Str(s.into())
    }
}

impl From<CompactString> for AttrValue {
    fn from(s: CompactString) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<EventHandler> for AttrValue {
    fn from(h: EventHandler) -> Self {
        Self::Handler(h)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// AttrsExt
// =============================================================================

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&AttrValue>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update)
    fn set_attr(&mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<AttrValue>;
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| *k == name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// Tests
// =============================================================================
