//! Reconciler configuration.

use compact_str::CompactString;

use crate::attr::KEY_ATTR;

/// Configuration for a [`Reconciler`](crate::Reconciler).
///
/// Each reconciler carries its own config, so independent roots on the same
/// document may use different key attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Attribute carrying the sibling identity hint.
    /// Default: `x-bdc-key`
    pub key_attr: CompactString,
    /// Refocus the previously focused node when a pass moved it.
    /// Default: true
    pub restore_focus: bool,
    /// Suppress scroll-into-view when focusing.
    /// Default: true
    pub prevent_scroll: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            key_attr: CompactString::from(KEY_ATTR),
            restore_focus: true,
            prevent_scroll: true,
        }
    }
}

impl ReconcileConfig {
    /// Create the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom key attribute.
    pub fn with_key_attr(mut self, key_attr: impl Into<CompactString>) -> Self {
        self.key_attr = key_attr.into();
        self
    }

    /// Enable or disable focus restoration.
    ///
    /// Autofocus on newly created elements is honored either way.
    pub fn with_restore_focus(mut self, restore_focus: bool) -> Self {
        self.restore_focus = restore_focus;
        self
    }

    /// Enable or disable scroll suppression on focus.
    pub fn with_prevent_scroll(mut self, prevent_scroll: bool) -> Self {
        self.prevent_scroll = prevent_scroll;
        self
    }
}
