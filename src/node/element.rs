//! Element type - tag, attributes and ordered children
//!
//! The core building block of a description tree.

use compact_str::CompactString;

use crate::attr::{event_name, AttrKey, AttrValue, Attrs, AttrsExt, Tag, EVENT_PREFIX, KEY_ATTR};
use crate::event::EventHandler;

use super::{Children, IntoChildren, Node};

// =============================================================================
// Element
// =============================================================================

/// Description of an element: tag, attributes and ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, compared verbatim against the host's local name
    pub tag: Tag,
    /// Element attributes, event handlers included
    pub attrs: Attrs,
    /// Child nodes
    pub children: Children,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Set an attribute (builder pattern)
    pub fn attr(mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the default sibling key attribute (`x-bdc-key`)
    pub fn key(self, key: impl Into<CompactString>) -> Self {
        self.attr(KEY_ATTR, AttrValue::Str(key.into()))
    }

    /// Bind an event handler, `event` given without the `on` prefix
    pub fn on(self, event: &str, handler: EventHandler) -> Self {
        let mut key = AttrKey::from(EVENT_PREFIX);
        key.push_str(event);
        self.attr(key, handler)
    }

    /// Append children (builder pattern)
    pub fn child(mut self, child: impl IntoChildren) -> Self {
        child.extend_into(&mut self.children);
        self
    }

    /// Append a text child (builder pattern)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::text(content));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get_attr(name)
    }

    /// Set attribute value (update if exists, add if not)
    pub fn set_attr(&mut self, name: impl Into<AttrKey>, value: impl Into<AttrValue>) {
        self.attrs.set_attr(name, value);
    }

    /// Remove attribute by name, returning the old value if it existed
    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove_attr(name)
    }

    /// Check if attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attr(name)
    }

    /// Identity hint stored under `key_attr`.
    ///
    /// Empty and falsy values count as no key, as do handlers.
    pub fn key_value(&self, key_attr: &str) -> Option<CompactString> {
        self.get_attr(key_attr)
            .filter(|v| v.is_truthy())
            .and_then(AttrValue::to_attr_string)
    }

    /// Whether the element asks for focus when first created
    pub fn wants_autofocus(&self) -> bool {
        self.get_attr("autofocus").is_some_and(AttrValue::is_truthy)
    }

    /// Iterate over bound event handlers as `(event, handler)` pairs
    pub fn handlers(&self) -> impl Iterator<Item = (&str, &EventHandler)> {
        self.attrs.iter().filter_map(|(k, v)| Some((event_name(k)?, v.as_handler()?)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Other helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children (all node types)
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterate over child element references
    pub fn children_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }
}
