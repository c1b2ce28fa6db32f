//! Arena-backed in-memory document.
//!
//! [`MemoryDocument`] is a complete [`Host`] without a browser: elements,
//! text and comment nodes in a generational arena, IDL properties from an
//! explicit table, live input values with a text cursor, focus, and event
//! listeners with bubbling dispatch.
//!
//! It behaves like a browser where the reconciler cares:
//!
//! - Moving or removing a node that contains the focused element blurs it.
//! - Writing an input's `value` property moves the cursor to the end.
//! - Text content is stored verbatim and never parsed.
//!
//! # Node identity
//!
//! [`NodeId`] is a slot index plus a generation. Released slots are reused
//! with a bumped generation, so a stale handle never aliases a newer node.

mod props;
#[cfg(test)]
mod render;

use props::PropKind;

use std::fmt;

use compact_str::{CompactString, ToCompactString};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::attr::AttrKey;
use crate::error::{DomError, DomResult};
use crate::event::{Event, EventHandler};
use crate::host::{FocusOptions, Host, NodeKind, PropValue};

// =============================================================================
// NodeId
// =============================================================================

/// Handle to a node in a [`MemoryDocument`].
///
/// - On creation, a fresh slot starts at generation `1`.
/// - On release, the slot is freed and every handle to it becomes stale.
/// - On reuse, the generation is incremented, producing a distinct handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Storage
// =============================================================================

#[derive(Debug)]
enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Default)]
struct ElementData {
    tag: CompactString,
    attrs: Vec<(AttrKey, String)>,
    listeners: Vec<(CompactString, EventHandler)>,
    /// Live control value; `None` until written or typed into
    value: Option<String>,
    checked: Option<bool>,
    selected: Option<bool>,
    /// Cursor/selection as char offsets into the live value
    selection: (usize, usize),
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            attr.1 = value.to_string();
        } else {
            self.attrs.push((name.into(), value.to_string()));
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }
}

#[derive(Debug)]
struct NodeRecord {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    expandos: FxHashMap<CompactString, String>,
}

impl NodeRecord {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            expandos: FxHashMap::default(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    record: Option<NodeRecord>,
}

// =============================================================================
// MemoryDocument
// =============================================================================

/// Headless document implementing [`Host`].
///
/// ```
/// use clobber::prelude::*;
///
/// let mut doc = MemoryDocument::new();
/// let root = doc.create_root("main").unwrap();
/// let p = doc.create_element("p").unwrap();
/// let text = doc.create_text("<b>literal</b>").unwrap();
/// doc.append_child(&p, &text).unwrap();
/// doc.append_child(&root, &p).unwrap();
///
/// assert!(doc.is_connected(&text));
/// assert_eq!(doc.children(root), vec![p]);
/// assert!(doc.child_elements(p).is_empty());
/// assert_eq!(doc.text_content(root), "<b>literal</b>");
/// ```
#[derive(Debug)]
pub struct MemoryDocument {
    slots: Vec<Slot>,
    free: Vec<u32>,
    document: NodeId,
    active: Option<NodeId>,
    scroll_requests: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            document: NodeId::new(0, 1),
            active: None,
            scroll_requests: 0,
        };
        doc.document = doc.alloc(NodeData::Document);
        doc
    }

    /// The document node. Nodes are connected when it is an ancestor.
    #[inline]
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Create an element and attach it to the document.
    pub fn create_root(&mut self, tag: &str) -> DomResult<NodeId> {
        let root = self.create_element(tag)?;
        let document = self.document;
        self.insert_before(&document, &root, None)?;
        Ok(root)
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(NodeData::Comment(content.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Arena
    // ─────────────────────────────────────────────────────────────────────────

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let record = Some(NodeRecord::new(data));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.saturating_add(1);
            slot.record = record;
            NodeId::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot { generation: 1, record });
            NodeId::new(index, 1)
        }
    }

    fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.record.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.record.as_mut())
    }

    fn get_opt_mut(&mut self, id: Option<NodeId>) -> Option<&mut NodeRecord> {
        match id {
            Some(id) => self.get_mut(id),
            None => None,
        }
    }

    fn record(&self, id: NodeId) -> DomResult<&NodeRecord> {
        self.get(id).ok_or(DomError::StaleNode(id))
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match &mut self.get_mut(id).ok_or(DomError::StaleNode(id))?.data {
            NodeData::Element(e) => Ok(e),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Whether the handle still refers to a live slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of nodes currently allocated, the document included.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.record.is_some()).count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree links
    // ─────────────────────────────────────────────────────────────────────────

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|r| r.parent);
        }
        false
    }

    /// Detach `id` from its parent, blurring focus inside it.
    fn unlink(&mut self, id: NodeId) {
        if let Some(active) = self.active {
            if self.is_inclusive_ancestor(id, active) {
                trace!(?active, "focused node detached, blurring");
                self.active = None;
            }
        }

        let Some(record) = self.get_mut(id) else {
            return;
        };
        let parent = record.parent.take();
        let prev = record.prev_sibling.take();
        let next = record.next_sibling.take();

        match prev {
            Some(p) => {
                if let Some(r) = self.get_mut(p) {
                    r.next_sibling = next;
                }
            }
            None => {
                if let Some(r) = self.get_opt_mut(parent) {
                    r.first_child = next;
                }
            }
        }
        match next {
            Some(n) => {
                if let Some(r) = self.get_mut(n) {
                    r.prev_sibling = prev;
                }
            }
            None => {
                if let Some(r) = self.get_opt_mut(parent) {
                    r.last_child = prev;
                }
            }
        }
    }

    /// Link a detached `id` into `parent` before `reference`.
    fn link_before(&mut self, parent: NodeId, id: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(r) => self.get(r).and_then(|rec| rec.prev_sibling),
            None => self.get(parent).and_then(|rec| rec.last_child),
        };

        if let Some(record) = self.get_mut(id) {
            record.parent = Some(parent);
            record.prev_sibling = prev;
            record.next_sibling = reference;
        }

        match prev {
            Some(p) => {
                if let Some(r) = self.get_mut(p) {
                    r.next_sibling = Some(id);
                }
            }
            None => {
                if let Some(r) = self.get_mut(parent) {
                    r.first_child = Some(id);
                }
            }
        }
        match reference {
            Some(r) => {
                if let Some(rec) = self.get_mut(r) {
                    rec.prev_sibling = Some(id);
                }
            }
            None => {
                if let Some(rec) = self.get_mut(parent) {
                    rec.last_child = Some(id);
                }
            }
        }
    }

    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut child = self.get(id).and_then(|r| r.last_child);
            while let Some(c) = child {
                stack.push(c);
                child = self.get(c).and_then(|r| r.prev_sibling);
            }
        }
        out
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// All child nodes, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut child = self.get(id).and_then(|r| r.first_child);
        while let Some(c) = child {
            out.push(c);
            child = self.get(c).and_then(|r| r.next_sibling);
        }
        out
    }

    /// Child node at `index`.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Child elements, in order.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .into_iter()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    /// Local name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Value of an attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// All attributes as `(name, value)` pairs, in insertion order.
    pub fn attributes(&self, id: NodeId) -> Vec<(String, String)> {
        self.element(id)
            .map(|e| {
                e.attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.subtree(id) {
            if let Some(NodeRecord {
                data: NodeData::Text(t),
                ..
            }) = self.get(node)
            {
                out.push_str(t);
            }
        }
        out
    }

    /// Number of listeners for `event` on a node.
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.element(id)
            .map(|e| e.listeners.iter().filter(|(k, _)| k == event).count())
            .unwrap_or(0)
    }

    /// Times `focus` was asked to scroll a node into view.
    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expandos
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach an arbitrary marker to a live node.
    pub fn set_expando(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let record = self.get_mut(id).ok_or(DomError::StaleNode(id))?;
        record.expandos.insert(name.into(), value.to_string());
        Ok(())
    }

    /// Read a marker set with [`set_expando`](Self::set_expando).
    pub fn expando(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.expandos.get(name).map(String::as_str)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form controls
    // ─────────────────────────────────────────────────────────────────────────

    fn is_text_control(&self, id: NodeId) -> bool {
        self.element(id)
            .is_some_and(|e| props::lookup(&e.tag, "value") == Some(PropKind::Value))
    }

    fn control_value(&self, id: NodeId) -> String {
        let Some(element) = self.element(id) else {
            return String::new();
        };
        if let Some(value) = &element.value {
            return value.clone();
        }
        if element.tag == "textarea" {
            self.text_content(id)
        } else {
            element.attr("value").unwrap_or_default().to_string()
        }
    }

    fn option_value(&self, id: NodeId) -> String {
        match self.attribute(id, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(id).trim().to_string(),
        }
    }

    fn option_selected(&self, id: NodeId) -> bool {
        self.element(id)
            .is_some_and(|e| e.selected.unwrap_or_else(|| e.attr("selected").is_some()))
    }

    fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.subtree(select)
            .into_iter()
            .skip(1)
            .filter(|id| self.tag(*id) == Some("option"))
            .collect()
    }

    fn select_value(&self, select: NodeId) -> String {
        let options = self.options(select);
        options
            .iter()
            .find(|o| self.option_selected(**o))
            .or_else(|| options.first())
            .map(|o| self.option_value(*o))
            .unwrap_or_default()
    }

    /// Live value of a form control.
    pub fn value(&self, id: NodeId) -> Option<String> {
        self.get_property(&id, "value")
    }

    /// Cursor/selection of a text control as char offsets.
    pub fn selection(&self, id: NodeId) -> Option<(usize, usize)> {
        if !self.is_text_control(id) {
            return None;
        }
        self.element(id).map(|e| e.selection)
    }

    /// Set the cursor/selection of a text control, clamped to its value.
    pub fn set_selection(&mut self, id: NodeId, start: usize, end: usize) -> DomResult<()> {
        if !self.is_text_control(id) {
            return Err(DomError::NotATextControl(id));
        }
        let len = self.control_value(id).chars().count();
        let start = start.min(len);
        self.element_mut(id)?.selection = (start, end.clamp(start, len));
        Ok(())
    }

    /// Collapse the selection and move the cursor one character left.
    pub fn move_cursor_left(&mut self, id: NodeId) -> DomResult<()> {
        let (start, _) = self.selection(id).ok_or(DomError::NotATextControl(id))?;
        let caret = start.saturating_sub(1);
        self.set_selection(id, caret, caret)
    }

    /// Insert text at the cursor as if typed, replacing any selection.
    pub fn type_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        if !self.is_text_control(id) {
            return Err(DomError::NotATextControl(id));
        }
        let current = self.control_value(id);
        let element = self.element_mut(id)?;
        let len = current.chars().count();
        let start = element.selection.0.min(len);
        let end = element.selection.1.clamp(start, len);

        let mut next = String::with_capacity(current.len() + text.len());
        next.push_str(&current[..byte_offset(&current, start)]);
        next.push_str(text);
        next.push_str(&current[byte_offset(&current, end)..]);

        let caret = start + text.chars().count();
        element.value = Some(next);
        element.selection = (caret, caret);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Dispatch an event at `target`, bubbling to its ancestors.
    ///
    /// Returns whether a handler prevented the default action.
    pub fn dispatch(&self, target: NodeId, kind: &str) -> DomResult<bool> {
        self.record(target)?;
        let event = Event::new(kind);
        let mut current = Some(target);
        while let Some(id) = current {
            let handlers: Vec<EventHandler> = self
                .element(id)
                .map(|e| {
                    e.listeners
                        .iter()
                        .filter(|(k, _)| k == kind)
                        .map(|(_, h)| h.clone())
                        .collect()
                })
                .unwrap_or_default();
            for handler in &handlers {
                handler.call(&event);
            }
            if event.propagation_stopped() {
                break;
            }
            current = self.parent(id);
        }
        Ok(event.default_prevented())
    }

    /// Dispatch a `click` at `target`.
    pub fn click(&self, target: NodeId) -> DomResult<bool> {
        self.dispatch(target, "click")
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '<' | '>' | '/' | '=' | '"' | '\'')
        })
}

// =============================================================================
// Host implementation
// =============================================================================

impl Host for MemoryDocument {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        if !is_valid_name(tag) {
            return Err(DomError::InvalidTag(tag.to_string()));
        }
        Ok(self.alloc(NodeData::Element(ElementData {
            tag: tag.into(),
            ..ElementData::default()
        })))
    }

    fn create_text(&mut self, content: &str) -> DomResult<NodeId> {
        Ok(self.alloc(NodeData::Text(content.to_string())))
    }

    fn kind(&self, node: &NodeId) -> NodeKind {
        match self.get(*node).map(|r| &r.data) {
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Text(_)) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn local_name(&self, node: &NodeId) -> Option<CompactString> {
        self.element(*node).map(|e| e.tag.clone())
    }

    fn text(&self, node: &NodeId) -> Option<String> {
        match &self.get(*node)?.data {
            NodeData::Text(t) => Some(t.clone()),
            _ => None,
        }
    }

    fn set_text(&mut self, node: &NodeId, content: &str) -> DomResult<()> {
        match &mut self.get_mut(*node).ok_or(DomError::StaleNode(*node))?.data {
            NodeData::Text(t) => {
                content.clone_into(t);
                Ok(())
            }
            _ => Err(DomError::NotAText(*node)),
        }
    }

    fn attribute_names(&self, node: &NodeId) -> Vec<AttrKey> {
        self.element(*node)
            .map(|e| e.attrs.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attribute(*node, name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> DomResult<()> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidAttributeName(name.to_string()));
        }
        self.element_mut(*node)?.set_attr(name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> DomResult<()> {
        self.element_mut(*node)?.remove_attr(name);
        Ok(())
    }

    fn has_property(&self, node: &NodeId, name: &str) -> bool {
        self.element(*node)
            .is_some_and(|e| props::lookup(&e.tag, name).is_some())
    }

    fn get_property(&self, node: &NodeId, name: &str) -> Option<String> {
        let element = self.element(*node)?;
        let value = match props::lookup(&element.tag, name)? {
            PropKind::Reflect(attr) => element.attr(attr).unwrap_or_default().to_string(),
            PropKind::ReflectBool(attr) => element.attr(attr).is_some().to_string(),
            PropKind::Value => self.control_value(*node),
            PropKind::SelectValue => self.select_value(*node),
            PropKind::OptionValue => self.option_value(*node),
            PropKind::Checked => element
                .checked
                .unwrap_or_else(|| element.attr("checked").is_some())
                .to_string(),
            PropKind::Selected => self.option_selected(*node).to_string(),
        };
        Some(value)
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: PropValue) -> DomResult<()> {
        let tag = self.local_name(node).ok_or(DomError::NotAnElement(*node))?;
        let Some(kind) = props::lookup(&tag, name) else {
            // Unknown properties only live on the script object
            let text = match &value {
                PropValue::Str(s) => s.to_string(),
                PropValue::Bool(b) => b.to_string(),
                PropValue::Null => "null".to_string(),
            };
            return self.set_expando(*node, name, &text);
        };

        let text: Option<CompactString> = match &value {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Bool(b) => Some(b.to_compact_string()),
            PropValue::Null => None,
        };

        match kind {
            PropKind::Reflect(attr) => {
                let element = self.element_mut(*node)?;
                match text {
                    Some(text) => element.set_attr(attr, &text),
                    None => element.remove_attr(attr),
                }
            }
            PropKind::OptionValue => {
                let element = self.element_mut(*node)?;
                match text {
                    Some(text) => element.set_attr("value", &text),
                    None => element.remove_attr("value"),
                }
            }
            PropKind::ReflectBool(attr) => {
                let element = self.element_mut(*node)?;
                if value.is_truthy() {
                    element.set_attr(attr, "");
                } else {
                    element.remove_attr(attr);
                }
            }
            PropKind::Value => {
                let text = text.map(String::from).unwrap_or_default();
                let caret = text.chars().count();
                let element = self.element_mut(*node)?;
                element.value = Some(text);
                element.selection = (caret, caret);
            }
            PropKind::SelectValue => {
                let wanted = text.map(String::from).unwrap_or_default();
                for option in self.options(*node) {
                    let selected = self.option_value(option) == wanted;
                    self.element_mut(option)?.selected = Some(selected);
                }
            }
            PropKind::Checked => {
                self.element_mut(*node)?.checked = Some(value.is_truthy());
            }
            PropKind::Selected => {
                self.element_mut(*node)?.selected = Some(value.is_truthy());
            }
        }
        Ok(())
    }

    fn set_style_text(&mut self, node: &NodeId, css: &str) -> DomResult<()> {
        let element = self.element_mut(*node)?;
        if css.is_empty() {
            element.remove_attr("style");
        } else {
            element.set_attr("style", css);
        }
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> DomResult<()> {
        let element = self.element_mut(*node)?;
        // Identical (event, handler) pairs are registered once
        if !element
            .listeners
            .iter()
            .any(|(k, h)| k == event && h.same_as(handler))
        {
            element.listeners.push((event.into(), handler.clone()));
        }
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> DomResult<()> {
        self.element_mut(*node)?
            .listeners
            .retain(|(k, h)| !(k == event && h.same_as(handler)));
        Ok(())
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.get(*node)?.first_child
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        self.get(*node)?.next_sibling
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        node: &NodeId,
        reference: Option<&NodeId>,
    ) -> DomResult<()> {
        let (parent, node) = (*parent, *node);
        let parent_record = self.record(parent)?;
        if !matches!(parent_record.data, NodeData::Element(_) | NodeData::Document) {
            return Err(DomError::HierarchyRequest { parent, node });
        }
        if matches!(self.record(node)?.data, NodeData::Document)
            || self.is_inclusive_ancestor(node, parent)
        {
            return Err(DomError::HierarchyRequest { parent, node });
        }

        let mut reference = reference.copied();
        if let Some(r) = reference {
            if self.record(r)?.parent != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == node {
                reference = self.next_sibling(&node);
            }
        }

        self.unlink(node);
        self.link_before(parent, node, reference);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        if self.record(*child)?.parent != Some(*parent) {
            return Err(DomError::NotAChild {
                parent: *parent,
                child: *child,
            });
        }
        self.unlink(*child);
        Ok(())
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|id| self.is_alive(*id))
    }

    fn focus(&mut self, node: &NodeId, options: FocusOptions) -> DomResult<()> {
        if self.element(*node).is_none() {
            return Err(DomError::NotAnElement(*node));
        }
        // Focusing a disconnected element is a silent no-op
        if !self.is_connected(node) {
            return Ok(());
        }
        if !options.prevent_scroll {
            self.scroll_requests += 1;
        }
        self.active = Some(*node);
        Ok(())
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.is_alive(*node) && self.is_inclusive_ancestor(self.document, *node)
    }

    fn release(&mut self, node: &NodeId) {
        let Some(record) = self.get(*node) else {
            return;
        };
        if record.parent.is_some() || *node == self.document {
            return;
        }
        for id in self.subtree(*node) {
            if self.active == Some(id) {
                self.active = None;
            }
            if let Some(slot) = self.slots.get_mut(id.index()) {
                slot.record = None;
                self.free.push(id.index);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
