//! Markup snapshots of a [`MemoryDocument`] subtree for assertions.
//!
//! Test-only: the crate never produces markup for consumption. Snapshots
//! follow `innerHTML` closely enough to compare whole trees in one string.

use super::{MemoryDocument, NodeData, NodeId};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

impl MemoryDocument {
    /// Snapshot a node and its descendants.
    pub(crate) fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Snapshot the children of a node.
    pub(crate) fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let Some(record) = self.get(node) else {
            return;
        };
        match &record.data {
            NodeData::Document => {
                for child in self.children(node) {
                    self.write_node(child, out);
                }
            }
            NodeData::Text(text) => push_escaped(out, text, false),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    push_escaped(out, value, true);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in self.children(node) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

/// Append `raw` with markup characters replaced; quotes only inside values.
fn push_escaped(out: &mut String, raw: &str, quoted: bool) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quoted => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    #[test]
    fn test_snapshot_nested() {
        let mut doc = MemoryDocument::new();
        let root = doc.create_root("div").unwrap();
        let label = doc.create_element("label").unwrap();
        let input = doc.create_element("input").unwrap();
        let text = doc.create_text("Name").unwrap();
        doc.set_attribute(&label, "class", "a \"b\"").unwrap();
        doc.set_attribute(&input, "disabled", "").unwrap();
        doc.append_child(&label, &text).unwrap();
        doc.append_child(&label, &input).unwrap();
        doc.append_child(&root, &label).unwrap();

        assert_eq!(
            doc.inner_html(root),
            "<label class=\"a &quot;b&quot;\">Name<input disabled=\"\"></label>"
        );
        assert_eq!(
            doc.to_html(root),
            "<div><label class=\"a &quot;b&quot;\">Name<input disabled=\"\"></label></div>"
        );
    }

    #[test]
    fn test_snapshot_document_and_comment() {
        let mut doc = MemoryDocument::new();
        let root = doc.create_root("main").unwrap();
        let comment = doc.create_comment("marker");
        doc.append_child(&root, &comment).unwrap();
        assert_eq!(doc.to_html(doc.document()), "<main><!--marker--></main>");
    }

    #[test]
    fn test_escaping() {
        let mut out = String::new();
        push_escaped(&mut out, "<a href=\"x\"> & y", false);
        assert_eq!(out, "&lt;a href=\"x\"&gt; &amp; y");

        out.clear();
        push_escaped(&mut out, "\"x\" & <y>", true);
        assert_eq!(out, "&quot;x&quot; &amp; &lt;y&gt;");
    }
}
