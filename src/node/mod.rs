//! Description node types and the builder.
//!
//! A description tree is an immutable value: `Node` is either a `Text` leaf
//! or a boxed `Element` with a tag, attributes and ordered children. Nothing
//! here touches a live document.
//!
//! # Building
//!
//! - [`h`] / [`h_with`]: function form
//! - [`h!`](crate::h): variadic macro form
//! - [`Element`] builder methods (`attr`, `key`, `on`, `child`, `text`)
//!
//! Children arguments go through [`IntoChildren`]: strings become a single
//! text child, nodes a single child, and lists are spliced in order.

mod element;
mod text;

pub use element::Element;
pub use text::Text;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{AttrKey, AttrValue, Tag};
use crate::macros::impl_enum_accessors;

/// Node in a description tree - either Element or Text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    // Generates for each variant (element -> Element, text -> Text):
    //   - is_xxx(&self) -> bool
    //   - as_xxx(&self) -> Option<&Type>
    //   - as_xxx_mut(&mut self) -> Option<&mut Type>
    impl_enum_accessors!(element, text);

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(Text::new(content))
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(Box::new(e))
    }
}

impl From<Box<Element>> for Node {
    fn from(e: Box<Element>) -> Self {
        Node::Element(e)
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Node::Text(t)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::text(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::text(s)
    }
}

impl From<&String> for Node {
    fn from(s: &String) -> Self {
        Node::text(s.as_str())
    }
}

impl From<CompactString> for Node {
    fn from(s: CompactString) -> Self {
        Node::text(s.as_str())
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 4]>;

// =============================================================================
// IntoChildren
// =============================================================================

/// Values accepted wherever a child list is expected.
///
/// A single node-like value contributes one child; a list contributes its
/// items in order; `()` and `None` contribute nothing.
pub trait IntoChildren {
    /// Append this value's children to `out`.
    fn extend_into(self, out: &mut Children);

    /// Collect into a fresh child list.
    fn into_children(self) -> Children
    where
        Self: Sized,
    {
        let mut out = Children::new();
        self.extend_into(&mut out);
        out
    }
}

macro_rules! impl_into_children_single {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoChildren for $ty {
                #[inline]
                fn extend_into(self, out: &mut Children) {
                    out.push(Node::from(self));
                }
            }
        )*
    };
}

impl_into_children_single!(Node, Element, Box<Element>, Text, &str, String, &String, CompactString);

impl IntoChildren for () {
    #[inline]
    fn extend_into(self, _out: &mut Children) {}
}

impl<T: Into<Node>> IntoChildren for Vec<T> {
    fn extend_into(self, out: &mut Children) {
        out.extend(self.into_iter().map(Into::into));
    }
}

impl<T: Into<Node>, const N: usize> IntoChildren for [T; N] {
    fn extend_into(self, out: &mut Children) {
        out.extend(self.into_iter().map(Into::into));
    }
}

impl<T: Into<Node> + Clone> IntoChildren for &[T] {
    fn extend_into(self, out: &mut Children) {
        out.extend(self.iter().cloned().map(Into::into));
    }
}

impl IntoChildren for Children {
    fn extend_into(self, out: &mut Children) {
        out.extend(self);
    }
}

impl<T: IntoChildren> IntoChildren for Option<T> {
    fn extend_into(self, out: &mut Children) {
        if let Some(children) = self {
            children.extend_into(out);
        }
    }
}

// =============================================================================
// Builder functions
// =============================================================================

/// Build an element with no attributes.
///
/// ```
/// use clobber::h;
///
/// let div = h("div", "contents");
/// assert_eq!(div.text_content(), "contents");
///
/// let ul = h("ul", [h("li", "a"), h("li", "b")]);
/// assert_eq!(ul.children.len(), 2);
/// ```
pub fn h(tag: impl Into<Tag>, children: impl IntoChildren) -> Element {
    let mut element = Element::new(tag);
    children.extend_into(&mut element.children);
    element
}

/// Build an element with attributes.
///
/// Later duplicates of a key replace earlier ones.
pub fn h_with<K, V>(
    tag: impl Into<Tag>,
    attrs: impl IntoIterator<Item = (K, V)>,
    children: impl IntoChildren,
) -> Element
where
    K: Into<AttrKey>,
    V: Into<AttrValue>,
{
    let mut element = Element::new(tag);
    for (key, value) in attrs {
        element.set_attr(key, value);
    }
    children.extend_into(&mut element.children);
    element
}
