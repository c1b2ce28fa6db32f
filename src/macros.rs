//! Builder and accessor macros
//!
//! `h!` is the variadic form of the description builder. The accessor macro
//! uses `paste` internally for identifier concatenation.

// =============================================================================
// h! - variadic element builder
// =============================================================================

/// Build an [`Element`](crate::Element) description.
///
/// Attributes are only taken from a leading `{ key => value, ... }` block;
/// otherwise every argument after the tag is a child. Each child goes through
/// [`IntoChildren`](crate::node::IntoChildren), so strings become text nodes
/// and lists are spliced in order.
///
/// ```
/// use clobber::{h, handler};
///
/// let list = h!("ul", { "class" => "todo-list" },
///     h!("li", { "x-bdc-key" => "a" }, "first"),
///     h!("li", { "x-bdc-key" => "b", "onclick" => handler(|_| {}) }, "second"),
/// );
/// assert_eq!(list.children.len(), 2);
///
/// let bare = h!("p", "text only");
/// assert!(bare.attrs.is_empty());
///
/// let spliced = h!("ol", vec![h!("li"), h!("li")]);
/// assert_eq!(spliced.children.len(), 2);
/// ```
///
/// Block expressions used as children must be parenthesized.
#[macro_export]
macro_rules! h {
    ($tag:expr $(,)?) => {
        $crate::Element::new($tag)
    };
    ($tag:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut element = $crate::Element::new($tag);
        $( element.set_attr($key, $value); )*
        $( $crate::node::IntoChildren::extend_into($child, &mut element.children); )*
        element
    }};
    ($tag:expr $(, $child:expr)+ $(,)?) => {{
        let mut element = $crate::Element::new($tag);
        $( $crate::node::IntoChildren::extend_into($child, &mut element.children); )*
        element
    }};
}

// =============================================================================
// Enum accessor generation
// =============================================================================

/// Generate is_xxx, as_xxx, as_xxx_mut for enums with typed variants
///
/// Uses paste's `:camel` modifier to convert method name to variant name.
/// Boxed variants coerce through `Deref` in the `Some(..)` position.
///
/// # Example
/// ```ignore
/// impl Node {
///     // element -> Element, text -> Text
///     impl_enum_accessors!(element, text);
/// }
/// ```
macro_rules! impl_enum_accessors {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a " [<$variant:camel>] " node"]
                #[inline]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>](_))
                }

                #[doc = "Try to get as " $variant " reference"]
                #[inline]
                pub fn [<as_ $variant>](&self) -> Option<&[<$variant:camel>]> {
                    match self {
                        Self::[<$variant:camel>](v) => Some(v),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                #[doc = "Try to get as mutable " $variant " reference"]
                #[inline]
                pub fn [<as_ $variant _mut>](&mut self) -> Option<&mut [<$variant:camel>]> {
                    match self {
                        Self::[<$variant:camel>](v) => Some(v),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            )*
        }
    };
}

pub(crate) use impl_enum_accessors;
