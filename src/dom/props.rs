//! IDL property table for the in-memory document.
//!
//! Browsers expose many attributes as element properties as well. Rather
//! than reflect over a live object, the in-memory document answers
//! [`Host::has_property`](crate::Host::has_property) from this explicit
//! per-tag whitelist. Names are case-sensitive IDL names: `readOnly` is a
//! property, `readonly` is only an attribute.

/// How a property maps onto element state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// Reflects a string attribute
    Reflect(&'static str),
    /// Reflects a boolean attribute (present/absent)
    ReflectBool(&'static str),
    /// Live value of a text control, detached from the `value` attribute
    /// once written
    Value,
    /// Value of a `select`, derived from its selected option
    SelectValue,
    /// `option.value`: reflects `value`, falls back to text content
    OptionValue,
    /// Live checkedness of an `input`
    Checked,
    /// Live selectedness of an `option`
    Selected,
}

use self::PropKind::{Checked, OptionValue, Reflect, ReflectBool, SelectValue, Selected, Value};

const GLOBAL: &[(&str, PropKind)] = &[
    ("id", Reflect("id")),
    ("title", Reflect("title")),
    ("lang", Reflect("lang")),
    ("dir", Reflect("dir")),
    ("className", Reflect("class")),
    ("accessKey", Reflect("accesskey")),
    ("tabIndex", Reflect("tabindex")),
    ("slot", Reflect("slot")),
    ("hidden", ReflectBool("hidden")),
    ("autofocus", ReflectBool("autofocus")),
];

const INPUT: &[(&str, PropKind)] = &[
    ("value", Value),
    ("checked", Checked),
    ("type", Reflect("type")),
    ("name", Reflect("name")),
    ("placeholder", Reflect("placeholder")),
    ("min", Reflect("min")),
    ("max", Reflect("max")),
    ("step", Reflect("step")),
    ("pattern", Reflect("pattern")),
    ("accept", Reflect("accept")),
    ("autocomplete", Reflect("autocomplete")),
    ("src", Reflect("src")),
    ("alt", Reflect("alt")),
    ("disabled", ReflectBool("disabled")),
    ("readOnly", ReflectBool("readonly")),
    ("required", ReflectBool("required")),
    ("multiple", ReflectBool("multiple")),
];

const TEXTAREA: &[(&str, PropKind)] = &[
    ("value", Value),
    ("name", Reflect("name")),
    ("placeholder", Reflect("placeholder")),
    ("rows", Reflect("rows")),
    ("cols", Reflect("cols")),
    ("wrap", Reflect("wrap")),
    ("disabled", ReflectBool("disabled")),
    ("readOnly", ReflectBool("readonly")),
    ("required", ReflectBool("required")),
];

const SELECT: &[(&str, PropKind)] = &[
    ("value", SelectValue),
    ("name", Reflect("name")),
    ("size", Reflect("size")),
    ("disabled", ReflectBool("disabled")),
    ("multiple", ReflectBool("multiple")),
    ("required", ReflectBool("required")),
];

const OPTION: &[(&str, PropKind)] = &[
    ("value", OptionValue),
    ("selected", Selected),
    ("label", Reflect("label")),
    ("disabled", ReflectBool("disabled")),
];

const BUTTON: &[(&str, PropKind)] = &[
    ("type", Reflect("type")),
    ("name", Reflect("name")),
    ("value", Reflect("value")),
    ("disabled", ReflectBool("disabled")),
];

const ANCHOR: &[(&str, PropKind)] = &[
    ("href", Reflect("href")),
    ("target", Reflect("target")),
    ("rel", Reflect("rel")),
    ("download", Reflect("download")),
    ("hreflang", Reflect("hreflang")),
    ("type", Reflect("type")),
];

const IMG: &[(&str, PropKind)] = &[
    ("src", Reflect("src")),
    ("alt", Reflect("alt")),
    ("srcset", Reflect("srcset")),
    ("width", Reflect("width")),
    ("height", Reflect("height")),
];

const FORM: &[(&str, PropKind)] = &[
    ("action", Reflect("action")),
    ("method", Reflect("method")),
    ("target", Reflect("target")),
    ("name", Reflect("name")),
    ("noValidate", ReflectBool("novalidate")),
];

const LABEL: &[(&str, PropKind)] = &[("htmlFor", Reflect("for"))];

fn table(tag: &str) -> &'static [(&'static str, PropKind)] {
    match tag {
        "input" => INPUT,
        "textarea" => TEXTAREA,
        "select" => SELECT,
        "option" => OPTION,
        "button" => BUTTON,
        "a" => ANCHOR,
        "img" => IMG,
        "form" => FORM,
        "label" => LABEL,
        _ => &[],
    }
}

/// Look up property `name` on an element with local name `tag`.
pub fn lookup(tag: &str, name: &str) -> Option<PropKind> {
    table(tag)
        .iter()
        .chain(GLOBAL)
        .find(|(prop, _)| *prop == name)
        .map(|(_, kind)| *kind)
}
