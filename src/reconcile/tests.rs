//! Reconciler behavior against the in-memory document.

use std::cell::Cell;
use std::rc::Rc;

use static_assertions::assert_not_impl_any;

use crate::prelude::*;

assert_not_impl_any!(Reconciler<MemoryDocument>: Send, Sync);
assert_not_impl_any!(MemoryDocument: Send, Sync);

// =============================================================================
// Helpers
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (MemoryDocument, NodeId, Reconciler<MemoryDocument>) {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let root = doc.create_root("div").unwrap();
    (doc, root, Reconciler::new())
}

fn counter() -> (Rc<Cell<usize>>, EventHandler) {
    let count = Rc::new(Cell::new(0));
    let on_event = {
        let count = Rc::clone(&count);
        handler(move |_| count.set(count.get() + 1))
    };
    (count, on_event)
}

fn rows(keys: &[&str]) -> Element {
    h!(
        "ul",
        keys.iter()
            .map(|key| h!("li", { KEY_ATTR => *key }, h!("input")))
            .collect::<Vec<_>>()
    )
}

fn nth(doc: &MemoryDocument, parent: NodeId, path: &[usize]) -> NodeId {
    path.iter()
        .fold(parent, |node, index| doc.child(node, *index).unwrap())
}

fn all_nodes(doc: &MemoryDocument, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    for child in doc.children(root) {
        out.push(child);
        out.extend(all_nodes(doc, child));
    }
    out
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_hello_world() {
    let (mut doc, root, mut reconciler) = setup();
    let stats = reconciler
        .reconcile(&mut doc, &root, h!("p", "Hello, World!"))
        .unwrap();

    assert_eq!(doc.inner_html(root), "<p>Hello, World!</p>");
    assert_eq!(stats.elements_created, 1);
    assert_eq!(stats.text_created, 1);
}

#[test]
fn test_empty_element() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler.reconcile(&mut doc, &root, h!("div")).unwrap();
    assert_eq!(doc.inner_html(root), "<div></div>");

    reconciler.reconcile(&mut doc, &root, ()).unwrap();
    assert_eq!(doc.inner_html(root), "");
}

#[test]
fn test_lists_are_spliced() {
    let (mut doc, root, mut reconciler) = setup();
    let expected = "<ul><li>1</li><li>2</li><li>3</li></ul>";

    let variadic = h!("ul", h!("li", "1"), h!("li", "2"), h!("li", "3"));
    reconciler.reconcile(&mut doc, &root, variadic).unwrap();
    assert_eq!(doc.inner_html(root), expected);

    let from_vec = h!("ul", vec![h!("li", "1"), h!("li", "2"), h!("li", "3")]);
    let stats = reconciler.reconcile(&mut doc, &root, from_vec).unwrap();
    assert_eq!(doc.inner_html(root), expected);
    assert!(!stats.has_structural_changes());

    // Top-level lists are spliced into the container as well
    reconciler
        .reconcile(&mut doc, &root, [h!("p", "a"), h!("p", "b")])
        .unwrap();
    assert_eq!(doc.inner_html(root), "<p>a</p><p>b</p>");
}

#[test]
fn test_text_node_reused() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler.reconcile(&mut doc, &root, "a").unwrap();
    let text = doc.child(root, 0).unwrap();

    let stats = reconciler.reconcile(&mut doc, &root, "b").unwrap();
    assert_eq!(doc.child(root, 0), Some(text));
    assert_eq!(doc.text(&text).as_deref(), Some("b"));
    assert_eq!(stats.text_updated, 1);
    assert_eq!(stats.text_created, 0);
}

#[test]
fn test_nested_container() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(&mut doc, &root, h!("section", h!("header"), h!("main")))
        .unwrap();
    let main = nth(&doc, root, &[0, 1]);

    reconciler
        .reconcile(&mut doc, &main, h!("p", "inner"))
        .unwrap();
    assert_eq!(
        doc.inner_html(root),
        "<section><header></header><main><p>inner</p></main></section>"
    );
}

#[test]
fn test_swapping_preserves_identity() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(
            &mut doc,
            &root,
            [
                h!("div", { KEY_ATTR => "1" }, "one"),
                h!("div", { KEY_ATTR => "2" }, "two"),
            ],
        )
        .unwrap();
    let one = doc.child(root, 0).unwrap();
    let two = doc.child(root, 1).unwrap();

    let stats = reconciler
        .reconcile(
            &mut doc,
            &root,
            [
                h!("div", { KEY_ATTR => "2" }, "two"),
                h!("div", { KEY_ATTR => "1" }, "one"),
            ],
        )
        .unwrap();
    assert_eq!(doc.children(root), vec![two, one]);
    assert_eq!(stats.elements_created, 0);
    assert_eq!(stats.elements_moved, 1);
    assert_eq!(
        doc.inner_html(root),
        "<div x-bdc-key=\"2\">two</div><div x-bdc-key=\"1\">one</div>"
    );
}

#[test]
fn test_unkeyed_swap_by_tag() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(&mut doc, &root, [h!("p"), h!("span")])
        .unwrap();
    let p = doc.child(root, 0).unwrap();
    let span = doc.child(root, 1).unwrap();

    let stats = reconciler
        .reconcile(&mut doc, &root, [h!("span"), h!("p")])
        .unwrap();
    assert_eq!(doc.children(root), vec![span, p]);
    assert_eq!(stats.elements_created, 0);
}

#[test]
fn test_keyed_never_matches_unkeyed() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler.reconcile(&mut doc, &root, h!("li")).unwrap();
    let unkeyed = doc.child(root, 0).unwrap();

    reconciler
        .reconcile(&mut doc, &root, h!("li", { KEY_ATTR => "a" }))
        .unwrap();
    let keyed = doc.child(root, 0).unwrap();
    assert_ne!(keyed, unkeyed);
    assert!(!doc.is_alive(unkeyed));
    assert_eq!(doc.children(root).len(), 1);
}

#[test]
fn test_empty_key_attribute_is_a_key() {
    let (mut doc, root, mut reconciler) = setup();
    let stray = doc.create_element("li").unwrap();
    doc.set_attribute(&stray, KEY_ATTR, "").unwrap();
    doc.append_child(&root, &stray).unwrap();

    // A live key attribute, even empty, never matches an unkeyed description
    reconciler.reconcile(&mut doc, &root, h!("li")).unwrap();
    let fresh = doc.child(root, 0).unwrap();
    assert_ne!(fresh, stray);
    assert!(!doc.is_alive(stray));

    // An empty description key is no key: the unkeyed element is reused and
    // the empty attribute written onto it
    reconciler
        .reconcile(&mut doc, &root, h!("li", { KEY_ATTR => "" }))
        .unwrap();
    assert_eq!(doc.child(root, 0), Some(fresh));
    assert_eq!(doc.attribute(fresh, KEY_ATTR), Some(""));

    // From then on it matches nothing and is replaced every pass
    let stats = reconciler
        .reconcile(&mut doc, &root, h!("li", { KEY_ATTR => "" }))
        .unwrap();
    assert_ne!(doc.child(root, 0), Some(fresh));
    assert_eq!(stats.elements_created, 1);
    assert_eq!(stats.nodes_removed, 1);
}

#[test]
fn test_keyed_reverse_preserves_state() {
    let (mut doc, root, mut reconciler) = setup();
    let keys = ["a", "b", "c", "d", "e"];
    reconciler.reconcile(&mut doc, &root, rows(&keys)).unwrap();
    let ul = doc.child(root, 0).unwrap();
    for (index, key) in keys.iter().enumerate() {
        let li = doc.child(ul, index).unwrap();
        doc.set_expando(li, "marker", key).unwrap();
    }

    let reversed: Vec<&str> = keys.iter().rev().copied().collect();
    let stats = reconciler.reconcile(&mut doc, &root, rows(&reversed)).unwrap();
    assert_eq!(stats.elements_created, 0);

    for (index, key) in reversed.iter().enumerate() {
        let li = doc.child(ul, index).unwrap();
        assert_eq!(doc.attribute(li, KEY_ATTR), Some(*key));
        assert_eq!(doc.expando(li, "marker"), Some(*key));
    }
}

#[test]
fn test_leftovers_removed() {
    let (mut doc, root, mut reconciler) = setup();
    let five: Vec<Element> = (0..5).map(|i| h!("p", i.to_string())).collect();
    reconciler.reconcile(&mut doc, &root, five).unwrap();
    let old = doc.children(root);

    let stats = reconciler
        .reconcile(&mut doc, &root, vec![h!("p", "0"), h!("p", "1")])
        .unwrap();
    assert_eq!(doc.children(root), old[..2].to_vec());
    assert_eq!(stats.nodes_removed, 3);
    assert!(old[2..].iter().all(|id| !doc.is_alive(*id)));
    assert_eq!(doc.inner_html(root), "<p>0</p><p>1</p>");
}

#[test]
fn test_foreign_nodes_removed() {
    let (mut doc, root, mut reconciler) = setup();
    let comment = doc.create_comment("foreign");
    let p = doc.create_element("p").unwrap();
    doc.append_child(&root, &comment).unwrap();
    doc.append_child(&root, &p).unwrap();

    reconciler.reconcile(&mut doc, &root, h!("p")).unwrap();
    assert_eq!(doc.children(root), vec![p]);
    assert!(!doc.is_alive(comment));
}

#[test]
fn test_idempotent() {
    let (mut doc, root, mut reconciler) = setup();
    let view = || {
        h!("main", { "class" => "app" },
            h!("h1", "Title"),
            rows(&["x", "y"]),
            h!("p", "footer"),
        )
    };
    reconciler.reconcile(&mut doc, &root, view()).unwrap();
    let html = doc.inner_html(root);
    let nodes = all_nodes(&doc, root);

    let stats = reconciler.reconcile(&mut doc, &root, view()).unwrap();
    assert!(!stats.has_structural_changes());
    assert_eq!(stats.nodes_removed, 0);
    assert_eq!(all_nodes(&doc, root), nodes);
    assert_eq!(doc.inner_html(root), html);
}

// =============================================================================
// Attributes and properties
// =============================================================================

#[test]
fn test_link_href() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(&mut doc, &root, h!("a", { "href" => "#success" }, "go"))
        .unwrap();
    let link = doc.child(root, 0).unwrap();
    assert_eq!(doc.attribute(link, "href"), Some("#success"));
    assert_eq!(doc.inner_html(root), "<a href=\"#success\">go</a>");
}

#[test]
fn test_boolean_attributes() {
    let (mut doc, root, mut reconciler) = setup();
    let checkbox = |on: bool| {
        h!("input", {
            "type" => "checkbox",
            "checked" => on,
            "disabled" => on,
            "data-flag" => on,
        })
    };

    reconciler.reconcile(&mut doc, &root, checkbox(true)).unwrap();
    let input = doc.child(root, 0).unwrap();
    assert_eq!(doc.attribute(input, "type"), Some("checkbox"));
    assert_eq!(doc.get_property(&input, "checked").as_deref(), Some("true"));
    assert_eq!(doc.attribute(input, "disabled"), Some(""));
    assert_eq!(doc.attribute(input, "data-flag"), Some(""));

    reconciler.reconcile(&mut doc, &root, checkbox(false)).unwrap();
    assert_eq!(doc.child(root, 0), Some(input));
    assert_eq!(doc.get_property(&input, "checked").as_deref(), Some("false"));
    assert_eq!(doc.attribute(input, "disabled"), None);
    assert_eq!(doc.attribute(input, "data-flag"), None);
}

#[test]
fn test_removing_attributes() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(
            &mut doc,
            &root,
            h!("div", { "class" => "a", "title" => "t", "data-x" => "1" }),
        )
        .unwrap();
    let div = doc.child(root, 0).unwrap();
    assert_eq!(doc.attributes(div).len(), 3);

    reconciler
        .reconcile(&mut doc, &root, h!("div", { "class" => "a" }))
        .unwrap();
    assert_eq!(
        doc.attributes(div),
        vec![("class".to_string(), "a".to_string())]
    );

    // An explicit null removes the key too
    reconciler
        .reconcile(&mut doc, &root, h!("div", { "class" => None::<&str> }))
        .unwrap();
    assert!(doc.attributes(div).is_empty());
}

#[test]
fn test_style_replaced_wholesale() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(&mut doc, &root, h!("p", { "style" => "color: red" }))
        .unwrap();
    let p = doc.child(root, 0).unwrap();
    assert_eq!(doc.attribute(p, "style"), Some("color: red"));

    reconciler
        .reconcile(&mut doc, &root, h!("p", { "style" => "margin: 0" }))
        .unwrap();
    assert_eq!(doc.attribute(p, "style"), Some("margin: 0"));

    reconciler.reconcile(&mut doc, &root, h!("p")).unwrap();
    assert_eq!(doc.attribute(p, "style"), None);
}

#[test]
fn test_no_markup_injection() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(
            &mut doc,
            &root,
            h!("p", { "title" => "\"><script>" }, "<b>bold</b>"),
        )
        .unwrap();
    let p = doc.child(root, 0).unwrap();
    let text = doc.child(p, 0).unwrap();
    assert!(doc.child_elements(p).is_empty());
    assert_eq!(doc.text(&text).as_deref(), Some("<b>bold</b>"));
    assert_eq!(doc.attribute(p, "title"), Some("\"><script>"));

    reconciler
        .reconcile(&mut doc, &root, h!("p", "<i>x</i>"))
        .unwrap();
    assert_eq!(doc.child(p, 0), Some(text));
    assert!(doc.child_elements(p).is_empty());
    assert_eq!(doc.inner_html(root), "<p>&lt;i&gt;x&lt;/i&gt;</p>");
}

#[test]
fn test_handler_under_plain_key_ignored() {
    let (mut doc, root, mut reconciler) = setup();
    let (_, on_event) = counter();
    reconciler
        .reconcile(&mut doc, &root, h!("div", { "title" => on_event }))
        .unwrap();
    let div = doc.child(root, 0).unwrap();
    assert!(doc.attributes(div).is_empty());
    assert!(reconciler.registry().is_empty());
}

#[test]
fn test_host_errors_propagate() {
    let (mut doc, root, mut reconciler) = setup();
    assert_eq!(
        reconciler.reconcile(&mut doc, &root, h!("1bad")),
        Err(DomError::InvalidTag("1bad".to_string()))
    );
    assert_eq!(
        reconciler.reconcile(&mut doc, &root, h!("div", { "a b" => "x" })),
        Err(DomError::InvalidAttributeName("a b".to_string()))
    );
}

// =============================================================================
// Event handlers
// =============================================================================

#[test]
fn test_event_handler_lifecycle() {
    let (mut doc, root, mut reconciler) = setup();
    let (first_count, first) = counter();
    let (second_count, second) = counter();

    // Add
    reconciler
        .reconcile(&mut doc, &root, h!("button", { "onclick" => first.clone() }))
        .unwrap();
    let button = doc.child(root, 0).unwrap();
    doc.click(button).unwrap();
    assert_eq!(first_count.get(), 1);
    assert_eq!(doc.attribute(button, "onclick"), None);

    // Same handler again stays a single listener
    reconciler
        .reconcile(&mut doc, &root, h!("button", { "onclick" => first.clone() }))
        .unwrap();
    assert_eq!(doc.listener_count(button, "click"), 1);
    doc.click(button).unwrap();
    assert_eq!(first_count.get(), 2);

    // Replace
    reconciler
        .reconcile(&mut doc, &root, h!("button", { "onclick" => second }))
        .unwrap();
    doc.click(button).unwrap();
    assert_eq!((first_count.get(), second_count.get()), (2, 1));

    // Remove
    let stats = reconciler.reconcile(&mut doc, &root, h!("button")).unwrap();
    assert_eq!(stats.handlers_detached, 1);
    assert_eq!(doc.listener_count(button, "click"), 0);
    assert!(reconciler.registry().is_empty());
    doc.click(button).unwrap();
    assert_eq!((first_count.get(), second_count.get()), (2, 1));

    // Restore
    reconciler
        .reconcile(&mut doc, &root, h!("button", { "onclick" => first }))
        .unwrap();
    doc.click(button).unwrap();
    assert_eq!(first_count.get(), 3);
    assert_eq!(doc.child(root, 0), Some(button));
}

#[test]
fn test_string_under_event_key_detaches() {
    let (mut doc, root, mut reconciler) = setup();
    let (count, on_click) = counter();
    reconciler
        .reconcile(&mut doc, &root, h!("button", { "onclick" => on_click }))
        .unwrap();
    let button = doc.child(root, 0).unwrap();

    reconciler
        .reconcile(&mut doc, &root, h!("button", { "onclick" => "alert(1)" }))
        .unwrap();
    doc.click(button).unwrap();
    assert_eq!(count.get(), 0);
    assert_eq!(doc.attribute(button, "onclick"), None);
    assert_eq!(doc.listener_count(button, "click"), 0);
}

#[test]
fn test_registry_purged_on_removal() {
    let (mut doc, root, mut reconciler) = setup();
    let (_, on_row) = counter();
    let (_, on_button) = counter();
    reconciler
        .reconcile(
            &mut doc,
            &root,
            h!("ul",
                h!("li", { "onclick" => on_row },
                    h!("button", { "onclick" => on_button, "onfocus" => handler(|_| {}) }),
                ),
            ),
        )
        .unwrap();
    assert_eq!(reconciler.registry().len(), 2);
    assert_eq!(reconciler.registry().handler_count(), 3);

    let stats = reconciler.reconcile(&mut doc, &root, h!("ul")).unwrap();
    assert!(reconciler.registry().is_empty());
    assert_eq!(stats.handlers_detached, 3);
    assert_eq!(stats.nodes_removed, 1);
}

#[test]
fn test_independent_reconcilers() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let left = doc.create_root("div").unwrap();
    let right = doc.create_root("div").unwrap();
    let mut left_reconciler = Reconciler::new();
    let mut right_reconciler =
        Reconciler::with_config(ReconcileConfig::new().with_key_attr("data-key"));

    let (left_count, on_left) = counter();
    let (_, on_right) = counter();
    left_reconciler
        .reconcile(&mut doc, &left, h!("button", { "onclick" => on_left }))
        .unwrap();
    right_reconciler
        .reconcile(
            &mut doc,
            &right,
            h!("button", { "data-key" => "r", "onclick" => on_right }),
        )
        .unwrap();
    let left_button = doc.child(left, 0).unwrap();
    let right_button = doc.child(right, 0).unwrap();

    assert!(left_reconciler.registry().contains(&left_button));
    assert!(!left_reconciler.registry().contains(&right_button));
    assert!(right_reconciler.registry().contains(&right_button));

    right_reconciler.reconcile(&mut doc, &right, ()).unwrap();
    assert!(right_reconciler.registry().is_empty());
    assert_eq!(left_reconciler.registry().len(), 1);
    doc.click(left_button).unwrap();
    assert_eq!(left_count.get(), 1);
}

// =============================================================================
// Focus
// =============================================================================

#[test]
fn test_focus_follows_keyed_row() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(&mut doc, &root, rows(&["a", "b", "c", "d"]))
        .unwrap();
    let input = nth(&doc, root, &[0, 2, 0]);
    doc.focus(&input, FocusOptions::default()).unwrap();

    reconciler
        .reconcile(&mut doc, &root, rows(&["d", "c", "b", "a"]))
        .unwrap();
    assert_eq!(nth(&doc, root, &[0, 1, 0]), input);
    assert_eq!(doc.active_element(), Some(input));
    assert_eq!(doc.scroll_requests(), 0);
}

#[test]
fn test_focus_lost_without_restore() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let root = doc.create_root("div").unwrap();
    let mut reconciler =
        Reconciler::with_config(ReconcileConfig::new().with_restore_focus(false));

    reconciler
        .reconcile(&mut doc, &root, rows(&["a", "b", "c", "d"]))
        .unwrap();
    let input = nth(&doc, root, &[0, 2, 0]);
    doc.focus(&input, FocusOptions::default()).unwrap();

    reconciler
        .reconcile(&mut doc, &root, rows(&["d", "c", "b", "a"]))
        .unwrap();
    assert_eq!(nth(&doc, root, &[0, 1, 0]), input);
    assert_eq!(doc.active_element(), None);
}

#[test]
fn test_focus_restore_may_scroll() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let root = doc.create_root("div").unwrap();
    let mut reconciler =
        Reconciler::with_config(ReconcileConfig::new().with_prevent_scroll(false));

    reconciler.reconcile(&mut doc, &root, rows(&["a", "b"])).unwrap();
    let input = nth(&doc, root, &[0, 1, 0]);
    doc.focus(&input, FocusOptions::default()).unwrap();

    reconciler.reconcile(&mut doc, &root, rows(&["b", "a"])).unwrap();
    assert_eq!(doc.active_element(), Some(input));
    assert_eq!(doc.scroll_requests(), 1);
}

#[test]
fn test_removed_focus_not_restored() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler.reconcile(&mut doc, &root, rows(&["a", "b"])).unwrap();
    let input = nth(&doc, root, &[0, 1, 0]);
    doc.focus(&input, FocusOptions::default()).unwrap();

    reconciler.reconcile(&mut doc, &root, rows(&["a"])).unwrap();
    assert_eq!(doc.active_element(), None);
    assert!(!doc.is_alive(input));
}

#[test]
fn test_autofocus_on_create_only() {
    let (mut doc, root, mut reconciler) = setup();
    let view = || [h!("input"), h!("input", { "autofocus" => true })];

    reconciler.reconcile(&mut doc, &root, view()).unwrap();
    let first = doc.child(root, 0).unwrap();
    let second = doc.child(root, 1).unwrap();
    assert_eq!(doc.active_element(), Some(second));

    // Reused autofocus elements do not steal focus back
    doc.focus(&first, FocusOptions::default()).unwrap();
    reconciler.reconcile(&mut doc, &root, view()).unwrap();
    assert_eq!(doc.active_element(), Some(first));
}

#[test]
fn test_input_cursor_preserved() {
    let (mut doc, root, mut reconciler) = setup();
    reconciler
        .reconcile(&mut doc, &root, h!("input", { "value" => "" }))
        .unwrap();
    let input = doc.child(root, 0).unwrap();
    doc.focus(&input, FocusOptions::default()).unwrap();

    doc.type_text(input, "a").unwrap();
    doc.move_cursor_left(input).unwrap();
    reconciler
        .reconcile(&mut doc, &root, h!("input", { "value" => "a" }))
        .unwrap();
    doc.type_text(input, "b").unwrap();
    assert_eq!(doc.value(input).as_deref(), Some("ba"));

    // A different value is written and the cursor moves to the end
    reconciler
        .reconcile(&mut doc, &root, h!("input", { "value" => "xyz" }))
        .unwrap();
    assert_eq!(doc.value(input).as_deref(), Some("xyz"));
    assert_eq!(doc.selection(input), Some((3, 3)));
    assert_eq!(doc.active_element(), Some(input));
}

#[test]
fn test_nested_reconciler_drops_released_handlers() {
    let (mut doc, root, mut outer) = setup();
    let mut inner = Reconciler::new();
    outer.reconcile(&mut doc, &root, h!("section")).unwrap();
    let section = doc.child(root, 0).unwrap();

    let (_, on_click) = counter();
    inner
        .reconcile(&mut doc, &section, h!("button", { "onclick" => on_click }))
        .unwrap();
    let button = doc.child(section, 0).unwrap();
    assert!(inner.registry().contains(&button));

    // The outer pass releases the inner widget's subtree
    outer.reconcile(&mut doc, &root, ()).unwrap();
    assert!(!doc.is_alive(button));

    assert_eq!(inner.prune(&doc), 1);
    assert!(inner.registry().is_empty());
    assert_eq!(inner.prune(&doc), 0);
}

#[test]
fn test_reconcile_prunes_released_handlers() {
    let (mut doc, root, mut outer) = setup();
    let mut inner = Reconciler::new();
    outer.reconcile(&mut doc, &root, h!("section")).unwrap();
    let section = doc.child(root, 0).unwrap();

    let (_, on_click) = counter();
    let (_, on_input) = counter();
    inner
        .reconcile(
            &mut doc,
            &section,
            h!("form", { "oninput" => on_input }, h!("button", { "onclick" => on_click })),
        )
        .unwrap();
    assert_eq!(inner.registry().len(), 2);

    outer.reconcile(&mut doc, &root, ()).unwrap();

    // The next pass on another container reclaims the dead entries
    let aside = doc.create_root("aside").unwrap();
    inner.reconcile(&mut doc, &aside, h!("p")).unwrap();
    assert!(inner.registry().is_empty());
}

#[test]
fn test_forget_unmounted_container() {
    let (mut doc, root, mut reconciler) = setup();
    let (count, on_click) = counter();
    reconciler
        .reconcile(
            &mut doc,
            &root,
            h!("div", h!("button", { "onclick" => on_click })),
        )
        .unwrap();
    let button = nth(&doc, root, &[0, 0]);

    reconciler.forget(&mut doc, &root).unwrap();
    assert!(reconciler.registry().is_empty());
    assert_eq!(doc.listener_count(button, "click"), 0);
    doc.click(button).unwrap();
    assert_eq!(count.get(), 0);
}

// =============================================================================
// Attribute paths observed through the host
// =============================================================================

/// Host that logs every attribute and property write before delegating.
#[derive(Debug, Default)]
struct Recorder {
    doc: MemoryDocument,
    writes: Vec<String>,
}

impl Recorder {
    fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.writes)
    }
}

impl Host for Recorder {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        self.doc.create_element(tag)
    }

    fn create_text(&mut self, content: &str) -> DomResult<NodeId> {
        self.doc.create_text(content)
    }

    fn kind(&self, node: &NodeId) -> NodeKind {
        self.doc.kind(node)
    }

    fn local_name(&self, node: &NodeId) -> Option<compact_str::CompactString> {
        self.doc.local_name(node)
    }

    fn text(&self, node: &NodeId) -> Option<String> {
        self.doc.text(node)
    }

    fn set_text(&mut self, node: &NodeId, content: &str) -> DomResult<()> {
        self.doc.set_text(node, content)
    }

    fn attribute_names(&self, node: &NodeId) -> Vec<AttrKey> {
        self.doc.attribute_names(node)
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.doc.get_attribute(node, name)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.writes.push(format!("attr {name}={value}"));
        self.doc.set_attribute(node, name, value)
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> DomResult<()> {
        self.writes.push(format!("remove {name}"));
        self.doc.remove_attribute(node, name)
    }

    fn has_property(&self, node: &NodeId, name: &str) -> bool {
        self.doc.has_property(node, name)
    }

    fn get_property(&self, node: &NodeId, name: &str) -> Option<String> {
        self.doc.get_property(node, name)
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: PropValue) -> DomResult<()> {
        self.writes.push(format!("prop {name}={value:?}"));
        self.doc.set_property(node, name, value)
    }

    fn set_style_text(&mut self, node: &NodeId, css: &str) -> DomResult<()> {
        self.doc.set_style_text(node, css)
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> DomResult<()> {
        self.doc.add_event_listener(node, event, handler)
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> DomResult<()> {
        self.doc.remove_event_listener(node, event, handler)
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.doc.first_child(node)
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        self.doc.next_sibling(node)
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        node: &NodeId,
        reference: Option<&NodeId>,
    ) -> DomResult<()> {
        self.doc.insert_before(parent, node, reference)
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        self.doc.remove_child(parent, child)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.doc.active_element()
    }

    fn focus(&mut self, node: &NodeId, options: FocusOptions) -> DomResult<()> {
        self.doc.focus(node, options)
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.doc.is_connected(node)
    }

    fn release(&mut self, node: &NodeId) {
        self.doc.release(node);
    }
}

fn recorder() -> (Recorder, NodeId, Reconciler<Recorder>) {
    init_tracing();
    let mut host = Recorder::default();
    let root = host.doc.create_root("div").unwrap();
    (host, root, Reconciler::new())
}

#[test]
fn test_input_type_written_as_attribute() {
    let (mut host, root, mut reconciler) = recorder();
    reconciler
        .reconcile(&mut host, &root, h!("input", { "type" => "checkbox", "name" => "done" }))
        .unwrap();
    let writes = host.take();

    assert!(writes.contains(&"attr type=checkbox".to_string()));
    assert!(!writes.iter().any(|w| w.starts_with("prop type")));
    // Other reflecting properties still take the property path
    assert!(writes.iter().any(|w| w.starts_with("prop name")));
}

#[test]
fn test_redundant_select_value_skipped() {
    let (mut host, root, mut reconciler) = recorder();
    let view = || {
        h!("select", { "value" => "b" },
            h!("option", { "value" => "a" }, "A"),
            h!("option", { "value" => "b" }, "B")
        )
    };

    reconciler.reconcile(&mut host, &root, view()).unwrap();
    reconciler.reconcile(&mut host, &root, view()).unwrap();
    let select = host.doc.child(root, 0).unwrap();
    assert_eq!(host.doc.value(select).as_deref(), Some("b"));
    host.take();

    let stats = reconciler.reconcile(&mut host, &root, view()).unwrap();
    assert!(
        !host.take().iter().any(|w| w.starts_with("prop value")),
        "equal select and option values are not rewritten"
    );
    assert_eq!(stats.attrs_set, 0);
    assert_eq!(host.doc.value(select).as_deref(), Some("b"));
}

#[test]
fn test_property_removal_paths() {
    let (mut host, root, mut reconciler) = recorder();
    let null = format!("prop href={:?}", PropValue::Null);

    reconciler
        .reconcile(&mut host, &root, h!("a", { "href" => "#x" }, "go"))
        .unwrap();
    let link = host.doc.child(root, 0).unwrap();
    host.take();

    reconciler.reconcile(&mut host, &root, h!("a", "go")).unwrap();
    assert_eq!(host.take(), vec![null]);
    assert_eq!(host.doc.attribute(link, "href"), None);

    // option value is cleared through the attribute instead
    reconciler
        .reconcile(&mut host, &root, h!("option", { "value" => "a" }, "A"))
        .unwrap();
    let option = host.doc.child(root, 0).unwrap();
    host.take();

    reconciler.reconcile(&mut host, &root, h!("option", "A")).unwrap();
    assert_eq!(host.take(), vec!["remove value".to_string()]);
    assert_eq!(host.doc.attribute(option, "value"), None);
    assert_eq!(host.doc.value(option).as_deref(), Some("A"));
}
