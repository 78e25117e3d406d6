//! Compaction and escaping integration tests
//!
//! Covers:
//! 1. Element serialization through `prepare_vnode`
//! 2. Escaping rules per context (text, style/script, attributes)
//! 3. Element construction entry points feeding compaction
//! 4. Property-based checks for escaping and raw text

use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use rstest::*;
use vellum_core::escape::{escape_html_text, escape_style_script_text};
use vellum_core::{
	AttrValue, Attributes, ComponentError, DynamicComponent, DynamicRef, Element, Node,
	PreparedNode, Props, Request, Segment, Source, Tag, create_element, jsx_dev, prepare_vnode,
};

// ============================================================================
// Helpers
// ============================================================================

struct Slot;

#[async_trait]
impl DynamicComponent for Slot {
	async fn render(
		&self,
		_attrs: &Attributes,
		_children: &[Node],
		_request: &Request,
		_context: &(),
	) -> Result<Node, ComponentError> {
		Ok(Node::Null)
	}
}

fn html(prepared: &PreparedNode) -> String {
	let mut out = Vec::new();
	for segment in prepared.segments() {
		match segment {
			Segment::Chunk(chunk) => out.extend_from_slice(chunk),
			Segment::Placeholder(dynamic) => {
				let id = dynamic.attrs().get_str("id").unwrap_or("?");
				out.extend_from_slice(format!("[{id}]").as_bytes());
			}
		}
	}
	String::from_utf8(out).expect("prepared output is utf-8")
}

fn render_static(node: &Node) -> String {
	html(&prepare_vnode(node))
}

// ============================================================================
// Happy Path
// ============================================================================

#[rstest]
fn test_div_with_void_child_and_escaped_text() {
	let node: Node = Node::List(vec![
		Element::new("div")
			.child("a&b")
			.child(Element::new("hr"))
			.child("c\"d")
			.into(),
	]);

	assert_eq!(render_static(&node), "<div>a&amp;b<hr>c&quot;d</div>");
}

#[rstest]
fn test_empty_non_void_element_has_closing_tag() {
	let node: Node = Element::new("span").into();
	assert_eq!(render_static(&node), "<span></span>");
}

#[rstest]
fn test_attributes_in_order() {
	let node: Node = Element::new("input")
		.attr("type", "checkbox")
		.bool_attr("checked", true)
		.bool_attr("disabled", false)
		.attr("tabindex", 0)
		.attr("placeholder", "")
		.into();

	assert_eq!(
		render_static(&node),
		"<input type=\"checkbox\" checked tabindex=\"0\">"
	);
}

#[rstest]
fn test_style_object_attribute() {
	let node: Node = Element::new("div")
		.style([
			("backgroundColor", AttrValue::from("red")),
			("fontSize", AttrValue::from("12px")),
		])
		.into();

	assert_eq!(
		render_static(&node),
		"<div style=\"background-color:red;font-size:12px\"></div>"
	);
}

#[rstest]
fn test_placeholders_stay_in_document_order() {
	let slot = |id: &'static str| -> Node {
		Node::Dynamic(DynamicRef::new(
			Arc::new(Slot),
			Attributes::from([("id", id)]),
			vec![],
		))
	};
	let node: Node = Element::new("ul")
		.child(Element::new("li").child(slot("one")))
		.child(Element::new("li").child(slot("two")))
		.child(slot("three"))
		.into();

	let prepared = prepare_vnode(&node);

	assert_eq!(prepared.dynamic_count(), 3);
	assert_eq!(
		html(&prepared),
		"<ul><li>[one]</li><li>[two]</li>[three]</ul>"
	);
}

// ============================================================================
// Construction
// ============================================================================

#[rstest]
fn test_create_element_with_dynamic_tag() {
	let node: Node = create_element(
		Tag::dynamic(Slot),
		Attributes::from([("id", "x")]),
		vec![Node::text("child")],
	);

	match &node {
		Node::Dynamic(dynamic) => {
			assert_eq!(dynamic.attrs().get_str("id"), Some("x"));
			assert_eq!(dynamic.children().len(), 1);
		}
		other => panic!("expected a dynamic node, got {other:?}"),
	}
	assert_eq!(render_static(&node), "[x]");
}

#[rstest]
fn test_source_metadata_never_reaches_markup() {
	let source = Source::new("src/pages/index.rs", 40, 2);
	let node: Node = jsx_dev(
		"section",
		Props::new().attr("id", "hero").child("hi"),
		Some("k"),
		true,
		&source,
	);

	assert_eq!(
		render_static(&node),
		"<section id=\"hero\" key=\"k\">hi</section>"
	);
	assert_eq!(
		node.as_element().and_then(|el| el.attrs().source()),
		Some(source)
	);
}

// ============================================================================
// Edge Cases
// ============================================================================

#[rstest]
fn test_raw_text_inside_script_is_untouched() {
	let node: Node = Element::new("script")
		.child(Node::raw("if (a < b && c > d) { x = \"y\"; }"))
		.into();

	assert_eq!(
		render_static(&node),
		"<script>if (a < b && c > d) { x = \"y\"; }</script>"
	);
}

#[rstest]
fn test_style_mode_inherited_through_lists() {
	let node: Node = Element::new("style")
		.child(Node::List(vec![Node::List(vec![Node::text("a>b")])]))
		.into();

	assert_eq!(render_static(&node), "<style>a&gt;b</style>");
}

#[rstest]
fn test_attribute_in_style_uses_attribute_escaping() {
	let node: Node = Element::new("style")
		.attr("media", "x\"y>z")
		.into();

	assert_eq!(render_static(&node), "<style media=\"x&quot;y>z\"></style>");
}

#[rstest]
fn test_event_handler_attribute_is_dropped() {
	let node: Node = Element::new("button")
		.attr("onClick", "steal()")
		.attr("type", "button")
		.child("Go")
		.into();

	assert_eq!(render_static(&node), "<button type=\"button\">Go</button>");
}

#[rstest]
#[case::handler_in_tag_name("img src=x onerror=alert(1)")]
#[case::closing_markup("b></b><script")]
#[case::whitespace("my tag")]
fn test_builder_element_with_invalid_tag_renders_nothing(#[case] tag: &'static str) {
	let node: Node = Element::new("div")
		.child(Element::new(tag).child(Element::new("span").child("inner")))
		.child(Element::new("hr"))
		.into();

	assert_eq!(render_static(&node), "<div><hr></div>");
}

#[rstest]
fn test_prepared_template_is_reusable() {
	let node: Node = Element::new("p").child("same").into();
	let prepared = Arc::new(prepare_vnode(&node));

	let page: Node = Node::List(vec![
		Node::Prepared(Arc::clone(&prepared)),
		Node::Prepared(Arc::clone(&prepared)),
	]);

	assert_eq!(render_static(&page), "<p>same</p><p>same</p>");
}

// ============================================================================
// Property-based Tests
// ============================================================================

#[rstest]
fn test_property_html_text_escaping_only_substitutes_three_chars() {
	proptest!(|(text in ".*")| {
		let escaped = escape_html_text(&text);

		prop_assert!(!escaped.contains('<'));
		prop_assert!(!escaped.contains('"'));
		let restored = escaped
			.replace("&quot;", "\"")
			.replace("&lt;", "<")
			.replace("&amp;", "&");
		prop_assert_eq!(restored, text);
	});
}

#[rstest]
fn test_property_style_script_escaping_keeps_quotes() {
	proptest!(|(text in ".*")| {
		let escaped = escape_style_script_text(&text);

		prop_assert!(!escaped.contains('<'));
		prop_assert!(!escaped.contains('>'));
		prop_assert_eq!(escaped.matches('"').count(), text.matches('"').count());
		prop_assert_eq!(escaped.matches('\'').count(), text.matches('\'').count());
	});
}

#[rstest]
fn test_property_raw_text_is_never_modified() {
	proptest!(|(text in ".*", tag in prop::sample::select(vec!["div", "style", "script", "p"]))| {
		let node: Node = Element::new(tag).child(Node::raw(text.clone())).into();

		prop_assert_eq!(render_static(&node), format!("<{tag}>{text}</{tag}>"));
	});
}

#[rstest]
fn test_property_compaction_is_idempotent_when_embedded() {
	proptest!(|(texts in prop::collection::vec(".*", 0..8))| {
		let node: Node = Element::new("div").children(texts.clone()).into();
		let direct = render_static(&node);
		let embedded: Node = Node::Prepared(Arc::new(prepare_vnode(&node)));

		prop_assert_eq!(render_static(&embedded), direct);
	});
}
