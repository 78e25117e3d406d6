//! The virtual node model.
//!
//! A [`Node`] tree describes a document before rendering. Primitive variants
//! render as text, [`Element`]s render as tags, [`Node::Dynamic`] marks the
//! spot where an async component's output will go, and [`Node::Prepared`]
//! embeds a previously compacted template.
//!
//! The type parameter `C` is the per-request context handed to dynamic
//! components. It defaults to `()` and carries no trait bounds here.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::attrs::{AttrValue, Attributes};
use crate::component::DynamicRef;
use crate::escape::{escape_html_text, escape_style_script_text};
use crate::prepare::PreparedNode;

/// Tags that never have children or a closing tag.
pub const VOID_TAGS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Returns whether `tag` is a void element.
pub fn is_void_tag(tag: &str) -> bool {
	VOID_TAGS.contains(&tag)
}

/// Formats a number the way markup expects it: no trailing `.0`,
/// `Infinity` for infinities and `NaN` for not-a-number.
///
/// Finite values use Rust's shortest round-trip form, which never switches
/// to exponent notation: `1e21` prints as `1000000000000000000000` and
/// `1e-7` as `0.0000001`.
pub(crate) fn format_float(value: f64) -> String {
	if value.is_nan() {
		"NaN".to_owned()
	} else if value.is_infinite() {
		let sign = if value > 0.0 { "" } else { "-" };
		format!("{sign}Infinity")
	} else if value == 0.0 {
		"0".to_owned()
	} else {
		value.to_string()
	}
}

/// How text children are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
	/// Regular element content.
	#[default]
	Html,
	/// Content of a `<style>` or `<script>` element.
	StyleScript,
}

impl TextMode {
	/// Escapes `text` for this mode.
	pub fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
		match self {
			Self::Html => escape_html_text(text),
			Self::StyleScript => escape_style_script_text(text),
		}
	}
}

/// Pre-trusted markup emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText(Cow<'static, str>);

impl RawText {
	/// Wraps markup that must not be escaped.
	pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
		Self(text.into())
	}

	/// Returns the wrapped markup.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// A virtual node.
pub enum Node<C = ()> {
	/// Text, escaped on output.
	Text(Cow<'static, str>),
	/// An integer rendered in decimal.
	Integer(i128),
	/// A float rendered like [`AttrValue::Float`].
	Float(f64),
	/// `true` or `false`.
	Bool(bool),
	/// Renders nothing.
	Null,
	/// Markup emitted verbatim.
	Raw(RawText),
	/// An HTML element.
	Element(Element<C>),
	/// A pending async component.
	Dynamic(DynamicRef<C>),
	/// A sequence rendered in order.
	List(Vec<Node<C>>),
	/// A compacted template embedded as-is.
	Prepared(Arc<PreparedNode<C>>),
}

impl<C> Node<C> {
	/// Creates a text node.
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(text.into())
	}

	/// Creates a raw markup node.
	pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
		Self::Raw(RawText::new(text))
	}

	/// Creates a list node from anything convertible into nodes.
	pub fn fragment<I>(items: I) -> Self
	where
		I: IntoIterator,
		I::Item: IntoNode<C>,
	{
		Self::List(items.into_iter().map(IntoNode::into_node).collect())
	}

	/// Returns whether this node renders nothing.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns the element if this is [`Node::Element`].
	pub fn as_element(&self) -> Option<&Element<C>> {
		match self {
			Self::Element(el) => Some(el),
			_ => None,
		}
	}
}

impl<C> Default for Node<C> {
	fn default() -> Self {
		Self::Null
	}
}

impl<C> Clone for Node<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Text(t) => Self::Text(t.clone()),
			Self::Integer(i) => Self::Integer(*i),
			Self::Float(f) => Self::Float(*f),
			Self::Bool(b) => Self::Bool(*b),
			Self::Null => Self::Null,
			Self::Raw(r) => Self::Raw(r.clone()),
			Self::Element(el) => Self::Element(el.clone()),
			Self::Dynamic(d) => Self::Dynamic(d.clone()),
			Self::List(items) => Self::List(items.clone()),
			Self::Prepared(p) => Self::Prepared(Arc::clone(p)),
		}
	}
}

impl<C> fmt::Debug for Node<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
			Self::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
			Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Null => f.write_str("Null"),
			Self::Raw(r) => f.debug_tuple("Raw").field(r).finish(),
			Self::Element(el) => el.fmt(f),
			Self::Dynamic(d) => d.fmt(f),
			Self::List(items) => f.debug_tuple("List").field(items).finish(),
			Self::Prepared(p) => p.fmt(f),
		}
	}
}

/// An HTML element with ordered attributes and children.
///
/// # Example
///
/// ```
/// use vellum_core::{Element, Node};
///
/// let node: Node = Element::new("div")
/// 	.attr("class", "card")
/// 	.child(Element::new("hr"))
/// 	.child("text")
/// 	.into();
/// assert_eq!(node.as_element().map(Element::tag_name), Some("div"));
/// ```
pub struct Element<C = ()> {
	tag: Cow<'static, str>,
	attrs: Attributes,
	children: Vec<Node<C>>,
}

impl<C> Element<C> {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}

	/// Creates an element from already collected parts.
	pub fn from_parts(
		tag: impl Into<Cow<'static, str>>,
		attrs: Attributes,
		children: Vec<Node<C>>,
	) -> Self {
		Self {
			tag: tag.into(),
			attrs,
			children,
		}
	}

	/// Sets an attribute.
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.attrs.set(name, value);
		self
	}

	/// Sets a boolean attribute.
	pub fn bool_attr(mut self, name: impl Into<Cow<'static, str>>, value: bool) -> Self {
		self.attrs.set(name, value);
		self
	}

	/// Sets the `style` attribute from ordered camelCase declarations.
	pub fn style<K, V, I>(mut self, declarations: I) -> Self
	where
		K: Into<Cow<'static, str>>,
		V: Into<AttrValue>,
		I: IntoIterator<Item = (K, V)>,
	{
		self.attrs.set("style", AttrValue::map(declarations));
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoNode<C>) -> Self {
		self.children.push(child.into_node());
		self
	}

	/// Appends several children.
	pub fn children<I>(mut self, children: I) -> Self
	where
		I: IntoIterator,
		I::Item: IntoNode<C>,
	{
		self.children
			.extend(children.into_iter().map(IntoNode::into_node));
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes.
	pub fn attrs(&self) -> &Attributes {
		&self.attrs
	}

	/// Returns the children.
	pub fn child_nodes(&self) -> &[Node<C>] {
		&self.children
	}

	/// Returns whether this is a void element. Children of void elements
	/// are never rendered.
	pub fn is_void(&self) -> bool {
		is_void_tag(&self.tag)
	}

	/// Returns how text children of this element are escaped.
	pub fn text_mode(&self) -> TextMode {
		match self.tag.as_ref() {
			"style" | "script" => TextMode::StyleScript,
			_ => TextMode::Html,
		}
	}

	/// Appends the opening tag, including attributes, to `out`.
	pub fn write_open_tag(&self, out: &mut String) {
		out.push('<');
		out.push_str(&self.tag);
		self.attrs.write_html(&self.tag, out);
		out.push('>');
	}
}

impl<C> Clone for Element<C> {
	fn clone(&self) -> Self {
		Self {
			tag: self.tag.clone(),
			attrs: self.attrs.clone(),
			children: self.children.clone(),
		}
	}
}

impl<C> fmt::Debug for Element<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.tag)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.finish()
	}
}

/// Conversion into a [`Node`].
pub trait IntoNode<C = ()> {
	/// Performs the conversion.
	fn into_node(self) -> Node<C>;
}

impl<C> IntoNode<C> for Node<C> {
	fn into_node(self) -> Node<C> {
		self
	}
}

impl<C> IntoNode<C> for Element<C> {
	fn into_node(self) -> Node<C> {
		Node::Element(self)
	}
}

impl<C> IntoNode<C> for RawText {
	fn into_node(self) -> Node<C> {
		Node::Raw(self)
	}
}

impl<C> IntoNode<C> for DynamicRef<C> {
	fn into_node(self) -> Node<C> {
		Node::Dynamic(self)
	}
}

impl<C> IntoNode<C> for PreparedNode<C> {
	fn into_node(self) -> Node<C> {
		Node::Prepared(Arc::new(self))
	}
}

impl<C> IntoNode<C> for Arc<PreparedNode<C>> {
	fn into_node(self) -> Node<C> {
		Node::Prepared(self)
	}
}

impl<C> IntoNode<C> for &'static str {
	fn into_node(self) -> Node<C> {
		Node::Text(Cow::Borrowed(self))
	}
}

impl<C> IntoNode<C> for String {
	fn into_node(self) -> Node<C> {
		Node::Text(Cow::Owned(self))
	}
}

impl<C> IntoNode<C> for &String {
	fn into_node(self) -> Node<C> {
		Node::Text(Cow::Owned(self.clone()))
	}
}

impl<C> IntoNode<C> for Cow<'static, str> {
	fn into_node(self) -> Node<C> {
		Node::Text(self)
	}
}

impl<C> IntoNode<C> for bool {
	fn into_node(self) -> Node<C> {
		Node::Bool(self)
	}
}

impl<C> IntoNode<C> for f64 {
	fn into_node(self) -> Node<C> {
		Node::Float(self)
	}
}

impl<C> IntoNode<C> for f32 {
	fn into_node(self) -> Node<C> {
		Node::Float(f64::from(self))
	}
}

macro_rules! into_node_from_int {
	($($ty:ty),*) => {
		$(
			impl<C> IntoNode<C> for $ty {
				fn into_node(self) -> Node<C> {
					Node::Integer(self as i128)
				}
			}
		)*
	};
}

into_node_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl<C> IntoNode<C> for () {
	fn into_node(self) -> Node<C> {
		Node::Null
	}
}

impl<C, T: IntoNode<C>> IntoNode<C> for Option<T> {
	fn into_node(self) -> Node<C> {
		match self {
			Some(inner) => inner.into_node(),
			None => Node::Null,
		}
	}
}

impl<C, T: IntoNode<C>> IntoNode<C> for Vec<T> {
	fn into_node(self) -> Node<C> {
		Node::List(self.into_iter().map(IntoNode::into_node).collect())
	}
}

macro_rules! into_node_for_tuple {
	($($name:ident),+) => {
		impl<C, $($name: IntoNode<C>),+> IntoNode<C> for ($($name,)+) {
			#[allow(non_snake_case)]
			fn into_node(self) -> Node<C> {
				let ($($name,)+) = self;
				Node::List(vec![$($name.into_node()),+])
			}
		}
	};
}

into_node_for_tuple!(A);
into_node_for_tuple!(A, B);
into_node_for_tuple!(A, B, D);
into_node_for_tuple!(A, B, D, E);
into_node_for_tuple!(A, B, D, E, F);
into_node_for_tuple!(A, B, D, E, F, G);

impl<C> From<Element<C>> for Node<C> {
	fn from(element: Element<C>) -> Self {
		Node::Element(element)
	}
}

impl<C> From<RawText> for Node<C> {
	fn from(raw: RawText) -> Self {
		Node::Raw(raw)
	}
}

impl<C> From<DynamicRef<C>> for Node<C> {
	fn from(dynamic: DynamicRef<C>) -> Self {
		Node::Dynamic(dynamic)
	}
}

impl<C> From<&'static str> for Node<C> {
	fn from(text: &'static str) -> Self {
		Node::Text(Cow::Borrowed(text))
	}
}

impl<C> From<String> for Node<C> {
	fn from(text: String) -> Self {
		Node::Text(Cow::Owned(text))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(1.5, "1.5")]
	#[case(3.0, "3")]
	#[case(-0.0, "0")]
	#[case(f64::INFINITY, "Infinity")]
	#[case(f64::NEG_INFINITY, "-Infinity")]
	#[case(f64::NAN, "NaN")]
	#[case::large(1e21, "1000000000000000000000")]
	#[case::small(1e-7, "0.0000001")]
	fn test_format_float(#[case] value: f64, #[case] expected: &str) {
		assert_eq!(format_float(value), expected);
	}

	#[rstest]
	#[case("br", true)]
	#[case("img", true)]
	#[case("wbr", true)]
	#[case("div", false)]
	#[case("BR", false)]
	fn test_is_void_tag(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(is_void_tag(tag), expected);
	}

	#[rstest]
	#[case("style", TextMode::StyleScript)]
	#[case("script", TextMode::StyleScript)]
	#[case("div", TextMode::Html)]
	fn test_text_mode(#[case] tag: &'static str, #[case] expected: TextMode) {
		assert_eq!(Element::<()>::new(tag).text_mode(), expected);
	}

	#[rstest]
	fn test_open_tag() {
		let el: Element = Element::new("a")
			.attr("href", "/x?a=1&b=\"2\"")
			.bool_attr("download", true)
			.bool_attr("hidden", false);
		let mut out = String::new();
		el.write_open_tag(&mut out);
		assert_eq!(out, "<a href=\"/x?a=1&b=&quot;2&quot;\" download>");
	}

	#[rstest]
	fn test_into_node_conversions() {
		assert!(matches!(IntoNode::<()>::into_node("a"), Node::Text(_)));
		assert!(matches!(IntoNode::<()>::into_node(7u8), Node::Integer(7)));
		assert!(matches!(IntoNode::<()>::into_node(None::<&str>), Node::Null));
		assert!(matches!(IntoNode::<()>::into_node(()), Node::Null));
		match IntoNode::<()>::into_node(("a", 1, true)) {
			Node::List(items) => assert_eq!(items.len(), 3),
			other => panic!("expected a list, got {other:?}"),
		}
	}

	#[rstest]
	fn test_builder_keeps_child_order() {
		let el: Element = Element::new("ul").children(["a", "b", "c"]);
		let texts: Vec<_> = el
			.child_nodes()
			.iter()
			.map(|n| match n {
				Node::Text(t) => t.to_string(),
				other => panic!("unexpected {other:?}"),
			})
			.collect();
		assert_eq!(texts, vec!["a", "b", "c"]);
	}
}
