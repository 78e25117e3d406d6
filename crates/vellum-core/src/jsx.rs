//! Element construction entry points.
//!
//! These functions are what a markup-to-code transform calls: every element
//! in a template becomes one [`create_element`] (or [`jsx`]) call.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::attrs::{
	AttrValue, Attributes, SOURCE_COLUMN_NUMBER_ATTR, SOURCE_FILE_NAME_ATTR,
	SOURCE_LINE_NUMBER_ATTR, Source,
};
use crate::component::{DynamicComponent, DynamicRef, StaticComponent};
use crate::escape::is_valid_tag_name;
use crate::node::{Element, IntoNode, Node, RawText};

/// What an element call constructs.
pub enum Tag<'a, C = ()> {
	/// A plain HTML element.
	Html(Cow<'static, str>),
	/// A function component, evaluated immediately.
	Static(&'a StaticComponent<'a, C>),
	/// An async component, resolved at render time.
	Dynamic(Arc<dyn DynamicComponent<C>>),
	/// Verbatim markup taken from the `text` attribute.
	Raw,
}

impl<'a, C: 'static> Tag<'a, C> {
	/// Wraps a function component.
	pub fn component<F>(component: &'a F) -> Self
	where
		F: Fn(&Attributes, Vec<Node<C>>) -> Node<C> + 'a,
	{
		Self::Static(component)
	}

	/// Wraps an async component.
	pub fn dynamic(component: impl DynamicComponent<C>) -> Self {
		Self::Dynamic(Arc::new(component))
	}
}

impl<C: 'static> From<&'static str> for Tag<'_, C> {
	fn from(tag: &'static str) -> Self {
		Self::Html(Cow::Borrowed(tag))
	}
}

impl<C: 'static> From<String> for Tag<'_, C> {
	fn from(tag: String) -> Self {
		Self::Html(Cow::Owned(tag))
	}
}

impl<C: 'static> From<Arc<dyn DynamicComponent<C>>> for Tag<'_, C> {
	fn from(component: Arc<dyn DynamicComponent<C>>) -> Self {
		Self::Dynamic(component)
	}
}

impl<C: 'static> fmt::Debug for Tag<'_, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Html(tag) => f.debug_tuple("Html").field(tag).finish(),
			Self::Static(_) => f.write_str("Static"),
			Self::Dynamic(component) => f.debug_tuple("Dynamic").field(&component.name()).finish(),
			Self::Raw => f.write_str("Raw"),
		}
	}
}

/// Attributes and children collected for a [`jsx`] call.
pub struct Props<C = ()> {
	/// The element's attributes.
	pub attrs: Attributes,
	/// The element's children.
	pub children: Vec<Node<C>>,
}

impl<C> Props<C> {
	/// Creates empty props.
	pub fn new() -> Self {
		Self {
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}

	/// Sets an attribute.
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.attrs.set(name, value);
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
}

impl<C> Default for Props<C> {
	fn default() -> Self {
		Self::new()
	}
}

/// Builds a node for `tag`.
///
/// - HTML tags become an [`Element`]. Invalid tag names are logged and
///   produce [`Node::Null`].
/// - Function components are called right away with the attributes and
///   children.
/// - Async components become a [`Node::Dynamic`] placeholder.
/// - [`Tag::Raw`] takes its markup from the `text` attribute.
pub fn create_element<'a, C: 'static>(
	tag: impl Into<Tag<'a, C>>,
	attrs: Attributes,
	children: Vec<Node<C>>,
) -> Node<C> {
	match tag.into() {
		Tag::Html(name) => {
			if !is_valid_tag_name(&name) {
				tracing::error!(tag = %name, "invalid tag name, element dropped");
				return Node::Null;
			}
			Node::Element(Element::from_parts(name, attrs, children))
		}
		Tag::Static(component) => component(&attrs, children),
		Tag::Dynamic(component) => Node::Dynamic(DynamicRef::new(component, attrs, children)),
		Tag::Raw => match attrs.get("text") {
			Some(AttrValue::Text(text)) => Node::Raw(RawText::new(text.clone())),
			_ => {
				tracing::error!("raw element requires a string `text` attribute");
				Node::Null
			}
		},
	}
}

/// Groups children without a wrapping element.
pub fn create_fragment<C>(_attrs: &Attributes, children: Vec<Node<C>>) -> Node<C> {
	Node::List(children)
}

/// Automatic-runtime entry point. A `key`, when given, is kept as an
/// attribute.
pub fn jsx<'a, C: 'static>(tag: impl Into<Tag<'a, C>>, mut props: Props<C>, key: Option<&str>) -> Node<C> {
	if let Some(key) = key {
		props.attrs.set("key", key.to_owned());
	}
	create_element(tag, props.attrs, props.children)
}

/// Same as [`jsx`]; used when the children were written as a static list.
pub fn jsxs<'a, C: 'static>(tag: impl Into<Tag<'a, C>>, props: Props<C>, key: Option<&str>) -> Node<C> {
	jsx(tag, props, key)
}

/// Development entry point: like [`jsx`], and also records where the element
/// was written under reserved attributes (see [`Attributes::source`]).
pub fn jsx_dev<'a, C: 'static>(
	tag: impl Into<Tag<'a, C>>,
	mut props: Props<C>,
	key: Option<&str>,
	_is_static_children: bool,
	source: &Source,
) -> Node<C> {
	props
		.attrs
		.set(SOURCE_FILE_NAME_ATTR, source.file_name.clone());
	props
		.attrs
		.set(SOURCE_LINE_NUMBER_ATTR, source.line_number);
	props
		.attrs
		.set(SOURCE_COLUMN_NUMBER_ATTR, source.column_number);
	jsx(tag, props, key)
}
