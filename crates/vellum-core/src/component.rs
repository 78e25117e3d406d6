//! Component abstractions.
//!
//! Static components are plain functions evaluated while the tree is built.
//! Dynamic components implement [`DynamicComponent`] and are resolved
//! asynchronously for every render pass.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::attrs::Attributes;
use crate::node::Node;

/// The request handed to dynamic components. Only the head is needed, so the
/// body is unit.
pub type Request = http::Request<()>;

/// A synchronous function component.
///
/// It receives its attributes and children and returns the node that
/// replaces it in the tree.
pub type StaticComponent<'a, C = ()> = dyn Fn(&Attributes, Vec<Node<C>>) -> Node<C> + 'a;

/// Errors produced by a dynamic component's render.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ComponentError {
	/// A plain error message.
	#[error("{0}")]
	Message(String),

	/// An underlying error.
	#[error(transparent)]
	Source(Arc<dyn std::error::Error + Send + Sync + 'static>),

	/// The render panicked.
	#[error("component panicked: {0}")]
	Panicked(String),
}

impl ComponentError {
	/// Creates an error from a message.
	pub fn msg(message: impl Into<String>) -> Self {
		Self::Message(message.into())
	}

	/// Wraps an underlying error.
	pub fn new<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Source(Arc::new(error))
	}

	/// Builds a [`ComponentError::Panicked`] from a panic payload.
	pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
		Self::Panicked(panic_message(payload))
	}
}

impl From<String> for ComponentError {
	fn from(message: String) -> Self {
		Self::Message(message)
	}
}

impl From<&str> for ComponentError {
	fn from(message: &str) -> Self {
		Self::Message(message.to_owned())
	}
}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&'static str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic payload".to_owned()
	}
}

/// An asynchronous component.
///
/// A fresh render is started for every render pass, so one instance may be
/// used by many concurrent requests.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use vellum_core::{Attributes, ComponentError, DynamicComponent, Element, Node, Request};
///
/// struct Greeting;
///
/// #[async_trait]
/// impl DynamicComponent for Greeting {
/// 	async fn render(
/// 		&self,
/// 		attrs: &Attributes,
/// 		_children: &[Node],
/// 		_request: &Request,
/// 		_context: &(),
/// 	) -> Result<Node, ComponentError> {
/// 		let name = attrs.get_str("name").unwrap_or("stranger").to_owned();
/// 		Ok(Element::new("p").child(format!("Hello, {name}")).into())
/// 	}
/// }
/// ```
#[async_trait]
pub trait DynamicComponent<C = ()>: Send + Sync + 'static {
	/// Produces this component's subtree.
	async fn render(
		&self,
		attrs: &Attributes,
		children: &[Node<C>],
		request: &Request,
		context: &C,
	) -> Result<Node<C>, ComponentError>;

	/// Produces the fallback subtree after `render` failed or panicked.
	///
	/// The default logs the error and renders nothing.
	fn on_fail(
		&self,
		error: &ComponentError,
		_attrs: &Attributes,
		_children: &[Node<C>],
		request: &Request,
		_context: &C,
	) -> Node<C> {
		tracing::error!(
			component = self.name(),
			uri = %request.uri(),
			error = %error,
			"dynamic component failed to render"
		);
		Node::Null
	}

	/// Name used in diagnostics.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

struct DynamicInner<C> {
	component: Arc<dyn DynamicComponent<C>>,
	name: &'static str,
	attrs: Attributes,
	children: Vec<Node<C>>,
}

/// A dynamic component together with the attributes and children it was
/// created with. Cloning is cheap.
pub struct DynamicRef<C = ()> {
	inner: Arc<DynamicInner<C>>,
}

impl<C: 'static> DynamicRef<C> {
	/// Binds a component to its attributes and children.
	pub fn new(
		component: Arc<dyn DynamicComponent<C>>,
		attrs: Attributes,
		children: Vec<Node<C>>,
	) -> Self {
		let name = component.name();
		Self {
			inner: Arc::new(DynamicInner {
				component,
				name,
				attrs,
				children,
			}),
		}
	}

	/// Returns the component.
	pub fn component(&self) -> &Arc<dyn DynamicComponent<C>> {
		&self.inner.component
	}
}

impl<C> DynamicRef<C> {
	/// Returns the bound attributes.
	pub fn attrs(&self) -> &Attributes {
		&self.inner.attrs
	}

	/// Returns the bound children.
	pub fn children(&self) -> &[Node<C>] {
		&self.inner.children
	}

	/// Returns the component's diagnostic name.
	pub fn name(&self) -> &'static str {
		self.inner.name
	}

	/// Returns whether both references share the same binding.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<C> Clone for DynamicRef<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<C> fmt::Debug for DynamicRef<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dynamic")
			.field("component", &self.name())
			.field("attrs", self.attrs())
			.field("children", &self.children().len())
			.finish()
	}
}
