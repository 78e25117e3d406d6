//! Data loaded once and rendered in several places.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use vellum_core::{Attributes, ComponentError, DynamicComponent, DynamicRef, Node, Request};

use crate::options::ComponentExecution;
use crate::task;

type FailHandler<C> = dyn Fn(&ComponentError, &Request, &C) -> Node<C> + Send + Sync;
type ViewFn<T, C> = dyn Fn(T) -> BoxFuture<'static, Result<Node<C>, ComponentError>> + Send + Sync;

/// A value that is loaded once and can be rendered into several places of
/// a tree, each with its own render function.
///
/// The load starts as soon as the object is created (on the ambient Tokio
/// runtime when there is one). Every view waits on the same shared result.
///
/// # Examples
///
/// ```
/// use vellum_core::{Element, Node};
/// use vellum_render::AsyncRenderObject;
///
/// # async fn demo() {
/// let user = AsyncRenderObject::new(async { Ok::<_, vellum_core::ComponentError>("ada".to_owned()) });
///
/// let page: Node = Element::new("body")
/// 	.child(Element::new("header").child(user.render(|name| Node::text(name))))
/// 	.child(Element::new("main").child(user.render(|name| Node::text(format!("Welcome, {name}")))))
/// 	.into();
/// # }
/// ```
pub struct AsyncRenderObject<T, C = ()> {
	data: Shared<BoxFuture<'static, Result<T, ComponentError>>>,
	default_on_fail: Arc<FailHandler<C>>,
}

impl<T, C> Clone for AsyncRenderObject<T, C> {
	fn clone(&self) -> Self {
		Self {
			data: self.data.clone(),
			default_on_fail: Arc::clone(&self.default_on_fail),
		}
	}
}

impl<T, C> AsyncRenderObject<T, C>
where
	T: Clone + Send + Sync + 'static,
	C: Send + Sync + 'static,
{
	/// Starts loading `future`. Failures are logged and render nothing
	/// unless a view supplies its own handler.
	pub fn new<F>(future: F) -> Self
	where
		F: Future<Output = Result<T, ComponentError>> + Send + 'static,
	{
		Self::with_on_fail(future, |error, request, _context| {
			tracing::error!(
				uri = %request.uri(),
				error = %error,
				"async render object failed to render"
			);
			Node::Null
		})
	}

	/// Starts loading `future`, using `on_fail` for views that do not supply
	/// their own failure handler.
	pub fn with_on_fail<F, H>(future: F, on_fail: H) -> Self
	where
		F: Future<Output = Result<T, ComponentError>> + Send + 'static,
		H: Fn(&ComponentError, &Request, &C) -> Node<C> + Send + Sync + 'static,
	{
		let data = task::start("AsyncRenderObject", future, ComponentExecution::Spawn)
			.map(|result| result.map_err(ComponentError::from).and_then(|loaded| loaded))
			.boxed()
			.shared();
		Self {
			data,
			default_on_fail: Arc::new(on_fail),
		}
	}

	/// Returns a node that renders the loaded value with `view`.
	pub fn render<V>(&self, view: V) -> Node<C>
	where
		V: Fn(T) -> Node<C> + Send + Sync + 'static,
	{
		self.render_async(move |value| {
			let node = view(value);
			async move { Ok::<_, ComponentError>(node) }
		})
	}

	/// Like [`render`](Self::render) with a fallible async view.
	pub fn render_async<V, Fut>(&self, view: V) -> Node<C>
	where
		V: Fn(T) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Node<C>, ComponentError>> + Send + 'static,
	{
		self.view(boxed_view(view), Arc::clone(&self.default_on_fail))
	}

	/// Like [`render`](Self::render), with a failure handler for this view
	/// only.
	pub fn render_or<V, H>(&self, view: V, on_fail: H) -> Node<C>
	where
		V: Fn(T) -> Node<C> + Send + Sync + 'static,
		H: Fn(&ComponentError, &Request, &C) -> Node<C> + Send + Sync + 'static,
	{
		let view = boxed_view(move |value| {
			let node = view(value);
			async move { Ok::<_, ComponentError>(node) }
		});
		self.view(view, Arc::new(on_fail))
	}

	fn view(&self, render: Box<ViewFn<T, C>>, on_fail: Arc<FailHandler<C>>) -> Node<C> {
		let component = AsyncObjectView {
			data: self.data.clone(),
			render,
			on_fail,
		};
		Node::Dynamic(DynamicRef::new(
			Arc::new(component),
			Attributes::new(),
			Vec::new(),
		))
	}
}

fn boxed_view<T, C, V, Fut>(view: V) -> Box<ViewFn<T, C>>
where
	V: Fn(T) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Node<C>, ComponentError>> + Send + 'static,
{
	Box::new(move |value| view(value).boxed())
}

struct AsyncObjectView<T, C> {
	data: Shared<BoxFuture<'static, Result<T, ComponentError>>>,
	render: Box<ViewFn<T, C>>,
	on_fail: Arc<FailHandler<C>>,
}

#[async_trait]
impl<T, C> DynamicComponent<C> for AsyncObjectView<T, C>
where
	T: Clone + Send + Sync + 'static,
	C: Send + Sync + 'static,
{
	async fn render(
		&self,
		_attrs: &Attributes,
		_children: &[Node<C>],
		_request: &Request,
		_context: &C,
	) -> Result<Node<C>, ComponentError> {
		let value = self.data.clone().await?;
		(self.render)(value).await
	}

	fn on_fail(
		&self,
		error: &ComponentError,
		_attrs: &Attributes,
		_children: &[Node<C>],
		request: &Request,
		context: &C,
	) -> Node<C> {
		(self.on_fail)(error, request, context)
	}

	fn name(&self) -> &'static str {
		"AsyncRenderObject"
	}
}
