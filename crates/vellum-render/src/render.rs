//! The per-request render pass.
//!
//! Rendering walks a tree exactly like compaction does, except that every
//! dynamic component becomes an [`AsyncPendingUnit`] whose render is started
//! right away. Output adapters on [`RenderedVdom`] then splice the units back
//! in document order.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use vellum_core::{
	ChunkWriter, ComponentError, DynamicRef, Node, PreparedNode, Request, write_node,
	write_prepared,
};

use crate::options::RenderOptions;
use crate::output::RenderedVdom;
use crate::rendered::{AsyncPendingUnit, RenderedNode};
use crate::task;

/// One render pass: the request and context shared by every component in
/// the tree, plus the options it was started with.
pub struct RenderPass<C = ()> {
	request: Arc<Request>,
	context: Arc<C>,
	options: RenderOptions,
}

impl<C> Clone for RenderPass<C> {
	fn clone(&self) -> Self {
		Self {
			request: Arc::clone(&self.request),
			context: Arc::clone(&self.context),
			options: self.options.clone(),
		}
	}
}

impl<C> RenderPass<C>
where
	C: Send + Sync + 'static,
{
	/// Creates a render pass.
	pub fn new(request: Arc<Request>, context: Arc<C>, options: RenderOptions) -> Self {
		Self {
			request,
			context,
			options,
		}
	}

	/// Returns the request.
	pub fn request(&self) -> &Request {
		&self.request
	}

	/// Returns the context.
	pub fn context(&self) -> &C {
		&self.context
	}

	/// Renders a tree, starting every dynamic component in it.
	pub fn render_node(&self, node: &Node<C>) -> RenderedNode {
		let mut writer = ChunkWriter::new();
		write_node(node, &mut writer, |dynamic| self.pending_unit(dynamic));
		RenderedNode::new(writer.finish())
	}

	/// Renders a compacted template. Its chunks are reused as-is.
	pub fn render_prepared(&self, prepared: &PreparedNode<C>) -> RenderedNode {
		let mut writer = ChunkWriter::new();
		write_prepared(prepared, &mut writer, |dynamic| self.pending_unit(dynamic));
		RenderedNode::new(writer.finish())
	}

	fn pending_unit(&self, dynamic: &DynamicRef<C>) -> AsyncPendingUnit {
		let pass = self.clone();
		let dynamic = dynamic.clone();
		let label = dynamic.name();
		let future = task::start(
			label,
			async move { pass.resolve_component(&dynamic).await },
			self.options.execution,
		);
		AsyncPendingUnit::new(label, future)
	}

	/// Runs a component's render and renders whatever it produced. Errors and
	/// panics from `render` are routed to `on_fail`.
	async fn resolve_component(&self, dynamic: &DynamicRef<C>) -> RenderedNode {
		let component = dynamic.component();
		let outcome = AssertUnwindSafe(async {
			component
				.render(
					dynamic.attrs(),
					dynamic.children(),
					&self.request,
					&self.context,
				)
				.await
		})
		.catch_unwind()
		.await;

		let node = match outcome {
			Ok(Ok(node)) => node,
			Ok(Err(error)) => self.fallback(dynamic, &error),
			Err(payload) => self.fallback(dynamic, &ComponentError::from_panic(payload.as_ref())),
		};
		self.render_node(&node)
	}

	fn fallback(&self, dynamic: &DynamicRef<C>, error: &ComponentError) -> Node<C> {
		dynamic.component().on_fail(
			error,
			dynamic.attrs(),
			dynamic.children(),
			&self.request,
			&self.context,
		)
	}
}

/// Renders node trees for requests.
///
/// # Examples
///
/// ```
/// use vellum_core::{Element, Node, Request};
/// use vellum_render::{RenderOptions, ServerRenderer};
///
/// let renderer = ServerRenderer::with_options(RenderOptions::new().deferred());
/// let page: Node = Element::new("p").child("hi").into();
/// let html = futures::executor::block_on(
/// 	renderer.render(&page, Request::default(), ()).to_html_string(),
/// );
/// assert_eq!(html.unwrap(), "<p>hi</p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServerRenderer {
	options: RenderOptions,
}

impl ServerRenderer {
	/// Creates a renderer with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a renderer with custom options.
	pub fn with_options(options: RenderOptions) -> Self {
		Self { options }
	}

	/// Returns the options.
	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	fn pass<C>(&self, request: impl Into<Arc<Request>>, context: impl Into<Arc<C>>) -> RenderPass<C>
	where
		C: Send + Sync + 'static,
	{
		RenderPass::new(request.into(), context.into(), self.options.clone())
	}

	/// Renders a tree for one request.
	pub fn render<C>(
		&self,
		node: &Node<C>,
		request: impl Into<Arc<Request>>,
		context: impl Into<Arc<C>>,
	) -> RenderedVdom
	where
		C: Send + Sync + 'static,
	{
		RenderedVdom::new(self.pass(request, context).render_node(node))
	}

	/// Renders a compacted template for one request.
	pub fn render_prepared<C>(
		&self,
		prepared: &PreparedNode<C>,
		request: impl Into<Arc<Request>>,
		context: impl Into<Arc<C>>,
	) -> RenderedVdom
	where
		C: Send + Sync + 'static,
	{
		RenderedVdom::new(self.pass(request, context).render_prepared(prepared))
	}
}

/// Renders `node` for one request with default options.
///
/// Every dynamic component in the tree is started immediately on the ambient
/// Tokio runtime. Call one of the [`RenderedVdom`] adapters to get the bytes.
pub fn render_server_vnode<C>(
	node: &Node<C>,
	request: impl Into<Arc<Request>>,
	context: impl Into<Arc<C>>,
) -> RenderedVdom
where
	C: Send + Sync + 'static,
{
	ServerRenderer::new().render(node, request, context)
}

/// Renders a compacted template for one request with default options.
pub fn render_prepared<C>(
	prepared: &PreparedNode<C>,
	request: impl Into<Arc<Request>>,
	context: impl Into<Arc<C>>,
) -> RenderedVdom
where
	C: Send + Sync + 'static,
{
	ServerRenderer::new().render_prepared(prepared, request, context)
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use vellum_core::{Attributes, DynamicComponent, Element, prepare_vnode};

	struct Counted {
		calls: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl DynamicComponent<String> for Counted {
		async fn render(
			&self,
			_attrs: &Attributes,
			_children: &[Node<String>],
			request: &Request,
			context: &String,
		) -> Result<Node<String>, ComponentError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(Node::text(format!("{} {}", context, request.uri().path())))
		}
	}

	fn counted(calls: &Arc<AtomicUsize>) -> Node<String> {
		Node::Dynamic(DynamicRef::new(
			Arc::new(Counted {
				calls: Arc::clone(calls),
			}),
			Attributes::new(),
			vec![],
		))
	}

	fn request(path: &str) -> Request {
		http::Request::builder()
			.uri(path)
			.body(())
			.expect("valid request")
	}

	#[rstest]
	#[tokio::test]
	async fn test_request_and_context_reach_components() {
		let calls = Arc::new(AtomicUsize::new(0));
		let node: Node<String> = Element::new("p").child(counted(&calls)).into();

		let html = render_server_vnode(&node, request("/home"), "hello".to_owned())
			.to_html_string()
			.await
			.expect("utf-8");

		assert_eq!(html, "<p>hello /home</p>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_render_runs_once_per_pass() {
		let calls = Arc::new(AtomicUsize::new(0));
		let node: Node<String> = Node::List(vec![counted(&calls), counted(&calls)]);

		let vdom = render_server_vnode(&node, request("/"), String::new());
		vdom.to_bytes().await;
		vdom.to_bytes().await;
		assert_eq!(calls.load(Ordering::SeqCst), 2);

		render_server_vnode(&node, request("/"), String::new())
			.to_bytes()
			.await;
		assert_eq!(calls.load(Ordering::SeqCst), 4);
	}

	#[rstest]
	#[tokio::test]
	async fn test_prepared_and_direct_agree() {
		let calls = Arc::new(AtomicUsize::new(0));
		let node: Node<String> = Element::new("div")
			.attr("id", "root")
			.child(counted(&calls))
			.child("tail")
			.into();
		let prepared = prepare_vnode(&node);

		let direct = render_server_vnode(&node, request("/a"), "x".to_owned())
			.to_bytes()
			.await;
		let compacted = render_prepared(&prepared, request("/a"), "x".to_owned())
			.to_bytes()
			.await;

		assert_eq!(direct, compacted);
		assert_eq!(&direct[..], b"<div id=\"root\">x /atail</div>");
	}
}
