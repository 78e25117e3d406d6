//! # vellum-render
//!
//! Per-request rendering for vellum node trees.
//!
//! [`render_server_vnode`] turns a tree (or a compacted template, through
//! [`render_prepared`]) into a [`RenderedVdom`]: static markup as byte chunks,
//! dynamic components as [`AsyncPendingUnit`]s already running on the
//! ambient Tokio runtime. The output adapters then produce a response body:
//!
//! - [`RenderedVdom::to_bytes`] for one contiguous buffer
//! - [`RenderedVdom::to_boxed_slice`] for one exactly sized allocation
//! - [`RenderedVdom::into_stream`] for a chunked [`RenderStream`]
//!
//! Content always comes out in document order, however the components
//! finish. A failing component is replaced by its `on_fail` fallback and
//! never affects its siblings.
//!
//! ## Example
//!
//! ```
//! use async_trait::async_trait;
//! use vellum_core::{Attributes, ComponentError, DynamicComponent, Element, Node, Request, Tag, create_element};
//! use vellum_render::render_server_vnode;
//!
//! struct Clock;
//!
//! #[async_trait]
//! impl DynamicComponent for Clock {
//! 	async fn render(
//! 		&self,
//! 		_attrs: &Attributes,
//! 		_children: &[Node],
//! 		_request: &Request,
//! 		_context: &(),
//! 	) -> Result<Node, ComponentError> {
//! 		Ok(Node::text("12:00"))
//! 	}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let page: Node = Element::new("p")
//! 	.child("It is ")
//! 	.child(create_element(Tag::dynamic(Clock), Attributes::new(), vec![]))
//! 	.into();
//!
//! let html = render_server_vnode(&page, Request::default(), ())
//! 	.to_html_string()
//! 	.await
//! 	.unwrap();
//! assert_eq!(html, "<p>It is 12:00</p>");
//! # }
//! ```

mod async_object;
mod error;
mod options;
mod output;
mod render;
mod rendered;
mod stream;
mod task;

pub use async_object::AsyncRenderObject;
pub use error::{RenderError, RenderResult};
pub use options::{ComponentExecution, RenderOptions, StreamingConfig};
pub use output::RenderedVdom;
pub use render::{RenderPass, ServerRenderer, render_prepared, render_server_vnode};
pub use rendered::{AsyncPendingUnit, RenderedNode, RenderedSegment, UnitFuture, UnitState};
pub use stream::RenderStream;
