//! # Vellum
//!
//! Server-side rendering of virtual node trees into HTML.
//!
//! A page is described as a tree of [`Node`]s built with the [`Element`]
//! builder or the JSX-style entry points in [`jsx_runtime`]. Static parts of
//! a tree can be compacted ahead of time with [`prepare_vnode`]; per request,
//! [`render_server_vnode`] starts every async component concurrently and the
//! result is written out as one buffer or as a stream.
//!
//! ## Crates
//!
//! - [`core`] (`vellum-core`): escaping, node model, components, compaction
//! - [`render`] (`vellum-render`): render passes, output adapters, streaming
//!
//! ## Quick Example
//!
//! ```
//! use vellum::{Element, Node, Request, StreamingConfig, render_server_vnode};
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let page: Node = Element::new("ul")
//! 	.children((1..=3).map(|n| Element::new("li").child(n)))
//! 	.into();
//!
//! let mut stream = render_server_vnode(&page, Request::default(), ())
//! 	.into_stream_with(StreamingConfig::new().with_buffer_size(1024));
//! let body = stream.next().await.unwrap();
//! assert_eq!(&body[..], b"<ul><li>1</li><li>2</li><li>3</li></ul>");
//! # }
//! ```

pub mod jsx_dev_runtime;
pub mod jsx_runtime;

/// Node model, escaping and compaction.
pub use vellum_core as core;
/// Render passes and output adapters.
pub use vellum_render as render;

pub use vellum_core::{
	AttrValue, Attributes, ComponentError, DOCTYPE, DynamicComponent, DynamicRef, Element,
	IntoNode, Node, PreparedNode, Props, RawText, Request, Segment, Source, StaticComponent, Tag,
	create_element, create_fragment, prepare_html_vnode, prepare_vnode,
};
pub use vellum_render::{
	AsyncPendingUnit, AsyncRenderObject, ComponentExecution, RenderError, RenderOptions,
	RenderResult, RenderStream, RenderedNode, RenderedVdom, ServerRenderer, StreamingConfig,
	UnitState, render_prepared, render_server_vnode,
};
