//! # vellum-core
//!
//! The virtual node model behind vellum.
//!
//! This crate knows how to describe a document ([`Node`], [`Element`]), how
//! to escape it safely, and how to compact the static parts of a tree into
//! reusable byte chunks ([`prepare_vnode`]). Resolving dynamic components
//! and producing output is the job of `vellum-render`.
//!
//! ## Modules
//!
//! - [`escape`]: context-specific escaping and attribute-name cleaning
//! - [`attrs`]: attribute values and emission rules
//! - [`node`]: the node enum, elements and conversions
//! - [`component`]: static and dynamic components
//! - [`jsx`]: element-construction entry points
//! - [`prepare`]: chunk writer and template compaction
//!
//! ## Example
//!
//! ```
//! use vellum_core::{Element, Node, Segment, prepare_vnode};
//!
//! let page: Node = Element::new("div")
//! 	.child("a&b")
//! 	.child(Element::new("hr"))
//! 	.child("c\"d")
//! 	.into();
//!
//! let prepared = prepare_vnode(&page);
//! match prepared.segments() {
//! 	[Segment::Chunk(html)] => assert_eq!(&html[..], b"<div>a&amp;b<hr>c&quot;d</div>"),
//! 	other => panic!("unexpected segments: {other:?}"),
//! }
//! ```

pub mod attrs;
pub mod component;
pub mod escape;
pub mod jsx;
pub mod node;
pub mod prepare;

pub use attrs::{AttrValue, Attributes, Source, write_attribute};
pub use component::{
	ComponentError, DynamicComponent, DynamicRef, Request, StaticComponent, panic_message,
};
pub use jsx::{Props, Tag, create_element, create_fragment, jsx, jsx_dev, jsxs};
pub use node::{Element, IntoNode, Node, RawText, TextMode, VOID_TAGS, is_void_tag};
pub use prepare::{
	ChunkWriter, DOCTYPE, PreparedNode, Segment, prepare_html_vnode, prepare_vnode, write_node,
	write_prepared,
};
