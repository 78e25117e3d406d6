//! Automatic-runtime entry points.
//!
//! ```
//! use vellum::jsx_runtime::{Fragment, Props, Tag, jsx, jsxs};
//! use vellum::{Node, prepare_vnode, Segment};
//!
//! let node: Node = jsxs(
//! 	Tag::component(&Fragment),
//! 	Props::new()
//! 		.child(jsx("b", Props::new().child("bold"), None))
//! 		.child(jsx("i", Props::new().child("italic"), Some("k1"))),
//! 	None,
//! );
//!
//! let prepared = prepare_vnode(&node);
//! match prepared.segments() {
//! 	[Segment::Chunk(html)] => assert_eq!(&html[..], b"<b>bold</b><i key=\"k1\">italic</i>"),
//! 	other => panic!("unexpected segments: {other:?}"),
//! }
//! ```

pub use vellum_core::create_fragment as Fragment;
pub use vellum_core::{Props, Tag, jsx, jsxs};
