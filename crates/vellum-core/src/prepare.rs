//! Template compaction.
//!
//! [`prepare_vnode`] walks a tree once and serializes everything static into
//! byte chunks, leaving only the dynamic components as placeholders. The
//! result can be rendered many times without touching the static markup
//! again.
//!
//! The walk uses an explicit work stack, so arbitrarily deep trees are fine.

use std::fmt;
use std::mem;

use bytes::Bytes;

use crate::component::DynamicRef;
use crate::escape::is_valid_tag_name;
use crate::node::{Node, TextMode, format_float};

/// Emitted ahead of the root by [`prepare_html_vnode`].
pub const DOCTYPE: &str = "<!DOCTYPE html>";

/// One piece of a serialized tree: either finished bytes or a placeholder.
#[derive(Debug, Clone)]
pub enum Segment<P> {
	/// Already serialized markup.
	Chunk(Bytes),
	/// Something to be filled in later.
	Placeholder(P),
}

/// Accumulates markup and placeholders into [`Segment`]s.
///
/// Consecutive text is coalesced into one chunk. Chunks never end up empty.
pub struct ChunkWriter<P> {
	buffer: String,
	segments: Vec<Segment<P>>,
}

impl<P> ChunkWriter<P> {
	/// Creates an empty writer.
	pub fn new() -> Self {
		Self {
			buffer: String::new(),
			segments: Vec::new(),
		}
	}

	/// Appends markup.
	pub fn push_str(&mut self, s: &str) {
		self.buffer.push_str(s);
	}

	fn buffer_mut(&mut self) -> &mut String {
		&mut self.buffer
	}

	/// Appends an already encoded chunk.
	pub fn push_chunk(&mut self, chunk: Bytes) {
		if chunk.is_empty() {
			return;
		}
		self.flush();
		self.segments.push(Segment::Chunk(chunk));
	}

	/// Appends a placeholder.
	pub fn push_placeholder(&mut self, placeholder: P) {
		self.flush();
		self.segments.push(Segment::Placeholder(placeholder));
	}

	fn flush(&mut self) {
		if !self.buffer.is_empty() {
			let text = mem::take(&mut self.buffer);
			self.segments.push(Segment::Chunk(Bytes::from(text)));
		}
	}

	/// Returns the segments written so far.
	pub fn finish(mut self) -> Vec<Segment<P>> {
		self.flush();
		self.segments
	}
}

impl<P> Default for ChunkWriter<P> {
	fn default() -> Self {
		Self::new()
	}
}

enum Work<'a, C> {
	Visit(&'a Node<C>, TextMode),
	Close(&'a str),
}

/// Serializes `node` into `writer`.
///
/// Every [`Node::Dynamic`] is turned into a placeholder through
/// `placeholder`, in document order. Elements with an invalid tag name are
/// logged and skipped together with their children. Embedded [`Node::Prepared`] templates are
/// copied in the same way, with their placeholders mapped too.
pub fn write_node<'a, C, P, F>(node: &'a Node<C>, writer: &mut ChunkWriter<P>, mut placeholder: F)
where
	F: FnMut(&'a DynamicRef<C>) -> P,
{
	let mut stack = vec![Work::Visit(node, TextMode::Html)];
	while let Some(work) = stack.pop() {
		let (node, mode) = match work {
			Work::Close(tag) => {
				let out = writer.buffer_mut();
				out.push_str("</");
				out.push_str(tag);
				out.push('>');
				continue;
			}
			Work::Visit(node, mode) => (node, mode),
		};
		match node {
			Node::Text(text) => writer.push_str(&mode.escape(text)),
			Node::Integer(value) => writer.push_str(&value.to_string()),
			Node::Float(value) => writer.push_str(&format_float(*value)),
			Node::Bool(value) => writer.push_str(if *value { "true" } else { "false" }),
			Node::Null => {}
			Node::Raw(raw) => writer.push_str(raw.as_str()),
			Node::Element(element) => {
				if !is_valid_tag_name(element.tag_name()) {
					tracing::error!(
						tag = element.tag_name(),
						"invalid tag name, element and its children dropped"
					);
					continue;
				}
				element.write_open_tag(writer.buffer_mut());
				if !element.is_void() {
					stack.push(Work::Close(element.tag_name()));
					let child_mode = element.text_mode();
					stack.extend(
						element
							.child_nodes()
							.iter()
							.rev()
							.map(|child| Work::Visit(child, child_mode)),
					);
				}
			}
			Node::Dynamic(dynamic) => writer.push_placeholder(placeholder(dynamic)),
			Node::List(items) => {
				stack.extend(items.iter().rev().map(|child| Work::Visit(child, mode)));
			}
			Node::Prepared(prepared) => write_segments(prepared, writer, &mut placeholder),
		}
	}
}

/// Copies a prepared template into `writer`, mapping its placeholders.
pub fn write_prepared<'a, C, P, F>(
	prepared: &'a PreparedNode<C>,
	writer: &mut ChunkWriter<P>,
	mut placeholder: F,
) where
	F: FnMut(&'a DynamicRef<C>) -> P,
{
	write_segments(prepared, writer, &mut placeholder);
}

fn write_segments<'a, C, P, F>(
	prepared: &'a PreparedNode<C>,
	writer: &mut ChunkWriter<P>,
	placeholder: &mut F,
) where
	F: FnMut(&'a DynamicRef<C>) -> P,
{
	for segment in &prepared.segments {
		match segment {
			Segment::Chunk(chunk) => writer.push_chunk(chunk.clone()),
			Segment::Placeholder(dynamic) => writer.push_placeholder(placeholder(dynamic)),
		}
	}
}

/// A compacted template: static markup chunks interleaved with the dynamic
/// components still to be resolved.
///
/// Prepared nodes are immutable and can be shared across threads and
/// requests, typically behind an [`Arc`](std::sync::Arc).
pub struct PreparedNode<C = ()> {
	segments: Vec<Segment<DynamicRef<C>>>,
}

impl<C> PreparedNode<C> {
	/// Returns the segments in document order.
	pub fn segments(&self) -> &[Segment<DynamicRef<C>>] {
		&self.segments
	}

	/// Returns the number of dynamic components left to resolve.
	pub fn dynamic_count(&self) -> usize {
		self.segments
			.iter()
			.filter(|s| matches!(s, Segment::Placeholder(_)))
			.count()
	}

	/// Returns whether the template has no dynamic components.
	pub fn is_static(&self) -> bool {
		self.dynamic_count() == 0
	}

	/// Total length of the static markup in bytes.
	pub fn static_len(&self) -> usize {
		self.segments
			.iter()
			.map(|s| match s {
				Segment::Chunk(chunk) => chunk.len(),
				Segment::Placeholder(_) => 0,
			})
			.sum()
	}
}

impl<C> Clone for PreparedNode<C> {
	fn clone(&self) -> Self {
		Self {
			segments: self.segments.clone(),
		}
	}
}

impl<C> fmt::Debug for PreparedNode<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PreparedNode")
			.field("segments", &self.segments)
			.finish()
	}
}

/// Compacts `node` into a reusable template.
pub fn prepare_vnode<C>(node: &Node<C>) -> PreparedNode<C> {
	let mut writer = ChunkWriter::new();
	write_node(node, &mut writer, DynamicRef::clone);
	PreparedNode {
		segments: writer.finish(),
	}
}

/// Like [`prepare_vnode`], with [`DOCTYPE`] emitted first.
pub fn prepare_html_vnode<C>(node: &Node<C>) -> PreparedNode<C> {
	let mut writer = ChunkWriter::new();
	writer.push_str(DOCTYPE);
	write_node(node, &mut writer, DynamicRef::clone);
	PreparedNode {
		segments: writer.finish(),
	}
}
