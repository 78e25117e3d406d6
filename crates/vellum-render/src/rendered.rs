//! Rendered output: byte chunks interleaved with pending component units.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use vellum_core::Segment;

use crate::error::RenderError;

/// One piece of a [`RenderedNode`].
pub type RenderedSegment = Segment<AsyncPendingUnit>;

/// The shared, memoized future behind an [`AsyncPendingUnit`].
pub type UnitFuture = Shared<BoxFuture<'static, Result<RenderedNode, RenderError>>>;

/// The per-request rendered form of a tree. Cloning is cheap.
#[derive(Clone)]
pub struct RenderedNode {
	segments: Arc<[RenderedSegment]>,
}

impl RenderedNode {
	pub(crate) fn new(segments: Vec<RenderedSegment>) -> Self {
		Self {
			segments: segments.into(),
		}
	}

	/// Returns the segments in document order.
	pub fn segments(&self) -> &[RenderedSegment] {
		&self.segments
	}

	/// Returns whether there is nothing to emit at this level.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns the number of pending units at this level.
	pub fn pending_count(&self) -> usize {
		self.segments
			.iter()
			.filter(|s| matches!(s, Segment::Placeholder(_)))
			.count()
	}
}

impl fmt::Debug for RenderedNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.segments.iter()).finish()
	}
}

/// Where an [`AsyncPendingUnit`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
	/// Not finished yet.
	Pending,
	/// Finished with content to splice in.
	Resolved,
	/// Finished without content; adapters log it and emit nothing.
	Failed,
}

/// A placeholder for a dynamic component's output.
///
/// The underlying future is shared and memoized: every clone awaits the same
/// result, and resolving twice never renders twice.
#[derive(Clone)]
pub struct AsyncPendingUnit {
	label: &'static str,
	future: UnitFuture,
}

impl AsyncPendingUnit {
	pub(crate) fn new(
		label: &'static str,
		future: BoxFuture<'static, Result<RenderedNode, RenderError>>,
	) -> Self {
		Self {
			label,
			future: future.shared(),
		}
	}

	/// Name of the component this unit renders.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Waits for the unit's content.
	pub async fn resolve(&self) -> Result<RenderedNode, RenderError> {
		self.future.clone().await
	}

	/// Returns the result if the unit has already finished.
	pub fn peek(&self) -> Option<&Result<RenderedNode, RenderError>> {
		self.future.peek()
	}

	/// Reports the unit's state without waiting.
	pub fn state(&self) -> UnitState {
		match self.peek() {
			None => UnitState::Pending,
			Some(Ok(_)) => UnitState::Resolved,
			Some(Err(_)) => UnitState::Failed,
		}
	}

	pub(crate) fn future(&self) -> UnitFuture {
		self.future.clone()
	}
}

impl fmt::Debug for AsyncPendingUnit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AsyncPendingUnit")
			.field("label", &self.label)
			.field("state", &self.state())
			.finish()
	}
}

/// Depth-first walk over nested rendered nodes.
///
/// Resolved units are pushed as new frames, so their content is emitted in
/// place before the rest of the enclosing level.
pub(crate) struct Cursor {
	frames: Vec<(RenderedNode, usize)>,
}

impl Cursor {
	pub(crate) fn new(root: RenderedNode) -> Self {
		Self {
			frames: vec![(root, 0)],
		}
	}

	/// Returns the next segment in document order.
	pub(crate) fn next_segment(&mut self) -> Option<RenderedSegment> {
		loop {
			let (node, index) = self.frames.last_mut()?;
			match node.segments().get(*index) {
				Some(segment) => {
					*index += 1;
					return Some(segment.clone());
				}
				None => {
					self.frames.pop();
				}
			}
		}
	}

	/// Splices resolved content at the current position.
	pub(crate) fn splice(&mut self, node: RenderedNode) {
		if !node.is_empty() {
			self.frames.push((node, 0));
		}
	}

	/// Drops all remaining work.
	pub(crate) fn clear(&mut self) {
		self.frames.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use futures::future;
	use rstest::rstest;

	fn chunk(s: &'static str) -> RenderedSegment {
		Segment::Chunk(Bytes::from_static(s.as_bytes()))
	}

	fn ready_unit(segments: Vec<RenderedSegment>) -> AsyncPendingUnit {
		AsyncPendingUnit::new("ready", future::ready(Ok(RenderedNode::new(segments))).boxed())
	}

	#[rstest]
	fn test_unit_state_transitions() {
		let unit = ready_unit(vec![chunk("a")]);
		assert_eq!(unit.state(), UnitState::Pending);
		let resolved = futures::executor::block_on(unit.resolve()).expect("resolves");
		assert_eq!(resolved.segments().len(), 1);
		assert_eq!(unit.state(), UnitState::Resolved);

		let failed = AsyncPendingUnit::new(
			"failing",
			future::ready(Err(RenderError::TaskFailed("gone".into()))).boxed(),
		);
		assert!(futures::executor::block_on(failed.resolve()).is_err());
		assert_eq!(failed.state(), UnitState::Failed);
	}

	#[rstest]
	fn test_clones_share_the_result() {
		let unit = ready_unit(vec![chunk("x")]);
		let copy = unit.clone();
		futures::executor::block_on(copy.resolve()).expect("resolves");
		assert_eq!(unit.state(), UnitState::Resolved);
	}

	#[rstest]
	fn test_cursor_splices_in_place() {
		let mut cursor = Cursor::new(RenderedNode::new(vec![
			chunk("a"),
			Segment::Placeholder(ready_unit(vec![])),
			chunk("d"),
		]));
		let mut out = Vec::new();
		while let Some(segment) = cursor.next_segment() {
			match segment {
				Segment::Chunk(bytes) => out.push(bytes),
				Segment::Placeholder(_) => {
					cursor.splice(RenderedNode::new(vec![chunk("b"), chunk("c")]));
				}
			}
		}
		assert_eq!(out, vec!["a", "b", "c", "d"]);
	}
}
