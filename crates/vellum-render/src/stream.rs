//! Pull-driven streaming output.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::stream::{FusedStream, Stream};
use vellum_core::Segment;

use crate::options::StreamingConfig;
use crate::output::log_dropped_unit;
use crate::rendered::{AsyncPendingUnit, Cursor, RenderedNode, UnitFuture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
	Open,
	Finished,
	Cancelled,
}

/// A stream of HTML chunks in document order.
///
/// Each poll emits whatever is ready. When the next position holds a
/// component that has not finished, the stream waits on that one component
/// only; anything buffered so far is flushed first. Components later in the
/// document keep rendering in the meantime, and their output is picked up
/// without waiting once the stream reaches them.
///
/// Cancelling or dropping the stream early does not abort running component
/// renders; their results are discarded.
pub struct RenderStream {
	cursor: Cursor,
	waiting: Option<(AsyncPendingUnit, UnitFuture)>,
	buffer: BytesMut,
	config: StreamingConfig,
	state: StreamState,
	emitted: usize,
}

impl RenderStream {
	pub(crate) fn new(root: RenderedNode, config: StreamingConfig) -> Self {
		Self {
			cursor: Cursor::new(root),
			waiting: None,
			buffer: BytesMut::new(),
			config,
			state: StreamState::Open,
			emitted: 0,
		}
	}

	/// Stops the stream. No further chunks are produced.
	pub fn cancel(&mut self, reason: &str) {
		if self.state != StreamState::Open {
			return;
		}
		tracing::warn!(
			reason,
			emitted_bytes = self.emitted,
			"render stream cancelled by consumer"
		);
		self.abandon();
	}

	/// Returns whether the stream was cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.state == StreamState::Cancelled
	}

	fn abandon(&mut self) {
		self.state = StreamState::Cancelled;
		self.cursor.clear();
		self.waiting = None;
		self.buffer.clear();
	}

	fn take_buffer(&mut self) -> Option<Bytes> {
		if self.buffer.is_empty() {
			return None;
		}
		let chunk = self.buffer.split().freeze();
		Some(self.emit(chunk))
	}

	fn emit(&mut self, chunk: Bytes) -> Bytes {
		self.emitted += chunk.len();
		chunk
	}
}

impl Stream for RenderStream {
	type Item = Bytes;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
		let this = self.get_mut();
		if this.state != StreamState::Open {
			return Poll::Ready(None);
		}

		loop {
			if let Some((unit, future)) = this.waiting.as_mut() {
				match Pin::new(future).poll(cx) {
					Poll::Pending => {
						return match this.take_buffer() {
							Some(chunk) => Poll::Ready(Some(chunk)),
							None => Poll::Pending,
						};
					}
					Poll::Ready(Ok(nested)) => this.cursor.splice(nested),
					Poll::Ready(Err(error)) => log_dropped_unit(unit, &error),
				}
				this.waiting = None;
				continue;
			}

			match this.cursor.next_segment() {
				Some(Segment::Chunk(chunk)) => {
					if this.config.buffer_size == 0 {
						return Poll::Ready(Some(this.emit(chunk)));
					}
					this.buffer.extend_from_slice(&chunk);
					if this.buffer.len() >= this.config.buffer_size {
						return Poll::Ready(this.take_buffer());
					}
				}
				Some(Segment::Placeholder(unit)) => {
					let future = unit.future();
					this.waiting = Some((unit, future));
				}
				None => {
					if let Some(chunk) = this.take_buffer() {
						return Poll::Ready(Some(chunk));
					}
					this.state = StreamState::Finished;
					tracing::debug!(emitted_bytes = this.emitted, "render stream completed");
					return Poll::Ready(None);
				}
			}
		}
	}
}

impl FusedStream for RenderStream {
	fn is_terminated(&self) -> bool {
		self.state != StreamState::Open
	}
}

impl Drop for RenderStream {
	fn drop(&mut self) {
		if self.state == StreamState::Open {
			tracing::warn!(
				emitted_bytes = self.emitted,
				"render stream dropped before completion"
			);
			self.abandon();
		}
	}
}
