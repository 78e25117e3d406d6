//! Output adapters.
//!
//! A [`RenderedVdom`] can be consumed three ways:
//!
//! | Adapter | Result |
//! |---------|--------|
//! | [`RenderedVdom::to_bytes`] | one contiguous [`Bytes`] |
//! | [`RenderedVdom::to_boxed_slice`] | one exactly sized `Box<[u8]>` |
//! | [`RenderedVdom::into_stream`] | a [`RenderStream`] pulling chunks as they become ready |
//!
//! Every adapter emits content in document order. Pending components are
//! awaited where they sit, while components further down keep running in
//! the background.

use bytes::{Bytes, BytesMut};
use vellum_core::Segment;

use crate::error::{RenderError, RenderResult};
use crate::options::StreamingConfig;
use crate::rendered::{AsyncPendingUnit, Cursor, RenderedNode};
use crate::stream::RenderStream;

/// The rendered form of one request's tree, ready to be turned into a
/// response body.
#[derive(Debug, Clone)]
pub struct RenderedVdom {
	root: RenderedNode,
}

impl RenderedVdom {
	pub(crate) fn new(root: RenderedNode) -> Self {
		Self { root }
	}

	/// Returns the top-level rendered node.
	pub fn rendered(&self) -> &RenderedNode {
		&self.root
	}

	/// Waits for every component and returns the whole document as one
	/// buffer.
	pub async fn to_bytes(&self) -> Bytes {
		let chunks = collect_chunks(&self.root).await;
		match chunks.len() {
			0 => Bytes::new(),
			1 => chunks.into_iter().next().unwrap_or_default(),
			_ => {
				let total = chunks.iter().map(Bytes::len).sum();
				let mut out = BytesMut::with_capacity(total);
				for chunk in &chunks {
					out.extend_from_slice(chunk);
				}
				out.freeze()
			}
		}
	}

	/// Waits for every component and returns the document in a single
	/// allocation sized to fit.
	pub async fn to_boxed_slice(&self) -> Box<[u8]> {
		let chunks = collect_chunks(&self.root).await;
		let total = chunks.iter().map(Bytes::len).sum();
		let mut out = Vec::with_capacity(total);
		for chunk in &chunks {
			out.extend_from_slice(chunk);
		}
		out.into_boxed_slice()
	}

	/// Like [`to_bytes`](Self::to_bytes), decoded as UTF-8.
	pub async fn to_html_string(&self) -> RenderResult<String> {
		let bytes = self.to_bytes().await;
		String::from_utf8(bytes.to_vec()).map_err(|_| RenderError::InvalidUtf8)
	}

	/// Turns the document into a pull-driven byte stream with default
	/// settings.
	pub fn into_stream(self) -> RenderStream {
		self.into_stream_with(StreamingConfig::default())
	}

	/// Turns the document into a pull-driven byte stream.
	pub fn into_stream_with(self, config: StreamingConfig) -> RenderStream {
		RenderStream::new(self.root, config)
	}
}

/// Walks `root` in document order, awaiting each pending unit in turn.
async fn collect_chunks(root: &RenderedNode) -> Vec<Bytes> {
	let mut chunks = Vec::new();
	let mut cursor = Cursor::new(root.clone());
	while let Some(segment) = cursor.next_segment() {
		match segment {
			Segment::Chunk(chunk) => chunks.push(chunk),
			Segment::Placeholder(unit) => match unit.resolve().await {
				Ok(nested) => cursor.splice(nested),
				Err(error) => log_dropped_unit(&unit, &error),
			},
		}
	}
	chunks
}

pub(crate) fn log_dropped_unit(unit: &AsyncPendingUnit, error: &RenderError) {
	tracing::error!(
		component = unit.label(),
		error = %error,
		"failed to resolve rendered component, dropping it from the output"
	);
}
