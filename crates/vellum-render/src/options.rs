//! Render and streaming options.

/// How dynamic component renders are started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentExecution {
	/// Spawn every component render on the ambient Tokio runtime as soon as
	/// the render pass reaches it, so siblings run concurrently.
	///
	/// Without a runtime this behaves like [`ComponentExecution::Deferred`].
	#[default]
	Spawn,
	/// Evaluate each component lazily, when an output adapter first awaits
	/// it. Needs no runtime.
	Deferred,
}

/// Options for a render pass.
///
/// # Examples
///
/// ```
/// use vellum_render::{ComponentExecution, RenderOptions};
///
/// let options = RenderOptions::new().deferred();
/// assert_eq!(options.execution, ComponentExecution::Deferred);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
	/// How dynamic components are started.
	pub execution: ComponentExecution,
}

impl RenderOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the execution strategy.
	pub fn execution(mut self, execution: ComponentExecution) -> Self {
		self.execution = execution;
		self
	}

	/// Switches to [`ComponentExecution::Deferred`].
	pub fn deferred(mut self) -> Self {
		self.execution = ComponentExecution::Deferred;
		self
	}
}

/// Configuration for [`RenderStream`](crate::RenderStream).
///
/// # Examples
///
/// ```
/// use vellum_render::StreamingConfig;
///
/// let config = StreamingConfig::new().with_buffer_size(8192);
/// assert_eq!(config.buffer_size, 8192);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamingConfig {
	/// Ready chunks are coalesced until this many bytes are buffered.
	/// Buffered bytes are always flushed before waiting on a pending
	/// component and at the end. `0` yields every chunk as produced.
	pub buffer_size: usize,
}

impl StreamingConfig {
	/// Creates a new StreamingConfig with default values
	///
	/// ```
	/// use vellum_render::StreamingConfig;
	///
	/// assert_eq!(StreamingConfig::new().buffer_size, 0);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the buffer size
	pub fn with_buffer_size(mut self, size: usize) -> Self {
		self.buffer_size = size;
		self
	}
}
