//! Render errors.

use vellum_core::ComponentError;

/// Errors raised while resolving rendered output.
///
/// Component failures never show up here: they are routed to the
/// component's `on_fail`. These cover what is left, such as a panic inside
/// `on_fail` itself or a task lost to runtime shutdown.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
	/// A render task panicked outside component containment.
	#[error("render task panicked: {0}")]
	Panicked(String),

	/// A spawned render task did not complete.
	#[error("render task failed: {0}")]
	TaskFailed(String),

	/// The rendered bytes are not valid UTF-8.
	#[error("rendered output is not valid UTF-8")]
	InvalidUtf8,
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for ComponentError {
	fn from(error: RenderError) -> Self {
		match error {
			RenderError::Panicked(message) => ComponentError::Panicked(message),
			other => ComponentError::msg(other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(RenderError::Panicked("boom".into()), "render task panicked: boom")]
	#[case(RenderError::TaskFailed("cancelled".into()), "render task failed: cancelled")]
	#[case(RenderError::InvalidUtf8, "rendered output is not valid UTF-8")]
	fn test_display(#[case] error: RenderError, #[case] expected: &str) {
		assert_eq!(error.to_string(), expected);
	}

	#[rstest]
	fn test_into_component_error() {
		let error: ComponentError = RenderError::Panicked("x".into()).into();
		assert!(matches!(error, ComponentError::Panicked(ref m) if m == "x"));
		let error: ComponentError = RenderError::TaskFailed("gone".into()).into();
		assert_eq!(error.to_string(), "render task failed: gone");
	}
}
