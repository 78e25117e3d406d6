//! Starting render work on the ambient runtime.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::future::{BoxFuture, FutureExt};
use tokio::runtime::Handle;
use vellum_core::panic_message;

use crate::error::RenderError;
use crate::options::ComponentExecution;

/// Starts `future` according to `execution` and returns a handle to its
/// result.
///
/// Panics are caught and reported as [`RenderError::Panicked`]. With
/// [`ComponentExecution::Spawn`] the future runs as its own Tokio task; if no
/// runtime is available it is returned unstarted instead.
pub(crate) fn start<T, F>(
	label: &'static str,
	future: F,
	execution: ComponentExecution,
) -> BoxFuture<'static, Result<T, RenderError>>
where
	T: Send + 'static,
	F: Future<Output = T> + Send + 'static,
{
	let guarded = AssertUnwindSafe(future)
		.catch_unwind()
		.map(|result| result.map_err(|payload| RenderError::Panicked(panic_message(payload.as_ref()))));

	if execution == ComponentExecution::Deferred {
		return guarded.boxed();
	}

	match Handle::try_current() {
		Ok(handle) => {
			let task = handle.spawn(guarded);
			async move {
				match task.await {
					Ok(result) => result,
					Err(error) => Err(RenderError::TaskFailed(error.to_string())),
				}
			}
			.boxed()
		}
		Err(_) => {
			tracing::debug!(
				component = label,
				"no Tokio runtime available, deferring render until output is requested"
			);
			guarded.boxed()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicBool, Ordering};

	#[rstest]
	#[tokio::test]
	async fn test_spawned_future_runs_without_being_awaited() {
		let ran = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&ran);
		let handle = start(
			"probe",
			async move {
				flag.store(true, Ordering::SeqCst);
			},
			ComponentExecution::Spawn,
		);
		tokio::task::yield_now().await;
		assert!(ran.load(Ordering::SeqCst));
		handle.await.expect("completes");
	}

	#[rstest]
	#[tokio::test]
	async fn test_deferred_future_waits_for_poll() {
		let ran = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&ran);
		let handle = start(
			"probe",
			async move {
				flag.store(true, Ordering::SeqCst);
			},
			ComponentExecution::Deferred,
		);
		tokio::task::yield_now().await;
		assert!(!ran.load(Ordering::SeqCst));
		handle.await.expect("completes");
		assert!(ran.load(Ordering::SeqCst));
	}

	#[rstest]
	#[case(ComponentExecution::Spawn)]
	#[case(ComponentExecution::Deferred)]
	#[tokio::test]
	async fn test_panics_are_reported(#[case] execution: ComponentExecution) {
		let result = start::<(), _>("probe", async { panic!("kaboom"); }, execution).await;
		assert!(matches!(result, Err(RenderError::Panicked(ref m)) if m == "kaboom"));
	}

	#[rstest]
	fn test_spawn_without_runtime_falls_back() {
		let result = futures::executor::block_on(start(
			"probe",
			async { 7 },
			ComponentExecution::Spawn,
		));
		assert_eq!(result.expect("completes"), 7);
	}
}
