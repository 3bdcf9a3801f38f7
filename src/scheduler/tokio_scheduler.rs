use super::{drive, Duration, Scheduler, Task, TaskHandle};
use futures::future::abortable;
use tokio::runtime::Handle;
use tracing::debug;

/// Scheduler spawning timer tasks onto a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  runtime: Handle,
}

impl TokioScheduler {
  pub fn new(runtime: Handle) -> Self { TokioScheduler { runtime } }

  /// Uses the runtime of the calling context.
  ///
  /// # Panics
  ///
  /// Panics when called outside of a tokio runtime.
  pub fn current() -> Self { TokioScheduler { runtime: Handle::current() } }
}

impl<S: Send + 'static> Scheduler<S> for TokioScheduler {
  fn schedule(&self, task: Task<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let (future, abort) =
      abortable(drive(task, handle.clone(), delay, tokio::time::sleep));
    handle.set_abort(abort);
    debug!(?delay, "spawning task on tokio runtime");
    self.runtime.spawn(async move {
      let _ = future.await;
    });
    handle
  }
}
