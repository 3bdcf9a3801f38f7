//! Timer scheduling for time-driven sources.
//!
//! A [`Task`] is a piece of state plus a step function. The scheduler calls
//! the step at the task's deadline and the step answers whether to stop or
//! sleep again. Deadlines advance by the requested period from the previous
//! deadline, not from the moment the step returned, so a slow consumer does
//! not make an interval drift.

use futures::future::{poll_fn, AbortHandle};
use parking_lot::Mutex;
use std::{
  future::Future,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  task::Poll,
};
use tracing::debug;

pub use std::time::{Duration, Instant};

use crate::subscription::SubscriptionLike;

pub mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(feature = "futures-scheduler")]
mod thread_pool_scheduler;
#[cfg(feature = "futures-scheduler")]
pub use thread_pool_scheduler::{SchedulerConfig, ThreadPoolScheduler};

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// What a task wants after one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
  /// The task is done and will not be stepped again.
  Finished,
  /// Step again once this much time has passed since the current deadline.
  Sleeping(Duration),
}

/// Unit of scheduled work.
pub struct Task<S> {
  state: S,
  handler: fn(&mut S) -> TaskState,
}

impl<S> Task<S> {
  pub fn new(state: S, handler: fn(&mut S) -> TaskState) -> Self {
    Task { state, handler }
  }

  #[inline]
  pub fn step(&mut self) -> TaskState { (self.handler)(&mut self.state) }
}

/// Runs tasks at their deadlines.
pub trait Scheduler<S> {
  /// Schedules `task` to take its first step after `delay` (or as soon as
  /// possible). The returned handle cancels it.
  fn schedule(&self, task: Task<S>, delay: Option<Duration>) -> TaskHandle;
}

/// Cancellation handle of a scheduled task.
///
/// The closed flag is checked before every step and the spawned future is
/// aborted, so a cancelled task never steps again once `unsubscribe`
/// returns, unless a step is already running on another thread.
#[derive(Clone, Debug, Default)]
pub struct TaskHandle(Arc<HandleInner>);

#[derive(Debug, Default)]
struct HandleInner {
  closed: AtomicBool,
  abort: Mutex<Option<AbortHandle>>,
}

impl TaskHandle {
  pub fn new() -> Self { Self::default() }

  /// Registers the abort handle of the spawned future. A task cancelled
  /// before it was spawned is aborted right away.
  pub(crate) fn set_abort(&self, abort: AbortHandle) {
    if self.is_closed() {
      abort.abort();
    } else {
      *self.0.abort.lock() = Some(abort);
      if self.is_closed() {
        if let Some(abort) = self.0.abort.lock().take() {
          abort.abort();
        }
      }
    }
  }

  /// Marks a task that ran to completion.
  pub(crate) fn finish(&self) {
    self.0.closed.store(true, Ordering::Release);
    self.0.abort.lock().take();
  }
}

impl SubscriptionLike for TaskHandle {
  fn unsubscribe(&mut self) {
    if !self.0.closed.swap(true, Ordering::AcqRel) {
      debug!("cancelling scheduled task");
      if let Some(abort) = self.0.abort.lock().take() {
        abort.abort();
      }
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.closed.load(Ordering::Acquire) }
}

/// Drives `task` on an async runtime, sleeping with `sleep` between steps.
#[cfg(any(test, feature = "futures-scheduler", feature = "tokio-scheduler"))]
pub(crate) async fn drive<S, Sleep, Fut>(
  mut task: Task<S>,
  handle: TaskHandle,
  delay: Option<Duration>,
  sleep: Sleep,
) where
  Sleep: Fn(Duration) -> Fut,
  Fut: Future<Output = ()>,
{
  let mut deadline = Instant::now() + delay.unwrap_or_default();
  loop {
    let now = Instant::now();
    if deadline > now {
      sleep(deadline - now).await;
    } else {
      // Behind schedule: give the worker back before the next step.
      yield_now().await;
    }
    if handle.is_closed() {
      return;
    }
    match task.step() {
      TaskState::Finished => {
        handle.finish();
        return;
      }
      TaskState::Sleeping(period) => deadline += period,
    }
  }
}

/// Returns `Pending` once, waking itself, so the executor can run other
/// tasks first.
#[cfg(any(test, feature = "futures-scheduler", feature = "tokio-scheduler"))]
async fn yield_now() {
  let mut yielded = false;
  poll_fn(|cx| {
    if yielded {
      Poll::Ready(())
    } else {
      yielded = true;
      cx.waker().wake_by_ref();
      Poll::Pending
    }
  })
  .await
}
