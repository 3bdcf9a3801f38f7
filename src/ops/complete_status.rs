use crate::prelude::*;
use futures::{executor::block_on, future::poll_fn, task::AtomicWaker};
use std::{
  sync::{
    atomic::{AtomicI8, Ordering},
    Arc,
  },
  task::Poll,
};

/// Terminal state of a run, observable from other threads.
///
/// Mostly used to block a test or a `main` until a scheduled sequence ends.
#[derive(Debug, Default)]
pub struct CompleteStatus {
  flag: AtomicI8,
  waker: AtomicWaker,
}

#[derive(Clone)]
pub struct StatusOp<S> {
  source: S,
  status: Arc<CompleteStatus>,
}

pub fn complete_status<S>(source: S) -> (StatusOp<S>, Arc<CompleteStatus>) {
  let status = Arc::new(CompleteStatus::default());
  (StatusOp { source, status: status.clone() }, status)
}

impl<S, Item, Err, O> Observable<Item, Err, O> for StatusOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, StatusObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Self { source, status } = self;
    source.actual_subscribe(StatusObserver { observer, status })
  }
}

impl<S, Item, Err> ObservableExt<Item, Err> for StatusOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct StatusObserver<O> {
  observer: O,
  status: Arc<CompleteStatus>,
}

impl<Item, Err, O> Observer<Item, Err> for StatusObserver<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) {
    self.observer.error(err);
    self.status.finish(-1);
  }

  fn complete(self) {
    self.observer.complete();
    self.status.finish(1);
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

impl CompleteStatus {
  /// Returns true once the run completed or failed.
  pub fn is_closed(&self) -> bool { self.flag.load(Ordering::Acquire) != 0 }

  /// Returns true if the run completed.
  pub fn is_completed(&self) -> bool { self.flag.load(Ordering::Acquire) > 0 }

  /// Returns true if the run failed.
  pub fn is_failed(&self) -> bool { self.flag.load(Ordering::Acquire) < 0 }

  /// Blocks the current thread until the run completes or fails.
  ///
  /// A run that is disposed instead never finishes, so don't wait on it.
  pub fn wait_for_end(this: Arc<Self>) {
    block_on(poll_fn(|cx| {
      this.waker.register(cx.waker());
      if this.is_closed() { Poll::Ready(()) } else { Poll::Pending }
    }));
  }

  fn finish(&self, flag: i8) {
    self.flag.store(flag, Ordering::Release);
    self.waker.wake();
  }
}
