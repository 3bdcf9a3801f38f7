//! The consumer end of a run and the handle used to cancel it.
//!
//! Every `subscribe*` call wraps the user's observer in a [`Subscriber`] and
//! returns a [`SubscriptionHandle`]. Both share a [`Gate`]: the subscriber
//! delivers only while the gate is open, and the handle closes it.
//!
//! Deliveries hold the gate's re-entrant delivery lock. `unsubscribe` takes
//! the same lock after releasing upstream resources, so a notification that
//! is in flight on another thread finishes before `unsubscribe` returns,
//! while a call made from inside a callback on the delivering thread returns
//! at once.

use crate::prelude::*;
use parking_lot::ReentrantMutex;
use std::sync::{
  atomic::{AtomicU8, Ordering},
  Arc,
};
use tracing::trace;

const ACTIVE: u8 = 0;
const TERMINATED: u8 = 1;
const DISPOSED: u8 = 2;

/// Per-run delivery state shared by a [`Subscriber`] and its
/// [`SubscriptionHandle`].
#[derive(Debug, Default)]
pub struct Gate {
  state: AtomicU8,
  delivery: ReentrantMutex<()>,
}

impl Gate {
  #[inline]
  fn is_active(&self) -> bool { self.state.load(Ordering::Acquire) == ACTIVE }

  /// Moves the run from active to `to`, returns false if it already left
  /// the active state.
  fn close(&self, to: u8) -> bool {
    self
      .state
      .compare_exchange(ACTIVE, to, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  /// Closes the gate for a terminal notification. A terminal arriving after
  /// dispose is dropped, a second terminal on one run is a contract breach.
  fn terminate(&self) -> bool {
    let closed = self.close(TERMINATED);
    debug_assert!(
      closed || self.state.load(Ordering::Acquire) == DISPOSED,
      "second terminal notification on one run"
    );
    closed
  }
}

/// Outermost observer of a run.
pub struct Subscriber<O> {
  pub(crate) observer: O,
  pub(crate) gate: Arc<Gate>,
  pub(crate) subscription: SharedSubscription,
}

impl<O> Subscriber<O> {
  pub(crate) fn new(observer: O) -> (Self, SubscriptionHandle) {
    let gate = Arc::new(Gate::default());
    let subscription = SharedSubscription::default();
    let handle = SubscriptionHandle {
      gate: gate.clone(),
      subscription: subscription.clone(),
    };
    (Subscriber { observer, gate, subscription }, handle)
  }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let _delivery = self.gate.delivery.lock();
    if self.gate.is_active() {
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let Self { observer, gate, mut subscription } = self;
    {
      let _delivery = gate.delivery.lock();
      if gate.terminate() {
        observer.error(err);
      }
    }
    subscription.unsubscribe();
  }

  fn complete(self) {
    let Self { observer, gate, mut subscription } = self;
    {
      let _delivery = gate.delivery.lock();
      if gate.terminate() {
        observer.complete();
      }
    }
    subscription.unsubscribe();
  }

  #[inline]
  fn is_finished(&self) -> bool {
    !self.gate.is_active() || self.observer.is_finished()
  }
}

/// Handle returned by every `subscribe*` call.
///
/// `unsubscribe` is idempotent and may be called from any thread, including
/// from inside a callback of the same run. After it returns the consumer
/// receives nothing more. Once the run has completed or failed it is a
/// no-op.
#[derive(Clone, Debug)]
pub struct SubscriptionHandle {
  gate: Arc<Gate>,
  subscription: SharedSubscription,
}

impl SubscriptionHandle {
  /// Ties the resources returned by `actual_subscribe` to this run. If the
  /// run already ended they are released right away.
  pub(crate) fn hold<U>(self, unsub: U) -> Self
  where
    U: SubscriptionLike + Send + Sync + 'static,
  {
    self.subscription.add(unsub);
    self
  }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> {
    SubscriptionGuard(self)
  }
}

impl SubscriptionLike for SubscriptionHandle {
  fn unsubscribe(&mut self) {
    if self.gate.close(DISPOSED) {
      trace!("disposing subscription");
      self.subscription.unsubscribe();
      let _wait_in_flight = self.gate.delivery.lock();
    } else {
      trace!("subscription already released");
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { !self.gate.is_active() }
}
