use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
  any::Any,
  fmt::{Debug, Formatter},
  sync::Arc,
};

/// Handle to resources held by a run, returned from `actual_subscribe` and
/// composed into the [`SubscriptionHandle`] a consumer receives.
///
/// [`SubscriptionHandle`]: crate::subscriber::SubscriptionHandle
pub trait SubscriptionLike {
  /// Release the resources. Calling it again is a no-op.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

pub type BoxSubscription = Box<dyn SubscriptionLike + Send + Sync>;

/// Synchronous sources hold nothing once `actual_subscribe` returns.
impl SubscriptionLike for () {
  #[inline]
  fn unsubscribe(&mut self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

/// A cloneable set of teardowns. Unsubscribing any clone releases every
/// teardown added to any clone, exactly once.
#[derive(Clone, Debug, Default)]
pub struct SharedSubscription(Arc<Mutex<Inner<BoxSubscription>>>);

impl SharedSubscription {
  /// Adds a teardown. If this subscription is already closed the teardown is
  /// released immediately.
  pub fn add<S: SubscriptionLike + Send + Sync + 'static>(
    &self,
    subscription: S,
  ) {
    if self.is_same(&subscription) {
      return;
    }
    let rejected = self.0.lock().add(Box::new(subscription));
    if let Some(mut rejected) = rejected {
      rejected.unsubscribe();
    }
  }

  pub fn teardown_size(&self) -> usize { self.0.lock().teardown.len() }

  fn is_same(&self, other: &dyn Any) -> bool {
    if let Some(other) = other.downcast_ref::<Self>() {
      Arc::ptr_eq(&self.0, &other.0)
    } else {
      false
    }
  }
}

impl SubscriptionLike for SharedSubscription {
  fn unsubscribe(&mut self) {
    // Teardowns run outside the lock: a teardown may reach back into this
    // subscription through another clone.
    let teardown = self.0.lock().close();
    for mut v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.lock().closed }
}

struct Inner<T> {
  closed: bool,
  teardown: SmallVec<[T; 1]>,
}

impl<T> Debug for Inner<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Inner")
      .field("closed", &self.closed)
      .field("teardown_count", &self.teardown.len())
      .finish()
  }
}

impl<T: SubscriptionLike> Inner<T> {
  /// Returns the teardown back when already closed.
  fn add(&mut self, v: T) -> Option<T> {
    if self.closed {
      Some(v)
    } else {
      self.teardown.retain(|v| !v.is_closed());
      self.teardown.push(v);
      None
    }
  }

  fn close(&mut self) -> SmallVec<[T; 1]> {
    if self.closed {
      SmallVec::new()
    } else {
      self.closed = true;
      std::mem::take(&mut self.teardown)
    }
  }
}

impl<T> Default for Inner<T> {
  fn default() -> Self { Inner { closed: false, teardown: SmallVec::new() } }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) {
    let s = &mut **self;
    s.unsubscribe()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    let s = &**self;
    s.is_closed()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> {
    SubscriptionGuard(subscription)
  }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[derive(Clone, Default)]
  struct Counted(Arc<AtomicUsize>);

  impl SubscriptionLike for Counted {
    fn unsubscribe(&mut self) { self.0.fetch_add(1, Ordering::SeqCst); }
    fn is_closed(&self) -> bool { self.0.load(Ordering::SeqCst) > 0 }
  }

  #[test]
  fn add_remove_for_shared() {
    let mut subscription = SharedSubscription::default();
    let inner = SharedSubscription::default();
    subscription.add(inner.clone());
    assert_eq!(subscription.teardown_size(), 1);
    subscription.add(subscription.clone());
    assert_eq!(subscription.teardown_size(), 1);

    subscription.unsubscribe();
    assert!(inner.is_closed());
    assert_eq!(subscription.teardown_size(), 0);
  }

  #[test]
  fn teardown_runs_once() {
    let count = Counted::default();
    let mut subscription = SharedSubscription::default();
    subscription.add(count.clone());
    subscription.unsubscribe();
    subscription.unsubscribe();
    subscription.clone().unsubscribe();
    assert_eq!(count.0.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn add_after_close_releases_immediately() {
    let count = Counted::default();
    let mut subscription = SharedSubscription::default();
    subscription.unsubscribe();
    subscription.add(count.clone());
    assert_eq!(count.0.load(Ordering::SeqCst), 1);
    assert_eq!(subscription.teardown_size(), 0);
  }

  #[test]
  fn teardown_may_reenter() {
    let outer = SharedSubscription::default();
    let inner = SharedSubscription::default();
    inner.add(outer.clone());
    outer.add(inner.clone());
    outer.clone().unsubscribe();
    assert!(outer.is_closed());
    assert!(inner.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let count = Counted::default();
    {
      let _guard = SubscriptionGuard::new(count.clone());
    }
    assert_eq!(count.0.load(Ordering::SeqCst), 1);
  }
}
