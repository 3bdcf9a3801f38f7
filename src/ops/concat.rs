use crate::prelude::*;
use tracing::trace;

/// Forwards every value of `first`, then subscribes to `second` once `first`
/// completes.
///
/// The second stage is subscribed lazily and never if `first` fails or the
/// run is disposed before `first` completes.
#[derive(Clone)]
pub struct ConcatOp<A, B> {
  pub(crate) first: A,
  pub(crate) second: B,
}

impl<Item, Err, O, A, B> Observable<Item, Err, O> for ConcatOp<A, B>
where
  O: Observer<Item, Err>,
  A: Observable<Item, Err, ConcatObserver<O, B>>,
  B: Observable<Item, Err, O>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = SharedSubscription::default();
    let unsub = self.first.actual_subscribe(ConcatObserver {
      observer,
      second: self.second,
      subscription: subscription.clone(),
    });
    subscription.add(unsub);
    subscription
  }
}

impl<Item, Err, A, B> ObservableExt<Item, Err> for ConcatOp<A, B>
where
  A: ObservableExt<Item, Err>,
  B: ObservableExt<Item, Err>,
{
}

pub struct ConcatObserver<O, B> {
  observer: O,
  second: B,
  subscription: SharedSubscription,
}

impl<Item, Err, O, B> Observer<Item, Err> for ConcatObserver<O, B>
where
  O: Observer<Item, Err>,
  B: Observable<Item, Err, O>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    if self.subscription.is_closed() || self.observer.is_finished() {
      return;
    }
    trace!("first stage completed, subscribing the second");
    let unsub = self.second.actual_subscribe(self.observer);
    self.subscription.add(unsub);
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
