use crate::prelude::*;
use tracing::trace;

/// Emits only the first `count` values emitted by the source.
///
/// If the source emits fewer than `count` values then all of its values are
/// emitted and the source's completion is forwarded. Otherwise the run
/// completes on the `count`th value and the upstream is released, so an
/// endless source such as `repeat` or `interval` stops producing.
#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeObserver<O>>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SharedSubscription::default();
    if self.count == 0 {
      observer.complete();
      return upstream;
    }
    let unsub = self.source.actual_subscribe(TakeObserver {
      observer: Some(observer),
      count: self.count,
      hits: 0,
      upstream: upstream.clone(),
    });
    upstream.add(unsub);
    upstream
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct TakeObserver<O> {
  observer: Option<O>,
  count: usize,
  hits: usize,
  upstream: SharedSubscription,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.observer.as_mut() {
      self.hits += 1;
      observer.next(value);
      if self.hits == self.count {
        if let Some(observer) = self.observer.take() {
          observer.complete();
        }
        trace!(count = self.count, "take reached its count");
        self.upstream.unsubscribe();
      }
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err)
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete()
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}
