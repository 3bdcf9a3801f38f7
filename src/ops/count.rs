use crate::prelude::*;
use std::marker::PhantomData;

/// Emits how many values the source produced, once the source completes.
#[derive(Clone)]
pub struct CountOp<S, Item> {
  pub(crate) source: S,
  pub(crate) _m: PhantomData<fn(Item)>,
}

impl<Item, Err, O, S> Observable<usize, Err, O> for CountOp<S, Item>
where
  O: Observer<usize, Err>,
  S: Observable<Item, Err, CountObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(CountObserver { observer, count: 0 })
  }
}

impl<Item, Err, S> ObservableExt<usize, Err> for CountOp<S, Item> where
  S: ObservableExt<Item, Err>
{
}

pub struct CountObserver<O> {
  observer: O,
  count: usize,
}

impl<Item, Err, O> Observer<Item, Err> for CountObserver<O>
where
  O: Observer<usize, Err>,
{
  #[inline]
  fn next(&mut self, _: Item) { self.count += 1; }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    self.observer.next(self.count);
    self.observer.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
