use crate::prelude::*;
use std::marker::PhantomData;

#[derive(Clone)]
pub struct MapErrOp<S, M, Err> {
  pub(crate) source: S,
  pub(crate) func: M,
  pub(crate) _m: PhantomData<fn(Err)>,
}

impl<Item, Err, E, O, S, M> Observable<Item, E, O> for MapErrOp<S, M, Err>
where
  O: Observer<Item, E>,
  S: Observable<Item, Err, MapErrObserver<O, M>>,
  M: FnOnce(Err) -> E,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let map = self.func;
    self.source.actual_subscribe(MapErrObserver { observer, map })
  }
}

impl<Item, Err, E, S, M> ObservableExt<Item, E> for MapErrOp<S, M, Err>
where
  S: ObservableExt<Item, Err>,
  M: FnOnce(Err) -> E,
{
}

pub struct MapErrObserver<O, M> {
  observer: O,
  map: M,
}

impl<Item, Err, E, O, M> Observer<Item, Err> for MapErrObserver<O, M>
where
  O: Observer<Item, E>,
  M: FnOnce(Err) -> E,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) { self.observer.error((self.map)(err)) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
