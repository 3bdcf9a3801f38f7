use crate::prelude::*;
use std::marker::PhantomData;

#[derive(Clone)]
pub struct MapOp<S, M, Item> {
  pub(crate) source: S,
  pub(crate) func: M,
  pub(crate) _m: PhantomData<fn(Item)>,
}

impl<Item, B, Err, O, S, M> Observable<B, Err, O> for MapOp<S, M, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, M>>,
  M: FnMut(Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let map = self.func;
    self.source.actual_subscribe(MapObserver { observer, map })
  }
}

impl<Item, B, Err, S, M> ObservableExt<B, Err> for MapOp<S, M, Item>
where
  S: ObservableExt<Item, Err>,
  M: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, M> {
  observer: O,
  map: M,
}

impl<Item, B, Err, O, M> Observer<Item, Err> for MapObserver<O, M>
where
  O: Observer<B, Err>,
  M: FnMut(Item) -> B,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next((self.map)(value)) }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[derive(Clone)]
pub struct TryMapOp<S, M, Item, Err> {
  pub(crate) source: S,
  pub(crate) func: M,
  pub(crate) _m: PhantomData<fn(Item, Err)>,
}

impl<Item, B, Err, E, O, S, M> Observable<B, E, O> for TryMapOp<S, M, Item, Err>
where
  O: Observer<B, E>,
  S: Observable<Item, Err, TryMapObserver<O, M>>,
  M: FnMut(Item) -> Result<B, E>,
  Err: Into<E>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SharedSubscription::default();
    let unsub = self.source.actual_subscribe(TryMapObserver {
      observer: Some(observer),
      func: self.func,
      upstream: upstream.clone(),
    });
    upstream.add(unsub);
    upstream
  }
}

impl<Item, B, Err, E, S, M> ObservableExt<B, E> for TryMapOp<S, M, Item, Err>
where
  S: ObservableExt<Item, Err>,
  M: FnMut(Item) -> Result<B, E>,
{
}

pub struct TryMapObserver<O, M> {
  observer: Option<O>,
  func: M,
  upstream: SharedSubscription,
}

impl<Item, B, Err, E, O, M> Observer<Item, Err> for TryMapObserver<O, M>
where
  O: Observer<B, E>,
  M: FnMut(Item) -> Result<B, E>,
  Err: Into<E>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.func)(value) {
      Ok(v) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(v)
        }
      }
      Err(e) => {
        if let Some(observer) = self.observer.take() {
          observer.error(e);
        }
        self.upstream.unsubscribe();
      }
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err.into())
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
