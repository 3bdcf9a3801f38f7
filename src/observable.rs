use crate::{
  ops::{
    complete_status::{CompleteStatus, StatusOp},
    concat::ConcatOp,
    count::CountOp,
    distinct::{DistinctOp, DistinctUntilChangedOp, DistinctUntilKeyChangedOp},
    filter::FilterOp,
    map::{MapOp, TryMapOp},
    map_err::MapErrOp,
    take::TakeOp,
    tap::{TapOp, TryTapOp},
    zip::ZipOp,
  },
  prelude::*,
};
use std::{fmt::Debug, hash::Hash, marker::PhantomData, sync::Arc};

mod create;
pub use create::*;
mod defer;
pub use defer::*;
mod from_iter;
pub use from_iter::*;
mod interval;
pub use interval::*;
mod trivial;
pub use trivial::*;

/// A sequence that pushes values of type `Item` and may fail with `Err`.
///
/// `actual_subscribe` starts one independent run delivering into `observer`
/// and returns the resources that run holds. Sources are cold: subscribing
/// a clone starts a fresh production from the beginning.
pub trait Observable<Item, Err, O> {
  type Unsub: SubscriptionLike + Send + Sync + 'static;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// Operators and subscribe entry points shared by every sequence.
pub trait ObservableExt<Item, Err>: Sized {
  /// Transforms every value with `f`.
  #[inline]
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp { source: self, func: f, _m: PhantomData }
  }

  /// Transforms every value with a fallible `f`.
  ///
  /// The first `Err` returned by `f` terminates the run with that error and
  /// releases the upstream. Upstream errors are converted with `Into`.
  #[inline]
  fn try_map<B, E, F>(self, f: F) -> TryMapOp<Self, F, Item, Err>
  where
    F: FnMut(Item) -> Result<B, E>,
    Err: Into<E>,
  {
    TryMapOp { source: self, func: f, _m: PhantomData }
  }

  /// Converts the error type of the sequence.
  #[inline]
  fn map_err<E, F>(self, f: F) -> MapErrOp<Self, F, Err>
  where
    F: FnOnce(Err) -> E,
  {
    MapErrOp { source: self, func: f, _m: PhantomData }
  }

  /// Forwards only the values for which `filter` returns `true`.
  #[inline]
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp { source: self, filter }
  }

  /// Forwards the first `count` values, then completes and releases the
  /// upstream.
  ///
  /// `take(0)` completes without subscribing to the source at all.
  #[inline]
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp { source: self, count } }

  /// Runs `f` on every value before forwarding it unchanged.
  #[inline]
  fn tap<F>(self, f: F) -> TapOp<Self, F>
  where
    F: FnMut(&Item),
  {
    TapOp { source: self, func: f }
  }

  /// Runs a fallible side effect on every value. A failure terminates the
  /// run with the returned error.
  #[inline]
  fn try_tap<E, F>(self, f: F) -> TryTapOp<Self, F, Err>
  where
    F: FnMut(&Item) -> Result<(), E>,
    Err: Into<E>,
  {
    TryTapOp { source: self, func: f, _m: PhantomData }
  }

  /// Suppresses a value whose key equals the key of the previously
  /// forwarded value. The first value is always forwarded.
  #[inline]
  fn distinct_until_key_changed<K, F>(
    self,
    key: F,
  ) -> DistinctUntilKeyChangedOp<Self, F>
  where
    F: FnMut(&Item) -> K,
    K: PartialEq,
  {
    DistinctUntilKeyChangedOp { source: self, key }
  }

  /// Suppresses consecutive duplicates.
  #[inline]
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self>
  where
    Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp { source: self }
  }

  /// Forwards a value only the first time it is seen in this run.
  #[inline]
  fn distinct(self) -> DistinctOp<Self>
  where
    Item: Eq + Hash + Clone,
  {
    DistinctOp { source: self }
  }

  /// Emits the number of values the source produced once it completes.
  #[inline]
  fn count(self) -> CountOp<Self, Item> {
    CountOp { source: self, _m: PhantomData }
  }

  /// Pairs the nth value of this sequence with the nth value of `other`
  /// and emits `combine(a, b)`.
  ///
  /// Completes once a completed side has no buffered values left. An error
  /// from either side is forwarded at once and the other side is released.
  #[inline]
  fn zip<B, ItemB, Out, F>(
    self,
    other: B,
    combine: F,
  ) -> ZipOp<Self, B, F, Item, ItemB>
  where
    B: ObservableExt<ItemB, Err>,
    F: FnMut(Item, ItemB) -> Out,
  {
    ZipOp { a: self, b: other, combine, _m: PhantomData }
  }

  /// Forwards this sequence, then subscribes to `other` once this one
  /// completes.
  #[inline]
  fn concat<B>(self, other: B) -> ConcatOp<Self, B>
  where
    B: ObservableExt<Item, Err>,
  {
    ConcatOp { first: self, second: other }
  }

  /// Pairs the sequence with a [`CompleteStatus`] that can be blocked on
  /// until the run terminates.
  #[inline]
  fn complete_status(self) -> (StatusOp<Self>, Arc<CompleteStatus>) {
    crate::ops::complete_status::complete_status(self)
  }

  /// Subscribes with a `next` closure. Only available for sequences that
  /// cannot fail.
  fn subscribe<N>(self, next: N) -> SubscriptionHandle
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, Subscriber<FnMutObserver<N>>>,
  {
    self.subscribe_with(FnMutObserver(next))
  }

  /// Subscribes with `next` and `error` closures.
  fn subscribe_err<N, E>(self, next: N, error: E) -> SubscriptionHandle
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    Self: Observable<Item, Err, Subscriber<ObserverErr<N, E>>>,
  {
    self.subscribe_with(ObserverErr { next, error })
  }

  /// Subscribes with `next`, `error` and `complete` closures.
  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionHandle
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, Subscriber<ObserverAll<N, E, C>>>,
  {
    self.subscribe_with(ObserverAll { next, error, complete })
  }

  /// Subscribes with a custom observer.
  fn subscribe_with<O>(self, observer: O) -> SubscriptionHandle
  where
    Self: Observable<Item, Err, Subscriber<O>>,
  {
    let (subscriber, handle) = Subscriber::new(observer);
    tracing::trace!("subscribing");
    let unsub = self.actual_subscribe(subscriber);
    handle.hold(unsub)
  }

  /// Starts the sequence for its side effects only.
  ///
  /// Values are dropped. An error that reaches the end of the chain is
  /// logged through `tracing`.
  fn run(self) -> SubscriptionHandle
  where
    Err: Debug,
    Self: Observable<Item, Err, Subscriber<DrainObserver>>,
  {
    self.subscribe_with(DrainObserver)
  }
}
