//! Observer trait and implementations
//!
//! An observer is the consumer end of a run. It receives values through
//! `next` and exactly one terminal notification through `error` or
//! `complete`.

use std::{convert::Infallible, fmt::Debug};

/// The consumer of a sequence.
pub trait Observer<Item, Err> {
  /// Receive the next value of the sequence.
  fn next(&mut self, value: Item);

  /// Receive the error that terminates the run.
  ///
  /// Consumes the observer, nothing can be delivered after an error.
  fn error(self, err: Err);

  /// Receive the completion of the run.
  ///
  /// Consumes the observer, nothing can be delivered after completion.
  fn complete(self);

  /// Returns `true` once the observer will not accept more values.
  ///
  /// Sources that produce in a loop (`from_iter`, `repeat`, `interval`)
  /// check it before every emission so a downstream `take` stops them.
  fn is_finished(&self) -> bool;
}

/// Emission facade handed to `create` closures.
///
/// Every method takes `&mut self`, so the closure can be written against
/// `&mut dyn Emitter` without knowing the concrete observer chain. Calls
/// made after a terminal notification are ignored.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
  fn is_finished(&self) -> bool;
}

impl<Item, Err, O> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self {
      observer.next(value)
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self {
      observer.error(err)
    }
  }

  fn complete(self) {
    if let Some(observer) = self {
      observer.complete()
    }
  }

  fn is_finished(&self) -> bool {
    self.as_ref().map_or(true, |o| o.is_finished())
  }
}

impl<Item, Err, O> Emitter<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    <Self as Observer<Item, Err>>::next(self, value)
  }

  fn error(&mut self, err: Err) {
    <Self as Observer<Item, Err>>::error(self.take(), err)
  }

  fn complete(&mut self) {
    <Self as Observer<Item, Err>>::complete(self.take())
  }

  fn is_finished(&self) -> bool {
    <Self as Observer<Item, Err>>::is_finished(self)
  }
}

/// Observer built from a single `next` closure, for sequences that cannot
/// fail.
#[derive(Clone)]
pub struct FnMutObserver<N>(pub N);

impl<Item, N> Observer<Item, Infallible> for FnMutObserver<N>
where
  N: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value) }

  fn error(self, err: Infallible) { match err {} }

  fn complete(self) {}

  #[inline]
  fn is_finished(&self) -> bool { false }
}

/// Observer built from a `next` and an `error` closure.
#[derive(Clone)]
pub struct ObserverErr<N, E> {
  pub(crate) next: N,
  pub(crate) error: E,
}

impl<Item, Err, N, E> Observer<Item, Err> for ObserverErr<N, E>
where
  N: FnMut(Item),
  E: FnOnce(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  fn error(self, err: Err) { (self.error)(err) }

  fn complete(self) {}

  #[inline]
  fn is_finished(&self) -> bool { false }
}

/// Observer built from `next`, `error` and `complete` closures.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  pub(crate) next: N,
  pub(crate) error: E,
  pub(crate) complete: C,
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  fn error(self, err: Err) { (self.error)(err) }

  fn complete(self) { (self.complete)() }

  #[inline]
  fn is_finished(&self) -> bool { false }
}

/// Observer used by `run()`: values are dropped, completion is traced and an
/// error is logged.
#[derive(Clone, Copy, Default)]
pub struct DrainObserver;

impl<Item, Err: Debug> Observer<Item, Err> for DrainObserver {
  #[inline]
  fn next(&mut self, _: Item) {}

  fn error(self, err: Err) {
    tracing::error!(error = ?err, "sequence terminated with an error");
  }

  fn complete(self) { tracing::trace!("sequence completed"); }

  #[inline]
  fn is_finished(&self) -> bool { false }
}
