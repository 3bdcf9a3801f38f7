use crate::prelude::*;
use std::{convert::Infallible, marker::PhantomData};

/// Creates an observable that emits `v` and completes.
pub fn of<Item>(v: Item) -> OfObservable<Item> { OfObservable(v) }

#[derive(Clone)]
pub struct OfObservable<Item>(Item);

impl<Item, O> Observable<Item, Infallible, O> for OfObservable<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    observer.next(self.0);
    observer.complete();
  }
}

impl<Item> ObservableExt<Item, Infallible> for OfObservable<Item> {}

/// Creates an observable that produces no values and completes at once.
///
/// ```
/// use telemetry_rx::prelude::*;
///
/// observable::empty()
///   .subscribe(|v: i32| println!("{},", v));
///
/// // Result: no thing printed
/// ```
pub fn empty<Item>() -> EmptyObservable<Item> { EmptyObservable(PhantomData) }

pub struct EmptyObservable<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for EmptyObservable<Item> {
  fn clone(&self) -> Self { EmptyObservable(PhantomData) }
}

impl<Item, O> Observable<Item, Infallible, O> for EmptyObservable<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

impl<Item> ObservableExt<Item, Infallible> for EmptyObservable<Item> {}

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw_err<Item, Err>(e: Err) -> ThrowObservable<Item, Err> {
  ThrowObservable(e, PhantomData)
}

pub struct ThrowObservable<Item, Err>(Err, PhantomData<fn() -> Item>);

impl<Item, Err: Clone> Clone for ThrowObservable<Item, Err> {
  fn clone(&self) -> Self { ThrowObservable(self.0.clone(), PhantomData) }
}

impl<Item, Err, O> Observable<Item, Err, O> for ThrowObservable<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    observer.error(self.0)
  }
}

impl<Item, Err> ObservableExt<Item, Err> for ThrowObservable<Item, Err> {}
