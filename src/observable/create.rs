use crate::prelude::*;
use std::marker::PhantomData;

/// Creates an observable from a closure that pushes values through an
/// [`Emitter`].
///
/// The closure runs once per subscription, inside the subscribing call.
/// Emissions after `error` or `complete`, or after the run was disposed, are
/// dropped. This is the way for a producer to report a failure of its own:
///
/// ```rust
/// use telemetry_rx::prelude::*;
///
/// observable::create(|emitter: &mut dyn Emitter<f64, SequenceError>| {
///   emitter.next(21.5);
///   emitter.error(SequenceError::producer_fault("sensor offline"));
/// })
/// .subscribe_err(|v| println!("{}", v), |e| println!("{}", e));
/// ```
pub fn create<F, Item, Err>(subscribe: F) -> CreateObservable<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>),
{
  CreateObservable { subscribe, _p: PhantomData }
}

pub struct CreateObservable<F, Item, Err> {
  subscribe: F,
  _p: PhantomData<fn() -> (Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for CreateObservable<F, Item, Err> {
  fn clone(&self) -> Self {
    CreateObservable { subscribe: self.subscribe.clone(), _p: PhantomData }
  }
}

impl<F, Item, Err, O> Observable<Item, Err, O>
  for CreateObservable<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>),
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let mut emitter = Some(observer);
    (self.subscribe)(&mut emitter);
  }
}

impl<F, Item, Err> ObservableExt<Item, Err>
  for CreateObservable<F, Item, Err>
where
  F: FnOnce(&mut dyn Emitter<Item, Err>),
{
}
