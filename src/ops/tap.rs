use crate::prelude::*;
use std::marker::PhantomData;

#[derive(Clone)]
pub struct TapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for TapOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TapObserver<O, F>>,
  F: FnMut(&Item),
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let func = self.func;
    self.source.actual_subscribe(TapObserver { observer, func })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for TapOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item),
{
}

pub struct TapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for TapObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item),
{
  fn next(&mut self, value: Item) {
    (self.func)(&value);
    self.observer.next(value)
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[derive(Clone)]
pub struct TryTapOp<S, F, Err> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _m: PhantomData<fn(Err)>,
}

impl<Item, Err, E, O, S, F> Observable<Item, E, O> for TryTapOp<S, F, Err>
where
  O: Observer<Item, E>,
  S: Observable<Item, Err, TryTapObserver<O, F, E>>,
  F: FnMut(&Item) -> Result<(), E>,
  Err: Into<E>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SharedSubscription::default();
    let unsub = self.source.actual_subscribe(TryTapObserver {
      observer: Some(observer),
      func: self.func,
      upstream: upstream.clone(),
      _e: PhantomData,
    });
    upstream.add(unsub);
    upstream
  }
}

impl<Item, Err, E, S, F> ObservableExt<Item, E> for TryTapOp<S, F, Err>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> Result<(), E>,
{
}

pub struct TryTapObserver<O, F, E> {
  observer: Option<O>,
  func: F,
  upstream: SharedSubscription,
  _e: PhantomData<fn(E)>,
}

impl<Item, Err, E, O, F> Observer<Item, Err> for TryTapObserver<O, F, E>
where
  O: Observer<Item, E>,
  F: FnMut(&Item) -> Result<(), E>,
  Err: Into<E>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.func)(&value) {
      Ok(()) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(value)
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

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn primitive_type() {
    let mut i = 0;
    let mut v = 0;
    observable::from_iter(100..101)
      .tap(|i| v = *i)
      .subscribe(|v| i += v);
    assert_eq!(i, 100);
    assert_eq!(v, 100);
  }

  #[test]
  fn sees_every_value_before_downstream() {
    let mut log = vec![];
    let mut tapped = vec![];
    observable::range(3)
      .tap(|v| tapped.push(*v))
      .filter(|v| *v != 1)
      .subscribe(|v| log.push(v));

    assert_eq!(tapped, vec![0, 1, 2]);
    assert_eq!(log, vec![0, 2]);
  }

  #[test]
  fn try_tap_failure_terminates() {
    let mut values = vec![];
    let mut error = None;
    observable::from_iter(vec![1, 2, 3, 4])
      .try_tap(|v| {
        if *v == 3 {
          Err(SequenceError::producer_fault("write failed"))
        } else {
          Ok(())
        }
      })
      .subscribe_err(|v| values.push(v), |e| error = Some(e));

    assert_eq!(values, vec![1, 2]);
    assert_eq!(error, Some(SequenceError::producer_fault("write failed")));
  }
}
