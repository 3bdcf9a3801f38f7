use crate::prelude::*;

/// Creates an observable that calls `factory` on every subscription and
/// subscribes to the observable it returns.
///
/// Per-run state such as a seeded random generator belongs in the factory,
/// so every run starts from its own state.
///
/// ```rust
/// use telemetry_rx::prelude::*;
///
/// observable::defer(|| {
///   println!("Hi!");
///   observable::of("Hello!")
/// })
/// .subscribe(move |v| println!("{}", v));
/// // Prints: Hi!\nHello!\n
/// ```
pub fn defer<F, S>(factory: F) -> DeferObservable<F>
where
  F: FnOnce() -> S,
{
  DeferObservable(factory)
}

#[derive(Clone)]
pub struct DeferObservable<F>(F);

impl<F, S, Item, Err, O> Observable<Item, Err, O> for DeferObservable<F>
where
  F: FnOnce() -> S,
  S: Observable<Item, Err, O>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    (self.0)().actual_subscribe(observer)
  }
}

impl<F, S, Item, Err> ObservableExt<Item, Err> for DeferObservable<F>
where
  F: FnOnce() -> S,
  S: ObservableExt<Item, Err>,
{
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  #[test]
  fn factory_runs_per_subscription() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();
    let deferred = observable::defer(move || {
      let run = c_calls.fetch_add(1, Ordering::SeqCst);
      observable::from_iter(vec![run; 2])
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    deferred.clone().subscribe(move |v| c_seen.lock().unwrap().push(v));
    let c_seen = seen.clone();
    deferred.subscribe(move |v| c_seen.lock().unwrap().push(v));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(*seen.lock().unwrap(), vec![0, 0, 1, 1]);
  }
}
