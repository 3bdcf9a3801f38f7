use crate::prelude::*;
use std::{collections::HashSet, hash::Hash};

/// Forwards a value only when its key differs from the key of the last
/// forwarded value.
#[derive(Clone)]
pub struct DistinctUntilKeyChangedOp<S, F> {
  pub(crate) source: S,
  pub(crate) key: F,
}

impl<Item, Err, O, S, F, K> Observable<Item, Err, O>
  for DistinctUntilKeyChangedOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctUntilKeyChangedObserver<O, F, K>>,
  F: FnMut(&Item) -> K,
  K: PartialEq,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(DistinctUntilKeyChangedObserver {
      observer,
      key: self.key,
      last: None,
    })
  }
}

impl<Item, Err, S, F, K> ObservableExt<Item, Err>
  for DistinctUntilKeyChangedOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> K,
  K: PartialEq,
{
}

pub struct DistinctUntilKeyChangedObserver<O, F, K> {
  observer: O,
  key: F,
  last: Option<K>,
}

impl<Item, Err, O, F, K> Observer<Item, Err>
  for DistinctUntilKeyChangedObserver<O, F, K>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> K,
  K: PartialEq,
{
  fn next(&mut self, value: Item) {
    let key = (self.key)(&value);
    if self.last.as_ref() != Some(&key) {
      self.last = Some(key);
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// Suppresses a value equal to the last forwarded one.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for DistinctUntilChangedOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctUntilChangedObserver<O, Item>>,
  Item: PartialEq + Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DistinctUntilChangedObserver { observer, last: None })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for DistinctUntilChangedOp<S>
where
  S: ObservableExt<Item, Err>,
  Item: PartialEq + Clone,
{
}

pub struct DistinctUntilChangedObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for DistinctUntilChangedObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: PartialEq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() != Some(&value) {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

/// Forwards every value the first time it is seen in the run.
#[derive(Clone)]
pub struct DistinctOp<S> {
  pub(crate) source: S,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for DistinctOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctObserver<O, Item>>,
  Item: Eq + Hash + Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DistinctObserver { observer, seen: HashSet::new() })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for DistinctOp<S>
where
  S: ObservableExt<Item, Err>,
  Item: Eq + Hash + Clone,
{
}

pub struct DistinctObserver<O, Item> {
  observer: O,
  seen: HashSet<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for DistinctObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: Eq + Hash + Clone,
{
  fn next(&mut self, value: Item) {
    if self.seen.insert(value.clone()) {
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use bencher::{benchmark_group, Bencher};

  #[test]
  fn key_changed_with_identity() {
    let mut values = vec![];
    observable::from_iter(vec![5, 5, 3, 3, 5])
      .distinct_until_key_changed(|v| *v)
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![5, 3, 5]);
  }

  #[test]
  fn key_changed_by_field() {
    let mut values = vec![];
    observable::from_iter(vec![("n", 1), ("n", 2), ("ne", 3), ("n", 4)])
      .distinct_until_key_changed(|v| v.0)
      .subscribe(|v| values.push(v.1));
    assert_eq!(values, vec![1, 3, 4]);
  }

  #[test]
  fn key_state_is_per_run() {
    let source =
      observable::from_iter(vec![1, 1, 2]).distinct_until_key_changed(|v| *v);
    let mut values = vec![];
    source.clone().subscribe(|v| values.push(v));
    source.subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 1, 2]);
  }

  #[test]
  fn until_changed() {
    let mut values = vec![];
    observable::from_iter(vec![1, 2, 2, 1, 2, 3])
      .distinct_until_changed()
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 1, 2, 3]);
  }

  #[test]
  fn distinct_values() {
    let mut values = vec![];
    let mut completed = false;
    observable::from_iter(vec![1, 2, 2, 1, 3, 3, 4])
      .distinct()
      .subscribe_all(|v| values.push(v), |_| {}, || completed = true);
    assert_eq!(values, vec![1, 2, 3, 4]);
    assert!(completed);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_distinct);

  fn bench_distinct(b: &mut Bencher) {
    b.iter(|| {
      let mut sum = 0;
      observable::range(1000)
        .map(|v| v % 17)
        .distinct()
        .subscribe(|v| sum += v);
      sum
    });
  }
}
