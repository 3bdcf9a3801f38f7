use crate::prelude::*;
use std::{convert::Infallible, iter::Repeat, ops::Range};

/// Creates an observable that replays the items of an iterator, in order,
/// inside the subscribing call.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Stops early once the downstream observer is finished, so an endless
/// iterator followed by `take(n)` yields `n` items.
///
/// ```
/// use telemetry_rx::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2, 3])
///   .subscribe(|v| println!("{},", v));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator,
{
  ObservableIter(iter)
}

/// Emits `0, 1, .., count - 1` and completes. `range(0)` completes at once.
pub fn range(count: usize) -> ObservableIter<Range<usize>> {
  from_iter(0..count)
}

/// Emits clones of `v` without end. Pair it with `take`.
///
/// ```
/// use telemetry_rx::prelude::*;
///
/// observable::repeat(123)
///   .take(3)
///   .subscribe(|v| println!("{},", v));
///
/// // print log:
/// // 123
/// // 123
/// // 123
/// ```
pub fn repeat<Item>(v: Item) -> ObservableIter<Repeat<Item>>
where
  Item: Clone,
{
  from_iter(std::iter::repeat(v))
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<O, Iter> Observable<Iter::Item, Infallible, O> for ObservableIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for v in self.0 {
      if observer.is_finished() {
        return;
      }
      observer.next(v);
    }
    observer.complete();
  }
}

impl<Iter> ObservableExt<Iter::Item, Infallible> for ObservableIter<Iter> where
  Iter: IntoIterator
{
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use bencher::{benchmark_group, Bencher};

  #[test]
  fn from_range() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::from_iter(0..100).subscribe_all(
      |_| hit_count += 1,
      |_| {},
      || completed = true,
    );

    assert_eq!(hit_count, 100);
    assert!(completed);
  }

  #[test]
  fn from_vec_in_order() {
    let mut values = vec![];
    observable::from_iter(vec!["a", "b", "c"]).subscribe(|v| values.push(v));
    assert_eq!(values, vec!["a", "b", "c"]);
  }

  #[test]
  fn range_counts_from_zero() {
    let mut values = vec![];
    let mut completed = false;
    observable::range(4).subscribe_all(
      |v| values.push(v),
      |_| {},
      || completed = true,
    );
    assert_eq!(values, vec![0, 1, 2, 3]);
    assert!(completed);
  }

  #[test]
  fn empty_range_completes() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::range(0).subscribe_all(
      |_| hit_count += 1,
      |_| {},
      || completed = true,
    );
    assert_eq!(hit_count, 0);
    assert!(completed);
  }

  #[test]
  fn repeat_stops_at_take() {
    let mut hit_count = 0;
    let mut completed = false;
    observable::repeat(123).take(5).subscribe_all(
      |v| {
        hit_count += 1;
        assert_eq!(123, v);
      },
      |_| {},
      || completed = true,
    );
    assert_eq!(5, hit_count);
    assert!(completed);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_from_iter);

  fn bench_from_iter(b: &mut Bencher) { b.iter(from_range); }
}
