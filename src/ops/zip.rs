use crate::prelude::*;
use std::{collections::VecDeque, marker::PhantomData};
use tracing::trace;

/// Pairs the values of two sequences by position.
///
/// Values that arrive before their partner are buffered without bound. The
/// run completes as soon as one side has completed and its buffer is
/// drained, and the other side is released at that point. An error from
/// either side ends the run the same way.
#[derive(Clone)]
pub struct ZipOp<A, B, F, ItemA, ItemB> {
  pub(crate) a: A,
  pub(crate) b: B,
  pub(crate) combine: F,
  pub(crate) _m: PhantomData<fn(ItemA, ItemB)>,
}

impl<ItemA, ItemB, Out, Err, O, A, B, F> Observable<Out, Err, O>
  for ZipOp<A, B, F, ItemA, ItemB>
where
  O: Observer<Out, Err>,
  A: Observable<ItemA, Err, ZipAObserver<O, F, ItemA, ItemB>>,
  B: Observable<ItemB, Err, ZipBObserver<O, F, ItemA, ItemB>>,
  F: FnMut(ItemA, ItemB) -> Out,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let all = SharedSubscription::default();
    let state = MutArc::own(ZipState {
      observer: Some(observer),
      combine: self.combine,
      a: VecDeque::new(),
      b: VecDeque::new(),
      a_done: false,
      b_done: false,
    });

    let side = ZipSide { state: state.clone(), all: all.clone() };
    let unsub = self.a.actual_subscribe(ZipAObserver(side));
    all.add(unsub);
    if !all.is_closed() {
      let side = ZipSide { state, all: all.clone() };
      let unsub = self.b.actual_subscribe(ZipBObserver(side));
      all.add(unsub);
    }
    all
  }
}

impl<ItemA, ItemB, Out, Err, A, B, F> ObservableExt<Out, Err>
  for ZipOp<A, B, F, ItemA, ItemB>
where
  A: ObservableExt<ItemA, Err>,
  B: ObservableExt<ItemB, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
}

struct ZipState<O, F, A, B> {
  observer: Option<O>,
  combine: F,
  a: VecDeque<A>,
  b: VecDeque<B>,
  a_done: bool,
  b_done: bool,
}

impl<O, F, A, B> ZipState<O, F, A, B> {
  fn drained(&self) -> bool {
    (self.a_done && self.a.is_empty()) || (self.b_done && self.b.is_empty())
  }
}

struct ZipSide<O, F, A, B> {
  state: MutArc<ZipState<O, F, A, B>>,
  all: SharedSubscription,
}

impl<O, F, A, B> ZipSide<O, F, A, B> {
  /// Hands the downstream observer to `deliver` outside the lock, then
  /// releases both sides.
  fn terminate(&mut self, deliver: impl FnOnce(O)) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      deliver(observer);
    }
    self.all.unsubscribe();
  }

  fn is_finished<Out, Err>(&self) -> bool
  where
    O: Observer<Out, Err>,
  {
    let state = self.state.rc_deref();
    state.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}

pub struct ZipAObserver<O, F, A, B>(ZipSide<O, F, A, B>);

pub struct ZipBObserver<O, F, A, B>(ZipSide<O, F, A, B>);

impl<ItemA, ItemB, Out, Err, O, F> Observer<ItemA, Err>
  for ZipAObserver<O, F, ItemA, ItemB>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
  fn next(&mut self, value: ItemA) {
    let drained = {
      let mut state = self.0.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      match state.b.pop_front() {
        Some(b) => {
          let v = (state.combine)(value, b);
          if let Some(observer) = state.observer.as_mut() {
            observer.next(v);
          }
        }
        None => {
          state.a.push_back(value);
          trace!(buffered = state.a.len(), "zip holding left value");
        }
      }
      state.drained()
    };
    if drained {
      self.0.terminate(|o| o.complete());
    }
  }

  fn error(self, err: Err) {
    let mut side = self.0;
    side.terminate(|o| o.error(err));
  }

  fn complete(self) {
    let mut side = self.0;
    let drained = {
      let mut state = side.state.rc_deref_mut();
      state.a_done = true;
      state.a.is_empty()
    };
    if drained {
      side.terminate(|o| o.complete());
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.0.is_finished::<Out, Err>() }
}

impl<ItemA, ItemB, Out, Err, O, F> Observer<ItemB, Err>
  for ZipBObserver<O, F, ItemA, ItemB>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
  fn next(&mut self, value: ItemB) {
    let drained = {
      let mut state = self.0.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      match state.a.pop_front() {
        Some(a) => {
          let v = (state.combine)(a, value);
          if let Some(observer) = state.observer.as_mut() {
            observer.next(v);
          }
        }
        None => {
          state.b.push_back(value);
          trace!(buffered = state.b.len(), "zip holding right value");
        }
      }
      state.drained()
    };
    if drained {
      self.0.terminate(|o| o.complete());
    }
  }

  fn error(self, err: Err) {
    let mut side = self.0;
    side.terminate(|o| o.error(err));
  }

  fn complete(self) {
    let mut side = self.0;
    let drained = {
      let mut state = side.state.rc_deref_mut();
      state.b_done = true;
      state.b.is_empty()
    };
    if drained {
      side.terminate(|o| o.complete());
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.0.is_finished::<Out, Err>() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn pairs_by_position() {
    let mut values = vec![];
    let mut completed = 0;
    observable::range(3)
      .zip(observable::range(5), |a, b| a + b)
      .subscribe_all(|v| values.push(v), |_| {}, || completed += 1);

    assert_eq!(values, vec![0, 2, 4]);
    assert_eq!(completed, 1);
  }

  #[test]
  fn shorter_right_side() {
    let mut values = vec![];
    observable::from_iter(vec!['a', 'b', 'c'])
      .zip(observable::of(1), |c, n| (c, n))
      .subscribe(|v| values.push(v));

    assert_eq!(values, vec![('a', 1)]);
  }

  #[test]
  fn empty_side_completes_at_once() {
    let mut hits = 0;
    let mut completed = false;
    observable::empty::<i32>()
      .zip(observable::repeat(1), |a, b| a + b)
      .subscribe_all(|_| hits += 1, |_| {}, || completed = true);

    assert_eq!(hits, 0);
    assert!(completed);
  }

  #[test]
  fn zip_on_virtual_time() {
    let scheduler = TestScheduler::new();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    let fast =
      observable::interval(Duration::from_millis(10), scheduler.clone());
    let slow =
      observable::interval(Duration::from_millis(25), scheduler.clone())
        .take(2);
    fast.zip(slow, |a, b| (a, b)).subscribe_all(
      move |v| c_values.borrow_mut().push(v),
      |_| {},
      move || c_completed.set(true),
    );

    scheduler.advance_by(Duration::from_millis(30));
    assert_eq!(*values.borrow(), vec![(0, 0)]);
    scheduler.flush();

    assert_eq!(*values.borrow(), vec![(0, 0), (1, 1)]);
    assert!(completed.get());
    assert_eq!(scheduler.now(), Duration::from_millis(50));
  }

  #[test]
  fn error_releases_other_side() {
    let scheduler = TestScheduler::new();
    let ticks = Rc::new(Cell::new(0));
    let c_ticks = ticks.clone();
    let error = Rc::new(RefCell::new(None));
    let c_error = error.clone();

    observable::interval(Duration::from_millis(10), scheduler.clone())
      .tap(move |_| c_ticks.set(c_ticks.get() + 1))
      .map_err(SequenceError::from)
      .zip(
        observable::throw_err(SequenceError::producer_fault("no humidity")),
        |t, h: f64| t as f64 + h,
      )
      .subscribe_err(|_| {}, move |e| *c_error.borrow_mut() = Some(e));

    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(
      *error.borrow(),
      Some(SequenceError::producer_fault("no humidity"))
    );
    assert_eq!(ticks.get(), 0);
  }

  #[cfg(feature = "futures-scheduler")]
  #[test]
  fn thread_pool_sides_are_serialized() {
    use std::sync::{
      atomic::{AtomicBool, AtomicUsize, Ordering},
      Arc, Mutex,
    };

    let scheduler = ThreadPoolScheduler::default();
    let pairs = Arc::new(Mutex::new(vec![]));
    let in_callback = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let (c_pairs, c_in_callback, c_overlaps) =
      (pairs.clone(), in_callback.clone(), overlaps.clone());

    let (source, status) =
      observable::interval(Duration::from_millis(1), scheduler.clone())
        .zip(
          observable::interval(Duration::from_millis(3), scheduler),
          |a, b| (a, b),
        )
        .take(30)
        .complete_status();
    source.subscribe(move |pair| {
      if c_in_callback.swap(true, Ordering::SeqCst) {
        c_overlaps.fetch_add(1, Ordering::SeqCst);
      }
      std::thread::sleep(Duration::from_micros(50));
      c_pairs.lock().unwrap().push(pair);
      c_in_callback.store(false, Ordering::SeqCst);
    });
    CompleteStatus::wait_for_end(status.clone());

    assert!(status.is_completed());
    let pairs = pairs.lock().unwrap();
    assert_eq!(pairs.len(), 30);
    assert!(pairs.iter().enumerate().all(|(i, &(a, b))| a == i && b == i));
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
  }
}
