use crate::prelude::*;
use std::convert::Infallible;

/// Creates an observable which emits `0, 1, 2, ..` every `period`, the first
/// value one `period` after subscribing.
///
/// Each subscription schedules its own timer task. Disposing the
/// subscription cancels that task.
pub fn interval<S>(period: Duration, scheduler: S) -> IntervalObservable<S> {
  IntervalObservable { scheduler, period, delay: None }
}

/// Creates an observable which emits its first value at `at` and then every
/// `period`. An `at` in the past fires immediately.
pub fn interval_at<S>(
  at: Instant,
  period: Duration,
  scheduler: S,
) -> IntervalObservable<S> {
  let delay = at.saturating_duration_since(Instant::now());
  IntervalObservable { scheduler, period, delay: Some(delay) }
}

#[derive(Clone)]
pub struct IntervalObservable<S> {
  scheduler: S,
  period: Duration,
  delay: Option<Duration>,
}

/// Per-run state of an interval timer.
pub struct IntervalState<O> {
  observer: O,
  seq: usize,
  period: Duration,
}

impl<S, O> Observable<usize, Infallible, O> for IntervalObservable<S>
where
  O: Observer<usize, Infallible>,
  S: Scheduler<IntervalState<O>>,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Self { scheduler, period, delay } = self;
    let state = IntervalState { observer, seq: 0, period };
    let delay = Some(delay.unwrap_or(period));
    scheduler.schedule(Task::new(state, interval_task), delay)
  }
}

impl<S> ObservableExt<usize, Infallible> for IntervalObservable<S> {}

fn interval_task<O>(state: &mut IntervalState<O>) -> TaskState
where
  O: Observer<usize, Infallible>,
{
  if state.observer.is_finished() {
    return TaskState::Finished;
  }
  state.observer.next(state.seq);
  state.seq += 1;
  if state.observer.is_finished() {
    TaskState::Finished
  } else {
    TaskState::Sleeping(state.period)
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn ticks_on_virtual_time() {
    let scheduler = TestScheduler::new();
    let ticks = Arc::new(Mutex::new(vec![]));
    let c_ticks = ticks.clone();
    let mut handle =
      observable::interval(Duration::from_millis(10), scheduler.clone())
        .subscribe(move |v| c_ticks.lock().unwrap().push(v));

    scheduler.advance_by(Duration::from_millis(9));
    assert!(ticks.lock().unwrap().is_empty());
    scheduler.advance_by(Duration::from_millis(31));
    assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2, 3]);

    handle.unsubscribe();
    scheduler.advance_by(Duration::from_millis(30));
    assert_eq!(ticks.lock().unwrap().len(), 4);
    assert!(scheduler.is_empty());
  }

  #[test]
  fn take_finishes_timer() {
    use std::{cell::Cell, rc::Rc};

    let scheduler = TestScheduler::new();
    let completed = Rc::new(Cell::new(false));
    let hits = Rc::new(Cell::new(0));
    let (c_hits, c_completed) = (hits.clone(), completed.clone());
    observable::interval(Duration::from_millis(5), scheduler.clone())
      .take(3)
      .subscribe_all(
        move |_| c_hits.set(c_hits.get() + 1),
        |_| {},
        move || c_completed.set(true),
      );

    scheduler.flush();
    assert_eq!(hits.get(), 3);
    assert!(completed.get());
    assert_eq!(scheduler.now(), Duration::from_millis(15));
  }

  #[test]
  fn each_subscription_has_its_own_timer() {
    let scheduler = TestScheduler::new();
    let source =
      observable::interval(Duration::from_millis(10), scheduler.clone());
    let first = Arc::new(Mutex::new(vec![]));
    let second = Arc::new(Mutex::new(vec![]));

    let c_first = first.clone();
    source.clone().take(3).subscribe(move |v| c_first.lock().unwrap().push(v));
    scheduler.advance_by(Duration::from_millis(20));
    let c_second = second.clone();
    source.take(2).subscribe(move |v| c_second.lock().unwrap().push(v));
    scheduler.flush();

    assert_eq!(*first.lock().unwrap(), vec![0, 1, 2]);
    assert_eq!(*second.lock().unwrap(), vec![0, 1]);
    assert_eq!(scheduler.now(), Duration::from_millis(40));
  }

  #[test]
  fn interval_at_uses_first_deadline() {
    let scheduler = TestScheduler::new();
    let ticks = Arc::new(Mutex::new(vec![]));
    let c_ticks = ticks.clone();
    let at = Instant::now() + Duration::from_secs(60);
    observable::interval_at(at, Duration::from_secs(1), scheduler.clone())
      .take(2)
      .subscribe(move |v| c_ticks.lock().unwrap().push(v));

    scheduler.advance_by(Duration::from_secs(50));
    assert!(ticks.lock().unwrap().is_empty());
    scheduler.flush();
    assert_eq!(*ticks.lock().unwrap(), vec![0, 1]);
  }

  #[cfg(feature = "futures-scheduler")]
  #[test]
  fn thread_pool_interval() {
    let millis = Arc::new(Mutex::new(0));
    let c_millis = millis.clone();
    let stamp = Instant::now();

    let (o, status) = observable::interval(
      Duration::from_millis(1),
      ThreadPoolScheduler::default(),
    )
    .take(5)
    .complete_status();
    o.subscribe(move |_| *c_millis.lock().unwrap() += 1);
    CompleteStatus::wait_for_end(status);

    assert_eq!(*millis.lock().unwrap(), 5);
    assert!(stamp.elapsed() >= Duration::from_millis(5));
  }

  #[cfg(feature = "futures-scheduler")]
  #[test]
  fn disposed_interval_stays_silent() {
    let period = Duration::from_millis(10);
    let ticks = Arc::new(Mutex::new(0));
    let c_ticks = ticks.clone();
    let mut handle =
      observable::interval(period, ThreadPoolScheduler::default())
        .subscribe(move |_| *c_ticks.lock().unwrap() += 1);

    std::thread::sleep(period * 3);
    handle.unsubscribe();
    let after_dispose = *ticks.lock().unwrap();
    std::thread::sleep(period * 3);
    assert_eq!(*ticks.lock().unwrap(), after_dispose);
  }
}
