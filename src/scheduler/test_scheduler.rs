//! Virtual time scheduler for deterministic tests of time-driven sequences.
//!
//! Time only moves when the test says so. Due tasks run synchronously on
//! the calling thread inside [`TestScheduler::advance_by`] and
//! [`TestScheduler::flush`], in deadline order and FIFO for equal deadlines.
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use telemetry_rx::prelude::*;
//!
//! let scheduler = TestScheduler::new();
//! let ticks = Rc::new(Cell::new(0));
//! let c_ticks = ticks.clone();
//! observable::interval(Duration::from_millis(100), scheduler.clone())
//!   .take(3)
//!   .subscribe(move |_| c_ticks.set(c_ticks.get() + 1));
//! scheduler.advance_by(Duration::from_millis(250));
//! assert_eq!(ticks.get(), 2);
//! ```
//!
//! Clones share the same clock and queue. Different instances are fully
//! independent, so tests running in parallel do not interfere.

use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap, rc::Rc};

use super::{Duration, Scheduler, Task, TaskHandle, TaskState};
use crate::subscription::SubscriptionLike;

#[derive(Default)]
struct State {
  virtual_time: Duration,
  queue: BinaryHeap<ScheduledTask>,
  next_id: usize,
}

struct ScheduledTask {
  at: Duration,
  id: usize,
  step: Box<dyn FnMut() -> TaskState>,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.at == other.at && self.id == other.id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by id
    other.at.cmp(&self.at).then_with(|| other.id.cmp(&self.id))
  }
}

impl State {
  fn push(
    &mut self,
    at: Duration,
    step: Box<dyn FnMut() -> TaskState>,
    handle: TaskHandle,
  ) {
    let id = self.next_id;
    self.next_id += 1;
    self.queue.push(ScheduledTask { at, id, step, handle });
  }
}

/// A virtual time scheduler.
#[derive(Clone, Default)]
pub struct TestScheduler(Rc<RefCell<State>>);

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Current virtual time, measured from the creation of the scheduler.
  pub fn now(&self) -> Duration { self.0.borrow().virtual_time }

  /// Number of queued tasks, cancelled ones included until they are due.
  pub fn pending_count(&self) -> usize { self.0.borrow().queue.len() }

  pub fn is_empty(&self) -> bool { self.0.borrow().queue.is_empty() }

  /// Advances virtual time by `duration`, running every task that becomes
  /// due on the way.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.now() + duration;
    self.run_until(Some(target));
    self.0.borrow_mut().virtual_time = target;
  }

  /// Runs tasks until the queue is empty, jumping time to each deadline.
  ///
  /// Never returns while an endless task (an `interval` without `take`) is
  /// still scheduled.
  pub fn flush(&self) { self.run_until(None); }

  fn run_until(&self, target: Option<Duration>) {
    loop {
      let task = {
        let mut state = self.0.borrow_mut();
        let due = state
          .queue
          .peek()
          .is_some_and(|next| target.map_or(true, |limit| next.at <= limit));
        if !due {
          break;
        }
        let Some(task) = state.queue.pop() else { break };
        // Cancelled tasks are dropped without moving the clock.
        if task.handle.is_closed() {
          continue;
        }
        state.virtual_time = task.at;
        task
      };
      let mut task = task;

      // The borrow is released: a step may schedule more work or read now().
      match (task.step)() {
        TaskState::Finished => task.handle.finish(),
        TaskState::Sleeping(period) => {
          let at = task.at + period;
          self.0.borrow_mut().push(at, task.step, task.handle);
        }
      }
    }
  }
}

impl<S: 'static> Scheduler<S> for TestScheduler {
  fn schedule(&self, mut task: Task<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let mut state = self.0.borrow_mut();
    let at = state.virtual_time + delay.unwrap_or_default();
    state.push(at, Box::new(move || task.step()), handle.clone());
    handle
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  fn counting_task(
    hits: Rc<Cell<usize>>,
    period: Duration,
    limit: usize,
  ) -> Task<(Rc<Cell<usize>>, Duration, usize)> {
    Task::new((hits, period, limit), |(hits, period, limit)| {
      hits.set(hits.get() + 1);
      if hits.get() < *limit {
        TaskState::Sleeping(*period)
      } else {
        TaskState::Finished
      }
    })
  }

  #[test]
  fn advance_by_cumulative() {
    let scheduler = TestScheduler::new();
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(scheduler.now(), Duration::from_millis(100));
    scheduler.advance_by(Duration::from_millis(50));
    assert_eq!(scheduler.now(), Duration::from_millis(150));
  }

  #[test]
  fn runs_only_due_tasks() {
    let scheduler = TestScheduler::new();
    let hits = Rc::new(Cell::new(0));
    let period = Duration::from_millis(10);
    scheduler.schedule(counting_task(hits.clone(), period, 5), Some(period));

    scheduler.advance_by(Duration::from_millis(9));
    assert_eq!(hits.get(), 0);
    scheduler.advance_by(Duration::from_millis(1));
    assert_eq!(hits.get(), 1);
    scheduler.advance_by(Duration::from_millis(25));
    assert_eq!(hits.get(), 3);
    assert_eq!(scheduler.pending_count(), 1);

    scheduler.flush();
    assert_eq!(hits.get(), 5);
    assert_eq!(scheduler.now(), Duration::from_millis(50));
    assert!(scheduler.is_empty());
  }

  #[test]
  fn cancelled_task_is_dropped() {
    let scheduler = TestScheduler::new();
    let hits = Rc::new(Cell::new(0));
    let period = Duration::from_millis(10);
    let mut handle =
      scheduler.schedule(counting_task(hits.clone(), period, 5), Some(period));
    scheduler.advance_by(period);
    handle.unsubscribe();
    scheduler.advance_by(period * 10);
    assert_eq!(hits.get(), 1);
    assert!(scheduler.is_empty());
  }

  #[test]
  fn same_deadline_runs_fifo() {
    let scheduler = TestScheduler::new();
    let order = Rc::new(RefCell::new(vec![]));
    for tag in 0..3 {
      let task = Task::new((order.clone(), tag), |(order, tag)| {
        order.borrow_mut().push(*tag);
        TaskState::Finished
      });
      scheduler.schedule(task, Some(Duration::from_millis(5)));
    }
    scheduler.flush();
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn instances_are_independent() {
    let a = TestScheduler::new();
    let b = TestScheduler::new();
    a.advance_by(Duration::from_secs(1));
    assert_eq!(b.now(), Duration::ZERO);
    assert_eq!(a.clone().now(), Duration::from_secs(1));
  }
}
