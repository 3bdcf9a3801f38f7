use super::{drive, Duration, Scheduler, Task, TaskHandle};
use crate::error::{Result, SchedulerError};
use futures::{executor::ThreadPool, future::abortable};
use once_cell::sync::Lazy;
use tracing::debug;

static DEFAULT_POOL: Lazy<ThreadPool> = Lazy::new(|| {
  ThreadPoolScheduler::with_config(SchedulerConfig::default())
    .map(|scheduler| scheduler.pool)
    .expect("start the default scheduler pool")
});

/// Settings of a [`ThreadPoolScheduler`] worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
  /// Number of worker threads.
  pub pool_size: usize,
  /// Prefix of worker thread names.
  pub name_prefix: String,
}

impl Default for SchedulerConfig {
  fn default() -> Self {
    let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
    SchedulerConfig {
      pool_size: cpus.max(2),
      name_prefix: "telemetry-rx-".to_string(),
    }
  }
}

/// Scheduler running timer tasks on a futures thread pool.
///
/// Every scheduled task is its own future, so independent intervals never
/// hold each other up. `Default` shares one lazily started pool across the
/// process.
#[derive(Clone)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl ThreadPoolScheduler {
  /// Starts a dedicated worker pool.
  pub fn with_config(config: SchedulerConfig) -> Result<Self> {
    if config.pool_size == 0 {
      return Err(SchedulerError::InvalidConfig {
        context: "pool_size must be at least 1".to_string(),
      });
    }
    let pool = ThreadPool::builder()
      .pool_size(config.pool_size)
      .name_prefix(config.name_prefix)
      .create()?;
    Ok(ThreadPoolScheduler { pool })
  }

  /// Uses an existing pool.
  pub fn from_pool(pool: ThreadPool) -> Self { ThreadPoolScheduler { pool } }
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self { ThreadPoolScheduler { pool: DEFAULT_POOL.clone() } }
}

impl<S: Send + 'static> Scheduler<S> for ThreadPoolScheduler {
  fn schedule(&self, task: Task<S>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let sleep = |d: Duration| async move {
      futures_time::task::sleep(d.into()).await;
    };
    let (future, abort) = abortable(drive(task, handle.clone(), delay, sleep));
    handle.set_abort(abort);
    debug!(?delay, "spawning task on thread pool");
    self.pool.spawn_ok(async move {
      let _ = future.await;
    });
    handle
  }
}
