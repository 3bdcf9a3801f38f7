//! Prelude module for convenient imports

pub use crate::error::{SchedulerError, SequenceError};
pub use crate::observable;
pub use crate::observable::{Observable, ObservableExt};
pub use crate::observer::{
  DrainObserver, Emitter, FnMutObserver, Observer, ObserverAll, ObserverErr,
};
pub use crate::ops::complete_status::CompleteStatus;
pub use crate::rc::{MutArc, RcDeref, RcDerefMut};
pub use crate::scheduler::{
  Duration, Instant, Scheduler, Task, TaskHandle, TaskState, TestScheduler,
};
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::{SchedulerConfig, ThreadPoolScheduler};
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
pub use crate::sensor::SensorSample;
pub use crate::subscriber::{Subscriber, SubscriptionHandle};
pub use crate::subscription::*;
