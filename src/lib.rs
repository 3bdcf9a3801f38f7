//! # telemetry-rx: a push-based sequence engine for sensor telemetry
//!
//! Sequences are built once from generators and operators and may be
//! subscribed any number of times. Every subscription is an independent,
//! cold run with its own buffers, counters and timers.
//!
//! ```rust
//! use telemetry_rx::prelude::*;
//!
//! observable::range(10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A sequence that can be subscribed to |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` notifications |
//! | [`SubscriptionHandle`] | Cancels a run, idempotently and from any thread |
//! | [`Scheduler`] | Runs timer tasks for `interval` |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): futures thread pool scheduler
//! - **`timer`**: `futures-time` sleeps, enabled by `futures-scheduler`
//! - **`tokio-scheduler`**: scheduler backed by a tokio runtime handle
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`SubscriptionHandle`]: subscriber::SubscriptionHandle
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod sensor;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
