//! Error types carried through sequences and raised by schedulers.
//!
//! [`SequenceError`] is the value that travels down a chain through
//! `Observer::error`. [`SchedulerError`] is returned when a scheduler cannot
//! be built.

use std::convert::Infallible;

/// Errors delivered to consumers through the error channel of a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
  /// A generator or a fallible transform step failed to produce a value.
  ///
  /// The run that raised it is terminated and every other active branch of
  /// the same run is released.
  #[error("producer fault: {context}")]
  ProducerFault {
    /// Description of what failed while producing
    context: String,
  },
}

impl SequenceError {
  /// Shorthand for [`SequenceError::ProducerFault`].
  pub fn producer_fault(context: impl Into<String>) -> Self {
    SequenceError::ProducerFault { context: context.into() }
  }
}

impl From<Infallible> for SequenceError {
  fn from(never: Infallible) -> Self { match never {} }
}

/// Errors raised while building a scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
  /// The worker pool backing a [`ThreadPoolScheduler`] could not start.
  ///
  /// [`ThreadPoolScheduler`]: crate::scheduler::ThreadPoolScheduler
  #[error("failed to start worker pool: {0}")]
  ThreadPool(#[from] std::io::Error),

  /// The requested configuration cannot be honoured.
  #[error("invalid scheduler configuration: {context}")]
  InvalidConfig { context: String },
}

/// Result alias for fallible construction in this crate.
pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
