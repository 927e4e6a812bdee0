//! Error vocabulary for streams.
//!
//! The engine itself is generic over the error type: any `'static` type can
//! travel through the `Error` event. `StreamError` is the taxonomy offered
//! for code that does not want to invent its own.

use std::time::Duration;

use thiserror::Error;

/// Emitted by [`timeout`](crate::producer::ProducerExt::timeout) when no
/// event arrives within the bound. Its own type so `timeout` stays generic:
/// the operator only asks for `Err: From<TimeoutError>`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no event arrived within {bound:?}")]
pub struct TimeoutError {
  pub bound: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamError {
  /// The producer body failed while emitting.
  #[error("producer failed: {0}")]
  Production(String),

  /// An operator's internal invariant was violated. Reaching a consumer
  /// means a defect in the engine, not in user code.
  #[error("operator invariant violated: {0}")]
  Operator(String),

  #[error(transparent)]
  Timeout(#[from] TimeoutError),

  /// A dynamically-typed external value could not be bridged into the
  /// stream's item type.
  #[error("cannot cast external value: {0}")]
  Casting(String),
}
