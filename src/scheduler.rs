//! Where and when queued work executes.
//!
//! The engine is single-threaded and cooperative: the core delivery path is
//! synchronous, and the only suspension points are scheduler boundaries.
//! Schedulers are plain values constructed by the caller and passed into the
//! time-based operators — there is no ambient or global scheduler.

use std::time::Duration;

use crate::disposable::Disposable;

mod event_loop;
mod immediate;

pub use event_loop::{EventLoop, LoopScheduler};
pub use immediate::ImmediateScheduler;

pub trait Scheduler: Clone + 'static {
  /// Enqueue `task` to run once `delay` has elapsed. Disposing the returned
  /// handle cancels the task if it has not fired yet.
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Disposable;

  /// The scheduler's current clock reading.
  fn now(&self) -> Duration;
}
