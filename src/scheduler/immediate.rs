use std::time::Duration;

use super::Scheduler;
use crate::disposable::Disposable;

/// Runs every task synchronously, on the caller's stack. The delay is
/// ignored; use an [`EventLoop`](super::EventLoop) scheduler where timing
/// matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, _delay: Duration, task: Box<dyn FnOnce()>) -> Disposable {
    task();
    Disposable::disposed()
  }

  fn now(&self) -> Duration { Duration::ZERO }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  #[test]
  fn runs_on_the_spot() {
    let ran = Rc::new(Cell::new(false));
    let r = ran.clone();
    let handle = ImmediateScheduler
      .schedule(Duration::from_secs(5), Box::new(move || r.set(true)));

    assert!(ran.get());
    assert!(handle.is_disposed());
  }
}
