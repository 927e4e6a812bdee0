//! The cooperative event loop: one queue, one virtual clock.
//!
//! An [`EventLoop`] is the designated execution context for deferred work —
//! the equivalent of the "main" queue the UI-observing operators deliver on.
//! Time is virtual and only advances when the owner drives the loop, which
//! makes every time-based operator deterministic under test: schedule the
//! inputs, call [`advance_by`](EventLoop::advance_by), assert the outputs.
//!
//! Tasks fire in `(due, scheduling order)` order; a task scheduled with zero
//! delay from within another task runs in the same drive call. A task due
//! exactly at the target instant of an `advance_*` call fires (the clock
//! comparison is `<=`, not `<`).

use std::{
  cell::{Cell, RefCell},
  cmp::Ordering,
  collections::BinaryHeap,
  rc::Rc,
  time::Duration,
};

use super::Scheduler;
use crate::disposable::Disposable;

struct Entry {
  due: Duration,
  seq: u64,
  cancelled: Rc<Cell<bool>>,
  task: Box<dyn FnOnce()>,
}

impl Entry {
  fn run(self) {
    if !self.cancelled.get() {
      (self.task)();
    }
  }
}

impl PartialEq for Entry {
  fn eq(&self, other: &Self) -> bool {
    self.due == other.due && self.seq == other.seq
  }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

// BinaryHeap is a max-heap; invert so the earliest (due, seq) pops first.
impl Ord for Entry {
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .due
      .cmp(&self.due)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

struct LoopState {
  now: Duration,
  next_seq: u64,
  queue: BinaryHeap<Entry>,
}

pub struct EventLoop {
  state: Rc<RefCell<LoopState>>,
}

impl Default for EventLoop {
  fn default() -> Self { Self::new() }
}

impl EventLoop {
  pub fn new() -> Self {
    EventLoop {
      state: Rc::new(RefCell::new(LoopState {
        now: Duration::ZERO,
        next_seq: 0,
        queue: BinaryHeap::new(),
      })),
    }
  }

  /// A cloneable [`Scheduler`] handle feeding this loop.
  pub fn scheduler(&self) -> LoopScheduler {
    LoopScheduler { state: self.state.clone() }
  }

  pub fn now(&self) -> Duration { self.state.borrow().now }

  pub fn pending_tasks(&self) -> usize { self.state.borrow().queue.len() }

  /// Advance the clock by `step`, running every task that falls due,
  /// including tasks those tasks schedule inside the window.
  pub fn advance_by(&self, step: Duration) {
    let target = self.state.borrow().now + step;
    self.advance_to(target);
  }

  /// Advance the clock to the absolute instant `target`.
  pub fn advance_to(&self, target: Duration) {
    loop {
      // Pop under the borrow, run with it released: the task may schedule.
      let entry = {
        let mut state = self.state.borrow_mut();
        match state.queue.peek() {
          Some(head) if head.due <= target => {
            let entry = state.queue.pop().unwrap();
            state.now = state.now.max(entry.due);
            Some(entry)
          }
          _ => {
            state.now = state.now.max(target);
            None
          }
        }
      };
      match entry {
        Some(entry) => entry.run(),
        None => break,
      }
    }
  }

  /// Run everything that is or becomes queued, jumping the clock forward
  /// task by task until the queue is empty.
  pub fn run_until_idle(&self) {
    loop {
      let entry = {
        let mut state = self.state.borrow_mut();
        match state.queue.pop() {
          Some(entry) => {
            state.now = state.now.max(entry.due);
            Some(entry)
          }
          None => None,
        }
      };
      match entry {
        Some(entry) => entry.run(),
        None => break,
      }
    }
  }
}

#[derive(Clone)]
pub struct LoopScheduler {
  state: Rc<RefCell<LoopState>>,
}

impl Scheduler for LoopScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Disposable {
    let cancelled = Rc::new(Cell::new(false));
    let handle = Disposable::new();

    // Mark the handle spent once the task has run, so groups holding many
    // task handles (observe_on, delay) can prune them.
    let done = handle.clone();
    let task = Box::new(move || {
      task();
      done.dispose();
    });

    {
      let mut state = self.state.borrow_mut();
      let due = state.now + delay;
      let seq = state.next_seq;
      state.next_seq += 1;
      state
        .queue
        .push(Entry { due, seq, cancelled: cancelled.clone(), task });
    }

    handle.add_teardown(move || cancelled.set(true));
    handle
  }

  fn now(&self) -> Duration { self.state.borrow().now }
}
