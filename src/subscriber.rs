//! The engine-inserted delivery guard.
//!
//! Every consumer-facing observer is wrapped in a [`Subscriber`] before any
//! event reaches it. The wrapper is where the engine's delivery invariants
//! live:
//!
//! - nothing is delivered after the handle is disposed, even if upstream
//!   already produced the event;
//! - at most one terminal notification gets through, and it consumes the
//!   inner observer, so later attempts find nothing to call;
//! - a terminal notification auto-disposes the handle, releasing the whole
//!   upstream chain;
//! - reentrant delivery into the same subscriber (a callback feeding an
//!   event back into its own chain) is dropped rather than corrupting state.
//!
//! Operators with fan-in (merge, zip, debounce timers, ...) clone one
//! `Subscriber` into every branch: clones share the observer slot, so the
//! single-terminal rule holds across branches for free.

use std::{cell::RefCell, rc::Rc};

use crate::{disposable::Disposable, observer::Observer};

pub struct Subscriber<O> {
  observer: Rc<RefCell<Option<O>>>,
  handle: Disposable,
}

impl<O> Subscriber<O> {
  /// Wrap `observer`; `handle` is the subscription the terminal events will
  /// auto-dispose.
  pub fn new(observer: O, handle: Disposable) -> Self {
    Subscriber {
      observer: Rc::new(RefCell::new(Some(observer))),
      handle,
    }
  }

  pub fn handle(&self) -> Disposable { self.handle.clone() }
}

// Manual impl: clones share the slot, `O` itself need not be `Clone`.
impl<O> Clone for Subscriber<O> {
  fn clone(&self) -> Self {
    Subscriber {
      observer: self.observer.clone(),
      handle: self.handle.clone(),
    }
  }
}

impl<O, Item, Err> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.handle.is_disposed() {
      return;
    }
    // A failed borrow means we are already inside this subscriber's own
    // callback; the reentrant event is dropped.
    if let Ok(mut slot) = self.observer.try_borrow_mut() {
      if let Some(observer) = slot.as_mut() {
        observer.next(value);
      }
    }
  }

  fn error(&mut self, err: Err) {
    if self.handle.is_disposed() {
      return;
    }
    let taken = self
      .observer
      .try_borrow_mut()
      .ok()
      .and_then(|mut slot| slot.take());
    if let Some(mut observer) = taken {
      observer.error(err);
    }
    self.handle.dispose();
  }

  fn complete(&mut self) {
    if self.handle.is_disposed() {
      return;
    }
    let taken = self
      .observer
      .try_borrow_mut()
      .ok()
      .and_then(|mut slot| slot.take());
    if let Some(mut observer) = taken {
      observer.complete();
    }
    self.handle.dispose();
  }

  fn is_stopped(&self) -> bool {
    self.handle.is_disposed()
      || self
        .observer
        .try_borrow()
        .map_or(true, |slot| {
          slot.as_ref().map_or(true, |o| o.is_stopped())
        })
  }
}
