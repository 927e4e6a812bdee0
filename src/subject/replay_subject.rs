use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::{
  broadcast_next, broadcast_terminal, is_terminated, subscribe_core,
  SubjectCore, Terminal,
};
use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Buffers the most recent `capacity` values. A fresh subscriber receives
/// the buffered backlog in original order, then the live events.
///
/// A late subscriber to a terminated replay subject still receives the
/// backlog, then the terminal. Capacity zero degrades to publish behavior.
pub struct ReplaySubject<Item, Err> {
  core: Rc<RefCell<SubjectCore<Item, Err>>>,
  buffer: Rc<RefCell<VecDeque<Item>>>,
  capacity: usize,
}

impl<Item, Err> Clone for ReplaySubject<Item, Err> {
  fn clone(&self) -> Self {
    ReplaySubject {
      core: self.core.clone(),
      buffer: self.buffer.clone(),
      capacity: self.capacity,
    }
  }
}

impl<Item, Err> ReplaySubject<Item, Err> {
  pub fn new(capacity: usize) -> Self {
    ReplaySubject {
      core: SubjectCore::new(),
      buffer: Rc::new(RefCell::new(VecDeque::new())),
      capacity,
    }
  }
}

impl<Item, Err> Producer for ReplaySubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, Err> + 'static,
  {
    let backlog: Vec<Item> = self.buffer.borrow().iter().cloned().collect();
    subscribe_core(&self.core, observer, move |subscriber| {
      for value in backlog {
        if subscriber.is_stopped() {
          break;
        }
        subscriber.next(value);
      }
    })
  }
}

impl<Item, Err> Observer<Item, Err> for ReplaySubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn next(&mut self, value: Item) {
    if is_terminated(&self.core) {
      return;
    }
    if self.capacity > 0 {
      let mut buffer = self.buffer.borrow_mut();
      if buffer.len() == self.capacity {
        buffer.pop_front();
      }
      buffer.push_back(value.clone());
    }
    broadcast_next(&self.core, value);
  }

  fn error(&mut self, err: Err) {
    broadcast_terminal(&self.core, Terminal::Error(err))
  }

  fn complete(&mut self) {
    broadcast_terminal(&self.core, Terminal::Completed)
  }

  fn is_stopped(&self) -> bool { is_terminated(&self.core) }
}
