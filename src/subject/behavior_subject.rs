use std::{cell::RefCell, rc::Rc};

use super::{
  broadcast_next, broadcast_terminal, is_terminated, subscribe_core,
  SubjectCore, Terminal,
};
use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Holds one current value. A fresh subscriber immediately receives it,
/// then the live events. Requires an initial value at construction.
///
/// After a terminal event, late subscribers receive only the terminal — the
/// stale value is not replayed.
pub struct BehaviorSubject<Item, Err> {
  core: Rc<RefCell<SubjectCore<Item, Err>>>,
  value: Rc<RefCell<Item>>,
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  fn clone(&self) -> Self {
    BehaviorSubject { core: self.core.clone(), value: self.value.clone() }
  }
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self {
    BehaviorSubject {
      core: SubjectCore::new(),
      value: Rc::new(RefCell::new(initial)),
    }
  }

  /// The value a fresh subscriber would receive right now.
  pub fn value(&self) -> Item
  where
    Item: Clone,
  {
    self.value.borrow().clone()
  }
}

impl<Item, Err> Producer for BehaviorSubject<Item, Err>
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
    let current = (!is_terminated(&self.core))
      .then(|| self.value.borrow().clone());
    subscribe_core(&self.core, observer, move |subscriber| {
      if let Some(value) = current {
        subscriber.next(value);
      }
    })
  }
}

impl<Item, Err> Observer<Item, Err> for BehaviorSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn next(&mut self, value: Item) {
    if is_terminated(&self.core) {
      return;
    }
    *self.value.borrow_mut() = value.clone();
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
