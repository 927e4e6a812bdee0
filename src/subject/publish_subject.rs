use std::{cell::RefCell, rc::Rc};

use super::{
  broadcast_next, broadcast_terminal, is_terminated, subscribe_core,
  SubjectCore, Terminal,
};
use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Multicasts only the events pushed after a subscriber attaches; no replay.
///
/// Clones share the same subscriber list, so one clone can be handed out as
/// a sink while another is subscribed as a producer.
pub struct PublishSubject<Item, Err> {
  core: Rc<RefCell<SubjectCore<Item, Err>>>,
}

impl<Item, Err> Clone for PublishSubject<Item, Err> {
  fn clone(&self) -> Self { PublishSubject { core: self.core.clone() } }
}

impl<Item, Err> Default for PublishSubject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> PublishSubject<Item, Err> {
  pub fn new() -> Self { PublishSubject { core: SubjectCore::new() } }

  pub fn subscriber_count(&self) -> usize {
    self.core.borrow().subscribers.len()
  }
}

impl<Item, Err> Producer for PublishSubject<Item, Err>
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
    subscribe_core(&self.core, observer, |_| {})
  }
}

impl<Item, Err> Observer<Item, Err> for PublishSubject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn next(&mut self, value: Item) { broadcast_next(&self.core, value) }

  fn error(&mut self, err: Err) {
    broadcast_terminal(&self.core, Terminal::Error(err))
  }

  fn complete(&mut self) {
    broadcast_terminal(&self.core, Terminal::Completed)
  }

  fn is_stopped(&self) -> bool { is_terminated(&self.core) }
}
