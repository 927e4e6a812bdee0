use std::convert::Infallible;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// A producer of exactly one value, then completion.
pub fn of<Item>(value: Item) -> Of<Item> { Of(value) }

#[derive(Clone)]
pub struct Of<Item>(Item);

impl<Item: 'static> Producer for Of<Item> {
  type Item = Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, Infallible> + 'static,
  {
    let mut observer = observer;
    observer.next(self.0);
    observer.complete();
    Disposable::disposed()
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{event::Event, producer::ProducerExt};

  #[test]
  fn one_value_then_complete() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();

    of(100).subscribe_events(move |ev| sink.borrow_mut().push(ev));
    assert_eq!(*events.borrow(), vec![Event::Next(100), Event::Completed]);
  }

  #[test]
  fn each_subscription_is_an_independent_run() {
    let count = Rc::new(RefCell::new(0));
    let producer = of(1);

    for _ in 0..2 {
      let c = count.clone();
      producer.clone().subscribe(move |v| *c.borrow_mut() += v);
    }
    assert_eq!(*count.borrow(), 2);
  }
}
