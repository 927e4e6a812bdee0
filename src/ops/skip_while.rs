use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Drop values while the predicate holds; from the first failing value on,
/// everything passes through.
#[derive(Clone)]
pub struct SkipWhileOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Producer for SkipWhileOp<S, F>
where
  S: Producer,
  F: FnMut(&S::Item) -> bool + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let SkipWhileOp { source, predicate } = self;
    source.actual_subscribe(SkipWhileObserver {
      observer,
      predicate,
      skipping: true,
    })
  }
}

pub struct SkipWhileObserver<O, F> {
  observer: O,
  predicate: F,
  skipping: bool,
}

impl<O, F, Item, Err> Observer<Item, Err> for SkipWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.skipping && (self.predicate)(&value) {
      return;
    }
    self.skipping = false;
    self.observer.next(value);
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn gate_opens_once_and_stays_open() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();

    source::from_iter([1, 2, 9, 1, 2])
      .skip_while(|v| *v < 5)
      .subscribe(move |v| sink.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec![9, 1, 2]);
  }
}
