use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Run a side effect on every value without altering the stream.
#[derive(Clone)]
pub struct TapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> Producer for TapOp<S, F>
where
  S: Producer,
  F: FnMut(&S::Item) + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let TapOp { source, func } = self;
    source.actual_subscribe(TapObserver { observer, func })
  }
}

pub struct TapObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err> Observer<Item, Err> for TapObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item),
{
  fn next(&mut self, value: Item) {
    (self.func)(&value);
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
  fn side_effect_sees_every_value() {
    let seen = Rc::new(RefCell::new(vec![]));
    let out = Rc::new(RefCell::new(vec![]));
    let probe = seen.clone();
    let sink = out.clone();

    source::from_iter(1..=3)
      .tap(move |v| probe.borrow_mut().push(*v))
      .subscribe(move |v| sink.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert_eq!(*out.borrow(), vec![1, 2, 3]);
  }
}
