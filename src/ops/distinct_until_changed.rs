use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Suppress consecutive duplicates; the first value always passes.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<S> Producer for DistinctUntilChangedOp<S>
where
  S: Producer,
  S::Item: PartialEq + Clone,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(DistinctObserver { observer, last: None })
  }
}

pub struct DistinctObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<O, Item, Err> Observer<Item, Err> for DistinctObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: PartialEq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() == Some(&value) {
      return;
    }
    self.last = Some(value.clone());
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
  fn suppresses_consecutive_duplicates_only() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();

    source::from_iter([1, 1, 2, 2, 1])
      .distinct_until_changed()
      .subscribe(move |v| sink.borrow_mut().push(v));
    assert_eq!(*out.borrow(), vec![1, 2, 1]);
  }
}
