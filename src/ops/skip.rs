use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

#[derive(Clone)]
pub struct SkipOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Producer for SkipOp<S>
where
  S: Producer,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let SkipOp { source, count } = self;
    source.actual_subscribe(SkipObserver { observer, left: count })
  }
}

pub struct SkipObserver<O> {
  observer: O,
  left: usize,
}

impl<O, Item, Err> Observer<Item, Err> for SkipObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.left > 0 {
      self.left -= 1;
    } else {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}
