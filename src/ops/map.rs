use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

#[derive(Clone)]
pub struct MapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> Producer for MapOp<S, F>
where
  S: Producer,
  B: 'static,
  F: FnMut(S::Item) -> B + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<B, S::Err> + 'static,
  {
    let MapOp { source, func } = self;
    source.actual_subscribe(MapObserver { observer, func })
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, B, Err> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) {
    self.observer.next((self.func)(value))
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}
