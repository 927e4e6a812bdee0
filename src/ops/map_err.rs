use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Rewrites the error type; values pass through untouched. Also the escape
/// hatch for gluing `Infallible` sources into fallible chains:
/// `of(1).map_err(|e: Infallible| match e {})`.
#[derive(Clone)]
pub struct MapErrOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, E2> Producer for MapErrOp<S, F>
where
  S: Producer,
  E2: 'static,
  F: FnMut(S::Err) -> E2 + 'static,
{
  type Item = S::Item;
  type Err = E2;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, E2> + 'static,
  {
    let MapErrOp { source, func } = self;
    source.actual_subscribe(MapErrObserver { observer, func })
  }
}

pub struct MapErrObserver<O, F> {
  observer: O,
  func: F,
}

impl<O, F, Item, Err, E2> Observer<Item, Err> for MapErrObserver<O, F>
where
  O: Observer<Item, E2>,
  F: FnMut(Err) -> E2,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) {
    self.observer.error((self.func)(err))
  }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}
