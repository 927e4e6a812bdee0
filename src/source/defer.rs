use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Build the actual producer lazily, once per subscription, at subscribe
/// time.
pub fn defer<F, P>(factory: F) -> Defer<F>
where
  F: FnOnce() -> P,
  P: Producer,
{
  Defer(factory)
}

#[derive(Clone)]
pub struct Defer<F>(F);

impl<F, P> Producer for Defer<F>
where
  F: FnOnce() -> P + 'static,
  P: Producer,
{
  type Item = P::Item;
  type Err = P::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<P::Item, P::Err> + 'static,
  {
    (self.0)().actual_subscribe(observer)
  }
}
