use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Object-safe mirror of [`Producer`]: `actual_subscribe` is generic, so
/// boxing goes through this by-value shim instead.
trait DynProducer<Item, Err> {
  fn dyn_subscribe(
    self: Box<Self>,
    observer: Box<dyn Observer<Item, Err>>,
  ) -> Disposable;
}

impl<P> DynProducer<P::Item, P::Err> for P
where
  P: Producer,
{
  fn dyn_subscribe(
    self: Box<Self>,
    observer: Box<dyn Observer<P::Item, P::Err>>,
  ) -> Disposable {
    (*self).actual_subscribe(observer)
  }
}

/// A type-erased producer, for storing heterogeneous pipelines in one
/// collection or hiding operator stacks behind a plain signature.
pub struct BoxedProducer<Item, Err> {
  inner: Box<dyn DynProducer<Item, Err>>,
}

impl<Item, Err> BoxedProducer<Item, Err> {
  pub fn new<P>(producer: P) -> Self
  where
    P: Producer<Item = Item, Err = Err> + 'static,
  {
    BoxedProducer { inner: Box::new(producer) }
  }
}

impl<Item, Err> Producer for BoxedProducer<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, Err> + 'static,
  {
    self.inner.dyn_subscribe(Box::new(observer))
  }
}
