use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Synchronously emit the given values before subscribing upstream;
/// upstream ordering is untouched.
#[derive(Clone)]
pub struct StartWithOp<S, Item> {
  pub(crate) source: S,
  pub(crate) values: Vec<Item>,
}

impl<S, Item> Producer for StartWithOp<S, Item>
where
  Item: 'static,
  S: Producer<Item = Item>,
{
  type Item = Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, S::Err> + 'static,
  {
    let StartWithOp { source, values } = self;
    let mut observer = observer;
    for value in values {
      if observer.is_stopped() {
        return Disposable::disposed();
      }
      observer.next(value);
    }
    source.actual_subscribe(observer)
  }
}
