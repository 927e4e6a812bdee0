use std::convert::Infallible;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Enumerate an iterator into a subscription, then complete.
///
/// Production is synchronous and polls `is_stopped` between values, so a
/// downstream gate (`take`, an early dispose from a callback) stops the
/// enumeration instead of draining the whole iterator.
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<I>(I);

impl<I> Producer for FromIter<I>
where
  I: IntoIterator,
  I::Item: 'static,
{
  type Item = I::Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<I::Item, Infallible> + 'static,
  {
    let mut observer = observer;
    for value in self.0 {
      if observer.is_stopped() {
        return Disposable::disposed();
      }
      observer.next(value);
    }
    observer.complete();
    Disposable::disposed()
  }
}
