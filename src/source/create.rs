//! Custom production from a closure.
//!
//! This is the adapter seam for callback-based external APIs: wrap the
//! callback registration in a closure that pushes into the observer it is
//! handed, and the result is an ordinary producer.

use std::marker::PhantomData;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Build a producer whose run is the closure `f`.
///
/// The closure receives the downstream observer (already wrapped in the
/// delivery guard, so over-emission after a terminal is dropped) and returns
/// `Result<(), Err>`: a synchronous failure of the producer body is
/// delivered as an `Error` event instead of escaping.
///
/// ```
/// use rivulet::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let out = Rc::new(RefCell::new(vec![]));
/// let sink = out.clone();
/// source::create(|observer: &mut dyn Observer<i32, &str>| {
///   observer.next(1);
///   observer.next(2);
///   observer.complete();
///   Ok(())
/// })
/// .subscribe(move |v| sink.borrow_mut().push(v));
///
/// assert_eq!(*out.borrow(), vec![1, 2]);
/// ```
pub fn create<F, Item, Err>(f: F) -> Create<F, Item, Err>
where
  F: FnOnce(&mut dyn Observer<Item, Err>) -> Result<(), Err>,
{
  Create { f, _marker: PhantomData }
}

#[derive(Clone)]
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

impl<F, Item, Err> Producer for Create<F, Item, Err>
where
  Item: 'static,
  Err: 'static,
  F: FnOnce(&mut dyn Observer<Item, Err>) -> Result<(), Err> + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, Err> + 'static,
  {
    let handle = Disposable::new();
    let mut subscriber = Subscriber::new(observer, handle.clone());
    if let Err(err) = (self.f)(&mut subscriber) {
      subscriber.error(err);
    }
    handle
  }
}
