use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Mirror values while the predicate holds; the first failing value is
/// dropped, the stream completes, and upstream is released.
#[derive(Clone)]
pub struct TakeWhileOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Producer for TakeWhileOp<S, F>
where
  S: Producer,
  F: FnMut(&S::Item) -> bool + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let TakeWhileOp { source, predicate } = self;
    let subscription = Disposable::new();
    let take_observer = TakeWhileObserver {
      observer,
      predicate,
      done: false,
      subscription: subscription.clone(),
    };
    subscription.add(source.actual_subscribe(take_observer));
    subscription
  }
}

pub struct TakeWhileObserver<O, F> {
  observer: O,
  predicate: F,
  done: bool,
  subscription: Disposable,
}

impl<O, F, Item, Err> Observer<Item, Err> for TakeWhileObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.done {
      return;
    }
    if (self.predicate)(&value) {
      self.observer.next(value);
    } else {
      self.done = true;
      self.observer.complete();
      self.subscription.dispose();
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool { self.done || self.observer.is_stopped() }
}
