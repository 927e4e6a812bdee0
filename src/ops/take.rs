use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Mirror the first `count` values, then complete and release upstream.
#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Producer for TakeOp<S>
where
  S: Producer,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let TakeOp { source, count } = self;
    if count == 0 {
      let mut observer = observer;
      observer.complete();
      return Disposable::disposed();
    }
    let subscription = Disposable::new();
    let take_observer = TakeObserver {
      observer,
      left: count,
      subscription: subscription.clone(),
    };
    subscription.add(source.actual_subscribe(take_observer));
    subscription
  }
}

pub struct TakeObserver<O> {
  observer: O,
  left: usize,
  subscription: Disposable,
}

impl<O, Item, Err> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.left == 0 {
      return;
    }
    self.left -= 1;
    self.observer.next(value);
    if self.left == 0 {
      self.observer.complete();
      self.subscription.dispose();
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool {
    self.left == 0 || self.observer.is_stopped()
  }
}
