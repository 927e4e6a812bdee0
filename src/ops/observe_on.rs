use std::time::Duration;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Re-dispatch every notification through `scheduler`, so downstream
/// callbacks run on its context instead of wherever the source emitted.
/// Event order is preserved; terminals travel the queue like values do.
#[derive(Clone)]
pub struct ObserveOnOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<S, SD> Producer for ObserveOnOp<S, SD>
where
  S: Producer,
  SD: Scheduler,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let ObserveOnOp { source, scheduler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());

    group.add(source.actual_subscribe(ObserveOnObserver {
      subscriber,
      scheduler,
      group: group.clone(),
    }));
    group
  }
}

pub struct ObserveOnObserver<O, SD> {
  subscriber: Subscriber<O>,
  scheduler: SD,
  group: Disposable,
}

impl<O, SD> ObserveOnObserver<O, SD>
where
  SD: Scheduler,
{
  fn dispatch(&self, task: Box<dyn FnOnce()>) {
    let handle = self.scheduler.schedule(Duration::ZERO, task);
    self.group.add(handle);
  }
}

impl<O, SD, Item, Err> Observer<Item, Err> for ObserveOnObserver<O, SD>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  fn next(&mut self, value: Item) {
    let mut subscriber = self.subscriber.clone();
    self.dispatch(Box::new(move || subscriber.next(value)));
  }

  fn error(&mut self, err: Err) {
    let mut subscriber = self.subscriber.clone();
    self.dispatch(Box::new(move || subscriber.error(err)));
  }

  fn complete(&mut self) {
    let mut subscriber = self.subscriber.clone();
    self.dispatch(Box::new(move || subscriber.complete()));
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
