use std::time::Duration;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Shift every value and the completion by `interval` on the given
/// scheduler. Errors are not delayed: a failure propagates as soon as it
/// happens, ahead of values still in flight.
#[derive(Clone)]
pub struct DelayOp<S, SD> {
  pub(crate) source: S,
  pub(crate) interval: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> Producer for DelayOp<S, SD>
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
    let DelayOp { source, interval, scheduler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());

    group.add(source.actual_subscribe(DelayObserver {
      subscriber,
      scheduler,
      interval,
      group: group.clone(),
    }));
    group
  }
}

pub struct DelayObserver<O, SD> {
  subscriber: Subscriber<O>,
  scheduler: SD,
  interval: Duration,
  // Task handles park here; the scheduler marks them spent after firing,
  // so `add` prunes them instead of accumulating one per value.
  group: Disposable,
}

impl<O, SD, Item, Err> Observer<Item, Err> for DelayObserver<O, SD>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
{
  fn next(&mut self, value: Item) {
    let mut subscriber = self.subscriber.clone();
    let task = self
      .scheduler
      .schedule(self.interval, Box::new(move || subscriber.next(value)));
    self.group.add(task);
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let mut subscriber = self.subscriber.clone();
    let task = self
      .scheduler
      .schedule(self.interval, Box::new(move || subscriber.complete()));
    self.group.add(task);
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
