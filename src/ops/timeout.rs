use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  disposable::Disposable, error::TimeoutError, observer::Observer,
  producer::Producer, scheduler::Scheduler, subscriber::Subscriber,
};

/// Fail with [`TimeoutError`] unless an event arrives within `bound` of the
/// subscription, and then again within `bound` of each value.
#[derive(Clone)]
pub struct TimeoutOp<S, SD> {
  pub(crate) source: S,
  pub(crate) bound: Duration,
  pub(crate) scheduler: SD,
}

fn arm_timer<O, SD, Item, Err>(
  subscriber: &Subscriber<O>,
  scheduler: &SD,
  bound: Duration,
  slot: &Rc<RefCell<Disposable>>,
) where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Err: From<TimeoutError>,
{
  let mut subscriber = subscriber.clone();
  let timer = scheduler.schedule(
    bound,
    Box::new(move || subscriber.error(TimeoutError { bound }.into())),
  );
  let previous = std::mem::replace(&mut *slot.borrow_mut(), timer);
  previous.dispose();
}

impl<S, SD> Producer for TimeoutOp<S, SD>
where
  S: Producer,
  SD: Scheduler,
  S::Err: From<TimeoutError>,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let TimeoutOp { source, bound, scheduler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    arm_timer::<O, SD, S::Item, S::Err>(&subscriber, &scheduler, bound, &slot);
    group.add(source.actual_subscribe(TimeoutObserver {
      subscriber,
      scheduler,
      bound,
      slot,
    }));
    group
  }
}

pub struct TimeoutObserver<O, SD> {
  subscriber: Subscriber<O>,
  scheduler: SD,
  bound: Duration,
  slot: Rc<RefCell<Disposable>>,
}

impl<O, SD, Item, Err> Observer<Item, Err> for TimeoutObserver<O, SD>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Err: From<TimeoutError>,
{
  fn next(&mut self, value: Item) {
    self.subscriber.next(value);
    if !self.subscriber.is_stopped() {
      arm_timer::<O, SD, Item, Err>(
        &self.subscriber,
        &self.scheduler,
        self.bound,
        &self.slot,
      );
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) { self.subscriber.complete() }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
