use std::{cell::RefCell, convert::Infallible, rc::Rc, time::Duration};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Emit `0, 1, 2, ...` every `period` on `scheduler`, forever (or until
/// disposed).
pub fn interval<SD>(period: Duration, scheduler: SD) -> Interval<SD>
where
  SD: Scheduler,
{
  Interval { period, scheduler }
}

#[derive(Clone)]
pub struct Interval<SD> {
  period: Duration,
  scheduler: SD,
}

impl<SD: Scheduler> Producer for Interval<SD> {
  type Item = u64;
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<u64, Infallible> + 'static,
  {
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    // The freshest tick handle lives in the slot; disposing the group
    // reaches it through the slot.
    let slot = Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());
    tick(&self.scheduler, self.period, 0, subscriber, slot);
    group
  }
}

fn tick<SD, O>(
  scheduler: &SD,
  period: Duration,
  count: u64,
  subscriber: Subscriber<O>,
  slot: Rc<RefCell<Disposable>>,
) where
  SD: Scheduler,
  O: Observer<u64, Infallible> + 'static,
{
  let next_scheduler = scheduler.clone();
  let next_slot = slot.clone();
  let handle = scheduler.schedule(
    period,
    Box::new(move || {
      let mut subscriber = subscriber;
      subscriber.next(count);
      if !subscriber.is_stopped() {
        tick(&next_scheduler, period, count + 1, subscriber, next_slot);
      }
    }),
  );
  *slot.borrow_mut() = handle;
}
