use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Defer the act of subscribing (and any synchronous emission it triggers)
/// onto `scheduler`, instead of running it on the caller.
#[derive(Clone)]
pub struct SubscribeOnOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
}

impl<S, SD> Producer for SubscribeOnOp<S, SD>
where
  S: Producer + 'static,
  SD: Scheduler,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let SubscribeOnOp { source, scheduler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    let task_slot = slot;
    let task = Box::new(move || {
      // Disposed before the task ran: nothing to start.
      if subscriber.is_stopped() {
        return;
      }
      *task_slot.borrow_mut() = source.actual_subscribe(subscriber);
    });
    group.add(scheduler.schedule(Duration::ZERO, task));
    group
  }
}
