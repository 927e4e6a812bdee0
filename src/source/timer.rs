use std::{convert::Infallible, time::Duration};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Emit a single `()` after `delay` on `scheduler`, then complete.
pub fn timer<SD>(delay: Duration, scheduler: SD) -> Timer<SD>
where
  SD: Scheduler,
{
  Timer { delay, scheduler }
}

#[derive(Clone)]
pub struct Timer<SD> {
  delay: Duration,
  scheduler: SD,
}

impl<SD: Scheduler> Producer for Timer<SD> {
  type Item = ();
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<(), Infallible> + 'static,
  {
    let group = Disposable::new();
    let mut subscriber = Subscriber::new(observer, group.clone());
    group.add(self.scheduler.schedule(
      self.delay,
      Box::new(move || {
        subscriber.next(());
        subscriber.complete();
      }),
    ));
    group
  }
}
