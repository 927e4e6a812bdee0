use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Emit a value only once the source has stayed silent for `interval`
/// (trailing debounce). Each new value restarts the timer and supersedes
/// the pending one. Completion flushes the pending value first; an error
/// discards it.
#[derive(Clone)]
pub struct DebounceOp<S, SD> {
  pub(crate) source: S,
  pub(crate) interval: Duration,
  pub(crate) scheduler: SD,
}

impl<S, SD> Producer for DebounceOp<S, SD>
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
    let DebounceOp { source, interval, scheduler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    group.add(source.actual_subscribe(DebounceObserver {
      subscriber,
      scheduler,
      interval,
      pending: Rc::new(RefCell::new(None)),
      slot,
    }));
    group
  }
}

pub struct DebounceObserver<O, SD, Item> {
  subscriber: Subscriber<O>,
  scheduler: SD,
  interval: Duration,
  pending: Rc<RefCell<Option<Item>>>,
  slot: Rc<RefCell<Disposable>>,
}

impl<O, SD, Item> DebounceObserver<O, SD, Item> {
  fn cancel_timer(&self) {
    let previous =
      std::mem::replace(&mut *self.slot.borrow_mut(), Disposable::new());
    previous.dispose();
  }
}

impl<O, SD, Item, Err> Observer<Item, Err> for DebounceObserver<O, SD, Item>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
{
  fn next(&mut self, value: Item) {
    *self.pending.borrow_mut() = Some(value);
    self.cancel_timer();

    let mut subscriber = self.subscriber.clone();
    let pending = self.pending.clone();
    let timer = self.scheduler.schedule(
      self.interval,
      Box::new(move || {
        if let Some(value) = pending.borrow_mut().take() {
          subscriber.next(value);
        }
      }),
    );
    *self.slot.borrow_mut() = timer;
  }

  fn error(&mut self, err: Err) {
    self.pending.borrow_mut().take();
    self.cancel_timer();
    self.subscriber.error(err);
  }

  fn complete(&mut self) {
    self.cancel_timer();
    // The quiet period is cut short: whatever is pending goes out now.
    let flushed = self.pending.borrow_mut().take();
    if let Some(value) = flushed {
      self.subscriber.next(value);
    }
    self.subscriber.complete();
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc, time::Duration};

  use crate::{prelude::*, scheduler::EventLoop};

  #[test]
  fn emits_after_a_quiet_interval() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, ()>::new();

    subject
      .clone()
      .debounce(Duration::from_millis(500), event_loop.scheduler())
      .subscribe(move |v| sink.borrow_mut().push(v));

    // Bursts collapse to their last value; isolated values survive.
    let schedule = [
      (100, 1),
      (1100, 2),
      (1200, 3),
      (1200, 4),
      (1400, 5),
      (2100, 6),
    ];
    for (at_ms, value) in schedule {
      event_loop.advance_to(Duration::from_millis(at_ms));
      subject.next(value);
    }
    event_loop.advance_to(Duration::from_secs(4));

    assert_eq!(*out.borrow(), vec![1, 5, 6]);
  }

  #[test]
  fn completion_flushes_the_pending_value() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, ()>::new();

    subject
      .clone()
      .debounce(Duration::from_millis(500), event_loop.scheduler())
      .subscribe(move |v| sink.borrow_mut().push(v));

    subject.next(1);
    subject.complete();
    event_loop.run_until_idle();

    assert_eq!(*out.borrow(), vec![1]);
    assert_eq!(event_loop.pending_tasks(), 0);
  }

  #[test]
  fn error_discards_the_pending_value() {
    let out = Rc::new(RefCell::new(vec![]));
    let errors = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let error_sink = errors.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, &'static str>::new();

    subject
      .clone()
      .debounce(Duration::from_millis(500), event_loop.scheduler())
      .subscribe_all(
        move |v| sink.borrow_mut().push(v),
        move |e| error_sink.borrow_mut().push(e),
        || {},
      );

    subject.next(1);
    subject.error("boom");
    event_loop.run_until_idle();

    assert!(out.borrow().is_empty());
    assert_eq!(*errors.borrow(), vec!["boom"]);
  }
}
