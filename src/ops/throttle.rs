use std::{
  cell::{Cell, RefCell},
  rc::Rc,
  time::Duration,
};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  scheduler::Scheduler, subscriber::Subscriber,
};

/// Rate-limit the source to at most one value per `interval`. The first
/// value of a burst goes out immediately and opens a window; values inside
/// the window supersede each other, and the freshest one goes out when the
/// window closes, opening the next window. Completion flushes the pending
/// trailing value; an error discards it.
#[derive(Clone)]
pub struct ThrottleOp<S, SD> {
  pub(crate) source: S,
  pub(crate) interval: Duration,
  pub(crate) scheduler: SD,
}

fn open_window<O, SD, Item, Err>(
  subscriber: &Subscriber<O>,
  scheduler: &SD,
  interval: Duration,
  trailing: &Rc<RefCell<Option<Item>>>,
  window_open: &Rc<Cell<bool>>,
  slot: &Rc<RefCell<Disposable>>,
) where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  window_open.set(true);
  let mut task_subscriber = subscriber.clone();
  let task_scheduler = scheduler.clone();
  let task_trailing = trailing.clone();
  let task_window_open = window_open.clone();
  let task_slot = slot.clone();
  let timer = scheduler.schedule(
    interval,
    Box::new(move || {
      let pending = task_trailing.borrow_mut().take();
      match pending {
        Some(value) => {
          task_subscriber.next(value);
          if !task_subscriber.is_stopped() {
            // The trailing emission opens the next window.
            open_window::<O, SD, Item, Err>(
              &task_subscriber,
              &task_scheduler,
              interval,
              &task_trailing,
              &task_window_open,
              &task_slot,
            );
          }
        }
        None => task_window_open.set(false),
      }
    }),
  );
  let previous = std::mem::replace(&mut *slot.borrow_mut(), timer);
  previous.dispose();
}

impl<S, SD> Producer for ThrottleOp<S, SD>
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
    let ThrottleOp { source, interval, scheduler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    group.add(source.actual_subscribe(ThrottleObserver {
      subscriber,
      scheduler,
      interval,
      trailing: Rc::new(RefCell::new(None)),
      window_open: Rc::new(Cell::new(false)),
      slot,
    }));
    group
  }
}

pub struct ThrottleObserver<O, SD, Item> {
  subscriber: Subscriber<O>,
  scheduler: SD,
  interval: Duration,
  trailing: Rc<RefCell<Option<Item>>>,
  window_open: Rc<Cell<bool>>,
  slot: Rc<RefCell<Disposable>>,
}

impl<O, SD, Item, Err> Observer<Item, Err> for ThrottleObserver<O, SD, Item>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  fn next(&mut self, value: Item) {
    if self.window_open.get() {
      *self.trailing.borrow_mut() = Some(value);
      return;
    }
    self.subscriber.next(value);
    if !self.subscriber.is_stopped() {
      open_window::<O, SD, Item, Err>(
        &self.subscriber,
        &self.scheduler,
        self.interval,
        &self.trailing,
        &self.window_open,
        &self.slot,
      );
    }
  }

  fn error(&mut self, err: Err) {
    self.trailing.borrow_mut().take();
    self.subscriber.error(err);
  }

  fn complete(&mut self) {
    // The window is cut short: whatever is pending goes out now.
    let flushed = self.trailing.borrow_mut().take();
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
  fn bursts_collapse_to_leading_and_trailing_values() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, ()>::new();

    subject
      .clone()
      .throttle(Duration::from_millis(500), event_loop.scheduler())
      .subscribe(move |v| sink.borrow_mut().push(v));

    // 1 leads its burst; 3 is the freshest value when the window closes
    // at 500, which opens a second window that 4 closes out at 1000.
    let schedule = [(0, 1), (100, 2), (200, 3), (600, 4)];
    for (at_ms, value) in schedule {
      event_loop.advance_to(Duration::from_millis(at_ms));
      subject.next(value);
    }
    event_loop.advance_to(Duration::from_secs(2));

    assert_eq!(*out.borrow(), vec![1, 3, 4]);
  }

  #[test]
  fn spaced_values_pass_through_unchanged() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, ()>::new();

    subject
      .clone()
      .throttle(Duration::from_millis(500), event_loop.scheduler())
      .subscribe(move |v| sink.borrow_mut().push(v));

    subject.next(1);
    event_loop.advance_to(Duration::from_millis(1000));
    subject.next(2);
    event_loop.advance_to(Duration::from_millis(2000));

    assert_eq!(*out.borrow(), vec![1, 2]);
  }

  #[test]
  fn completion_flushes_the_trailing_value() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, ()>::new();

    subject
      .clone()
      .throttle(Duration::from_millis(500), event_loop.scheduler())
      .subscribe(move |v| sink.borrow_mut().push(v));

    subject.next(1);
    subject.next(2);
    subject.complete();
    event_loop.run_until_idle();

    assert_eq!(*out.borrow(), vec![1, 2]);
  }

  #[test]
  fn error_discards_the_trailing_value() {
    let out = Rc::new(RefCell::new(vec![]));
    let errors = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let error_sink = errors.clone();
    let event_loop = EventLoop::new();
    let mut subject = PublishSubject::<i32, &'static str>::new();

    subject
      .clone()
      .throttle(Duration::from_millis(500), event_loop.scheduler())
      .subscribe_all(
        move |v| sink.borrow_mut().push(v),
        move |e| error_sink.borrow_mut().push(e),
        || {},
      );

    subject.next(1);
    subject.next(2);
    subject.error("boom");
    event_loop.run_until_idle();

    assert_eq!(*out.borrow(), vec![1]);
    assert_eq!(*errors.borrow(), vec!["boom"]);
  }
}
