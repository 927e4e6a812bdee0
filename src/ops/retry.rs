use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// On error, resubscribe to a fresh run of the source, up to `attempts`
/// runs in total. Values from failed runs are not replayed; the stream
/// restarts from scratch. The last run's error goes through unchanged.
#[derive(Clone)]
pub struct RetryOp<S> {
  pub(crate) source: S,
  pub(crate) attempts: usize,
}

impl<S> Producer for RetryOp<S>
where
  S: Producer + Clone + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let RetryOp { source, attempts } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    let swapped = Rc::new(Cell::new(false));
    let retry_observer = RetryObserver {
      source: source.clone(),
      left: attempts.max(1),
      subscriber,
      slot: slot.clone(),
      swapped: swapped.clone(),
    };
    let handle = source.actual_subscribe(retry_observer);
    // A synchronous failure has already put a re-attempt in the slot; the
    // first run's spent handle must not overwrite it.
    if group.is_disposed() || swapped.get() {
      handle.dispose();
    } else {
      *slot.borrow_mut() = handle;
    }
    group
  }
}

pub struct RetryObserver<S, O> {
  source: S,
  left: usize,
  subscriber: Subscriber<O>,
  slot: Rc<RefCell<Disposable>>,
  swapped: Rc<Cell<bool>>,
}

impl<S, O> Observer<S::Item, S::Err> for RetryObserver<S, O>
where
  S: Producer + Clone + 'static,
  O: Observer<S::Item, S::Err> + 'static,
{
  fn next(&mut self, value: S::Item) { self.subscriber.next(value) }

  fn error(&mut self, err: S::Err) {
    if self.left <= 1 {
      self.subscriber.error(err);
      return;
    }
    self.left -= 1;
    self.swapped.set(true);
    let next_attempt = RetryObserver {
      source: self.source.clone(),
      left: self.left,
      subscriber: self.subscriber.clone(),
      slot: self.slot.clone(),
      swapped: self.swapped.clone(),
    };
    let handle = self.source.clone().actual_subscribe(next_attempt);
    if self.subscriber.is_stopped() {
      handle.dispose();
    } else {
      let previous = std::mem::replace(&mut *self.slot.borrow_mut(), handle);
      previous.dispose();
    }
  }

  fn complete(&mut self) { self.subscriber.complete() }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
  };

  use crate::{event::Event, prelude::*};

  /// Fails with `failures` errors before a run finally succeeds.
  fn flaky(
    failures: usize,
  ) -> impl Producer<Item = i32, Err = &'static str> + Clone {
    let runs = Rc::new(Cell::new(0));
    source::create(move |observer: &mut dyn Observer<i32, &'static str>| {
      let run = runs.get();
      runs.set(run + 1);
      observer.next(1);
      observer.next(2);
      if run < failures {
        return Err("flaky");
      }
      observer.next(3);
      observer.complete();
      Ok(())
    })
  }

  #[test]
  fn restarts_the_run_on_error() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();

    flaky(1)
      .retry(2)
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    assert_eq!(
      *events.borrow(),
      vec![
        Event::Next(1),
        Event::Next(2),
        Event::Next(1),
        Event::Next(2),
        Event::Next(3),
        Event::Completed
      ]
    );
  }

  #[test]
  fn exhausted_attempts_surface_the_error() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();

    flaky(5)
      .retry(2)
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    assert_eq!(
      *events.borrow(),
      vec![
        Event::Next(1),
        Event::Next(2),
        Event::Next(1),
        Event::Next(2),
        Event::Error("flaky")
      ]
    );
  }

  #[test]
  fn disposing_after_a_synchronous_failure_cancels_the_re_attempt() {
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();
    let runs = Rc::new(Cell::new(0));
    let cancelled = Rc::new(Cell::new(false));
    let fired = Rc::new(Cell::new(false));

    let r = runs.clone();
    let c = cancelled.clone();
    let f = fired.clone();
    let handle = source::defer(move || {
      let run = r.get();
      r.set(run + 1);
      if run == 0 {
        source::throw::<&'static str, ()>("boom").box_it()
      } else {
        let c = c.clone();
        source::timer(Duration::from_millis(100), scheduler.clone())
          .map_err(|_| "")
          .finalize(move || c.set(true))
          .box_it()
      }
    })
    .retry(2)
    .subscribe(move |_| f.set(true));

    assert_eq!(runs.get(), 2);
    handle.dispose();
    assert!(cancelled.get());
    event_loop.advance_by(Duration::from_millis(200));
    assert!(!fired.get());
  }

  #[test]
  fn completion_does_not_resubscribe() {
    let runs = Rc::new(Cell::new(0));
    let r = runs.clone();
    let counted = source::create(move |observer: &mut dyn Observer<i32, &'static str>| {
      r.set(r.get() + 1);
      observer.complete();
      Ok(())
    });

    counted.retry(3).subscribe(|_| {});
    assert_eq!(runs.get(), 1);
  }
}
