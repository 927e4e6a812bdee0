use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Swallow the source's error and continue with the producer the handler
/// builds from it. Values already emitted stay emitted; the fallback's own
/// terminal (or error) is the one downstream finally sees.
#[derive(Clone)]
pub struct CatchErrorOp<S, F> {
  pub(crate) source: S,
  pub(crate) handler: F,
}

impl<S, F, P2> Producer for CatchErrorOp<S, F>
where
  S: Producer,
  P2: Producer<Item = S::Item>,
  F: FnMut(S::Err) -> P2 + 'static,
{
  type Item = S::Item;
  type Err = P2::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, P2::Err> + 'static,
  {
    let CatchErrorOp { source, handler } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    // Swapping to the fallback replaces the slot's occupant; the group
    // reaches whichever subscription is current.
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    let swapped = Rc::new(Cell::new(false));
    let catch_observer = CatchObserver {
      subscriber,
      handler,
      slot: slot.clone(),
      swapped: swapped.clone(),
    };
    let handle = source.actual_subscribe(catch_observer);
    // A synchronous error has already put the fallback in the slot; the
    // source's spent handle must not overwrite it.
    if group.is_disposed() || swapped.get() {
      handle.dispose();
    } else {
      *slot.borrow_mut() = handle;
    }
    group
  }
}

pub struct CatchObserver<O, F> {
  subscriber: Subscriber<O>,
  handler: F,
  slot: Rc<RefCell<Disposable>>,
  swapped: Rc<Cell<bool>>,
}

impl<O, F, P2, Item, SourceErr> Observer<Item, SourceErr>
  for CatchObserver<O, F>
where
  P2: Producer<Item = Item>,
  F: FnMut(SourceErr) -> P2 + 'static,
  O: Observer<Item, P2::Err> + 'static,
{
  fn next(&mut self, value: Item) { self.subscriber.next(value) }

  fn error(&mut self, err: SourceErr) {
    self.swapped.set(true);
    let fallback = (self.handler)(err);
    let handle = fallback.actual_subscribe(self.subscriber.clone());
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
  use std::{cell::RefCell, rc::Rc};

  use crate::{event::Event, prelude::*};

  #[test]
  fn error_switches_to_the_fallback() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let mut subject = PublishSubject::<i32, &'static str>::new();

    subject
      .clone()
      .catch_error(|_| source::of(99).map_err(|_| "unreachable"))
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    subject.next(1);
    subject.error("boom");

    assert_eq!(
      *events.borrow(),
      vec![Event::Next(1), Event::Next(99), Event::Completed]
    );
  }

  #[test]
  fn fallback_can_depend_on_the_error() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();

    source::throw::<_, i32>(7)
      .catch_error(|code| source::of(code * 10).map_err(|_| ()))
      .subscribe(move |v| sink.borrow_mut().push(v));

    assert_eq!(*out.borrow(), vec![70]);
  }

  #[test]
  fn disposing_after_a_synchronous_error_detaches_the_fallback() {
    let fallback = PublishSubject::<i32, &'static str>::new();
    let inner = fallback.clone();

    let handle = source::throw::<&'static str, i32>("boom")
      .catch_error(move |_| inner.clone())
      .subscribe(|_| {});

    assert_eq!(fallback.subscriber_count(), 1);
    handle.dispose();
    assert_eq!(fallback.subscriber_count(), 0);
  }

  #[test]
  fn completion_never_triggers_the_handler() {
    let calls = Rc::new(RefCell::new(0));
    let count = calls.clone();
    let mut subject = PublishSubject::<i32, ()>::new();

    subject
      .clone()
      .catch_error(move |_| {
        *count.borrow_mut() += 1;
        source::empty::<i32>().map_err(|_| ())
      })
      .subscribe(|_| {});

    subject.next(1);
    subject.complete();
    assert_eq!(*calls.borrow(), 0);
  }
}
