use std::{cell::Cell, marker::PhantomData, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Suppress source values until the notifier emits its first value; from
/// that point on, mirror the source. Terminals always pass through.
#[derive(Clone)]
pub struct SkipUntilOp<S, N> {
  pub(crate) source: S,
  pub(crate) notifier: N,
}

impl<S, N> Producer for SkipUntilOp<S, N>
where
  S: Producer,
  N: Producer<Err = S::Err>,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let SkipUntilOp { source, notifier } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let open = Rc::new(Cell::new(false));

    // The notifier keeps its own handle so its first value can release it
    // without touching the source subscription.
    let notifier_handle = Disposable::new();
    notifier_handle.add(notifier.actual_subscribe(SkipUntilNotifier {
      subscriber: subscriber.clone(),
      open: open.clone(),
      handle: notifier_handle.clone(),
      _marker: PhantomData,
    }));
    group.add(notifier_handle);
    group.add(source.actual_subscribe(SkipUntilObserver {
      subscriber,
      open,
    }));
    group
  }
}

pub struct SkipUntilObserver<O> {
  subscriber: Subscriber<O>,
  open: Rc<Cell<bool>>,
}

impl<O, Item, Err> Observer<Item, Err> for SkipUntilObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.open.get() {
      self.subscriber.next(value);
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) { self.subscriber.complete() }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

pub struct SkipUntilNotifier<O, Item> {
  subscriber: Subscriber<O>,
  open: Rc<Cell<bool>>,
  handle: Disposable,
  _marker: PhantomData<fn() -> Item>,
}

impl<O, Item, Err, NotifierItem> Observer<NotifierItem, Err>
  for SkipUntilNotifier<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _value: NotifierItem) {
    self.open.set(true);
    self.handle.dispose();
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {}

  fn is_stopped(&self) -> bool {
    self.open.get() || self.subscriber.is_stopped()
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{event::Event, prelude::*};

  #[test]
  fn values_before_the_notification_are_dropped() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let mut values = PublishSubject::<i32, ()>::new();
    let mut gate = PublishSubject::<(), ()>::new();

    values
      .clone()
      .skip_until(gate.clone())
      .subscribe(move |v| sink.borrow_mut().push(v));

    values.next(1);
    values.next(2);
    gate.next(());
    values.next(3);
    values.next(4);

    assert_eq!(*out.borrow(), vec![3, 4]);
    assert_eq!(gate.subscriber_count(), 0);
  }

  #[test]
  fn completion_passes_through_while_closed() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let mut values = PublishSubject::<i32, ()>::new();
    let gate = PublishSubject::<(), ()>::new();

    values
      .clone()
      .skip_until(gate)
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    values.next(1);
    values.complete();

    assert_eq!(*events.borrow(), vec![Event::Completed]);
  }

  #[test]
  fn notifier_error_terminates_the_output() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let values = PublishSubject::<i32, &'static str>::new();
    let mut gate = PublishSubject::<(), &'static str>::new();

    values
      .clone()
      .skip_until(gate.clone())
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    gate.error("gate failed");
    assert_eq!(*events.borrow(), vec![Event::Error("gate failed")]);
  }
}
