use std::{cell::Cell, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Interleave two sources of the same item type in arrival order. The
/// output completes once both inputs have completed; the first error from
/// either side terminates it immediately.
#[derive(Clone)]
pub struct MergeOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A, B> Producer for MergeOp<A, B>
where
  A: Producer,
  B: Producer<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<A::Item, A::Err> + 'static,
  {
    let MergeOp { a, b } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let remaining = Rc::new(Cell::new(2));

    group.add(a.actual_subscribe(MergeObserver {
      subscriber: subscriber.clone(),
      remaining: remaining.clone(),
    }));
    group.add(b.actual_subscribe(MergeObserver { subscriber, remaining }));
    group
  }
}

pub struct MergeObserver<O> {
  subscriber: Subscriber<O>,
  remaining: Rc<Cell<usize>>,
}

impl<O, Item, Err> Observer<Item, Err> for MergeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.subscriber.next(value) }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    self.remaining.set(self.remaining.get().saturating_sub(1));
    if self.remaining.get() == 0 {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{event::Event, prelude::*};

  #[test]
  fn interleaves_in_arrival_order() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let mut a = PublishSubject::<&'static str, ()>::new();
    let mut b = PublishSubject::<&'static str, ()>::new();

    a.clone()
      .merge(b.clone())
      .subscribe(move |v| sink.borrow_mut().push(v));

    a.next("a1");
    b.next("b1");
    a.next("a2");

    assert_eq!(*out.borrow(), vec!["a1", "b1", "a2"]);
  }

  #[test]
  fn completes_only_after_both_sides() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let mut a = PublishSubject::<i32, ()>::new();
    let mut b = PublishSubject::<i32, ()>::new();

    a.clone()
      .merge(b.clone())
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    a.complete();
    b.next(1);
    b.complete();

    assert_eq!(
      *events.borrow(),
      vec![Event::Next(1), Event::Completed]
    );
  }

  #[test]
  fn first_error_wins() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let mut a = PublishSubject::<i32, &'static str>::new();
    let mut b = PublishSubject::<i32, &'static str>::new();

    a.clone()
      .merge(b.clone())
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    a.error("boom");
    b.next(1);

    assert_eq!(*events.borrow(), vec![Event::Error("boom")]);
    assert_eq!(b.subscriber_count(), 0);
  }

  #[test]
  fn merges_synchronous_sources() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();

    source::from_iter(0..2)
      .merge(source::from_iter(10..12))
      .subscribe(move |v| sink.borrow_mut().push(v));

    assert_eq!(*out.borrow(), vec![0, 1, 10, 11]);
  }
}
