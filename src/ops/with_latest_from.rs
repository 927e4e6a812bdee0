use std::{cell::RefCell, marker::PhantomData, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Emit on every primary value, paired with the most recent secondary
/// value. Primary values arriving before the secondary has produced
/// anything are dropped. Only the primary's completion completes the
/// output.
#[derive(Clone)]
pub struct WithLatestFromOp<P, S> {
  pub(crate) primary: P,
  pub(crate) secondary: S,
}

impl<P, S> Producer for WithLatestFromOp<P, S>
where
  P: Producer,
  S: Producer<Err = P::Err>,
  S::Item: Clone,
{
  type Item = (P::Item, S::Item);
  type Err = P::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<(P::Item, S::Item), P::Err> + 'static,
  {
    let WithLatestFromOp { primary, secondary } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let latest: Rc<RefCell<Option<S::Item>>> = Rc::new(RefCell::new(None));

    group.add(secondary.actual_subscribe(LatestObserver {
      subscriber: subscriber.clone(),
      latest: latest.clone(),
      _marker: PhantomData,
    }));
    group.add(primary.actual_subscribe(WithLatestObserver {
      subscriber,
      latest,
    }));
    group
  }
}

pub struct WithLatestObserver<O, B> {
  subscriber: Subscriber<O>,
  latest: Rc<RefCell<Option<B>>>,
}

impl<O, A, B, Err> Observer<A, Err> for WithLatestObserver<O, B>
where
  O: Observer<(A, B), Err>,
  B: Clone,
{
  fn next(&mut self, value: A) {
    let snapshot = self.latest.borrow().clone();
    if let Some(latest) = snapshot {
      self.subscriber.next((value, latest));
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) { self.subscriber.complete() }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

pub struct LatestObserver<O, A, B> {
  subscriber: Subscriber<O>,
  latest: Rc<RefCell<Option<B>>>,
  _marker: PhantomData<fn() -> A>,
}

impl<O, A, B, Err> Observer<B, Err> for LatestObserver<O, A, B>
where
  O: Observer<(A, B), Err>,
{
  fn next(&mut self, value: B) { *self.latest.borrow_mut() = Some(value) }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    // The secondary running dry only freezes the latest value.
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{event::Event, prelude::*};

  #[test]
  fn pairs_with_the_most_recent_secondary_value() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let mut clicks = PublishSubject::<i32, ()>::new();
    let mut text = PublishSubject::<&'static str, ()>::new();

    clicks
      .clone()
      .with_latest_from(text.clone())
      .subscribe(move |v| sink.borrow_mut().push(v));

    clicks.next(1);
    text.next("a");
    clicks.next(2);
    text.next("b");
    text.next("c");
    clicks.next(3);

    assert_eq!(*out.borrow(), vec![(2, "a"), (3, "c")]);
  }

  #[test]
  fn secondary_completion_freezes_the_latest_value() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let mut clicks = PublishSubject::<i32, ()>::new();
    let mut text = PublishSubject::<&'static str, ()>::new();

    clicks
      .clone()
      .with_latest_from(text.clone())
      .subscribe(move |v| sink.borrow_mut().push(v));

    text.next("a");
    text.complete();
    clicks.next(1);

    assert_eq!(*out.borrow(), vec![(1, "a")]);
  }

  #[test]
  fn primary_completion_ends_the_output() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let mut clicks = PublishSubject::<i32, ()>::new();
    let text = PublishSubject::<&'static str, ()>::new();

    clicks
      .clone()
      .with_latest_from(text.clone())
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    clicks.complete();
    assert_eq!(*events.borrow(), vec![Event::Completed]);
    assert_eq!(text.subscriber_count(), 0);
  }
}
