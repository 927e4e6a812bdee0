use std::{cell::RefCell, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Map every value to an inner producer and merge the outputs of all live
/// inner runs. Inner values interleave in arrival order. The output
/// completes once the outer and every inner run have completed; any error,
/// outer or inner, ends the output at once.
#[derive(Clone)]
pub struct FlatMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

struct FlatMapState {
  active: usize,
  outer_done: bool,
}

impl<S, F, P2> Producer for FlatMapOp<S, F>
where
  S: Producer,
  P2: Producer<Err = S::Err>,
  F: FnMut(S::Item) -> P2 + 'static,
{
  type Item = P2::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<P2::Item, S::Err> + 'static,
  {
    let FlatMapOp { source, func } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let state = Rc::new(RefCell::new(FlatMapState {
      active: 0,
      outer_done: false,
    }));

    group.add(source.actual_subscribe(FlatMapOuterObserver {
      subscriber,
      func,
      state,
      // Inner handles park here; spent ones are pruned by `add`.
      group: group.clone(),
    }));
    group
  }
}

pub struct FlatMapOuterObserver<O, F> {
  subscriber: Subscriber<O>,
  func: F,
  state: Rc<RefCell<FlatMapState>>,
  group: Disposable,
}

impl<O, F, P2, Item, Err> Observer<Item, Err> for FlatMapOuterObserver<O, F>
where
  P2: Producer<Err = Err>,
  F: FnMut(Item) -> P2 + 'static,
  O: Observer<P2::Item, Err> + 'static,
{
  fn next(&mut self, value: Item) {
    if self.subscriber.is_stopped() {
      return;
    }
    let inner = (self.func)(value);
    self.state.borrow_mut().active += 1;
    self.group.add(inner.actual_subscribe(FlatMapInnerObserver {
      subscriber: self.subscriber.clone(),
      state: self.state.clone(),
    }));
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.outer_done = true;
      state.active == 0
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

pub struct FlatMapInnerObserver<O> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<FlatMapState>>,
}

impl<O, Item, Err> Observer<Item, Err> for FlatMapInnerObserver<O>
where
  O: Observer<Item, Err> + 'static,
{
  fn next(&mut self, value: Item) { self.subscriber.next(value) }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.active = state.active.saturating_sub(1);
      state.outer_done && state.active == 0
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc, time::Duration};

  use crate::{event::Event, prelude::*};

  #[test]
  fn inner_values_interleave_in_arrival_order() {
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let event_loop = EventLoop::new();
    let scheduler = event_loop.scheduler();

    source::from_iter([10u64, 20])
      .flat_map(move |base| {
        let first =
          source::timer(Duration::from_millis(base), scheduler.clone())
            .map(move |_| base);
        let second =
          source::timer(Duration::from_millis(base + 15), scheduler.clone())
            .map(move |_| base + 1);
        first.merge(second)
      })
      .subscribe(move |v| sink.borrow_mut().push(v));

    event_loop.run_until_idle();
    assert_eq!(*out.borrow(), vec![10, 20, 11, 21]);
  }

  #[test]
  fn completes_only_after_the_outer_and_every_inner() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();
    let mut outer = PublishSubject::<i32, ()>::new();
    let mut slow = PublishSubject::<i32, ()>::new();
    let inner = slow.clone();

    outer
      .clone()
      .flat_map(move |v| inner.clone().start_with([v]))
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    outer.next(1);
    outer.next(2);
    outer.complete();
    assert!(!events.borrow().contains(&Event::Completed));

    slow.next(7);
    slow.complete();
    assert_eq!(
      *events.borrow(),
      vec![
        Event::Next(1),
        Event::Next(2),
        Event::Next(7),
        Event::Next(7),
        Event::Completed
      ]
    );
  }

  #[test]
  fn an_inner_error_ends_the_output() {
    let events = Rc::new(RefCell::new(vec![]));
    let sink = events.clone();

    source::from_iter([1, 2])
      .map_err(|_| "inner")
      .flat_map(|v| {
        if v == 2 {
          source::throw::<&'static str, i32>("inner").box_it()
        } else {
          source::of(v).map_err(|_| "inner").box_it()
        }
      })
      .subscribe_events(move |ev| sink.borrow_mut().push(ev));

    assert_eq!(
      *events.borrow(),
      vec![Event::Next(1), Event::Error("inner")]
    );
  }

  #[test]
  fn disposal_reaches_every_live_inner_run() {
    let mut outer = PublishSubject::<i32, ()>::new();
    let inner = PublishSubject::<i32, ()>::new();
    let feed = inner.clone();

    let handle = outer
      .clone()
      .flat_map(move |_| feed.clone())
      .subscribe(|_| {});

    outer.next(1);
    outer.next(2);
    assert_eq!(inner.subscriber_count(), 2);

    handle.dispose();
    assert_eq!(inner.subscriber_count(), 0);
    assert_eq!(outer.subscriber_count(), 0);
  }
}
