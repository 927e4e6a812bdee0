use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Pair values strictly by index: the nth output is the tuple of the nth
/// value of each side. Unmatched values wait in a queue; the output
/// completes as soon as one side completes with an empty queue, since no
/// further pair can form.
#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

struct ZipState<A, B> {
  a: VecDeque<A>,
  b: VecDeque<B>,
  a_done: bool,
  b_done: bool,
}

impl<A, B> ZipState<A, B> {
  /// Once a pair is taken, a finished side with a drained queue means the
  /// stream is over.
  fn is_exhausted(&self) -> bool {
    (self.a_done && self.a.is_empty()) || (self.b_done && self.b.is_empty())
  }
}

impl<A, B> Producer for ZipOp<A, B>
where
  A: Producer,
  B: Producer<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<(A::Item, B::Item), A::Err> + 'static,
  {
    let ZipOp { a, b } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let state = Rc::new(RefCell::new(ZipState {
      a: VecDeque::new(),
      b: VecDeque::new(),
      a_done: false,
      b_done: false,
    }));

    group.add(a.actual_subscribe(ZipObserverA {
      subscriber: subscriber.clone(),
      state: state.clone(),
    }));
    group.add(b.actual_subscribe(ZipObserverB { subscriber, state }));
    group
  }
}

pub struct ZipObserverA<O, A, B> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<ZipState<A, B>>>,
}

impl<O, A, B, Err> Observer<A, Err> for ZipObserverA<O, A, B>
where
  O: Observer<(A, B), Err>,
{
  fn next(&mut self, value: A) {
    // Decide under the borrow, deliver with it released.
    let (pair, exhausted) = {
      let mut state = self.state.borrow_mut();
      state.a.push_back(value);
      let pair = if state.b.is_empty() {
        None
      } else {
        state.a.pop_front().zip(state.b.pop_front())
      };
      let exhausted = pair.is_some() && state.is_exhausted();
      (pair, exhausted)
    };
    if let Some(pair) = pair {
      self.subscriber.next(pair);
    }
    if exhausted {
      self.subscriber.complete();
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.a_done = true;
      state.a.is_empty()
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

pub struct ZipObserverB<O, A, B> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<ZipState<A, B>>>,
}

impl<O, A, B, Err> Observer<B, Err> for ZipObserverB<O, A, B>
where
  O: Observer<(A, B), Err>,
{
  fn next(&mut self, value: B) {
    let (pair, exhausted) = {
      let mut state = self.state.borrow_mut();
      state.b.push_back(value);
      let pair = if state.a.is_empty() {
        None
      } else {
        state.a.pop_front().zip(state.b.pop_front())
      };
      let exhausted = pair.is_some() && state.is_exhausted();
      (pair, exhausted)
    };
    if let Some(pair) = pair {
      self.subscriber.next(pair);
    }
    if exhausted {
      self.subscriber.complete();
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.b_done = true;
      state.b.is_empty()
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
