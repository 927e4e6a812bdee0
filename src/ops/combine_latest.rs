use std::{cell::RefCell, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Emit the latest pair whenever either side produces a value; silent until
/// both sides have produced at least once. Completes when both sides have
/// completed.
#[derive(Clone)]
pub struct CombineLatestOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

struct CombineState<A, B> {
  a: Option<A>,
  b: Option<B>,
  a_done: bool,
  b_done: bool,
}

impl<A, B> Producer for CombineLatestOp<A, B>
where
  A: Producer,
  B: Producer<Err = A::Err>,
  A::Item: Clone,
  B::Item: Clone,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<(A::Item, B::Item), A::Err> + 'static,
  {
    let CombineLatestOp { a, b } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let state = Rc::new(RefCell::new(CombineState {
      a: None,
      b: None,
      a_done: false,
      b_done: false,
    }));

    group.add(a.actual_subscribe(CombineObserverA {
      subscriber: subscriber.clone(),
      state: state.clone(),
    }));
    group.add(b.actual_subscribe(CombineObserverB { subscriber, state }));
    group
  }
}

pub struct CombineObserverA<O, A, B> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<CombineState<A, B>>>,
}

impl<O, A, B, Err> Observer<A, Err> for CombineObserverA<O, A, B>
where
  O: Observer<(A, B), Err>,
  A: Clone,
  B: Clone,
{
  fn next(&mut self, value: A) {
    let pair = {
      let mut state = self.state.borrow_mut();
      state.a = Some(value);
      state.a.clone().zip(state.b.clone())
    };
    if let Some(pair) = pair {
      self.subscriber.next(pair);
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.a_done = true;
      state.b_done
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

pub struct CombineObserverB<O, A, B> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<CombineState<A, B>>>,
}

impl<O, A, B, Err> Observer<B, Err> for CombineObserverB<O, A, B>
where
  O: Observer<(A, B), Err>,
  A: Clone,
  B: Clone,
{
  fn next(&mut self, value: B) {
    let pair = {
      let mut state = self.state.borrow_mut();
      state.b = Some(value);
      state.a.clone().zip(state.b.clone())
    };
    if let Some(pair) = pair {
      self.subscriber.next(pair);
    }
  }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.b_done = true;
      state.a_done
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
