use std::{cell::RefCell, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Flatten a producer of producers by following only the most recent inner
/// producer. Each new inner value unsubscribes the previous inner run; the
/// output completes once the outer has completed and the last inner has
/// too.
#[derive(Clone)]
pub struct SwitchLatestOp<S> {
  pub(crate) source: S,
}

struct SwitchState {
  // Identifies the current inner run; stale inner completions are ignored.
  epoch: usize,
  inner_live: bool,
  outer_done: bool,
}

impl<S> Producer for SwitchLatestOp<S>
where
  S: Producer,
  S::Item: Producer<Err = S::Err>,
{
  type Item = <S::Item as Producer>::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Self::Item, S::Err> + 'static,
  {
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());
    let state = Rc::new(RefCell::new(SwitchState {
      epoch: 0,
      inner_live: false,
      outer_done: false,
    }));
    // The slot always holds the current inner subscription, so the group
    // reaches it no matter how many switches happened.
    let slot: Rc<RefCell<Disposable>> =
      Rc::new(RefCell::new(Disposable::new()));
    group.add(slot.clone());

    group.add(self.source.actual_subscribe(SwitchOuterObserver {
      subscriber,
      state,
      slot,
    }));
    group
  }
}

pub struct SwitchOuterObserver<O> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<SwitchState>>,
  slot: Rc<RefCell<Disposable>>,
}

impl<O, P> Observer<P, P::Err> for SwitchOuterObserver<O>
where
  P: Producer,
  O: Observer<P::Item, P::Err> + 'static,
{
  fn next(&mut self, inner: P) {
    if self.subscriber.is_stopped() {
      return;
    }
    let epoch = {
      let mut state = self.state.borrow_mut();
      state.epoch += 1;
      state.inner_live = true;
      state.epoch
    };
    let previous =
      std::mem::replace(&mut *self.slot.borrow_mut(), Disposable::new());
    previous.dispose();

    let handle = inner.actual_subscribe(SwitchInnerObserver {
      subscriber: self.subscriber.clone(),
      state: self.state.clone(),
      epoch,
    });
    *self.slot.borrow_mut() = handle;
  }

  fn error(&mut self, err: P::Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      state.outer_done = true;
      !state.inner_live
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}

pub struct SwitchInnerObserver<O> {
  subscriber: Subscriber<O>,
  state: Rc<RefCell<SwitchState>>,
  epoch: usize,
}

impl<O, Item, Err> Observer<Item, Err> for SwitchInnerObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.subscriber.next(value) }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.borrow_mut();
      if state.epoch != self.epoch {
        return;
      }
      state.inner_live = false;
      state.outer_done
    };
    if finished {
      self.subscriber.complete();
    }
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
