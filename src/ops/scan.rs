use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Stateful left-fold: emits the running accumulator on every value and
/// leaves error/completion forwarding untouched.
#[derive(Clone)]
pub struct ScanOp<S, B, F> {
  pub(crate) source: S,
  pub(crate) seed: B,
  pub(crate) func: F,
}

impl<S, B, F> Producer for ScanOp<S, B, F>
where
  S: Producer,
  B: Clone + 'static,
  F: FnMut(B, S::Item) -> B + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<B, S::Err> + 'static,
  {
    let ScanOp { source, seed, func } = self;
    source.actual_subscribe(ScanObserver { observer, acc: seed, func })
  }
}

pub struct ScanObserver<O, B, F> {
  observer: O,
  acc: B,
  func: F,
}

impl<O, B, F, Item, Err> Observer<Item, Err> for ScanObserver<O, B, F>
where
  O: Observer<B, Err>,
  B: Clone,
  F: FnMut(B, Item) -> B,
{
  fn next(&mut self, value: Item) {
    self.acc = (self.func)(self.acc.clone(), value);
    self.observer.next(self.acc.clone());
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}
