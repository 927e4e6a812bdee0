use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Run a callback exactly once when the subscription ends — whether through
/// a terminal event (which auto-disposes the chain) or an explicit dispose.
#[derive(Clone)]
pub struct FinalizeOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F> Producer for FinalizeOp<S, F>
where
  S: Producer,
  F: FnOnce() + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let FinalizeOp { source, func } = self;
    let subscription = Disposable::new();
    subscription.add_teardown(func);
    subscription.add(source.actual_subscribe(observer));
    subscription
  }
}
