use std::fmt::Debug;

use tracing::debug;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Trace the full lifecycle of a subscription under `label`: subscribe,
/// every event, and disposal. The stream itself passes through untouched.
#[derive(Clone)]
pub struct DebugOp<S> {
  pub(crate) source: S,
  pub(crate) label: String,
}

impl<S> Producer for DebugOp<S>
where
  S: Producer,
  S::Item: Debug,
  S::Err: Debug,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let DebugOp { source, label } = self;
    debug!(target: "rivulet", stream = %label, "subscribed");

    let subscription = Disposable::new();
    {
      let label = label.clone();
      subscription.add_teardown(move || {
        debug!(target: "rivulet", stream = %label, "disposed");
      });
    }
    subscription
      .add(source.actual_subscribe(DebugObserver { observer, label }));
    subscription
  }
}

pub struct DebugObserver<O> {
  observer: O,
  label: String,
}

impl<O, Item, Err> Observer<Item, Err> for DebugObserver<O>
where
  O: Observer<Item, Err>,
  Item: Debug,
  Err: Debug,
{
  fn next(&mut self, value: Item) {
    debug!(target: "rivulet", stream = %self.label, "next: {value:?}");
    self.observer.next(value);
  }

  fn error(&mut self, err: Err) {
    debug!(target: "rivulet", stream = %self.label, "error: {err:?}");
    self.observer.error(err);
  }

  fn complete(&mut self) {
    debug!(target: "rivulet", stream = %self.label, "completed");
    self.observer.complete();
  }

  fn is_stopped(&self) -> bool { self.observer.is_stopped() }
}
