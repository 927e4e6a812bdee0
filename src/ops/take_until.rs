use std::marker::PhantomData;

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subscriber::Subscriber,
};

/// Mirror the source until the notifier emits its first value, then
/// complete and release both subscriptions.
///
/// A notifier that completes without emitting has no effect; a notifier
/// error terminates the output.
#[derive(Clone)]
pub struct TakeUntilOp<S, N> {
  pub(crate) source: S,
  pub(crate) notifier: N,
}

impl<S, N> Producer for TakeUntilOp<S, N>
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
    let TakeUntilOp { source, notifier } = self;
    let group = Disposable::new();
    let subscriber = Subscriber::new(observer, group.clone());

    // The notifier attaches first so a synchronous notification stops the
    // source before it emits anything.
    group.add(notifier.actual_subscribe(TakeUntilNotifier {
      subscriber: subscriber.clone(),
      _marker: PhantomData,
    }));
    group.add(source.actual_subscribe(subscriber));
    group
  }
}

pub struct TakeUntilNotifier<O, Item> {
  subscriber: Subscriber<O>,
  _marker: PhantomData<fn() -> Item>,
}

impl<O, Item, Err, NotifierItem> Observer<NotifierItem, Err>
  for TakeUntilNotifier<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _value: NotifierItem) { self.subscriber.complete() }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    // A notifier that runs dry never fires; the source keeps going.
  }

  fn is_stopped(&self) -> bool { self.subscriber.is_stopped() }
}
