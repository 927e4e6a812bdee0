//! Observer trait and closure adapters.
//!
//! An `Observer` is the consumer side of a subscription: it receives zero or
//! more values, then at most one terminal notification. All methods take
//! `&mut self`, which keeps the trait object-safe — subjects and boxed
//! producers can hold `Box<dyn Observer<_, _>>` without a separate dyn
//! mirror. The at-most-one-terminal rule is enforced one layer up, by
//! [`Subscriber`](crate::subscriber::Subscriber).

use crate::event::Event;

pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the failure that terminates the subscription.
  fn error(&mut self, err: Err);

  /// Receive the notification that the sequence finished normally.
  fn complete(&mut self);

  /// `true` once this observer will not accept further events. Synchronous
  /// sources poll this to stop enumerating early (e.g. under `take`).
  fn is_stopped(&self) -> bool;
}

impl<Item, Err> Observer<Item, Err> for Box<dyn Observer<Item, Err>> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }

  #[inline]
  fn is_stopped(&self) -> bool { (**self).is_stopped() }
}

/// Closure adapter for `subscribe(on_next)`: errors and completion are
/// silently dropped, mirroring the bare `subscribe` of the full-callback
/// variants.
pub struct NextObserver<N>(pub N);

impl<N, Item, Err> Observer<Item, Err> for NextObserver<N>
where
  N: FnMut(Item),
{
  fn next(&mut self, value: Item) { (self.0)(value) }

  fn error(&mut self, _err: Err) {}

  fn complete(&mut self) {}

  fn is_stopped(&self) -> bool { false }
}

/// Closure adapter for the full `{on_next, on_error, on_completed}` triple.
pub struct AllObserver<N, E, C> {
  pub next: N,
  pub error: E,
  pub complete: C,
}

impl<N, E, C, Item, Err> Observer<Item, Err> for AllObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
{
  fn next(&mut self, value: Item) { (self.next)(value) }

  fn error(&mut self, err: Err) { (self.error)(err) }

  fn complete(&mut self) { (self.complete)() }

  fn is_stopped(&self) -> bool { false }
}

/// Closure adapter that materializes every notification into an [`Event`].
pub struct EventObserver<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for EventObserver<F>
where
  F: FnMut(Event<Item, Err>),
{
  fn next(&mut self, value: Item) { (self.0)(Event::Next(value)) }

  fn error(&mut self, err: Err) { (self.0)(Event::Error(err)) }

  fn complete(&mut self) { (self.0)(Event::Completed) }

  fn is_stopped(&self) -> bool { false }
}
