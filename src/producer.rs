//! The producer trait: an inert, composable description of an event
//! sequence.
//!
//! A `Producer` owns no running state. Subscribing starts an independent run
//! and hands back the [`Disposable`] that cancels it; composing operators
//! wraps one description in another without running anything. Descriptions
//! that need to be subscribed more than once are `Clone`.

use std::time::Duration;

use crate::{
  disposable::Disposable,
  error::TimeoutError,
  event::Event,
  observer::{AllObserver, EventObserver, NextObserver, Observer},
  ops::{
    box_it::BoxedProducer,
    catch_error::CatchErrorOp,
    combine_latest::CombineLatestOp,
    debounce::DebounceOp,
    debug::DebugOp,
    delay::DelayOp,
    distinct_until_changed::DistinctUntilChangedOp,
    filter::FilterOp,
    finalize::FinalizeOp,
    flat_map::FlatMapOp,
    map::MapOp,
    map_err::MapErrOp,
    merge::MergeOp,
    observe_on::ObserveOnOp,
    retry::RetryOp,
    scan::ScanOp,
    share::ShareOp,
    skip::SkipOp,
    skip_until::SkipUntilOp,
    skip_while::SkipWhileOp,
    start_with::StartWithOp,
    subscribe_on::SubscribeOnOp,
    switch_latest::SwitchLatestOp,
    take::TakeOp,
    take_until::TakeUntilOp,
    take_while::TakeWhileOp,
    tap::TapOp,
    throttle::ThrottleOp,
    timeout::TimeoutOp,
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
  },
  scheduler::Scheduler,
  subscriber::Subscriber,
};

pub trait Producer {
  type Item: 'static;
  type Err: 'static;

  /// Begin this producer's run against `observer` and return the upstream
  /// teardown. Implementations receive the raw downstream observer; the
  /// consumer-boundary guarantees (single terminal, drop-after-dispose)
  /// are layered on by [`ProducerExt::subscribe_observer`].
  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Self::Item, Self::Err> + 'static;
}

/// The subscription and operator surface, blanket-implemented for every
/// producer.
pub trait ProducerExt: Producer + Sized {
  /// Subscribe with a values-only callback; errors and completion are
  /// dropped.
  fn subscribe<N>(self, next: N) -> Disposable
  where
    N: FnMut(Self::Item) + 'static,
  {
    self.subscribe_observer(NextObserver(next))
  }

  /// Subscribe with the full `{on_next, on_error, on_completed}` triple.
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Disposable
  where
    N: FnMut(Self::Item) + 'static,
    E: FnMut(Self::Err) + 'static,
    C: FnMut() + 'static,
  {
    self.subscribe_observer(AllObserver { next, error, complete })
  }

  /// Subscribe with a single callback receiving materialized [`Event`]s.
  fn subscribe_events<F>(self, f: F) -> Disposable
  where
    F: FnMut(Event<Self::Item, Self::Err>) + 'static,
  {
    self.subscribe_observer(EventObserver(f))
  }

  /// Subscribe a custom observer. This is the consumer boundary: the
  /// observer is wrapped in the delivery guard, and the handle returned here
  /// is the one a terminal event auto-disposes.
  fn subscribe_observer<O>(self, observer: O) -> Disposable
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    let handle = Disposable::new();
    let subscriber = Subscriber::new(observer, handle.clone());
    let upstream = self.actual_subscribe(subscriber);
    // If the run already terminated, the handle is disposed and `add`
    // releases the upstream immediately.
    handle.add(upstream);
    handle
  }

  // ---- transformation ----

  fn map<B, F>(self, func: F) -> MapOp<Self, F>
  where
    B: 'static,
    F: FnMut(Self::Item) -> B + 'static,
  {
    MapOp { source: self, func }
  }

  fn map_err<E2, F>(self, func: F) -> MapErrOp<Self, F>
  where
    E2: 'static,
    F: FnMut(Self::Err) -> E2 + 'static,
  {
    MapErrOp { source: self, func }
  }

  /// Map every value to an inner producer and merge all inner outputs,
  /// unbounded.
  fn flat_map<P2, F>(self, func: F) -> FlatMapOp<Self, F>
  where
    P2: Producer<Err = Self::Err>,
    F: FnMut(Self::Item) -> P2 + 'static,
  {
    FlatMapOp { source: self, func }
  }

  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + 'static,
  {
    FilterOp { source: self, predicate }
  }

  /// Stateful left-fold emitting the running accumulator on every value.
  fn scan<B, F>(self, seed: B, func: F) -> ScanOp<Self, B, F>
  where
    B: Clone + 'static,
    F: FnMut(B, Self::Item) -> B + 'static,
  {
    ScanOp { source: self, seed, func }
  }

  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self>
  where
    Self::Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp { source: self }
  }

  // ---- gating ----

  fn take(self, count: usize) -> TakeOp<Self> {
    TakeOp { source: self, count }
  }

  fn take_while<F>(self, predicate: F) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + 'static,
  {
    TakeWhileOp { source: self, predicate }
  }

  /// Mirror the source until `notifier` emits its first value, then
  /// complete and release the source.
  fn take_until<N>(self, notifier: N) -> TakeUntilOp<Self, N>
  where
    N: Producer<Err = Self::Err>,
  {
    TakeUntilOp { source: self, notifier }
  }

  fn skip(self, count: usize) -> SkipOp<Self> {
    SkipOp { source: self, count }
  }

  fn skip_while<F>(self, predicate: F) -> SkipWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + 'static,
  {
    SkipWhileOp { source: self, predicate }
  }

  /// Suppress values until `notifier` emits its first value.
  fn skip_until<N>(self, notifier: N) -> SkipUntilOp<Self, N>
  where
    N: Producer<Err = Self::Err>,
  {
    SkipUntilOp { source: self, notifier }
  }

  /// Emit the given values synchronously before any upstream event.
  fn start_with<I>(self, values: I) -> StartWithOp<Self, Self::Item>
  where
    I: IntoIterator<Item = Self::Item>,
  {
    StartWithOp { source: self, values: values.into_iter().collect() }
  }

  // ---- combination ----

  fn merge<S2>(self, other: S2) -> MergeOp<Self, S2>
  where
    S2: Producer<Item = Self::Item, Err = Self::Err>,
  {
    MergeOp { a: self, b: other }
  }

  fn zip<S2>(self, other: S2) -> ZipOp<Self, S2>
  where
    S2: Producer<Err = Self::Err>,
  {
    ZipOp { a: self, b: other }
  }

  fn combine_latest<S2>(self, other: S2) -> CombineLatestOp<Self, S2>
  where
    S2: Producer<Err = Self::Err>,
  {
    CombineLatestOp { a: self, b: other }
  }

  /// Emit on every value of `self`, paired with the most recent value of
  /// `other`; suppressed until `other` has emitted at least once.
  fn with_latest_from<S2>(self, other: S2) -> WithLatestFromOp<Self, S2>
  where
    S2: Producer<Err = Self::Err>,
  {
    WithLatestFromOp { primary: self, secondary: other }
  }

  /// For a producer of producers: follow only the most recent inner
  /// producer, unsubscribing from the previous one on each switch.
  fn switch_latest(self) -> SwitchLatestOp<Self>
  where
    Self::Item: Producer<Err = Self::Err>,
  {
    SwitchLatestOp { source: self }
  }

  // ---- time ----

  fn debounce<SD>(self, interval: Duration, scheduler: SD) -> DebounceOp<Self, SD>
  where
    SD: Scheduler,
  {
    DebounceOp { source: self, interval, scheduler }
  }

  /// At most one value per `interval`: the first value of a burst goes out
  /// at once, the freshest later one when the window closes.
  fn throttle<SD>(self, interval: Duration, scheduler: SD) -> ThrottleOp<Self, SD>
  where
    SD: Scheduler,
  {
    ThrottleOp { source: self, interval, scheduler }
  }

  fn delay<SD>(self, interval: Duration, scheduler: SD) -> DelayOp<Self, SD>
  where
    SD: Scheduler,
  {
    DelayOp { source: self, interval, scheduler }
  }

  /// Fail with [`TimeoutError`] if no event arrives within `bound` of the
  /// subscription or of the previous value.
  fn timeout<SD>(self, bound: Duration, scheduler: SD) -> TimeoutOp<Self, SD>
  where
    SD: Scheduler,
    Self::Err: From<TimeoutError>,
  {
    TimeoutOp { source: self, bound, scheduler }
  }

  /// Relocate downstream delivery onto `scheduler`.
  fn observe_on<SD>(self, scheduler: SD) -> ObserveOnOp<Self, SD>
  where
    SD: Scheduler,
  {
    ObserveOnOp { source: self, scheduler }
  }

  /// Relocate the subscription side effect onto `scheduler`.
  fn subscribe_on<SD>(self, scheduler: SD) -> SubscribeOnOp<Self, SD>
  where
    SD: Scheduler,
  {
    SubscribeOnOp { source: self, scheduler }
  }

  // ---- errors ----

  /// Resubscribe on error, `attempts` runs in total (the first one
  /// included), before letting the final error through.
  fn retry(self, attempts: usize) -> RetryOp<Self>
  where
    Self: Clone,
  {
    RetryOp { source: self, attempts }
  }

  /// On error, switch to the producer built by `handler` instead of
  /// propagating.
  fn catch_error<F, P2>(self, handler: F) -> CatchErrorOp<Self, F>
  where
    P2: Producer<Item = Self::Item>,
    F: FnMut(Self::Err) -> P2 + 'static,
  {
    CatchErrorOp { source: self, handler }
  }

  // ---- utility ----

  /// Run a side effect on every value without altering the stream.
  fn tap<F>(self, func: F) -> TapOp<Self, F>
  where
    F: FnMut(&Self::Item) + 'static,
  {
    TapOp { source: self, func }
  }

  /// Log subscription lifecycle events through `tracing`.
  fn debug(self, label: &str) -> DebugOp<Self> {
    DebugOp { source: self, label: label.to_owned() }
  }

  /// Run `func` exactly once when the subscription ends, whether by
  /// terminal event or by disposal.
  fn finalize<F>(self, func: F) -> FinalizeOp<Self, F>
  where
    F: FnOnce() + 'static,
  {
    FinalizeOp { source: self, func }
  }

  /// Multiplex one upstream run across all concurrent subscribers,
  /// replaying up to `replay` buffered values to late attachers. Upstream
  /// connects on the first attach and fully resets when the last subscriber
  /// leaves.
  fn share(self, replay: usize) -> ShareOp<Self>
  where
    Self: Clone,
    Self::Item: Clone,
    Self::Err: Clone,
  {
    ShareOp::new(self, replay)
  }

  /// Erase the concrete producer type.
  fn box_it(self) -> BoxedProducer<Self::Item, Self::Err>
  where
    Self: 'static,
  {
    BoxedProducer::new(self)
  }
}

impl<P: Producer> ProducerExt for P {}
