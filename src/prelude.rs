//! The one-line import for working with streams.

pub use crate::{
  disposable::{Disposable, Dispose, DisposeBag},
  error::{StreamError, TimeoutError},
  event::Event,
  observer::{AllObserver, EventObserver, NextObserver, Observer},
  producer::{Producer, ProducerExt},
  scheduler::{EventLoop, ImmediateScheduler, LoopScheduler, Scheduler},
  source,
  subject::{BehaviorSubject, PublishSubject, ReplaySubject},
  subscriber::Subscriber,
};
