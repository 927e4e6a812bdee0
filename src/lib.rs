//! `rivulet` is a single-threaded, push-based event stream engine.
//!
//! A [`Producer`](producer::Producer) is an inert description of an event
//! sequence; subscribing starts an independent run that pushes zero or more
//! values into an [`Observer`](observer::Observer), followed by at most one
//! terminal event (`Error` or `Completed`). Subscribing returns a
//! [`Disposable`](disposable::Disposable) that cancels the run and releases
//! everything attached to it.
//!
//! The engine is deliberately not thread-safe: delivery is synchronous and
//! cooperative, and the only suspension points are explicit
//! [`Scheduler`](scheduler::Scheduler) boundaries. Time-based operators take
//! a scheduler value from the caller; driving an
//! [`EventLoop`](scheduler::EventLoop) by hand makes their timing fully
//! deterministic.
//!
//! ```
//! use rivulet::prelude::*;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let out = Rc::new(RefCell::new(vec![]));
//! let sink = out.clone();
//!
//! source::from_iter(1..)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 10)
//!   .take(3)
//!   .subscribe(move |v| sink.borrow_mut().push(v));
//!
//! assert_eq!(*out.borrow(), vec![20, 40, 60]);
//! ```

pub mod disposable;
pub mod error;
pub mod event;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod producer;
pub mod scheduler;
pub mod source;
pub mod subject;
pub mod subscriber;

pub use prelude::*;
