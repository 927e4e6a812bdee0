//! Creation factories: producers built from values, iterators, callbacks,
//! timers, and the trivial sentinels.

mod create;
mod defer;
mod from_iter;
mod interval;
mod of;
mod timer;
mod trivial;

pub use create::{create, Create};
pub use defer::{defer, Defer};
pub use from_iter::{from_iter, FromIter};
pub use interval::{interval, Interval};
pub use of::{of, Of};
pub use timer::{timer, Timer};
pub use trivial::{empty, never, throw, Empty, Never, Throw};
