//! The operator library: pure transformations from producer to producer.
//!
//! Every operator is a value wrapping its source, paired with an observer
//! that rewrites the event flow. Composition builds descriptions only;
//! nothing runs until subscribe.

pub mod box_it;
pub mod catch_error;
pub mod combine_latest;
pub mod debounce;
pub mod debug;
pub mod delay;
pub mod distinct_until_changed;
pub mod filter;
pub mod finalize;
pub mod flat_map;
pub mod map;
pub mod map_err;
pub mod merge;
pub mod observe_on;
pub mod retry;
pub mod scan;
pub mod share;
pub mod skip;
pub mod skip_until;
pub mod skip_while;
pub mod start_with;
pub mod subscribe_on;
pub mod switch_latest;
pub mod take;
pub mod take_until;
pub mod take_while;
pub mod tap;
pub mod throttle;
pub mod timeout;
pub mod with_latest_from;
pub mod zip;
