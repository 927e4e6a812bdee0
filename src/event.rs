//! The tagged event type flowing through every subscription.

/// One notification on a subscription: zero or more `Next` values followed by
/// at most one terminal (`Error` xor `Completed`). The single-terminal rule
/// is enforced by the engine's [`Subscriber`](crate::subscriber::Subscriber)
/// guard, not by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<Item, Err> {
  Next(Item),
  Error(Err),
  Completed,
}

impl<Item, Err> Event<Item, Err> {
  pub fn is_next(&self) -> bool { matches!(self, Event::Next(_)) }

  pub fn is_error(&self) -> bool { matches!(self, Event::Error(_)) }

  pub fn is_completed(&self) -> bool { matches!(self, Event::Completed) }

  /// Terminal events end the subscription and trigger auto-disposal.
  pub fn is_terminal(&self) -> bool { !self.is_next() }

  pub fn value(&self) -> Option<&Item> {
    match self {
      Event::Next(v) => Some(v),
      _ => None,
    }
  }
}
