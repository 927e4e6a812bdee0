//! Subjects: producers that are also externally drivable sinks.
//!
//! All variants share one multicast core. Fan-out snapshots the subscriber
//! list before iterating, so a callback that attaches, detaches, or pushes
//! reentrantly cannot corrupt the loop. Subscribers are delivered to in
//! attachment order; once a terminal event is broadcast the core remembers
//! it and hands it to late attachers immediately.
//!
//! Detach callbacks hold only a `Weak` reference to the core: a consumer's
//! `Disposable` never keeps a subject alive.

use std::{
  cell::RefCell,
  rc::{Rc, Weak},
};

use smallvec::SmallVec;

use crate::{
  disposable::Disposable, observer::Observer, subscriber::Subscriber,
};

mod behavior_subject;
mod publish_subject;
mod replay_subject;

pub use behavior_subject::BehaviorSubject;
pub use publish_subject::PublishSubject;
pub use replay_subject::ReplaySubject;

type BoxSubscriber<Item, Err> = Subscriber<Box<dyn Observer<Item, Err>>>;

#[derive(Clone)]
pub(crate) enum Terminal<Err> {
  Error(Err),
  Completed,
}

pub(crate) struct SubjectCore<Item, Err> {
  next_id: usize,
  subscribers: SmallVec<[(usize, BoxSubscriber<Item, Err>); 2]>,
  terminal: Option<Terminal<Err>>,
}

impl<Item, Err> Default for SubjectCore<Item, Err> {
  fn default() -> Self {
    SubjectCore {
      next_id: 0,
      subscribers: SmallVec::new(),
      terminal: None,
    }
  }
}

impl<Item, Err> SubjectCore<Item, Err> {
  pub(crate) fn new() -> Rc<RefCell<Self>> {
    Rc::new(RefCell::new(Self::default()))
  }
}

pub(crate) fn is_terminated<Item, Err>(
  core: &Rc<RefCell<SubjectCore<Item, Err>>>,
) -> bool {
  core.borrow().terminal.is_some()
}

fn deliver_terminal<Item, Err>(
  subscriber: &mut BoxSubscriber<Item, Err>,
  terminal: Terminal<Err>,
) {
  match terminal {
    Terminal::Error(err) => subscriber.error(err),
    Terminal::Completed => subscriber.complete(),
  }
}

/// Attach `observer` to the core. `warmup` replays variant-specific backlog
/// (a behavior value, a replay buffer) into the fresh subscriber before it
/// joins the live list.
pub(crate) fn subscribe_core<Item, Err, O, W>(
  core: &Rc<RefCell<SubjectCore<Item, Err>>>,
  observer: O,
  warmup: W,
) -> Disposable
where
  Item: 'static,
  Err: Clone + 'static,
  O: Observer<Item, Err> + 'static,
  W: FnOnce(&mut BoxSubscriber<Item, Err>),
{
  let handle = Disposable::new();
  let boxed: Box<dyn Observer<Item, Err>> = Box::new(observer);
  let mut subscriber = Subscriber::new(boxed, handle.clone());

  let terminal = core.borrow().terminal.clone();
  warmup(&mut subscriber);
  if let Some(terminal) = terminal {
    deliver_terminal(&mut subscriber, terminal);
    return handle;
  }
  if subscriber.is_stopped() {
    return handle;
  }

  let id = {
    let mut core = core.borrow_mut();
    let id = core.next_id;
    core.next_id += 1;
    core.subscribers.push((id, subscriber));
    id
  };

  let weak = Rc::downgrade(core);
  handle.add_teardown(move || detach(&weak, id));
  handle
}

fn detach<Item, Err>(
  core: &Weak<RefCell<SubjectCore<Item, Err>>>,
  id: usize,
) {
  if let Some(core) = core.upgrade() {
    // During a fan-out the core is unborrowed (snapshot-then-iterate); a
    // failed borrow means a reentrant attach is in flight, and the stopped
    // entry will be pruned on the next broadcast instead.
    if let Ok(mut core) = core.try_borrow_mut() {
      core.subscribers.retain(|(sid, _)| *sid != id);
    }
  }
}

pub(crate) fn broadcast_next<Item, Err>(
  core: &Rc<RefCell<SubjectCore<Item, Err>>>,
  value: Item,
) where
  Item: Clone + 'static,
  Err: 'static,
{
  let mut snapshot: SmallVec<[BoxSubscriber<Item, Err>; 2]> = {
    let mut core = core.borrow_mut();
    if core.terminal.is_some() {
      return;
    }
    core.subscribers.retain(|(_, s)| !s.is_stopped());
    core.subscribers.iter().map(|(_, s)| s.clone()).collect()
  };
  for subscriber in snapshot.iter_mut() {
    subscriber.next(value.clone());
  }
}

pub(crate) fn broadcast_terminal<Item, Err>(
  core: &Rc<RefCell<SubjectCore<Item, Err>>>,
  terminal: Terminal<Err>,
) where
  Item: 'static,
  Err: Clone + 'static,
{
  let snapshot = {
    let mut core = core.borrow_mut();
    if core.terminal.is_some() {
      return;
    }
    core.terminal = Some(terminal.clone());
    std::mem::take(&mut core.subscribers)
  };
  for (_, mut subscriber) in snapshot {
    deliver_terminal(&mut subscriber, terminal.clone());
  }
}
