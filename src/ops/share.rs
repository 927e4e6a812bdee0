use std::{cell::RefCell, rc::Rc};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
  subject::ReplaySubject, subscriber::Subscriber,
};

/// Multiplex one upstream run across all concurrent subscribers through a
/// replay subject.
///
/// The first attach connects the upstream; later attachers join the live
/// run and receive up to `replay` buffered values first. The connection is
/// reference-counted: when the last subscriber detaches, the upstream is
/// released and the buffer discarded, so the next attach starts a fresh
/// run.
pub struct ShareOp<S: Producer> {
  source: S,
  replay: usize,
  state: Rc<RefCell<Option<Connection<S::Item, S::Err>>>>,
}

struct Connection<Item, Err> {
  subject: ReplaySubject<Item, Err>,
  upstream: Disposable,
  count: usize,
}

impl<S: Producer> ShareOp<S> {
  pub(crate) fn new(source: S, replay: usize) -> Self {
    ShareOp {
      source,
      replay,
      state: Rc::new(RefCell::new(None)),
    }
  }
}

// Clones share the connection state; that is what makes them one shared
// stream rather than independent copies.
impl<S: Producer + Clone> Clone for ShareOp<S> {
  fn clone(&self) -> Self {
    ShareOp {
      source: self.source.clone(),
      replay: self.replay,
      state: self.state.clone(),
    }
  }
}

impl<S> Producer for ShareOp<S>
where
  S: Producer + Clone,
  S::Item: Clone,
  S::Err: Clone,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    let ShareOp { source, replay, state } = self;

    let (subject, connect) = {
      let mut state = state.borrow_mut();
      match state.as_mut() {
        Some(connection) => {
          connection.count += 1;
          (connection.subject.clone(), false)
        }
        None => {
          let subject = ReplaySubject::new(replay);
          *state = Some(Connection {
            subject: subject.clone(),
            upstream: Disposable::new(),
            count: 1,
          });
          (subject, true)
        }
      }
    };

    // Attach before connecting, so the first subscriber sees everything a
    // synchronous upstream emits. Local guard: a terminal from the shared
    // run must dispose this handle, or the refcount would never drop.
    let handle = Disposable::new();
    let attachment = subject
      .clone()
      .actual_subscribe(Subscriber::new(observer, handle.clone()));
    handle.add(attachment);

    if connect {
      let upstream = source.actual_subscribe(subject);
      if let Some(connection) = state.borrow_mut().as_mut() {
        connection.upstream = upstream;
      } else {
        // Everyone detached during the synchronous run.
        upstream.dispose();
      }
    }

    let detach_state = state;
    handle.add_teardown(move || {
      let released = {
        let mut state = detach_state.borrow_mut();
        let last = match state.as_mut() {
          Some(connection) => {
            connection.count -= 1;
            connection.count == 0
          }
          None => false,
        };
        if last {
          state.take().map(|connection| connection.upstream)
        } else {
          None
        }
      };
      if let Some(upstream) = released {
        upstream.dispose();
      }
    });
    handle
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[test]
  fn one_upstream_run_feeds_all_subscribers() {
    let mut subject = PublishSubject::<i32, ()>::new();
    let shared = subject.clone().share(0);

    let first = Rc::new(RefCell::new(vec![]));
    let second = Rc::new(RefCell::new(vec![]));
    let sink1 = first.clone();
    let sink2 = second.clone();

    let h1 = shared.clone().subscribe(move |v| sink1.borrow_mut().push(v));
    let h2 = shared.clone().subscribe(move |v| sink2.borrow_mut().push(v));
    assert_eq!(subject.subscriber_count(), 1);

    subject.next(7);
    assert_eq!(*first.borrow(), vec![7]);
    assert_eq!(*second.borrow(), vec![7]);

    h1.dispose();
    h2.dispose();
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn late_subscriber_gets_the_replay_backlog() {
    let mut subject = PublishSubject::<i32, ()>::new();
    let shared = subject.clone().share(2);

    let first = Rc::new(RefCell::new(vec![]));
    let sink1 = first.clone();
    let _h1 = shared.clone().subscribe(move |v| sink1.borrow_mut().push(v));

    subject.next(1);
    subject.next(2);
    subject.next(3);

    let late = Rc::new(RefCell::new(vec![]));
    let sink2 = late.clone();
    let _h2 = shared.clone().subscribe(move |v| sink2.borrow_mut().push(v));

    assert_eq!(*first.borrow(), vec![1, 2, 3]);
    assert_eq!(*late.borrow(), vec![2, 3]);
  }

  #[test]
  fn last_detach_resets_the_connection() {
    let mut subject = PublishSubject::<i32, ()>::new();
    let shared = subject.clone().share(1);

    let h1 = shared.clone().subscribe(|_| {});
    subject.next(1);
    h1.dispose();
    assert_eq!(subject.subscriber_count(), 0);

    // A fresh attach reconnects and sees no stale backlog.
    let out = Rc::new(RefCell::new(vec![]));
    let sink = out.clone();
    let _h2 = shared.clone().subscribe(move |v| sink.borrow_mut().push(v));
    assert_eq!(subject.subscriber_count(), 1);
    assert!(out.borrow().is_empty());

    subject.next(2);
    assert_eq!(*out.borrow(), vec![2]);
  }

  #[test]
  fn upstream_terminal_reaches_every_subscriber() {
    let completions = Rc::new(Cell::new(0));
    let mut subject = PublishSubject::<i32, ()>::new();
    let shared = subject.clone().share(0);

    for _ in 0..2 {
      let c = completions.clone();
      shared
        .clone()
        .subscribe_all(|_| {}, |_| {}, move || c.set(c.get() + 1));
    }
    subject.complete();

    assert_eq!(completions.get(), 2);
  }
}
