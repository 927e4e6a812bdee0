//! End-to-end behavior of whole pipelines, driven the way a consumer would
//! drive them: subjects as external inputs, an event loop for time, plain
//! collectors for outputs.

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
  time::Duration,
};

use rivulet::{event::Event, prelude::*};

fn collector<T>() -> (Rc<RefCell<Vec<T>>>, Rc<RefCell<Vec<T>>>) {
  let out = Rc::new(RefCell::new(vec![]));
  (out.clone(), out)
}

#[test]
fn dispose_twice_equals_dispose_once() {
  let teardowns = Rc::new(Cell::new(0));
  let t = teardowns.clone();
  let mut subject = PublishSubject::<i32, ()>::new();
  let (out, sink) = collector();

  let handle = subject
    .clone()
    .finalize(move || t.set(t.get() + 1))
    .subscribe(move |v| sink.borrow_mut().push(v));

  subject.next(1);
  handle.dispose();
  handle.dispose();
  subject.next(2);

  assert_eq!(*out.borrow(), vec![1]);
  assert_eq!(teardowns.get(), 1);
  assert_eq!(subject.subscriber_count(), 0);
}

#[test]
fn map_is_elementwise_and_order_preserving() {
  let input = vec![3, 1, 4, 1, 5, 9, 2, 6];
  let (out, sink) = collector();

  source::from_iter(input.clone())
    .map(|v| v * v)
    .subscribe(move |v| sink.borrow_mut().push(v));

  let expected: Vec<i32> = input.iter().map(|v| v * v).collect();
  assert_eq!(*out.borrow(), expected);
}

#[test]
fn merge_interleaves_in_time_order_and_completes_after_both() {
  let (events, sink) = collector();
  let event_loop = EventLoop::new();
  let scheduler = event_loop.scheduler();

  let a = source::timer(Duration::from_millis(10), scheduler.clone())
    .map(|_| "a1")
    .merge(
      source::timer(Duration::from_millis(30), scheduler.clone())
        .map(|_| "a2"),
    );
  let b =
    source::timer(Duration::from_millis(20), scheduler.clone()).map(|_| "b1");

  a.merge(b)
    .subscribe_events(move |ev| sink.borrow_mut().push(ev));

  event_loop.advance_by(Duration::from_millis(25));
  assert_eq!(
    *events.borrow(),
    vec![Event::Next("a1"), Event::Next("b1")]
  );

  event_loop.advance_by(Duration::from_millis(25));
  assert_eq!(
    *events.borrow(),
    vec![
      Event::Next("a1"),
      Event::Next("b1"),
      Event::Next("a2"),
      Event::Completed
    ]
  );
}

#[test]
fn zip_pairs_by_index_and_stops_when_pairs_run_out() {
  let (out, sink) = collector();
  let completed = Rc::new(Cell::new(false));
  let done = completed.clone();
  let mut numbers = PublishSubject::<i32, ()>::new();
  let mut letters = PublishSubject::<&'static str, ()>::new();

  numbers
    .clone()
    .zip(letters.clone())
    .map(|(n, s)| format!("{n}{s}"))
    .subscribe_all(
      move |v| sink.borrow_mut().push(v),
      |_| {},
      move || done.set(true),
    );

  for n in 1..=5 {
    numbers.next(n);
  }
  for s in ["A", "B", "C", "D"] {
    letters.next(s);
  }
  letters.complete();

  assert_eq!(*out.borrow(), vec!["1A", "2B", "3C", "4D"]);
  // The buffered 5 can never pair once the letters are done.
  assert!(completed.get());
}

#[test]
fn combine_latest_pairs_each_emission_with_the_latest_partner() {
  let (out, sink) = collector();
  let mut numbers = PublishSubject::<i32, ()>::new();
  let mut letters = PublishSubject::<&'static str, ()>::new();

  numbers
    .clone()
    .combine_latest(letters.clone())
    .map(|(n, s)| format!("{n}{s}"))
    .subscribe(move |v| sink.borrow_mut().push(v));

  numbers.next(1);
  letters.next("A");
  numbers.next(2);
  letters.next("B");
  letters.next("C");
  letters.next("D");
  numbers.next(3);
  numbers.next(4);
  numbers.next(5);

  assert_eq!(
    *out.borrow(),
    vec!["1A", "2A", "2B", "2C", "2D", "3D", "4D", "5D"]
  );
}

#[test]
fn debounce_keeps_values_followed_by_quiet_gaps() {
  let (out, sink) = collector();
  let event_loop = EventLoop::new();
  let mut input = PublishSubject::<i32, ()>::new();

  input
    .clone()
    .debounce(Duration::from_millis(500), event_loop.scheduler())
    .subscribe(move |v| sink.borrow_mut().push(v));

  let timeline = [(100, 1), (1100, 2), (1200, 3), (1200, 4), (1400, 5), (2100, 6)];
  for (at_ms, value) in timeline {
    event_loop.advance_to(Duration::from_millis(at_ms));
    input.next(value);
  }
  // 6 has no successor; its timer fires once the stream goes quiet.
  event_loop.run_until_idle();

  assert_eq!(*out.borrow(), vec![1, 5, 6]);
}

#[test]
fn retry_recovers_from_a_single_failure_without_surfacing_it() {
  let (events, sink) = collector();
  let attempts = Rc::new(Cell::new(0));
  let counter = attempts.clone();

  let flaky = source::create(
    move |observer: &mut dyn Observer<i32, &'static str>| {
      let attempt = counter.get();
      counter.set(attempt + 1);
      observer.next(1);
      observer.next(2);
      if attempt == 0 {
        return Err("first attempt fails");
      }
      observer.next(3);
      observer.complete();
      Ok(())
    },
  );

  flaky
    .retry(2)
    .subscribe_events(move |ev| sink.borrow_mut().push(ev));

  assert_eq!(attempts.get(), 2);
  assert_eq!(
    *events.borrow(),
    vec![
      Event::Next(1),
      Event::Next(2),
      Event::Next(1),
      Event::Next(2),
      Event::Next(3),
      Event::Completed
    ]
  );
}

#[test]
fn share_replays_at_most_the_buffer_and_reconnects_fresh() {
  let mut input = PublishSubject::<i32, ()>::new();
  let shared = input.clone().share(2);

  let (first, sink1) = collector();
  let h1 = shared.clone().subscribe(move |v| sink1.borrow_mut().push(v));

  input.next(1);
  input.next(2);
  input.next(3);

  // k = 3 values emitted, n = 2 buffered: the late attacher gets min(k, n).
  let (late, sink2) = collector();
  let h2 = shared.clone().subscribe(move |v| sink2.borrow_mut().push(v));
  assert_eq!(*first.borrow(), vec![1, 2, 3]);
  assert_eq!(*late.borrow(), vec![2, 3]);

  h1.dispose();
  h2.dispose();
  assert_eq!(input.subscriber_count(), 0);

  // Fresh reconnect: nothing from before the disconnect leaks through.
  let (fresh, sink3) = collector();
  let _h3 = shared.clone().subscribe(move |v| sink3.borrow_mut().push(v));
  assert!(fresh.borrow().is_empty());

  input.next(4);
  assert_eq!(*fresh.borrow(), vec![4]);
}

#[test]
fn a_full_pipeline_composes() {
  let (out, sink) = collector();
  let event_loop = EventLoop::new();
  let mut queries = PublishSubject::<&'static str, ()>::new();

  queries
    .clone()
    .debounce(Duration::from_millis(300), event_loop.scheduler())
    .distinct_until_changed()
    .filter(|q| q.len() >= 3)
    .map(|q| format!("results for {q}"))
    .subscribe(move |v| sink.borrow_mut().push(v));

  queries.next("r");
  queries.next("ru");
  queries.next("rust");
  event_loop.advance_by(Duration::from_millis(300));
  // Same query again after a pause: suppressed as a consecutive duplicate.
  queries.next("rust");
  event_loop.advance_by(Duration::from_millis(300));
  queries.next("rx");
  event_loop.advance_by(Duration::from_millis(300));

  assert_eq!(*out.borrow(), vec!["results for rust"]);
}
