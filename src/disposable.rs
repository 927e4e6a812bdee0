//! Disposal primitives.
//!
//! A [`Disposable`] is the handle returned from `subscribe`: the right, and
//! the responsibility, to release a subscription's resources. Handles are
//! cheap to clone (all clones share one state), disposal is idempotent, and
//! children added after disposal are released immediately instead of leaking.

use std::{
  any::Any,
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

/// A cancellable resource.
///
/// Implemented by [`Disposable`] itself and by anything an operator wants to
/// hang off a subscription (timer handles, inner subscriptions, callbacks).
pub trait Dispose {
  /// Release the resource. Must be idempotent.
  fn dispose(&mut self);

  fn is_disposed(&self) -> bool;
}

enum Teardown {
  Child(Box<dyn Dispose>),
  Callback(Box<dyn FnOnce()>),
}

impl Teardown {
  fn run(self) {
    match self {
      Teardown::Child(mut child) => child.dispose(),
      Teardown::Callback(f) => f(),
    }
  }

  /// A spent entry no longer needs to be kept alive in the teardown list.
  fn is_spent(&self) -> bool {
    match self {
      Teardown::Child(child) => child.is_disposed(),
      Teardown::Callback(_) => false,
    }
  }
}

struct Inner {
  disposed: bool,
  teardown: SmallVec<[Teardown; 1]>,
}

/// The concrete subscription handle.
///
/// `Disposable` doubles as a release group: child handles and teardown
/// callbacks can be attached with [`add`](Disposable::add) and
/// [`add_teardown`](Disposable::add_teardown), and all of them fire together
/// on the first call to [`dispose`](Disposable::dispose).
#[derive(Clone)]
pub struct Disposable(Rc<RefCell<Inner>>);

impl Default for Disposable {
  fn default() -> Self { Self::new() }
}

impl Disposable {
  pub fn new() -> Self {
    Disposable(Rc::new(RefCell::new(Inner {
      disposed: false,
      teardown: SmallVec::new(),
    })))
  }

  /// An already-released handle, for subscriptions that finished all their
  /// work synchronously and own nothing.
  pub fn disposed() -> Self {
    let d = Disposable::new();
    d.dispose();
    d
  }

  /// A handle whose only resource is the given callback.
  pub fn from_fn<F: FnOnce() + 'static>(f: F) -> Self {
    let d = Disposable::new();
    d.add_teardown(f);
    d
  }

  /// Attach a child resource. If this handle is already disposed the child
  /// is released on the spot.
  pub fn add<C: Dispose + 'static>(&self, child: C) {
    if self.is_same(&child) {
      return;
    }
    let mut child = child;
    {
      let mut inner = self.0.borrow_mut();
      if !inner.disposed {
        inner.teardown.retain(|t| !t.is_spent());
        inner.teardown.push(Teardown::Child(Box::new(child)));
        return;
      }
    }
    child.dispose();
  }

  /// Attach a callback that runs exactly once, on disposal. Runs immediately
  /// if this handle is already disposed.
  pub fn add_teardown<F: FnOnce() + 'static>(&self, f: F) {
    {
      let mut inner = self.0.borrow_mut();
      if !inner.disposed {
        inner.teardown.push(Teardown::Callback(Box::new(f)));
        return;
      }
    }
    f();
  }

  /// Release every attached resource. Idempotent: the second and later calls
  /// are no-ops. Reentrant disposal from inside a teardown callback is a
  /// no-op as well, since the flag flips before any callback runs.
  pub fn dispose(&self) {
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      std::mem::take(&mut inner.teardown)
    };
    for entry in teardown {
      entry.run();
    }
  }

  pub fn is_disposed(&self) -> bool { self.0.borrow().disposed }

  /// Move this handle into a [`DisposeBag`], tying its lifetime to the bag's
  /// owner.
  pub fn retained_by(self, bag: &DisposeBag) { bag.insert(self); }

  /// Adding a handle to itself would self-reference; skip it.
  fn is_same(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<Self>()
      .is_some_and(|other| Rc::ptr_eq(&self.0, &other.0))
  }
}

impl Dispose for Disposable {
  #[inline]
  fn dispose(&mut self) { Disposable::dispose(self) }

  #[inline]
  fn is_disposed(&self) -> bool { Disposable::is_disposed(self) }
}

/// Dispose-through for a shared slot: operators that re-schedule work keep
/// the freshest task handle in an `Rc<RefCell<Disposable>>`; releasing the
/// slot releases whatever handle currently sits in it.
impl Dispose for Rc<RefCell<Disposable>> {
  fn dispose(&mut self) { self.borrow().dispose() }

  fn is_disposed(&self) -> bool { self.borrow().is_disposed() }
}

impl Debug for Disposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.borrow();
    f.debug_struct("Disposable")
      .field("disposed", &inner.disposed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// A disposal group whose lifetime is tied to an owning context.
///
/// Collects [`Disposable`]s and releases all of them together when the bag
/// is dropped (or when [`dispose`](DisposeBag::dispose) is called early).
#[derive(Default)]
pub struct DisposeBag {
  items: RefCell<Vec<Disposable>>,
}

impl DisposeBag {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&self, handle: Disposable) {
    let mut items = self.items.borrow_mut();
    items.retain(|d| !d.is_disposed());
    items.push(handle);
  }

  /// Release everything collected so far. The bag stays usable.
  pub fn dispose(&self) {
    let items = std::mem::take(&mut *self.items.borrow_mut());
    for d in items {
      d.dispose();
    }
  }

  pub fn len(&self) -> usize { self.items.borrow().len() }

  pub fn is_empty(&self) -> bool { self.items.borrow().is_empty() }
}

impl Drop for DisposeBag {
  fn drop(&mut self) { self.dispose() }
}
