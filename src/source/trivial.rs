//! The sentinels: `empty`, `never`, `throw`.

use std::{convert::Infallible, marker::PhantomData};

use crate::{
  disposable::Disposable, observer::Observer, producer::Producer,
};

/// Completes immediately without emitting.
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

/// Emits nothing and never terminates.
pub fn never<Item>() -> Never<Item> { Never(PhantomData) }

/// Fails immediately with `err`.
pub fn throw<Err, Item>(err: Err) -> Throw<Err, Item> {
  Throw(err, PhantomData)
}

#[derive(Clone)]
pub struct Empty<Item>(PhantomData<fn() -> Item>);

impl<Item: 'static> Producer for Empty<Item> {
  type Item = Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, Infallible> + 'static,
  {
    let mut observer = observer;
    observer.complete();
    Disposable::disposed()
  }
}

#[derive(Clone)]
pub struct Never<Item>(PhantomData<fn() -> Item>);

impl<Item: 'static> Producer for Never<Item> {
  type Item = Item;
  type Err = Infallible;

  fn actual_subscribe<O>(self, _observer: O) -> Disposable
  where
    O: Observer<Item, Infallible> + 'static,
  {
    Disposable::new()
  }
}

#[derive(Clone)]
pub struct Throw<Err, Item>(Err, PhantomData<fn() -> Item>);

impl<Err: 'static, Item: 'static> Producer for Throw<Err, Item> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(self, observer: O) -> Disposable
  where
    O: Observer<Item, Err> + 'static,
  {
    let mut observer = observer;
    observer.error(self.0);
    Disposable::disposed()
  }
}
