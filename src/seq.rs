//! filter, map and reduce over slices.
//!
//! The generic functions take Rust closures with the `(element, index, sequence)`
//! callback shape. The `*_values` variants take a [`Callee`] over JSON values and
//! invoke it through [`call`](crate::invoke::call), so a non-callable callback fails the same way a
//! direct call would. Input sequences are never mutated.

use serde_json::Value;
use std::ops::Deref;

use crate::errors::{EvalError, Result};
use crate::invoke::{call_slice, Callee};
use crate::values::truthy;

pub fn filter<T, P>(seq: &[T], mut predicate: P) -> Vec<T>
where
    T: Clone,
    P: FnMut(&T, usize, &[T]) -> bool,
{
    let mut kept = Vec::new();
    for (index, item) in seq.iter().enumerate() {
        if predicate(item, index, seq) {
            kept.push(item.clone());
        }
    }
    kept
}

pub fn map<T, U, F>(seq: &[T], mut transform: F) -> Vec<U>
where
    F: FnMut(&T, usize, &[T]) -> U,
{
    let mut out = Vec::with_capacity(seq.len());
    for (index, item) in seq.iter().enumerate() {
        out.push(transform(item, index, seq));
    }
    out
}

/// Left fold that always starts from `seed`.
pub fn fold<T, A, F>(seq: &[T], mut combine: F, seed: A) -> A
where
    F: FnMut(A, &T, usize, &[T]) -> A,
{
    let mut acc = seed;
    for (index, item) in seq.iter().enumerate() {
        acc = combine(acc, item, index, seq);
    }
    acc
}

/// Left fold with an optional seed.
///
/// Without a seed the first element is the starting accumulator and `combine` runs
/// from index 1. `Some(seed)` is always a real seed, whatever it holds. An empty
/// sequence without a seed is [`EvalError::EmptyReduce`].
pub fn reduce<T, F>(seq: &[T], mut combine: F, seed: Option<T>) -> Result<T>
where
    T: Clone,
    F: FnMut(T, &T, usize, &[T]) -> T,
{
    let (mut acc, start) = match seed {
        Some(seed) => (seed, 0),
        None => (seq.first().cloned().ok_or(EvalError::EmptyReduce)?, 1),
    };
    for (index, item) in seq.iter().enumerate().skip(start) {
        acc = combine(acc, item, index, seq);
    }
    Ok(acc)
}

/// Argument buffer reused across every callback invocation over one sequence.
///
/// Holds `slots` arguments, the last of which is the whole sequence. That last slot
/// is only built when the callee's arity reaches it.
struct CallbackArgs {
    buf: Vec<Value>,
}

impl CallbackArgs {
    fn new(callee: &Callee, seq: &[Value], slots: usize) -> Self {
        let takes_seq = match callee {
            Callee::Function(f) => *f.arity().end() >= slots,
            Callee::Value(_) => false,
        };
        let mut buf = vec![Value::Null; slots - 1];
        if takes_seq {
            buf.push(Value::Array(seq.to_vec()));
        }
        Self { buf }
    }

    fn set(&mut self, slot: usize, value: Value) {
        self.buf[slot] = value;
    }

    fn invoke(&self, callee: &Callee) -> Result<Value> {
        call_slice(callee, None, &self.buf)
    }
}

pub fn filter_values(seq: &[Value], predicate: &Callee) -> Result<Vec<Value>> {
    let mut args = CallbackArgs::new(predicate, seq, 3);
    let mut kept = Vec::new();
    for (index, item) in seq.iter().enumerate() {
        args.set(0, item.clone());
        args.set(1, Value::from(index));
        if truthy(&args.invoke(predicate)?) {
            kept.push(item.clone());
        }
    }
    Ok(kept)
}

pub fn map_values(seq: &[Value], transform: &Callee) -> Result<Vec<Value>> {
    let mut args = CallbackArgs::new(transform, seq, 3);
    let mut out = Vec::with_capacity(seq.len());
    for (index, item) in seq.iter().enumerate() {
        args.set(0, item.clone());
        args.set(1, Value::from(index));
        out.push(args.invoke(transform)?);
    }
    Ok(out)
}

pub fn reduce_values(seq: &[Value], combine: &Callee, seed: Option<Value>) -> Result<Value> {
    let (mut acc, start) = match seed {
        Some(seed) => (seed, 0),
        None => (seq.first().cloned().ok_or(EvalError::EmptyReduce)?, 1),
    };
    let mut args = CallbackArgs::new(combine, seq, 4);
    for (index, item) in seq.iter().enumerate().skip(start) {
        args.set(0, std::mem::take(&mut acc));
        args.set(1, item.clone());
        args.set(2, Value::from(index));
        acc = args.invoke(combine)?;
    }
    Ok(acc)
}

/// Owned sequence carrying the utilities as trailing methods.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Seq<T>(Vec<T>);

impl<T> Seq<T> {
    pub fn new(items: Vec<T>) -> Self {
        Seq(items)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn map<U, F>(&self, transform: F) -> Seq<U>
    where
        F: FnMut(&T, usize, &[T]) -> U,
    {
        Seq(map(&self.0, transform))
    }

    pub fn fold<A, F>(&self, combine: F, seed: A) -> A
    where
        F: FnMut(A, &T, usize, &[T]) -> A,
    {
        fold(&self.0, combine, seed)
    }
}

impl<T: Clone> Seq<T> {
    pub fn filter<P>(&self, predicate: P) -> Seq<T>
    where
        P: FnMut(&T, usize, &[T]) -> bool,
    {
        Seq(filter(&self.0, predicate))
    }

    pub fn reduce<F>(&self, combine: F, seed: Option<T>) -> Result<T>
    where
        F: FnMut(T, &T, usize, &[T]) -> T,
    {
        reduce(&self.0, combine, seed)
    }
}

impl<T> Deref for Seq<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Seq<T> {
    fn from(items: Vec<T>) -> Self {
        Seq(items)
    }
}

impl<T> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Seq(iter.into_iter().collect())
    }
}
