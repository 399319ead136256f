//! The canonical one-line demonstrations, one per utility.

use itertools::Itertools;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;

use crate::context::Context;
use crate::errors::Result;
use crate::functions::builtins::DisplayDetails;
use crate::invoke::{apply, Callee};
use crate::seq::{self, Seq};

pub struct Demo {
    pub name: &'static str,
    pub run: fn() -> Result<String>,
}

pub const DEMOS: &[Demo] = &[
    Demo { name: "apply", run: apply_demo },
    Demo { name: "call", run: call_demo },
    Demo { name: "filter", run: filter_demo },
    Demo { name: "map", run: map_demo },
    Demo { name: "reduce", run: reduce_demo },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|d| d.name == name)
}

/// Serializable outcome of one demo run.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub name: &'static str,
    pub output: String,
}

impl Demo {
    pub fn report(&self) -> Result<DemoReport> {
        Ok(DemoReport {
            name: self.name,
            output: (self.run)()?,
        })
    }
}

fn car() -> Context {
    Context::new()
        .with("brand", "Toyota")
        .with("company", "Toyota Motor Corporation")
}

fn line(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn list<T: Display>(items: &[T]) -> String {
    format!("[{}]", items.iter().join(", "))
}

fn apply_demo() -> Result<String> {
    let mut car1 = car();
    let details = Callee::function(DisplayDetails);
    apply(&details, Some(&mut car1), Some(&json!(["Camry", 2020]))).map(line)
}

fn call_demo() -> Result<String> {
    let mut car1 = car();
    let details = Callee::function(DisplayDetails);
    crate::call!(&details, Some(&mut car1), "Camry", 2020).map(line)
}

fn filter_demo() -> Result<String> {
    let nums = [1, 2, 3, 4, 5, 6];
    let more_than_two = seq::filter(&nums, |n, _, _| *n > 2);
    Ok(list(&more_than_two))
}

fn map_demo() -> Result<String> {
    let nums = Seq::new(vec![1, 2, 3, 4, 5]);
    let result = nums.map(|num, _, _| num * 2);
    Ok(list(&result))
}

fn reduce_demo() -> Result<String> {
    let nums = [1, 2, 3, 4, 5];
    let sum = seq::reduce(&nums, |acc, curr, _, _| acc + curr, Some(0))?;
    Ok(sum.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_demo_prints_its_line() {
        let camry = "Brand: Toyota, Company: Toyota Motor Corporation, Model: Camry, Year: 2020";
        let expected = [
            ("apply", camry),
            ("call", camry),
            ("filter", "[3, 4, 5, 6]"),
            ("map", "[2, 4, 6, 8, 10]"),
            ("reduce", "15"),
        ];
        for (name, line) in expected {
            let demo = find(name).unwrap();
            assert_eq!((demo.run)().unwrap(), line);
        }
        assert_eq!(DEMOS.len(), expected.len());
        assert!(find("bind").is_none());
    }
}
