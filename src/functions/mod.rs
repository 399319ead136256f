use serde_json::Value;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::trace;

use crate::context::Context;
use crate::errors::{EvalError, Result};

/// A callable that receives its receiver explicitly as `this`.
pub trait Function: Send + Sync {
    fn name(&self) -> &'static str;
    fn arity(&self) -> RangeInclusive<usize>;
    fn call(&self, this: &Context, args: &[Value]) -> Result<Value>;
}

/// Checks the lower arity bound and drops arguments past the upper one.
pub fn fit_args<'a>(f: &dyn Function, args: &'a [Value]) -> Result<&'a [Value]> {
    let arity = f.arity();
    if args.len() < *arity.start() {
        return Err(EvalError::Arity {
            name: f.name().to_string(),
            expected: describe_arity(&arity),
            got: args.len(),
        });
    }
    Ok(&args[..args.len().min(*arity.end())])
}

pub(crate) fn describe_arity(arity: &RangeInclusive<usize>) -> String {
    if arity.start() == arity.end() {
        arity.start().to_string()
    } else if *arity.end() == usize::MAX {
        format!("at least {}", arity.start())
    } else {
        format!("{}..={}", arity.start(), arity.end())
    }
}

/// Calls `f` with `this`, after [`fit_args`].
pub fn dispatch(f: &dyn Function, this: &Context, args: &[Value]) -> Result<Value> {
    let args = fit_args(f, args)?;
    trace!(function = f.name(), argc = args.len(), "dispatch");
    f.call(this, args)
}

/// Name-indexed set of functions, cheap to clone.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<&'static str, Arc<dyn Function>>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut map: HashMap<&'static str, Arc<dyn Function>> = HashMap::new();
        map.insert("display_details", Arc::new(builtins::DisplayDetails));
        map.insert("above", Arc::new(builtins::Above));
        map.insert("below", Arc::new(builtins::Below));
        map.insert("times", Arc::new(builtins::Times));
        map.insert("add", Arc::new(builtins::Add));
        map.insert("is_even", Arc::new(builtins::IsEven));
        map.insert("upper", Arc::new(builtins::Upper));
        map.insert("lower", Arc::new(builtins::Lower));
        map.insert("length", Arc::new(builtins::Length));
        map.insert("identity", Arc::new(builtins::Identity));
        Self { inner: Arc::new(map) }
    }

    pub fn register<F: Function + 'static>(&mut self, f: F) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(f.name(), Arc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Function>> {
        self.inner.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.inner.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

pub mod builtins {
    use super::*;
    use crate::values::{compare, number, render, type_name};
    use std::cmp::Ordering;

    static NULL: Value = Value::Null;

    fn arg(args: &[Value], i: usize) -> &Value {
        args.get(i).unwrap_or(&NULL)
    }

    fn numeric(name: &str, v: &Value) -> Result<f64> {
        v.as_f64().ok_or_else(|| {
            EvalError::Runtime(format!("{name} expects numbers, got {}", type_name(v)))
        })
    }

    /// `display_details(model, year)` describing the car bound as `this`.
    pub struct DisplayDetails;
    impl Function for DisplayDetails {
        fn name(&self) -> &'static str { "display_details" }
        fn arity(&self) -> RangeInclusive<usize> { 0..=2 }
        fn call(&self, this: &Context, args: &[Value]) -> Result<Value> {
            Ok(Value::String(format!(
                "Brand: {}, Company: {}, Model: {}, Year: {}",
                render(this.get("brand")),
                render(this.get("company")),
                render(args.first()),
                render(args.get(1)),
            )))
        }
    }

    /// `above(threshold, x)` is `x > threshold`; meant to be bound on its threshold.
    pub struct Above;
    impl Function for Above {
        fn name(&self) -> &'static str { "above" }
        fn arity(&self) -> RangeInclusive<usize> { 2..=2 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            Ok(Value::Bool(compare(arg(args, 1), arg(args, 0)) == Some(Ordering::Greater)))
        }
    }

    /// `below(threshold, x)` is `x < threshold`.
    pub struct Below;
    impl Function for Below {
        fn name(&self) -> &'static str { "below" }
        fn arity(&self) -> RangeInclusive<usize> { 2..=2 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            Ok(Value::Bool(compare(arg(args, 1), arg(args, 0)) == Some(Ordering::Less)))
        }
    }

    pub struct Times;
    impl Function for Times {
        fn name(&self) -> &'static str { "times" }
        fn arity(&self) -> RangeInclusive<usize> { 2..=2 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            let a = numeric(self.name(), arg(args, 0))?;
            let b = numeric(self.name(), arg(args, 1))?;
            Ok(number(a * b))
        }
    }

    /// Numeric sum, or concatenation when both sides are strings.
    pub struct Add;
    impl Function for Add {
        fn name(&self) -> &'static str { "add" }
        fn arity(&self) -> RangeInclusive<usize> { 2..=2 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            if let (Value::String(a), Value::String(b)) = (arg(args, 0), arg(args, 1)) {
                return Ok(Value::String(format!("{a}{b}")));
            }
            let a = numeric(self.name(), arg(args, 0))?;
            let b = numeric(self.name(), arg(args, 1))?;
            Ok(number(a + b))
        }
    }

    pub struct IsEven;
    impl Function for IsEven {
        fn name(&self) -> &'static str { "is_even" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            let n = numeric(self.name(), arg(args, 0))?;
            Ok(Value::Bool(n % 2.0 == 0.0))
        }
    }

    pub struct Upper;
    impl Function for Upper {
        fn name(&self) -> &'static str { "upper" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            Ok(match arg(args, 0) {
                Value::String(t) => Value::String(t.to_uppercase()),
                other => other.clone(),
            })
        }
    }

    pub struct Lower;
    impl Function for Lower {
        fn name(&self) -> &'static str { "lower" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            Ok(match arg(args, 0) {
                Value::String(t) => Value::String(t.to_lowercase()),
                other => other.clone(),
            })
        }
    }

    pub struct Length;
    impl Function for Length {
        fn name(&self) -> &'static str { "length" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            let len = match arg(args, 0) {
                Value::Array(a) => a.len(),
                Value::Object(m) => m.len(),
                Value::String(s) => s.chars().count(),
                _ => 0,
            };
            Ok(Value::from(len))
        }
    }

    pub struct Identity;
    impl Function for Identity {
        fn name(&self) -> &'static str { "identity" }
        fn arity(&self) -> RangeInclusive<usize> { 1..=1 }
        fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
            Ok(arg(args, 0).clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(name: &str, args: &[Value]) -> Result<Value> {
        let registry = Registry::with_builtins();
        let f = registry.get(name).expect("builtin registered");
        dispatch(f.as_ref(), &Context::new(), args)
    }

    #[test]
    fn extra_arguments_are_dropped() {
        // callbacks get (element, index, sequence); unary builtins only see the element
        let out = run("is_even", &[json!(4), json!(1), json!([3, 4])]).unwrap();
        assert_eq!(out, json!(true));
    }

    #[test]
    fn too_few_arguments_is_an_arity_error() {
        let err = run("times", &[json!(2)]).unwrap_err();
        assert_eq!(err.to_string(), "times expects 2 argument(s), got 1");
    }

    #[test]
    fn display_details_reads_this() {
        let car = Context::new()
            .with("brand", "Toyota")
            .with("company", "Toyota Motor Corporation");
        let args = [json!("Camry"), json!(2020)];
        let out = dispatch(&builtins::DisplayDetails, &car, &args).unwrap();
        assert_eq!(
            out,
            json!("Brand: Toyota, Company: Toyota Motor Corporation, Model: Camry, Year: 2020")
        );
        let bare = dispatch(&builtins::DisplayDetails, &Context::new(), &[]).unwrap();
        assert_eq!(
            bare,
            json!("Brand: undefined, Company: undefined, Model: undefined, Year: undefined")
        );
    }

    #[test]
    fn arithmetic_builtins() {
        assert_eq!(run("times", &[json!(2), json!(3)]).unwrap(), json!(6));
        assert_eq!(run("add", &[json!(1.5), json!(1)]).unwrap(), json!(2.5));
        assert_eq!(run("add", &[json!("ab"), json!("c")]).unwrap(), json!("abc"));
        assert!(matches!(run("add", &[json!("a"), json!(1)]), Err(EvalError::Runtime(_))));
        assert_eq!(run("above", &[json!(2), json!(3)]).unwrap(), json!(true));
        assert_eq!(run("below", &[json!(2), json!(3)]).unwrap(), json!(false));
    }

    #[test]
    fn register_custom_function() {
        struct Answer;
        impl Function for Answer {
            fn name(&self) -> &'static str { "answer" }
            fn arity(&self) -> RangeInclusive<usize> { 0..=0 }
            fn call(&self, _this: &Context, _args: &[Value]) -> Result<Value> {
                Ok(json!(42))
            }
        }
        let mut registry = Registry::with_builtins();
        registry.register(Answer);
        let f = registry.get("answer").unwrap();
        assert_eq!(dispatch(f.as_ref(), &Context::new(), &[]).unwrap(), json!(42));
        assert!(registry.names().contains(&"answer"));
    }
}
