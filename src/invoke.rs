//! Invoking a function with an explicit receiver.
//!
//! [`apply`] takes the arguments as one array value, [`call`] (and the [`call!`]
//! macro) take them as trailing values. Both bind the callee into the context's
//! reserved slot before dispatching, and both reject a non-callable callee before
//! touching the context.

use serde_json::Value;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::debug;

use crate::context::{function_label, Context};
use crate::errors::{EvalError, Result};
use crate::functions::{fit_args, Function};
use crate::values::type_name;

/// Anything that may sit in the callee position: data or a function.
#[derive(Clone)]
pub enum Callee {
    Value(Value),
    Function(Arc<dyn Function>),
}

impl Callee {
    pub fn function<F: Function + 'static>(f: F) -> Self {
        Callee::Function(Arc::new(f))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Callee::Function(_))
    }

    pub fn as_function(&self) -> Result<&Arc<dyn Function>> {
        match self {
            Callee::Function(f) => Ok(f),
            Callee::Value(v) => Err(EvalError::NotCallable(v.to_string())),
        }
    }

    /// Data view; functions become their `[Function: name]` label.
    pub fn into_value(self) -> Value {
        match self {
            Callee::Value(v) => v,
            Callee::Function(f) => Value::String(function_label(f.name())),
        }
    }
}

impl From<Value> for Callee {
    fn from(v: Value) -> Self {
        Callee::Value(v)
    }
}

impl From<Arc<dyn Function>> for Callee {
    fn from(f: Arc<dyn Function>) -> Self {
        Callee::Function(f)
    }
}

impl fmt::Debug for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callee::Value(v) => write!(f, "Value({v})"),
            Callee::Function(func) => write!(f, "{}", function_label(func.name())),
        }
    }
}

/// Positional form: `args` must be an array (`None` means no arguments).
///
/// A missing context is replaced by a fresh empty one.
pub fn apply(
    callee: &Callee,
    context: Option<&mut Context>,
    args: Option<&Value>,
) -> Result<Value> {
    let f = callee.as_function()?;
    let args: &[Value] = match args {
        None => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return Err(EvalError::InvalidArgumentList(type_name(other).to_string()));
        }
    };
    invoke_bound(f, context, args)
}

/// Spread form: arguments arrive already positional, so there is nothing to validate
/// beyond the callee itself.
pub fn call<I>(callee: &Callee, context: Option<&mut Context>, args: I) -> Result<Value>
where
    I: IntoIterator<Item = Value>,
{
    let args: Vec<Value> = args.into_iter().collect();
    call_slice(callee, context, &args)
}

/// [`call`] over borrowed arguments, for callers that reuse one buffer.
pub(crate) fn call_slice(
    callee: &Callee,
    context: Option<&mut Context>,
    args: &[Value],
) -> Result<Value> {
    let f = callee.as_function()?;
    invoke_bound(f, context, args)
}

/// `call!(callee, context, a, b, ...)`, converting each trailing argument with
/// `Value::from`.
#[macro_export]
macro_rules! call {
    ($callee:expr, $context:expr $(, $arg:expr)* $(,)?) => {
        $crate::invoke::call(
            $callee,
            $context,
            ::std::vec![$($crate::Value::from($arg)),*],
        )
    };
}

fn invoke_bound(
    f: &Arc<dyn Function>,
    context: Option<&mut Context>,
    args: &[Value],
) -> Result<Value> {
    let args = fit_args(f.as_ref(), args)?;
    let mut scratch = Context::new();
    let this = context.unwrap_or(&mut scratch);
    this.attach(Arc::clone(f));
    debug!(function = f.name(), argc = args.len(), "invoking with bound context");
    f.call(this, args)
}

/// Returns a callable that invokes `callee` with `context` and `args` prepended to
/// whatever it is later called with.
pub fn bind(callee: &Callee, context: Option<Context>, args: Vec<Value>) -> Result<Callee> {
    let target = Arc::clone(callee.as_function()?);
    Ok(Callee::function(Bound {
        target,
        this: context.unwrap_or_default(),
        args,
    }))
}

struct Bound {
    target: Arc<dyn Function>,
    this: Context,
    args: Vec<Value>,
}

impl Function for Bound {
    /// The target's name. A bound function is not distinguishable from its target in a
    /// context's `fn` slot; both render as `[Function: <target>]`.
    fn name(&self) -> &'static str {
        self.target.name()
    }

    fn arity(&self) -> RangeInclusive<usize> {
        let arity = self.target.arity();
        let n = self.args.len();
        arity.start().saturating_sub(n)..=arity.end().saturating_sub(n)
    }

    fn call(&self, _this: &Context, args: &[Value]) -> Result<Value> {
        let mut all = self.args.clone();
        all.extend_from_slice(args);
        let mut this = self.this.clone();
        invoke_bound(&self.target, Some(&mut this), &all)
    }
}
