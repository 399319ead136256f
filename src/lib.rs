pub mod errors;
pub mod context;
pub mod functions;  // plugin model
pub mod invoke;
pub mod seq;
pub mod values;
pub mod demos;
pub mod expression;
pub mod parser;

pub use serde_json::Value;

pub use context::Context;
pub use errors::{EvalError, Result};
pub use expression::Evaluator;
pub use functions::{Function, Registry};
pub use invoke::{apply, bind, call, Callee};
pub use seq::{filter, fold, map, reduce, Seq};

/// Convenience: evaluate with the built-in registry.
pub fn eval(expr: &str) -> Result<Value> {
    let ev = Evaluator::new(Registry::with_builtins());
    ev.eval(expr)
}
