use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::errors::{EvalError, Result};
use crate::functions::Function;
use crate::values::type_name;

/// Key under which call/apply leave a reference to the invoked function.
pub const BOUND_KEY: &str = "fn";

/// Receiver object handed to a [`Function`] as its explicit `this`.
///
/// Plain fields live in a JSON map. The reserved [`BOUND_KEY`] slot holds the last
/// function invoked through this context; it is set by `call`/`apply` and stays set
/// after the call returns.
#[derive(Clone, Default)]
pub struct Context {
    fields: Map<String, Value>,
    bound: Option<Arc<dyn Function>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields, bound: None }
    }

    /// `null` gives an empty context; any other non-object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(fields) => Ok(Self::from_map(fields)),
            other => Err(EvalError::Runtime(format!(
                "cannot use {} as a call context",
                type_name(&other)
            ))),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn bound_function(&self) -> Option<&Arc<dyn Function>> {
        self.bound.as_ref()
    }

    /// Overwrites whatever sat under the reserved key, data field included.
    pub(crate) fn attach(&mut self, function: Arc<dyn Function>) {
        self.fields.remove(BOUND_KEY);
        self.bound = Some(function);
    }

    /// JSON view of the context; the bound function shows up as `"[Function: name]"`.
    pub fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        if let Some(f) = &self.bound {
            fields.insert(BOUND_KEY.to_string(), Value::String(function_label(f.name())));
        }
        Value::Object(fields)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({})", self.to_value())
    }
}

pub(crate) fn function_label(name: &str) -> String {
    format!("[Function: {name}]")
}
