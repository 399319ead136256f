use thiserror::Error;

/// Every failure the utilities and the expression layer can raise.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The receiver of call/apply/bind is not a callable value.
    #[error("TypeError: {0} is not a function")]
    NotCallable(String),

    /// The argument list handed to `apply` is not an array.
    #[error("TypeError: CreateListFromArrayLike called on non-object ({0})")]
    InvalidArgumentList(String),

    #[error("reduce of empty sequence with no initial value")]
    EmptyReduce,

    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
