use polyfill_utils as pu;
use pu::{Callee, Context, EvalError};
use serde_json::json;

// A non-callable receiver is rejected before the context is touched.
#[test]
fn test_call_on_number_is_not_callable() {
    let mut ctx = Context::new().with("brand", "Toyota");
    let err = pu::call!(&Callee::from(json!(5)), Some(&mut ctx), "Camry").unwrap_err();
    assert!(matches!(err, EvalError::NotCallable(_)), "got {err}");
    assert_eq!(err.to_string(), "TypeError: 5 is not a function");
    assert!(ctx.bound_function().is_none());
}

#[test]
fn test_apply_with_string_argument_list() {
    let err = pu::eval("apply(display_details, null, \"abc\")").unwrap_err();
    assert!(matches!(err, EvalError::InvalidArgumentList(_)), "got {err}");
}

#[test]
fn test_reduce_empty_without_seed() {
    let err = pu::reduce(&[] as &[i64], |acc, x, _, _| acc + x, None).unwrap_err();
    assert!(matches!(err, EvalError::EmptyReduce));
    assert_eq!(pu::eval("reduce([], add, 0)").unwrap(), json!(0));
}

#[test]
fn test_unknown_function_and_bad_syntax() {
    assert!(matches!(pu::eval("frobnicate(1)"), Err(EvalError::UnknownFunction(_))));
    assert!(matches!(pu::eval("map([1, 2]"), Err(EvalError::Parse(_))));
    assert!(matches!(pu::eval("times(1)"), Err(EvalError::Arity { .. })));
}
