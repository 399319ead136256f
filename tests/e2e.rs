use polyfill_utils as pu;
use pu::{Context, Evaluator, Function, Registry, Value};
use serde_json::json;
use std::ops::RangeInclusive;

const CAR: &str = r#"json("{\"brand\":\"Toyota\",\"company\":\"Toyota Motor Corporation\"}")"#;
const CAMRY: &str = "Brand: Toyota, Company: Toyota Motor Corporation, Model: Camry, Year: 2020";

#[test]
fn test_example_apply() {
    let expr = format!("apply(display_details, {CAR}, ['Camry', 2020])");
    assert_eq!(pu::eval(&expr).unwrap(), json!(CAMRY));
}

#[test]
fn test_example_call() {
    let expr = format!("call(display_details, {CAR}, 'Camry', 2020)");
    assert_eq!(pu::eval(&expr).unwrap(), json!(CAMRY));
}

#[test]
fn test_example_filter() {
    let out = pu::eval("filter([1, 2, 3, 4, 5, 6], bind(above, null, 2))").unwrap();
    assert_eq!(out, json!([3, 4, 5, 6]));
}

#[test]
fn test_example_map() {
    let out = pu::eval("map([1, 2, 3, 4, 5], bind(times, null, 2))").unwrap();
    assert_eq!(out, json!([2, 4, 6, 8, 10]));
}

#[test]
fn test_example_reduce() {
    assert_eq!(pu::eval("reduce([1, 2, 3, 4, 5], add, 0)").unwrap(), json!(15));
}

#[test]
fn test_nested_pipeline() {
    let expr = "reduce(map(filter([1,2,3,4,5,6], is_even), bind(times, null, 3)), add)";
    assert_eq!(pu::eval(expr).unwrap(), json!(36));
}

#[test]
fn test_bound_context_survives_bind() {
    let expr = format!("map([2019, 2020], bind(display_details, {CAR}, 'Camry'))");
    let out = pu::eval(&expr).unwrap();
    assert_eq!(out[1], json!(CAMRY));
}

#[test]
fn test_demo_lines() {
    let lines: Vec<String> = pu::demos::DEMOS
        .iter()
        .map(|d| (d.run)().unwrap())
        .collect();
    assert_eq!(lines, vec![CAMRY, CAMRY, "[3, 4, 5, 6]", "[2, 4, 6, 8, 10]", "15"]);
}

/// Returns the arguments it was called with.
struct Collect;
impl Function for Collect {
    fn name(&self) -> &'static str { "collect" }
    fn arity(&self) -> RangeInclusive<usize> { 0..=4 }
    fn call(&self, _this: &Context, args: &[Value]) -> pu::Result<Value> {
        Ok(Value::Array(args.to_vec()))
    }
}

fn with_collect() -> Evaluator {
    let mut registry = Registry::with_builtins();
    registry.register(Collect);
    Evaluator::new(registry)
}

#[test]
fn test_reduce_passes_acc_element_index_sequence() {
    let out = with_collect().eval("reduce([1, 2], collect, null)").unwrap();
    assert_eq!(out, json!([[null, 1, 0, [1, 2]], 2, 1, [1, 2]]));
}

#[test]
fn test_reduce_without_seed_starts_at_index_one() {
    let out = with_collect().eval("reduce([1, 2], collect)").unwrap();
    assert_eq!(out, json!([1, 2, 1, [1, 2]]));
}

#[test]
fn test_map_passes_index_and_sequence() {
    let out = with_collect().eval("map(['x'], collect)").unwrap();
    assert_eq!(out, json!([["x", 0, ["x"]]]));
}
