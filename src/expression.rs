// src/expression.rs
use serde_json::Value;
use tracing::debug;

use crate::context::Context;
use crate::errors::{EvalError, Result};
use crate::functions::{dispatch, describe_arity, Registry};
use crate::invoke::{apply, bind, call, Callee};
use crate::parser::{ParseError, Parser};
use crate::seq::{filter_values, map_values, reduce_values};
use crate::values::type_name;

#[derive(Debug, Clone, PartialEq)]
pub enum ENode {
    Call { name: String, args: Vec<ENode> },
    /// Bare identifier: a reference to a registered function.
    Ref(String),
    Literal(Value),
    Array(Vec<ENode>),
}

impl From<ParseError> for EvalError {
    fn from(e: ParseError) -> Self {
        EvalError::Parse(e.to_string())
    }
}

pub fn parse_expr(input: &str) -> std::result::Result<ENode, ParseError> {
    let mut p = EParser::new(input);
    let node = p.parse_node()?;
    p.parser.skip_ws();
    if !p.parser.eof() {
        return Err(ParseError::InvalidSyntax(format!(
            "trailing input at {}",
            p.parser.position()
        )));
    }
    Ok(node)
}

/// Deepest `[`/`(` nesting accepted by the parser.
pub const MAX_DEPTH: usize = 128;

struct EParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> EParser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            parser: Parser::new(s),
            depth: 0,
        }
    }

    fn parse_node(&mut self) -> std::result::Result<ENode, ParseError> {
        self.parser.skip_ws();
        match self.parser.peek_char() {
            Some('"') | Some('\'') => {
                let s = self.parser.parse_quoted_string()?;
                return Ok(ENode::Literal(Value::String(s)));
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                return Ok(ENode::Literal(self.parser.parse_number_literal()?));
            }
            Some('[') => {
                self.parser.consume_char('[');
                let items = self.parse_list(']')?;
                return Ok(ENode::Array(items));
            }
            _ => {}
        }
        let name = self.parser.parse_identifier()?;
        self.parser.skip_ws();
        if self.parser.consume_char('(') {
            let args = self.parse_list(')')?;
            return Ok(ENode::Call { name, args });
        }
        Ok(match name.as_str() {
            "true" => ENode::Literal(Value::Bool(true)),
            "false" => ENode::Literal(Value::Bool(false)),
            "null" => ENode::Literal(Value::Null),
            _ => ENode::Ref(name),
        })
    }

    /// Comma separated nodes up to and including `close`.
    fn parse_list(&mut self, close: char) -> std::result::Result<Vec<ENode>, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::InvalidSyntax(format!(
                "nesting too deep at {}",
                self.parser.position()
            )));
        }
        self.depth += 1;
        let items = self.parse_items(close);
        self.depth -= 1;
        items
    }

    fn parse_items(&mut self, close: char) -> std::result::Result<Vec<ENode>, ParseError> {
        let mut out = Vec::new();
        self.parser.skip_ws();
        if self.parser.consume_char(close) {
            return Ok(out);
        }
        loop {
            out.push(self.parse_node()?);
            self.parser.skip_ws();
            if self.parser.consume_char(',') {
                continue;
            }
            self.parser.expect(close)?;
            return Ok(out);
        }
    }
}

fn check_arg_count(name: &str, args: &[ENode], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(EvalError::Arity {
            name: name.to_string(),
            expected: describe_arity(&(min..=max)),
            got: args.len(),
        });
    }
    Ok(())
}

/// Evaluates expression trees against a function registry.
///
/// `call`, `apply`, `bind`, `filter`, `map`, `reduce` and `json` are evaluated here
/// because they take function references or contexts; every other call goes to the
/// registry with an empty context.
pub struct Evaluator {
    registry: Registry,
}

impl Evaluator {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn eval(&self, expr: &str) -> Result<Value> {
        let ast = parse_expr(expr)?;
        debug!(?ast, "parsed expression");
        Ok(self.eval_ast(&ast)?.into_value())
    }

    pub fn eval_ast(&self, node: &ENode) -> Result<Callee> {
        match node {
            ENode::Literal(v) => Ok(Callee::Value(v.clone())),
            ENode::Ref(name) => self
                .registry
                .get(name)
                .map(Callee::Function)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone())),
            ENode::Array(items) => {
                let values = items
                    .iter()
                    .map(|n| self.eval_data(n))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Callee::Value(Value::Array(values)))
            }
            ENode::Call { name, args } => self.eval_call(name, args),
        }
    }

    fn eval_data(&self, node: &ENode) -> Result<Value> {
        match self.eval_ast(node)? {
            Callee::Value(v) => Ok(v),
            Callee::Function(f) => Err(EvalError::Runtime(format!(
                "function {} used where a value is expected",
                f.name()
            ))),
        }
    }

    fn eval_array(&self, name: &str, node: &ENode) -> Result<Vec<Value>> {
        match self.eval_data(node)? {
            Value::Array(items) => Ok(items),
            other => Err(EvalError::Runtime(format!(
                "{name} expects an array, got {}",
                type_name(&other)
            ))),
        }
    }

    fn eval_context(&self, node: Option<&ENode>) -> Result<Context> {
        match node {
            Some(n) => Context::from_value(self.eval_data(n)?),
            None => Ok(Context::new()),
        }
    }

    fn eval_call(&self, name: &str, args: &[ENode]) -> Result<Callee> {
        let value = match name {
            "json" => {
                check_arg_count(name, args, 1, 1)?;
                let text = match self.eval_data(&args[0])? {
                    Value::String(s) => s,
                    other => {
                        return Err(EvalError::Runtime(format!(
                            "json expects a string, got {}",
                            type_name(&other)
                        )))
                    }
                };
                serde_json::from_str::<Value>(&text)
                    .map_err(|e| EvalError::Parse(format!("invalid JSON: {e}")))?
            }
            "call" => {
                check_arg_count(name, args, 1, usize::MAX)?;
                let f = self.eval_ast(&args[0])?;
                f.as_function()?;
                let mut ctx = self.eval_context(args.get(1))?;
                let rest = args
                    .iter()
                    .skip(2)
                    .map(|n| self.eval_data(n))
                    .collect::<Result<Vec<_>>>()?;
                call(&f, Some(&mut ctx), rest)?
            }
            "apply" => {
                check_arg_count(name, args, 1, 3)?;
                let f = self.eval_ast(&args[0])?;
                f.as_function()?;
                let mut ctx = self.eval_context(args.get(1))?;
                let list = args.get(2).map(|n| self.eval_data(n)).transpose()?;
                apply(&f, Some(&mut ctx), list.as_ref())?
            }
            "bind" => {
                check_arg_count(name, args, 1, usize::MAX)?;
                let f = self.eval_ast(&args[0])?;
                f.as_function()?;
                let ctx = self.eval_context(args.get(1))?;
                let rest = args
                    .iter()
                    .skip(2)
                    .map(|n| self.eval_data(n))
                    .collect::<Result<Vec<_>>>()?;
                return bind(&f, Some(ctx), rest);
            }
            "filter" => {
                check_arg_count(name, args, 2, 2)?;
                let seq = self.eval_array(name, &args[0])?;
                let predicate = self.eval_ast(&args[1])?;
                Value::Array(filter_values(&seq, &predicate)?)
            }
            "map" => {
                check_arg_count(name, args, 2, 2)?;
                let seq = self.eval_array(name, &args[0])?;
                let transform = self.eval_ast(&args[1])?;
                Value::Array(map_values(&seq, &transform)?)
            }
            "reduce" => {
                check_arg_count(name, args, 2, 3)?;
                let seq = self.eval_array(name, &args[0])?;
                let combine = self.eval_ast(&args[1])?;
                let seed = args.get(2).map(|n| self.eval_data(n)).transpose()?;
                reduce_values(&seq, &combine, seed)?
            }
            _ => {
                let f = self
                    .registry
                    .get(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
                let values = args
                    .iter()
                    .map(|n| self.eval_data(n))
                    .collect::<Result<Vec<_>>>()?;
                dispatch(f.as_ref(), &Context::new(), &values)?
            }
        };
        Ok(Callee::Value(value))
    }
}
