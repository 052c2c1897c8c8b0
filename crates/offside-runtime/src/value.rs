//! Runtime value types for Offside evaluation.

use crate::env::{Env, Heap};
use crate::eval::eval;
use crate::EvalError;
use offside_ast::ast::Expr;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Equal,
}

impl BinOp {
    pub fn from_symbol(s: &str) -> Option<BinOp> {
        match s {
            "+" => Some(BinOp::Plus),
            "-" => Some(BinOp::Minus),
            "=" => Some(BinOp::Equal),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Equal => "=",
        }
    }

    pub fn compute<'a>(self, lhs: f64, rhs: f64) -> Value<'a> {
        match self {
            BinOp::Plus => Value::Number(lhs + rhs),
            BinOp::Minus => Value::Number(lhs - rhs),
            // exact IEEE comparison
            BinOp::Equal => Value::Boolean(lhs == rhs),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Number(f64),
    Boolean(bool),
    // An operator that has not consumed anything yet.
    Operator(BinOp),
    PartialOp { lhs: f64, op: BinOp },
    Closure { param: &'a str, body: &'a Expr, env: Env<'a> },
}

impl<'a> Value<'a> {
    /// Handed values take the value to their left as argument when juxtaposed.
    pub fn is_handed(&self) -> bool {
        matches!(self, Value::Operator(_))
    }

    pub fn apply(self, heap: &'a Heap<'a>, arg: Value<'a>) -> Result<Value<'a>, EvalError> {
        match (self, arg) {
            (Value::Number(_) | Value::Boolean(_), _) => {
                Err(EvalError::CannotApply { func: self.to_string(), arg: arg.to_string() })
            }
            (Value::Operator(op), Value::Number(lhs)) => Ok(Value::PartialOp { lhs, op }),
            (Value::Operator(op), _) => Err(EvalError::WrongArgType(arg.to_string(), op.to_string())),
            (Value::PartialOp { lhs, op }, Value::Number(rhs)) => Ok(op.compute(lhs, rhs)),
            (Value::PartialOp { .. }, _) => {
                Err(EvalError::WrongArgType(self.to_string(), arg.to_string()))
            }
            (Value::Closure { param, body, env }, _) => {
                let frame = heap.bind_value(param, arg, env);
                eval(heap, frame, body)
            }
        }
    }
}

/// Resolves a juxtaposition `v1 v2`.
///
/// A handed `v2` consumes `v1`, which is how `3 + 4` becomes `(3 +) 4`;
/// otherwise an unhanded `v1` is applied to `v2`.
pub fn apply_juxtaposed<'a>(
    heap: &'a Heap<'a>,
    v1: Value<'a>,
    v2: Value<'a>,
) -> Result<Value<'a>, EvalError> {
    if v2.is_handed() {
        v2.apply(heap, v1)
    } else if !v1.is_handed() {
        v1.apply(heap, v2)
    } else {
        Err(EvalError::CannotApply { func: v1.to_string(), arg: v2.to_string() })
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write_number(f, *n),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Operator(op) => write!(f, "{op}"),
            Value::PartialOp { lhs, op } => {
                write_number(f, *lhs)?;
                write!(f, " {op}")
            }
            Value::Closure { param, .. } => write!(f, "\\{param}.<...>"),
        }
    }
}

/// Writes `n` the way `Double.toString` does: always a fractional part,
/// `E` notation outside `[1e-3, 1e7)`, and `Infinity`/`NaN` spelled out.
///
/// Digits are the shortest that read back to the same value.
pub fn write_number(f: &mut impl fmt::Write, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    let sign = if n.is_sign_negative() { "-" } else { "" };
    if n.is_infinite() {
        return write!(f, "{sign}Infinity");
    }
    if n == 0.0 {
        return write!(f, "{sign}0.0");
    }

    // `{:e}` gives the shortest round-trip digits as `d.ddde<exp>`
    let sci = format!("{:e}", n.abs());
    let (mantissa, exp) = sci.split_once('e').ok_or(fmt::Error)?;
    let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-3..7).contains(&exp) {
        let (lead, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        return write!(f, "{sign}{lead}.{rest}E{exp}");
    }
    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        return write!(f, "{sign}0.{zeros}{digits}");
    }
    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        let pad = "0".repeat(int_len - digits.len());
        write!(f, "{sign}{digits}{pad}.0")
    } else {
        let (int, frac) = digits.split_at(int_len);
        write!(f, "{sign}{int}.{frac}")
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Operator(a), Value::Operator(b)) => a == b,
            (Value::PartialOp { lhs: a, op: p }, Value::PartialOp { lhs: b, op: q }) => {
                a == b && p == q
            }
            // functions are not comparable
            _ => false,
        }
    }
}
