//! Deferred computations for lazy bindings.

use crate::env::{Env, Heap};
use crate::eval::eval;
use crate::{EvalError, Value};
use log::debug;
use offside_ast::ast::Expr;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy)]
pub enum ThunkState<'a> {
    Unevaluated,
    Evaluating,
    Evaluated(Value<'a>),
}

/// A binding's expression paired with the recursive-let frame it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Thunk<'a> {
    pub name: &'a str,
    pub expr: &'a Expr,
    pub env: Env<'a>,
    pub state: &'a RefCell<ThunkState<'a>>,
}

impl<'a> Thunk<'a> {
    /// Evaluates the binding once and caches the value.
    ///
    /// A failed evaluation leaves the thunk unevaluated, so forcing it again
    /// reports the same error.
    pub fn force(&self, heap: &'a Heap<'a>) -> Result<Value<'a>, EvalError> {
        let state = *self.state.borrow();
        match state {
            ThunkState::Evaluated(v) => return Ok(v),
            // The value depends on itself; evaluating again would never finish.
            ThunkState::Evaluating => return Err(EvalError::RecursiveValue(self.name.to_string())),
            ThunkState::Unevaluated => {}
        }
        *self.state.borrow_mut() = ThunkState::Evaluating;
        debug!("forcing `{}` ({})", self.name, self.expr.span);
        match eval(heap, self.env, self.expr) {
            Ok(v) => {
                *self.state.borrow_mut() = ThunkState::Evaluated(v);
                Ok(v)
            }
            Err(err) => {
                *self.state.borrow_mut() = ThunkState::Unevaluated;
                Err(err)
            }
        }
    }
}

/// What a name resolves to: a value at hand, or a binding still to be forced.
#[derive(Debug, Clone, Copy)]
pub enum Deferred<'a> {
    Ready(Value<'a>),
    Thunk(Thunk<'a>),
}

impl<'a> Deferred<'a> {
    pub fn force(&self, heap: &'a Heap<'a>) -> Result<Value<'a>, EvalError> {
        match self {
            Deferred::Ready(v) => Ok(*v),
            Deferred::Thunk(t) => t.force(heap),
        }
    }
}
