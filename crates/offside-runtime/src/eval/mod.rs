//! Evaluation functions for Offside runtime.

use crate::env::{Env, Heap};
use crate::value::apply_juxtaposed;
use crate::{EvalError, Value};
use log::{debug, trace};
use offside_ast::ast::{Expr, ExprKind};

/// Remaining stack below which evaluation moves to a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each additional stack segment.
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Evaluates `e` in `env`, growing the stack on demand for deep recursion.
pub fn eval<'a>(heap: &'a Heap<'a>, env: Env<'a>, e: &'a Expr) -> Result<Value<'a>, EvalError> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || eval_inner(heap, env, e))
}

fn eval_inner<'a>(heap: &'a Heap<'a>, env: Env<'a>, e: &'a Expr) -> Result<Value<'a>, EvalError> {
    let v = match &e.kind {
        ExprKind::Var(name) => {
            let deferred = env
                .resolve(name)
                .map_err(|_| EvalError::Unbound(name.clone()).traced(e.span))?;
            deferred.force(heap).map_err(|err| err.traced(e.span))?
        }
        ExprKind::Lambda { param, body } => Value::Closure { param: &param.name, body, env },
        ExprKind::LetRec { body, bindings } => {
            let frame = heap.rec_frame(bindings, env);
            debug!("letrec frame with {} binding(s) at {}", bindings.len(), e.span);
            eval(heap, frame, body)?
        }
        ExprKind::Cond { cond, then_branch, else_branch } => match eval(heap, env, cond)? {
            Value::Boolean(true) => eval(heap, env, then_branch)?,
            Value::Boolean(false) => eval(heap, env, else_branch)?,
            other => return Err(EvalError::NotBoolean(other.to_string()).traced(e.span)),
        },
        ExprKind::App { func, arg } => {
            // both sides are always evaluated; the operand values decide the direction
            let v1 = eval(heap, env, func)?;
            let v2 = eval(heap, env, arg)?;
            apply_juxtaposed(heap, v1, v2).map_err(|err| err.traced(e.span))?
        }
    };
    trace!("{} => {}", e.span, v);
    Ok(v)
}
