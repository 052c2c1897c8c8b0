//! Lazy evaluator for Offside programs.
//!
//! A program is a set of mutually recursive top-level bindings. Evaluation
//! forces `root` and everything it transitively depends on; bindings that are
//! never demanded are never evaluated.

use log::debug;
use offside_ast::ast::Bindings;
use offside_ast::span::Span;

pub mod env;
mod error;
pub mod eval;
mod literal;
pub mod thunk;
pub mod value;

pub use env::{Env, Frame, Heap};
pub use error::EvalError;
pub use eval::eval;
pub use value::{BinOp, Value};

/// Name of the binding a program evaluates to.
pub const ROOT: &str = "root";

/// Top-level bindings installed as one recursive frame over the globals.
pub struct Interpreter<'a> {
    heap: &'a Heap<'a>,
    top: Env<'a>,
}

impl<'a> Interpreter<'a> {
    pub fn new(heap: &'a Heap<'a>, bindings: &'a Bindings) -> Self {
        debug!("installing {} top-level binding(s)", bindings.len());
        let top = heap.rec_frame(bindings, heap.global());
        Self { heap, top }
    }

    /// Forces the top-level binding `name`.
    ///
    /// `at` is reported when nothing is bound to `name`. Errors raised while
    /// forcing keep the trace they were built with.
    pub fn lookup(&self, name: &str, at: Span) -> Result<Value<'a>, EvalError> {
        let deferred = self
            .top
            .resolve(name)
            .map_err(|_| EvalError::Unbound(name.to_string()).traced(at))?;
        deferred.force(self.heap)
    }

    pub fn root(&self, at: Span) -> Result<Value<'a>, EvalError> {
        self.lookup(ROOT, at)
    }
}

/// Evaluates `root` in `bindings` and renders the result.
///
/// `missing_root_at` is the position reported when the program has no
/// `root`, normally the point where parsing stopped.
pub fn eval_bindings(bindings: &Bindings, missing_root_at: Span) -> Result<String, EvalError> {
    let heap = Heap::new();
    let interp = Interpreter::new(&heap, bindings);
    let value = interp.root(missing_root_at)?;
    debug!("evaluated root with {} frame(s) allocated", heap.len());
    Ok(value.to_string())
}
