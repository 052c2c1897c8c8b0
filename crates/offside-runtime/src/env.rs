//! Environment frames and the arena they live in.
//!
//! Frames are allocated in a [`Heap`] and referred to by shared reference, so
//! a recursive-let frame can hand out closures that capture the frame itself.
//! Everything is freed together when the heap is dropped.

use crate::literal::parse_number;
use crate::thunk::{Deferred, Thunk, ThunkState};
use crate::value::{BinOp, Value};
use offside_ast::ast::Bindings;
use std::cell::RefCell;
use std::fmt;
use typed_arena::Arena;

pub type Env<'a> = &'a Frame<'a>;

pub enum Frame<'a> {
    /// Built-in operators and numeric literals.
    Global,
    /// Sibling bindings evaluated in this very frame, one memo cell each.
    Rec { bindings: &'a Bindings, cells: Vec<RefCell<ThunkState<'a>>>, outer: Env<'a> },
    /// A lambda parameter bound to its argument.
    Value { name: &'a str, value: Value<'a>, outer: Env<'a> },
}

/// Lookup failure: the name is bound nowhere in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unbound;

impl<'a> Frame<'a> {
    pub fn resolve(&'a self, name: &str) -> Result<Deferred<'a>, Unbound> {
        let mut frame = self;
        loop {
            match frame {
                Frame::Value { name: bound, value, outer } => {
                    if *bound == name {
                        return Ok(Deferred::Ready(*value));
                    }
                    frame = *outer;
                }
                Frame::Rec { bindings, cells, outer } => {
                    let found = bindings.iter().zip(cells).find(|(b, _)| b.name.name == name);
                    if let Some((b, state)) = found {
                        return Ok(Deferred::Thunk(Thunk {
                            name: &b.name.name,
                            expr: &b.expr,
                            env: frame,
                            state,
                        }));
                    }
                    frame = *outer;
                }
                Frame::Global => return global_value(name).map(Deferred::Ready).ok_or(Unbound),
            }
        }
    }
}

fn global_value<'a>(name: &str) -> Option<Value<'a>> {
    if let Some(op) = BinOp::from_symbol(name) {
        return Some(Value::Operator(op));
    }
    parse_number(name).map(Value::Number)
}

// Frames are cyclic once memo cells hold closures over them; keep Debug shallow.
impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Global => f.write_str("Global"),
            Frame::Rec { bindings, .. } => f
                .debug_tuple("Rec")
                .field(&bindings.iter().map(|b| b.name.name.as_str()).collect::<Vec<_>>())
                .finish(),
            Frame::Value { name, value, .. } => {
                f.debug_tuple("Value").field(name).field(&value.to_string()).finish()
            }
        }
    }
}

/// Arena owning every frame created during one run.
pub struct Heap<'a> {
    frames: Arena<Frame<'a>>,
    global: Frame<'a>,
}

impl<'a> Heap<'a> {
    pub fn new() -> Self {
        Self { frames: Arena::new(), global: Frame::Global }
    }

    pub fn global(&'a self) -> Env<'a> {
        &self.global
    }

    pub fn rec_frame(&'a self, bindings: &'a Bindings, outer: Env<'a>) -> Env<'a> {
        let cells = bindings.iter().map(|_| RefCell::new(ThunkState::Unevaluated)).collect();
        self.frames.alloc(Frame::Rec { bindings, cells, outer })
    }

    pub fn bind_value(&'a self, name: &'a str, value: Value<'a>, outer: Env<'a>) -> Env<'a> {
        self.frames.alloc(Frame::Value { name, value, outer })
    }

    /// Number of frames allocated so far.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Heap<'_> {
    fn default() -> Self {
        Self::new()
    }
}
