//! Runtime error types for Offside evaluation.

use offside_ast::span::Span;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound var: {0}")]
    Unbound(String),
    #[error("cannot apply: {func} {arg}")]
    CannotApply { func: String, arg: String },
    #[error("wrong arg type: {0} {1}")]
    WrongArgType(String, String),
    #[error("condition not boolean: {0}")]
    NotBoolean(String),
    #[error("recursive value: {0}")]
    RecursiveValue(String),
    /// An error together with the expressions it passed through, innermost first.
    #[error("{}: {}", head(.spans), .kind)]
    Traced { kind: Box<EvalError>, spans: Vec<Span> },
}

fn head(spans: &[Span]) -> String {
    spans.first().map(Span::to_string).unwrap_or_default()
}

impl EvalError {
    /// Records that the error escaped the expression at `span`.
    ///
    /// The first call starts the trace; later calls append enclosing
    /// expressions.
    pub fn traced(self, span: Span) -> EvalError {
        match self {
            EvalError::Traced { kind, mut spans } => {
                spans.push(span);
                EvalError::Traced { kind, spans }
            }
            other => EvalError::Traced { kind: Box::new(other), spans: vec![span] },
        }
    }

    /// Span of the innermost expression that failed.
    pub fn span(&self) -> Option<Span> {
        self.trace().first().copied()
    }

    pub fn trace(&self) -> &[Span] {
        match self {
            EvalError::Traced { spans, .. } => spans,
            _ => &[],
        }
    }

    /// The underlying error without its trace.
    pub fn kind(&self) -> &EvalError {
        match self {
            EvalError::Traced { kind, .. } => kind,
            other => other,
        }
    }
}
