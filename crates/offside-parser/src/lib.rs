use log::debug;
use offside_ast::{ast::*, span::Span};
use offside_lexer::{LineScanner, Token};
use std::io::BufRead;

/// Nested binding blocks sit this many columns deeper than their owner.
pub const NESTED_INDENT: usize = 4;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("{span}: indent {found} (expected {expected})")]
    Indent { span: Span, found: usize, expected: usize },
    #[error("{0}: variable name is empty")]
    EmptyVariableName(Span),
    #[error("{0}: unexpected end of line")]
    UnexpectedEndOfLine(Span),
    #[error("{0}: missing variables")]
    MissingVariables(Span),
    #[error("{0}: expr term is empty")]
    EmptyTerm(Span),
    #[error("{0}: unexpected if")]
    UnexpectedIf(Span),
    #[error("{0}: unexpected end of file")]
    UnexpectedEndOfFile(Span),
    #[error("{span}: already bound: {name}")]
    AlreadyBound { span: Span, name: String },
    #[error("{span}: I/O error: {source}")]
    Io {
        span: Span,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Indent { span, .. }
            | ParseError::AlreadyBound { span, .. }
            | ParseError::Io { span, .. } => *span,
            ParseError::EmptyVariableName(span)
            | ParseError::UnexpectedEndOfLine(span)
            | ParseError::MissingVariables(span)
            | ParseError::EmptyTerm(span)
            | ParseError::UnexpectedIf(span)
            | ParseError::UnexpectedEndOfFile(span) => *span,
        }
    }
}

/// Top-level bindings plus the position where reading stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub bindings: Bindings,
    /// Used to place diagnostics that refer to no particular token, such as a
    /// missing `root`.
    pub end: Span,
}

pub fn parse_program(src: &str) -> Result<Bindings, ParseError> {
    parse_reader(src.as_bytes()).map(|p| p.bindings)
}

pub fn parse_reader<R: BufRead>(reader: R) -> Result<Program, ParseError> {
    let mut parser = Parser::new(reader);
    let bindings = parser.parse_bindings(0)?;
    Ok(Program { bindings, end: parser.src_loc() })
}

/// Line-at-a-time parser.
///
/// Only one line is held at a time; a line that belongs to an enclosing
/// block stays buffered until that block's `parse_binding` picks it up.
pub struct Parser<R> {
    lines: std::io::Lines<R>,
    line: LineScanner,
    line_no: usize,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: LineScanner::new(""), line_no: 0 }
    }

    /// Current read position as a zero-width span.
    pub fn src_loc(&self) -> Span {
        Span::point(self.line_no.max(1), self.line.cursor() + 1)
    }

    /// Loads the next non-blank line. Returns `false` at end of input, leaving
    /// the last line read in place so `src_loc` still points into it.
    fn advance(&mut self) -> Result<bool, ParseError> {
        loop {
            match self.lines.next() {
                None => return Ok(false),
                Some(Err(source)) => return Err(ParseError::Io { span: self.src_loc(), source }),
                Some(Ok(text)) => {
                    self.line_no += 1;
                    let scanner = LineScanner::new(text);
                    if scanner.is_blank() {
                        // a skipped line still moves the position to its start
                        self.line = LineScanner::new("");
                        continue;
                    }
                    self.line = scanner;
                    return Ok(true);
                }
            }
        }
    }

    pub fn parse_bindings(&mut self, indent: usize) -> Result<Bindings, ParseError> {
        let mut bindings = Bindings::new();
        while let Some((name, expr)) = self.parse_binding(indent)? {
            debug!("parsed binding `{}` at {} (indent {})", name.name, name.span, indent);
            if let Err(dup) = bindings.insert(name, expr) {
                return Err(ParseError::AlreadyBound { span: dup.name.span, name: dup.name.name });
            }
        }
        Ok(bindings)
    }

    fn parse_binding(&mut self, indent: usize) -> Result<Option<(Ident, Expr)>, ParseError> {
        if self.line.is_exhausted() && !self.advance()? {
            return Ok(None);
        }
        let l = self.line_no;

        let i = self.line.indent();
        if i < indent {
            return Ok(None);
        }
        if i > indent {
            return Err(ParseError::Indent { span: Span::new(l, 1, i), found: i, expected: indent });
        }

        let mut vars = Vec::new();
        loop {
            let t = self.line.next_token();
            if t.is_empty() {
                return Err(ParseError::EmptyVariableName(Span::point(l, t.begin + 1)));
            }
            if t.at_eol {
                return Err(ParseError::UnexpectedEndOfLine(Span::point(l, t.end + 1)));
            }
            if t.text == "=" {
                break;
            }
            vars.push(Ident::new(t.text, Span::new(l, t.begin + 1, t.end)));
        }

        let mut vars = vars.into_iter();
        let Some(name) = vars.next() else {
            return Err(ParseError::MissingVariables(Span::point(l, self.line.cursor() + 1)));
        };

        let expr = self.parse_expr(indent)?;
        // f x y = e  =>  f = \x. \y. e
        let expr = vars.rev().fold(expr, |body, param| Expr::lambda(param, body));
        Ok(Some((name, expr)))
    }

    fn parse_expr(&mut self, indent: usize) -> Result<Expr, ParseError> {
        let e = self.parse_cond_expr()?;
        let bindings = self.parse_bindings(indent + NESTED_INDENT)?;
        if bindings.is_empty() {
            return Ok(e);
        }
        debug!("nested scope of {} binding(s) under {}", bindings.len(), e.span);
        Ok(Expr::letrec(e, bindings))
    }

    fn parse_cond_expr(&mut self) -> Result<Expr, ParseError> {
        let l = self.line_no;
        let i_start = self.line.cursor();

        // true branch (or the whole expression when there is no `if`)
        let first = self.term()?;
        if first.text == "if" {
            return Err(ParseError::UnexpectedIf(Span::new(l, first.begin + 1, first.end + 1)));
        }
        let mut at_eol = first.at_eol;
        let mut then_branch = var_expr(l, first);
        let mut saw_if = false;
        while !at_eol {
            let t = self.term()?;
            at_eol = t.at_eol;
            if t.text == "if" {
                saw_if = true;
                break;
            }
            then_branch = Expr::app(then_branch, var_expr(l, t));
        }
        if !saw_if {
            return Ok(then_branch);
        }

        // condition, through end of line
        let t = self.term()?;
        let mut at_eol = t.at_eol;
        let mut cond = var_expr(l, t);
        while !at_eol {
            let t = self.term()?;
            at_eol = t.at_eol;
            cond = Expr::app(cond, var_expr(l, t));
        }

        // false branch on the next line, aligned with the true branch
        let eof = Span::point(l, self.line.cursor() + 1);
        if !self.advance()? {
            return Err(ParseError::UnexpectedEndOfFile(eof));
        }
        let i = self.line.indent();
        if i != i_start {
            return Err(ParseError::Indent {
                span: Span::new(self.line_no, 1, i.max(1)),
                found: i,
                expected: i_start,
            });
        }
        let else_branch = self.parse_cond_expr()?;

        Ok(Expr::cond(cond, then_branch, else_branch))
    }

    fn term(&mut self) -> Result<Token, ParseError> {
        let t = self.line.next_token();
        if t.is_empty() {
            return Err(ParseError::EmptyTerm(Span::point(self.line_no, t.begin + 1)));
        }
        Ok(t)
    }
}

fn var_expr(line: usize, t: Token) -> Expr {
    Expr::var(t.text, Span::new(line, t.begin + 1, t.end))
}
