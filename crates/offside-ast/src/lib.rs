pub mod span {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Location of a construct in the source.
    ///
    /// Lines and columns are 1-based; `char_end` is inclusive and columns
    /// count characters, not bytes.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    pub struct Span {
        pub line: usize,
        pub char_begin: usize,
        pub char_end: usize,
    }

    impl Span {
        pub fn new(line: usize, char_begin: usize, char_end: usize) -> Self {
            debug_assert!(line >= 1 && char_begin >= 1, "span positions start from 1");
            debug_assert!(char_begin <= char_end, "span begins after it ends");
            Self { line, char_begin, char_end }
        }

        /// A zero-width position at column `col` (1-based).
        pub fn point(line: usize, col: usize) -> Self {
            Self::new(line, col, col)
        }

        /// Merge two adjacent spans on the same line into one covering both.
        ///
        /// # Panics
        ///
        /// If the spans are on different lines or `self` does not end strictly
        /// before `other` begins. The parser only merges constructs it read left
        /// to right on one line, so either case is a parser bug.
        pub fn compose(self, other: Span) -> Span {
            if self.line != other.line {
                panic!("line numbers mismatch: {} vs. {}", self.line, other.line);
            }
            if self.char_end >= other.char_begin {
                panic!("overlap: {} vs. {}", self.char_end, other.char_begin);
            }
            Span { line: self.line, char_begin: self.char_begin, char_end: other.char_end }
        }
    }

    impl fmt::Display for Span {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}({}-{})", self.line, self.char_begin, self.char_end)
        }
    }
}

pub mod ast {
    use crate::span::Span;
    use serde::{Deserialize, Serialize};

    /// A name as written in the source: binding names and lambda parameters.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct Ident {
        pub name: String,
        pub span: Span,
    }
    impl Ident {
        pub fn new(name: impl Into<String>, span: Span) -> Self {
            Self { name: name.into(), span }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub enum ExprKind {
        Var(String),
        // Juxtaposition; which side applies to which is decided at runtime.
        App {
            func: Box<Expr>,
            arg: Box<Expr>,
        },
        Lambda {
            param: Ident,
            body: Box<Expr>,
        },
        Cond {
            cond: Box<Expr>,
            then_branch: Box<Expr>,
            else_branch: Box<Expr>,
        },
        // Deeper-indented block under an expression; siblings see each other.
        LetRec {
            body: Box<Expr>,
            bindings: Bindings,
        },
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct Expr {
        pub kind: ExprKind,
        pub span: Span,
    }

    impl Expr {
        pub fn new(kind: ExprKind, span: Span) -> Self {
            Self { kind, span }
        }

        pub fn var(name: impl Into<String>, span: Span) -> Self {
            Self::new(ExprKind::Var(name.into()), span)
        }

        pub fn app(func: Expr, arg: Expr) -> Self {
            let span = func.span.compose(arg.span);
            Self::new(ExprKind::App { func: Box::new(func), arg: Box::new(arg) }, span)
        }

        pub fn lambda(param: Ident, body: Expr) -> Self {
            let span = param.span.compose(body.span);
            Self::new(ExprKind::Lambda { param, body: Box::new(body) }, span)
        }

        /// `then_branch if cond`; the true branch comes first on the line.
        pub fn cond(cond: Expr, then_branch: Expr, else_branch: Expr) -> Self {
            let span = then_branch.span.compose(cond.span);
            Self::new(
                ExprKind::Cond {
                    cond: Box::new(cond),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                span,
            )
        }

        pub fn letrec(body: Expr, bindings: Bindings) -> Self {
            let span = body.span;
            Self::new(ExprKind::LetRec { body: Box::new(body), bindings }, span)
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct Binding {
        pub name: Ident,
        pub expr: Expr,
    }

    /// Duplicate-free set of bindings, kept in source order.
    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    #[serde(transparent)]
    pub struct Bindings {
        entries: Vec<Binding>,
    }

    impl Bindings {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a binding. A name that is already bound is handed back untouched.
        pub fn insert(&mut self, name: Ident, expr: Expr) -> Result<(), Binding> {
            if self.contains(&name.name) {
                return Err(Binding { name, expr });
            }
            self.entries.push(Binding { name, expr });
            Ok(())
        }

        pub fn get(&self, name: &str) -> Option<&Expr> {
            self.entries.iter().find(|b| b.name.name == name).map(|b| &b.expr)
        }

        pub fn contains(&self, name: &str) -> bool {
            self.entries.iter().any(|b| b.name.name == name)
        }

        pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
            self.entries.iter()
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }

    impl<'a> IntoIterator for &'a Bindings {
        type Item = &'a Binding;
        type IntoIter = std::slice::Iter<'a, Binding>;

        fn into_iter(self) -> Self::IntoIter {
            self.iter()
        }
    }
}

pub mod pretty {
    use crate::ast::*;

    pub fn print_expr(e: &Expr) -> String {
        match &e.kind {
            ExprKind::Var(name) => name.clone(),
            ExprKind::App { func, arg } => format!("({} {})", print_expr(func), print_expr(arg)),
            ExprKind::Lambda { param, body } => {
                format!("(\\{}. {})", param.name, print_expr(body))
            }
            ExprKind::Cond { cond, then_branch, else_branch } => format!(
                "(if {} then {} else {})",
                print_expr(cond),
                print_expr(then_branch),
                print_expr(else_branch)
            ),
            ExprKind::LetRec { body, bindings } => {
                let bs = bindings
                    .iter()
                    .map(|b| format!("{} = {};", b.name.name, print_expr(&b.expr)))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("(letrec {} in {})", bs, print_expr(body))
            }
        }
    }

    /// One `name = expr` line per binding, in source order.
    pub fn print_bindings(bindings: &Bindings) -> String {
        let mut out = String::new();
        for b in bindings {
            out.push_str(&format!("{} = {}\n", b.name.name, print_expr(&b.expr)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::ast::*;
    use super::pretty::*;
    use super::span::Span;
    use pretty_assertions::assert_eq;

    fn var(name: &str, line: usize, begin: usize) -> Expr {
        Expr::var(name, Span::new(line, begin, begin + name.chars().count() - 1))
    }

    #[test]
    fn span_display() {
        assert_eq!(Span::new(3, 7, 12).to_string(), "3(7-12)");
    }

    #[test]
    fn compose_covers_both() {
        let s = Span::new(1, 1, 3).compose(Span::new(1, 5, 9));
        assert_eq!(s, Span::new(1, 1, 9));
    }

    #[test]
    #[should_panic(expected = "line numbers mismatch")]
    fn compose_across_lines_panics() {
        let _ = Span::new(1, 1, 3).compose(Span::new(2, 5, 9));
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn compose_overlapping_panics() {
        let _ = Span::new(1, 1, 5).compose(Span::new(1, 5, 9));
    }

    #[test]
    fn app_span_is_composed() {
        // 3 + 4
        let e = Expr::app(Expr::app(var("3", 1, 8), var("+", 1, 10)), var("4", 1, 12));
        assert_eq!(e.span, Span::new(1, 8, 12));
        assert_eq!(print_expr(&e), "((3 +) 4)");
    }

    #[test]
    fn cond_span_runs_from_true_branch_to_condition() {
        let then_branch = var("1", 1, 8);
        let cond = Expr::app(Expr::app(var("x", 1, 13), var("=", 1, 15)), var("0", 1, 17));
        let else_branch = var("2", 2, 8);
        let e = Expr::cond(cond, then_branch, else_branch);
        assert_eq!(e.span, Span::new(1, 8, 17));
        assert_eq!(print_expr(&e), "(if ((x =) 0) then 1 else 2)");
    }

    #[test]
    fn bindings_reject_duplicates_and_keep_order() {
        let mut bs = Bindings::new();
        bs.insert(Ident::new("b", Span::point(1, 1)), var("1", 1, 5)).unwrap();
        bs.insert(Ident::new("a", Span::point(2, 1)), var("b", 2, 5)).unwrap();
        let dup = bs.insert(Ident::new("b", Span::point(3, 1)), var("2", 3, 5)).unwrap_err();
        assert_eq!(dup.name.span, Span::point(3, 1));
        assert_eq!(bs.len(), 2);
        assert_eq!(print_bindings(&bs), "b = 1\na = b\n");
        assert_eq!(bs.get("a"), Some(&var("b", 2, 5)));
    }

    #[test]
    fn letrec_prints_bindings_before_body() {
        let mut bs = Bindings::new();
        bs.insert(Ident::new("y", Span::point(2, 5)), var("2", 2, 9)).unwrap();
        let e = Expr::letrec(var("y", 1, 8), bs);
        assert_eq!(e.span, Span::new(1, 8, 8));
        assert_eq!(print_expr(&e), "(letrec y = 2; in y)");
    }

    #[test]
    fn bindings_serialize_as_list() {
        let mut bs = Bindings::new();
        bs.insert(Ident::new("root", Span::new(1, 1, 4)), var("1", 1, 8)).unwrap();
        let json = serde_json::to_value(&bs).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"]["name"], "root");
    }
}
