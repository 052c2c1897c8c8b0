use offside_ast::span::Span;
use offside_parser::{parse_program, parse_reader};
use offside_runtime::{eval_bindings, EvalError, Heap, Interpreter, Value};
use pretty_assertions::assert_eq;

fn run(src: &str) -> Result<String, EvalError> {
    let program = parse_reader(src.as_bytes()).expect("program should parse");
    eval_bindings(&program.bindings, program.end)
}

fn run_ok(src: &str) -> String {
    run(src).unwrap_or_else(|e| panic!("evaluation failed: {e}"))
}

const SUM: &str = "\
sum n = r
    r = 0 if n = 0
        n + m
    m = sum k
    k = n - 1
";

#[test]
fn arithmetic() {
    assert_eq!(run_ok("root = 3 + 4"), "7.0");
    assert_eq!(run_ok("root = 10 - 2 - 3"), "5.0");
    assert_eq!(run_ok("root = 1.5 + 1"), "2.5");
    assert_eq!(run_ok("root = 2 = 2"), "true");
}

#[test]
fn float_equality_is_exact() {
    assert_eq!(run_ok("root = 0.1 + 0.2 = 0.3"), "false");
}

#[test]
fn function_application() {
    assert_eq!(run_ok("id x = x + 1\nroot = id 41"), "42.0");
    assert_eq!(run_ok("add x y = x + y\nroot = add 3 4"), "7.0");
}

#[test]
fn bindings_are_order_independent() {
    assert_eq!(run_ok("root = a\na = b + 1\nb = 2"), "3.0");
    assert_eq!(run_ok("b = 2\na = b + 1\nroot = a"), "3.0");
}

#[test]
fn conditional_picks_a_branch() {
    assert_eq!(run_ok("root = 10 if 1 = 1\n       20"), "10.0");
    assert_eq!(run_ok("root = 10 if 1 = 2\n       20"), "20.0");
}

#[test]
fn untaken_branch_is_not_evaluated() {
    assert_eq!(run_ok("root = 1 if 0 = 0\n       nope"), "1.0");
}

#[test]
fn unused_bindings_are_never_forced() {
    assert_eq!(run_ok("root = 1\nunused = nope"), "1.0");
}

#[test]
fn nested_scopes_and_recursion() {
    assert_eq!(run_ok(&format!("{SUM}root = sum 5\n")), "15.0");
}

#[test]
fn inner_binding_shadows_outer() {
    let src = "x = 1\nroot = x\n    x = 2\n";
    assert_eq!(run_ok(src), "2.0");
}

#[test]
fn parameter_shadows_literal() {
    // any word can be a parameter name, even one that reads as a number
    assert_eq!(run_ok("f 1 = 1 + 1\nroot = f 5"), "10.0");
}

#[test]
fn literal_grammar() {
    assert_eq!(run_ok("root = Infinity"), "Infinity");
    assert_eq!(run_ok("root = 0 - Infinity"), "-Infinity");
    assert_eq!(run_ok("root = NaN = NaN"), "false");
    assert_eq!(run_ok("root = 1d + 0x1p3"), "9.0");
    assert_eq!(run_ok("root = 1e7"), "1.0E7");
    assert_eq!(run("root = inf").unwrap_err().to_string(), "1(8-10): unbound var: inf");
}

#[test]
fn closures_and_partials_render() {
    assert_eq!(run_ok("id x = x\nroot = id"), "\\x.<...>");
    assert_eq!(run_ok("root = 3 +"), "3.0 +");
    assert_eq!(run_ok("root = -"), "-");
}

#[test]
fn unbound_variable() {
    let e = run("root = unknownvar").unwrap_err();
    assert_eq!(e.kind(), &EvalError::Unbound("unknownvar".into()));
    assert_eq!(e.span(), Some(Span::new(1, 8, 17)));
    assert_eq!(e.to_string(), "1(8-17): unbound var: unknownvar");
}

#[test]
fn trace_follows_variable_chain() {
    let e = run("root = a\na = b\nb = zz").unwrap_err();
    assert_eq!(e.trace(), &[Span::new(3, 5, 6), Span::new(2, 5, 5), Span::new(1, 8, 8)]);
}

#[test]
fn trace_includes_application_sites() {
    let e = run("f x = x + y\nroot = f 1").unwrap_err();
    assert_eq!(e.to_string(), "1(11-11): unbound var: y");
    assert_eq!(e.trace(), &[Span::new(1, 11, 11), Span::new(2, 8, 10)]);
}

#[test]
fn cannot_apply_numbers() {
    let e = run("root = 1 2").unwrap_err();
    assert_eq!(e.to_string(), "1(8-10): cannot apply: 1.0 2.0");
}

#[test]
fn operator_rejects_boolean() {
    let e = run("root = 1 = 1 + 2").unwrap_err();
    assert_eq!(e.kind(), &EvalError::WrongArgType("true".into(), "+".into()));
    assert_eq!(e.trace(), &[Span::new(1, 8, 14)]);
}

#[test]
fn condition_must_be_boolean() {
    let e = run("root = 1 if 5\n       2").unwrap_err();
    assert_eq!(e.to_string(), "1(8-13): condition not boolean: 5.0");
}

#[test]
fn self_dependent_value() {
    let e = run("root = a\na = a").unwrap_err();
    assert_eq!(e.to_string(), "2(5-5): recursive value: a");
    assert_eq!(e.trace(), &[Span::new(2, 5, 5), Span::new(1, 8, 8)]);
}

#[test]
fn missing_root_points_past_last_token() {
    let e = run("a = 1\nb = 22").unwrap_err();
    assert_eq!(e.to_string(), "2(7-7): unbound var: root");
    let e = run("a = 1\n\n").unwrap_err();
    assert_eq!(e.to_string(), "2(1-1): unbound var: root");
    let e = run("").unwrap_err();
    assert_eq!(e.span(), Some(Span::point(1, 1)));
}

#[test]
fn repeated_evaluation_is_stable() {
    let bindings = parse_program(&format!("{SUM}root = sum 3\nbad = nope\n")).unwrap();
    let heap = Heap::new();
    let interp = Interpreter::new(&heap, &bindings);
    let at = Span::point(1, 1);
    assert_eq!(interp.root(at).unwrap(), Value::Number(6.0));
    assert_eq!(interp.root(at).unwrap(), Value::Number(6.0));
    let first = interp.lookup("bad", at).unwrap_err();
    let second = interp.lookup("bad", at).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(eval_bindings(&bindings, at).unwrap(), eval_bindings(&bindings, at).unwrap());
}

#[test]
fn deep_recursion_does_not_overflow() {
    assert_eq!(run_ok(&format!("{SUM}root = sum 5000\n")), "1.25025E7");
}
