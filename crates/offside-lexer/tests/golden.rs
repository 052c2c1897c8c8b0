use offside_lexer::{lex_line, LineScanner, Tok};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn format_lexemes(src: &str) -> String {
    let mut out = String::new();
    for (n, line) in src.lines().enumerate() {
        for lx in lex_line(line) {
            let k = match lx.tok {
                Tok::Space => continue,
                Tok::Word => "Word",
            };
            out.push_str(&format!("{}:{}-{}:{}:{}\n", n + 1, lx.begin, lx.end, k, lx.text));
        }
    }
    out
}

// Mirrors how the parser walks a binding line: indent, then tokens to end of line.
fn format_scanned(src: &str) -> String {
    let mut out = String::new();
    for (n, line) in src.lines().enumerate() {
        let mut sc = LineScanner::new(line);
        if sc.is_blank() {
            continue;
        }
        out.push_str(&format!("{}: indent {}\n", n + 1, sc.indent()));
        loop {
            let t = sc.next_token();
            out.push_str(&format!("  [{}-{}] {:?}\n", t.begin, t.end, t.text));
            if t.at_eol {
                break;
            }
        }
    }
    out
}

fn read_golden(name: &str) -> String {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.pop(); // offside-lexer
    p.pop(); // crates
    p.push("goldens");
    p.push(format!("{}.golden", name));
    fs::read_to_string(p).expect("read golden")
}

const SUM: &str = "sum n = r\n    r = 0 if n = 0\n        n + m\n    m = sum k\n    k = n - 1\n\nroot = sum 5\n";

#[test]
fn golden_lexemes_sum() {
    let got = format_lexemes(SUM);
    let want = read_golden("lexemes_sum");
    assert_eq!(got.trim(), want.trim());
}

#[test]
fn golden_scanned_sum() {
    let got = format_scanned(SUM);
    let want = read_golden("scanned_sum");
    assert_eq!(got.trim(), want.trim());
}
