//! Numeric literals, in the grammar of `Double.valueOf`.
//!
//! Accepted: decimal and hexadecimal floats with an optional sign and an
//! optional `f`/`F`/`d`/`D` suffix, plus `NaN` and `Infinity`. Rust-only
//! spellings such as `inf` or `nan` are not numbers here.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    #[regex(r"[+-]?(NaN|Infinity)")]
    Special,
    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?[fFdD]?")]
    Decimal,
    #[regex(r"[+-]?0[xX]([0-9a-fA-F]+(\.[0-9a-fA-F]*)?|\.[0-9a-fA-F]+)[pP][+-]?[0-9]+[fFdD]?")]
    Hex,
}

const SUFFIXES: [char; 4] = ['f', 'F', 'd', 'D'];

/// Reads `word` as a number literal, or `None` if it is not one.
pub fn parse_number(word: &str) -> Option<f64> {
    // surrounding control characters and spaces are ignored, as in Java
    let word = word.trim_matches(|c: char| c <= ' ');
    let mut lexer = Literal::lexer(word);
    let kind = lexer.next()?.ok()?;
    if lexer.span() != (0..word.len()) {
        return None;
    }
    match kind {
        Literal::Special => {
            let (negative, rest) = split_sign(word);
            if rest == "NaN" {
                Some(f64::NAN)
            } else if negative {
                Some(f64::NEG_INFINITY)
            } else {
                Some(f64::INFINITY)
            }
        }
        Literal::Decimal => word.trim_end_matches(SUFFIXES).parse().ok(),
        Literal::Hex => parse_hex(word),
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    }
}

// `0x<hex digits>[.<hex digits>]p<binary exponent>`
fn parse_hex(word: &str) -> Option<f64> {
    let (negative, rest) = split_sign(word);
    let body = rest.get(2..)?.trim_end_matches(SUFFIXES);
    let (mantissa, exp) = body.split_once(['p', 'P'])?;
    let exp: i32 = exp.parse().ok()?;

    let mut bits: u64 = 0;
    let mut shift: i32 = 0;
    let mut fraction = false;
    for c in mantissa.chars() {
        if c == '.' {
            fraction = true;
            continue;
        }
        let digit = u64::from(c.to_digit(16)?);
        if bits >> 60 == 0 {
            bits = bits << 4 | digit;
            if fraction {
                shift -= 4;
            }
        } else if !fraction {
            // past 60 significant bits only the magnitude is kept
            shift += 4;
        }
    }
    let magnitude = bits as f64 * 2f64.powi(exp.checked_add(shift)?);
    Some(if negative { -magnitude } else { magnitude })
}
