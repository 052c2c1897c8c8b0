use logos::Logos;
use std::ops::Range;

// Only the space character separates tokens; tabs belong to words.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy)]
pub enum Tok {
    #[token(" ")]
    Space,
    #[regex(r"[^ ]+")]
    Word,
}

/// A lexeme of one line, with 0-based character columns (`end` exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed<'a> {
    pub tok: Tok,
    pub begin: usize,
    pub end: usize,
    pub text: &'a str,
}

pub fn lex_line(line: &str) -> Vec<Lexed<'_>> {
    let mut out = Vec::new();
    let mut lexer = Tok::lexer(line);
    // logos reports byte ranges; columns are counted in chars.
    let mut col = 0usize;
    while let Some(res) = lexer.next() {
        let range = lexer.span();
        let text = &line[range];
        let width = text.chars().count();
        if let Ok(tok) = res {
            out.push(Lexed { tok, begin: col, end: col + width, text });
        }
        col += width;
    }
    out
}

/// A token read by [`LineScanner::next_token`].
///
/// `text` is empty when the cursor sat on a space or at the end of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub begin: usize,
    pub end: usize,
    /// The token ran up to the end of the line.
    pub at_eol: bool,
}

impl Token {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Lexeme {
    tok: Tok,
    end: usize,
    bytes: Range<usize>,
}

/// Cursor over a single source line.
///
/// Tokens are maximal runs of non-space characters; exactly one space
/// separates consecutive tokens, so a second space yields an empty token.
#[derive(Debug, Clone)]
pub struct LineScanner {
    text: String,
    lexemes: Vec<Lexeme>,
    // index of the lexeme starting at `cursor`
    next: usize,
    cursor: usize,
    len: usize,
}

impl LineScanner {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut lexemes = Vec::new();
        let mut byte = 0usize;
        let mut len = 0usize;
        for lx in lex_line(&text) {
            let bytes = byte..byte + lx.text.len();
            byte = bytes.end;
            len = lx.end;
            lexemes.push(Lexeme { tok: lx.tok, end: lx.end, bytes });
        }
        Self { text, lexemes, next: 0, cursor: 0, len }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current 0-based column.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Line length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.len
    }

    /// Whether the line holds nothing but spaces.
    pub fn is_blank(&self) -> bool {
        self.lexemes.iter().all(|l| l.tok == Tok::Space)
    }

    /// Counts the leading spaces and moves the cursor past them.
    pub fn indent(&mut self) -> usize {
        while let Some(l) = self.lexemes.get(self.next) {
            if l.tok != Tok::Space {
                break;
            }
            self.cursor = l.end;
            self.next += 1;
        }
        self.cursor
    }

    pub fn next_token(&mut self) -> Token {
        let begin = self.cursor;
        let (text, end) = match self.lexemes.get(self.next) {
            Some(l) if l.tok == Tok::Word => {
                self.next += 1;
                (self.text[l.bytes.clone()].to_string(), l.end)
            }
            _ => (String::new(), begin),
        };
        let at_eol = end == self.len;
        if at_eol {
            self.cursor = end;
        } else {
            // step over the separating space
            self.cursor = end + 1;
            self.next += 1;
        }
        Token { text, begin, end, at_eol }
    }
}
