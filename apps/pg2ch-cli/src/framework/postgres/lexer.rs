//! # PostgreSQL DDL Tokenizer
//!
//! Splits DDL text into tokens with [`logos`]. Comments are recognised and
//! dropped, quoted literals are unescaped, and every token keeps its byte span
//! so the parser can slice clauses verbatim out of the original text.
//!
//! Keywords are not tokens of their own: they arrive as [`Token::Ident`] and
//! the parser compares them case-insensitively.

use logos::{Lexer, Logos};
use std::fmt;
use std::ops::Range;

use super::errors::{LexError, LexErrorKind, Position};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'s> {
    /// Unquoted identifier or keyword, original case preserved
    #[regex(r"[\p{L}_][\p{L}\p{N}_$]*", |lex| lex.slice())]
    Ident(&'s str),

    /// "Quoted identifier" with `""` unescaped
    #[token("\"", quoted_identifier)]
    QuotedIdent(String),

    /// 'string literal' with `''` unescaped
    #[token("'", string_literal)]
    String(String),

    /// E'escape string' with backslash escapes resolved
    #[token("E'", escape_string_literal)]
    #[token("e'", escape_string_literal)]
    EscapeString(String),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    #[regex(r"[0-9]*\.[0-9]+", |lex| lex.slice())]
    Number(&'s str),

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semicolon,

    /// Any other single punctuation character (`::` arrives as two of these)
    #[regex(r"[+\-*/<>=~!@#%^&|?:$]", |lex| lex.slice())]
    Operator(&'s str),

    /// `--` and `/* */` comments; filtered out by [`Tokenizer`]
    #[token("--", line_comment)]
    #[token("/*", block_comment)]
    Comment,
}

impl<'s> Token<'s> {
    /// True when the token is an unquoted identifier equal to `keyword`,
    /// ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Ident(word) if word.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier '{s}'"),
            Token::QuotedIdent(s) => write!(f, "identifier \"{s}\""),
            Token::String(s) => write!(f, "string '{s}'"),
            Token::EscapeString(s) => write!(f, "string E'{s}'"),
            Token::Number(n) => write!(f, "number {n}"),
            Token::LeftParen => write!(f, "'('"),
            Token::RightParen => write!(f, "')'"),
            Token::LeftBracket => write!(f, "'['"),
            Token::RightBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Operator(op) => write!(f, "'{op}'"),
            Token::Comment => write!(f, "comment"),
        }
    }
}

/// Scans a quoted run after the opening quote, treating a doubled quote as an
/// escaped one. Returns the unescaped content and the number of bytes consumed
/// including the closing quote.
fn scan_quoted(remainder: &str, quote: char) -> Option<(String, usize)> {
    let mut content = String::new();
    let mut chars = remainder.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            if matches!(chars.peek(), Some((_, next)) if *next == quote) {
                content.push(quote);
                chars.next();
                continue;
            }
            return Some((content, i + c.len_utf8()));
        }
        content.push(c);
    }
    None
}

fn string_literal<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Result<String, LexErrorKind> {
    let (content, consumed) =
        scan_quoted(lex.remainder(), '\'').ok_or(LexErrorKind::UnterminatedString)?;
    lex.bump(consumed);
    Ok(content)
}

/// Like [`scan_quoted`] for `'`, but a backslash also escapes the next
/// character. `\n`, `\t`, `\r`, `\b` and `\f` become control characters.
fn scan_escape_string(remainder: &str) -> Option<(String, usize)> {
    let mut content = String::new();
    let mut chars = remainder.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                content.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    other => other,
                });
            }
            '\'' if matches!(chars.peek(), Some((_, '\''))) => {
                content.push('\'');
                chars.next();
            }
            '\'' => return Some((content, i + 1)),
            other => content.push(other),
        }
    }
    None
}

fn escape_string_literal<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Result<String, LexErrorKind> {
    let (content, consumed) =
        scan_escape_string(lex.remainder()).ok_or(LexErrorKind::UnterminatedString)?;
    lex.bump(consumed);
    Ok(content)
}

fn quoted_identifier<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Result<String, LexErrorKind> {
    let (content, consumed) =
        scan_quoted(lex.remainder(), '"').ok_or(LexErrorKind::UnterminatedIdentifier)?;
    lex.bump(consumed);
    Ok(content)
}

fn line_comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Result<(), LexErrorKind> {
    let remainder = lex.remainder();
    let end = remainder.find('\n').unwrap_or(remainder.len());
    lex.bump(end);
    Ok(())
}

fn block_comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Result<(), LexErrorKind> {
    let end = lex
        .remainder()
        .find("*/")
        .ok_or(LexErrorKind::UnterminatedComment)?;
    lex.bump(end + 2);
    Ok(())
}

/// A token together with its byte range in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'s> {
    pub token: Token<'s>,
    pub span: Range<usize>,
}

/// Lazy token stream over DDL text.
///
/// Cloning a tokenizer forks the stream at its current position. The stream
/// ends at the end of input or right after the first [`LexError`].
#[derive(Clone)]
pub struct Tokenizer<'s> {
    lexer: Lexer<'s, Token<'s>>,
    failed: bool,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            lexer: Token::lexer(source),
            failed: false,
        }
    }
}

impl<'s> Iterator for Tokenizer<'s> {
    type Item = Result<SpannedToken<'s>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.lexer.next()? {
                Ok(Token::Comment) => continue,
                Ok(token) => {
                    return Some(Ok(SpannedToken {
                        token,
                        span: self.lexer.span(),
                    }))
                }
                Err(kind) => {
                    self.failed = true;
                    let position = Position::locate(self.lexer.source(), self.lexer.span().start);
                    return Some(Err(LexError { kind, position }));
                }
            }
        }
    }
}

/// Tokenizes the whole input, stopping at the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken<'_>>, LexError> {
    Tokenizer::new(source).collect()
}
