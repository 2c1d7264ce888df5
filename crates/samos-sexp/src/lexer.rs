//! Tokenizer for s-expression documents.
//!
//! The lexer never fails. Text that cannot form a token comes out as a
//! [`Token::Error`], which the reader reports with its span in document
//! order. Comments come out as [`Token::Comment`] and are dropped before
//! parsing. Datum comments (`#;`) are kept, because skipping them needs to
//! know where the next datum ends.

use chumsky::prelude::*;
use std::fmt;

pub(crate) type Span = SimpleSpan;
pub(crate) type ParseError<'src, T> = Rich<'src, T, Span>;

type LexExtra<'src> = extra::Err<ParseError<'src, char>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// `(` or `[`
    Open(char),
    /// `)` or `]`
    Close(char),
    /// `#(`
    VectorOpen,
    Quote,
    Dot,
    DatumComment,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Symbol(String),
    Comment,
    Error(LexError),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LexError {
    /// Input ended inside a string, `|symbol|`, block comment or `#\`.
    Unterminated(&'static str),
    Invalid(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open(c) | Token::Close(c) => write!(f, "{}", c),
            Token::VectorOpen => f.write_str("#("),
            Token::Quote => f.write_str("'"),
            Token::Dot => f.write_str("."),
            Token::DatumComment => f.write_str("#;"),
            Token::Bool(true) => f.write_str("#t"),
            Token::Bool(false) => f.write_str("#f"),
            Token::Int(i) => write!(f, "{}", i),
            Token::Float(x) => write!(f, "{}", x),
            Token::Str(s) => write!(f, "{:?}", s),
            Token::Char(c) => write!(f, "#\\{}", c),
            Token::Symbol(name) => f.write_str(name),
            Token::Comment => f.write_str("comment"),
            Token::Error(_) => f.write_str("invalid input"),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | ';' | '|' | '\'')
}

pub(crate) fn lexer<'src>() -> impl Parser<'src, &'src str, Vec<Spanned<Token>>, LexExtra<'src>> {
    let word_char = any().filter(|c: &char| !is_delimiter(*c));

    let word = any()
        .filter(|c: &char| *c != '#' && !is_delimiter(*c))
        .then(word_char.clone().repeated())
        .to_slice()
        .map(classify_word);

    let punctuation = choice((
        one_of("([").map(Token::Open),
        one_of(")]").map(Token::Close),
        just('\'').to(Token::Quote),
    ));

    let string = quoted('"').map(|body| match body {
        Some(Ok(text)) => Token::Str(text),
        Some(Err(message)) => Token::Error(LexError::Invalid(message)),
        None => Token::Error(LexError::Unterminated("string")),
    });

    let bar_symbol = quoted('|').map(|body| match body {
        Some(Ok(name)) => Token::Symbol(name),
        Some(Err(message)) => Token::Error(LexError::Invalid(message)),
        None => Token::Error(LexError::Unterminated("symbol")),
    });

    let line_comment = just(';')
        .then(any().and_is(just('\n').not()).repeated())
        .to(Token::Comment);

    // A nested comment left open runs to the end of input, so the outer
    // one is unterminated as well.
    let block_comment = recursive(|block_comment| {
        just("#|")
            .then(
                choice((
                    block_comment.ignored(),
                    any().and_is(just("|#").not()).ignored(),
                ))
                .repeated(),
            )
            .ignore_then(just("|#").or_not())
            .map(|close| match close {
                Some(_) => Token::Comment,
                None => Token::Error(LexError::Unterminated("block comment")),
            })
    });

    // The first character after `#\` is taken literally, so `#\(` and
    // `#\ ` work.
    let character = just("#\\")
        .ignore_then(any().then(word_char.clone().repeated()).to_slice().or_not())
        .map(|name: Option<&str>| match name {
            Some(name) => char_literal(name),
            None => Token::Error(LexError::Unterminated("character")),
        });

    let hash_word = just('#')
        .then(word_char.repeated())
        .to_slice()
        .map(|text: &str| match text {
            "#t" | "#true" => Token::Bool(true),
            "#f" | "#false" => Token::Bool(false),
            other => Token::Error(LexError::Invalid(format!("unknown syntax `{}`", other))),
        });

    let hash = choice((
        just("#(").to(Token::VectorOpen),
        just("#;").to(Token::DatumComment),
        block_comment,
        character,
        hash_word,
    ));

    let token = choice((word, punctuation, string, bar_symbol, line_comment, hash));

    text::whitespace()
        .ignore_then(
            token
                .map_with(|node, extra| Spanned {
                    node,
                    span: extra.span(),
                })
                .then_ignore(text::whitespace())
                .repeated()
                .collect(),
        )
        .then_ignore(end())
}

/// A `"string"` or `|symbol|` body. `None` when input ends before the
/// closing delimiter, `Some(Err(..))` for a bad escape.
fn quoted<'src>(
    quote: char,
) -> impl Parser<'src, &'src str, Option<Result<String, String>>, LexExtra<'src>> + Clone {
    just(quote)
        .ignore_then(
            choice((none_of([quote, '\\']).map(Ok), escape(quote)))
                .repeated()
                .collect::<Vec<Result<char, String>>>(),
        )
        .then(just(quote).or_not())
        .map(|(chars, close)| close.map(|_| chars.into_iter().collect()))
}

/// An escape after a backslash; `quote` is the closing delimiter, which may
/// itself be escaped.
fn escape<'src>(
    quote: char,
) -> impl Parser<'src, &'src str, Result<char, String>, LexExtra<'src>> + Clone {
    // `\xHH;` with any number of hex digits.
    let hex = just('x')
        .ignore_then(any().filter(char::is_ascii_hexdigit).repeated().to_slice())
        .then(just(';').or_not())
        .map(|(digits, semicolon): (&str, Option<char>)| match semicolon {
            Some(_) => u32::from_str_radix(digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| "invalid hex escape".to_string()),
            None => Err("hex escape must end with `;`".to_string()),
        });

    just('\\').ignore_then(choice((
        just('n').to(Ok('\n')),
        just('t').to(Ok('\t')),
        just('r').to(Ok('\r')),
        just('a').to(Ok('\u{7}')),
        just('0').to(Ok('\0')),
        just('\\').to(Ok('\\')),
        just(quote).to(Ok(quote)),
        hex,
        any().map(|c| Err(format!("unknown escape `\\{}`", c))),
    )))
}

fn char_literal(name: &str) -> Token {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Token::Char(c);
    }

    let named = match name {
        "space" => Some(' '),
        "newline" | "linefeed" => Some('\n'),
        "tab" => Some('\t'),
        "return" => Some('\r'),
        "null" | "nul" => Some('\0'),
        "alarm" => Some('\u{7}'),
        "backspace" => Some('\u{8}'),
        "delete" => Some('\u{7f}'),
        "escape" => Some('\u{1b}'),
        _ => name
            .strip_prefix('x')
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32),
    };
    match named {
        Some(c) => Token::Char(c),
        None => Token::Error(LexError::Invalid(format!(
            "unknown character name `{}`",
            name
        ))),
    }
}

fn classify_word(text: &str) -> Token {
    match text {
        "." => return Token::Dot,
        "+inf.0" => return Token::Float(f64::INFINITY),
        "-inf.0" => return Token::Float(f64::NEG_INFINITY),
        "+nan.0" | "-nan.0" => return Token::Float(f64::NAN),
        _ => {}
    }

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return match text.parse::<i64>() {
            Ok(i) => Token::Int(i),
            Err(_) => Token::Error(LexError::Invalid(format!(
                "integer `{}` does not fit in 64 bits",
                text
            ))),
        };
    }
    if looks_like_float(unsigned) {
        if let Ok(x) = text.parse::<f64>() {
            return Token::Float(x);
        }
    }
    Token::Symbol(text.to_string())
}

/// Whether a bare word would read as a number rather than a symbol.
pub(crate) fn reads_as_number(text: &str) -> bool {
    if matches!(text, "+inf.0" | "-inf.0" | "+nan.0" | "-nan.0") {
        return true;
    }
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    (!unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()))
        || looks_like_float(unsigned)
}

/// Decimal digits with a point and/or an exponent, no sign.
fn looks_like_float(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
        None => (text, None),
    };

    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = all_digits(whole)
        && fraction.is_none_or(all_digits)
        && (!whole.is_empty() || fraction.is_some_and(|f| !f.is_empty()));

    let exponent_ok = match exponent {
        None => fraction.is_some(),
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    };
    mantissa_ok && exponent_ok
}
