//! Reader that builds [`Sexp`] trees with source locations.
//!
//! Reading runs in three steps: the lexer in [`crate::lexer`], a structure
//! pass that checks brackets and nesting depth in one loop over the tokens,
//! and a `chumsky` parser that assembles the tree.
//!
//! # Depth Limiting
//!
//! List nesting is capped by [`ReaderOptions::max_depth`] before the
//! recursive parser runs. The default limit is 256 levels. List length is
//! not limited.

use crate::error::{EvaluatorError, EvaluatorResult};
use crate::lexer::{LexError, ParseError, Span, Spanned, Token, lexer};
use crate::node::{Sexp, SexpValue};
use crate::types::Symbol;
use chumsky::{input::ValueInput, prelude::*};
use samos_source_map::{LineIndex, SourceInfo};
use std::fmt;
use std::rc::Rc;

/// Options for reading documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Maximum list nesting depth (default: 256).
    ///
    /// Reading fails with `EvaluatorError::NestingTooDeep` past this depth.
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Parse a document from a string.
///
/// The document must hold exactly one datum.
///
/// # Example
///
/// ```rust
/// use samos_sexp::parse;
///
/// let doc = parse("((test-cfg . ((int-prop . 42))))").unwrap();
/// assert!(doc.is_pair());
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a single well-formed datum.
pub fn parse(content: &str) -> EvaluatorResult<Sexp> {
    parse_impl(content, None, &ReaderOptions::default())
}

/// Parse a document from a string with an associated filename.
///
/// The filename is included in source locations for error reporting.
///
/// ```rust
/// use samos_sexp::parse_file;
///
/// let doc = parse_file("(a . 1)", "cfg.scm").unwrap();
/// assert_eq!(doc.source_info.file.as_deref(), Some("cfg.scm"));
/// ```
pub fn parse_file(content: &str, filename: &str) -> EvaluatorResult<Sexp> {
    parse_impl(content, Some(filename), &ReaderOptions::default())
}

/// Parse with explicit options and an optional filename.
pub fn parse_with_options(
    content: &str,
    filename: Option<&str>,
    options: &ReaderOptions,
) -> EvaluatorResult<Sexp> {
    parse_impl(content, filename, options)
}

fn parse_impl(
    content: &str,
    filename: Option<&str>,
    options: &ReaderOptions,
) -> EvaluatorResult<Sexp> {
    let spans = Rc::new(Spans::new(content, filename));

    let mut tokens = lexer()
        .parse(content)
        .into_result()
        .map_err(|errors| spans.first_error(errors))?;
    tokens.retain(|token| token.node != Token::Comment);
    check_structure(&tokens, &spans, options)?;

    let eoi = Span::from(content.len()..content.len());
    let input = tokens
        .as_slice()
        .map(eoi, |Spanned { node, span }| (node, span));
    let (root, extra) = document(Rc::clone(&spans))
        .parse(input)
        .into_result()
        .map_err(|errors| spans.first_error(errors))?;

    if let Some(extra) = extra {
        return Err(spans.parse_error(
            "a document holds exactly one datum",
            extra.start,
            extra.end,
        ));
    }
    Ok(root)
}

/// Turns byte spans into [`SourceInfo`] for one document.
struct Spans<'a> {
    index: LineIndex<'a>,
    file: Option<String>,
}

impl<'a> Spans<'a> {
    fn new(source: &'a str, file: Option<&str>) -> Self {
        Spans {
            index: LineIndex::new(source),
            file: file.map(str::to_string),
        }
    }

    fn info(&self, start: usize, end: usize) -> SourceInfo {
        let info = SourceInfo::new(self.index.range(start, end).unwrap_or_default());
        match &self.file {
            Some(file) => info.with_file(file.clone()),
            None => info,
        }
    }

    fn span_info(&self, span: Span) -> SourceInfo {
        self.info(span.start, span.end)
    }

    fn parse_error(&self, message: impl Into<String>, start: usize, end: usize) -> EvaluatorError {
        EvaluatorError::Parse {
            message: message.into(),
            location: self.info(start, end),
        }
    }

    fn eof_error(&self, message: impl Into<String>, start: usize, end: usize) -> EvaluatorError {
        EvaluatorError::UnexpectedEof {
            message: message.into(),
            location: self.info(start, end),
        }
    }

    /// The first error `chumsky` reported. Running out of tokens is an
    /// unexpected end of input; anything else is a parse error at the
    /// offending token.
    fn first_error<T: fmt::Display>(&self, errors: Vec<ParseError<'_, T>>) -> EvaluatorError {
        let Some(error) = errors.into_iter().next() else {
            return self.parse_error("unreadable document", 0, 0);
        };
        let span = *error.span();
        match error.found() {
            Some(found) => self.parse_error(format!("unexpected `{}`", found), span.start, span.end),
            None => self.eof_error("expected a datum", span.start, span.end),
        }
    }
}

fn closer_for(opener: &Token) -> char {
    if *opener == Token::Open('[') { ']' } else { ')' }
}

/// Report lexical errors, unbalanced brackets and excess nesting in
/// document order. Afterwards every opener has its closer and no token is
/// an error.
fn check_structure(
    tokens: &[Spanned<Token>],
    spans: &Spans<'_>,
    options: &ReaderOptions,
) -> EvaluatorResult<()> {
    let mut open: Vec<&Spanned<Token>> = Vec::new();

    for token in tokens {
        let span = token.span;
        match &token.node {
            Token::Error(LexError::Unterminated(what)) => {
                return Err(spans.eof_error(
                    format!("unterminated {}", what),
                    span.start,
                    span.start + 1,
                ));
            }
            Token::Error(LexError::Invalid(message)) => {
                return Err(spans.parse_error(message.clone(), span.start, span.end));
            }
            Token::Open(_) | Token::VectorOpen => {
                if open.len() >= options.max_depth {
                    return Err(EvaluatorError::NestingTooDeep {
                        max_depth: options.max_depth,
                        location: spans.span_info(span),
                    });
                }
                open.push(token);
            }
            Token::Close(c) => {
                let Some(opener) = open.pop() else {
                    return Err(spans.parse_error(
                        format!("unexpected `{}`", c),
                        span.start,
                        span.end,
                    ));
                };
                let expected = closer_for(&opener.node);
                if *c != expected {
                    return Err(spans.parse_error(
                        format!("mismatched `{}`, expected `{}`", c, expected),
                        span.start,
                        span.end,
                    ));
                }
            }
            _ => {}
        }
    }

    match open.last() {
        None => Ok(()),
        Some(Spanned {
            node: Token::VectorOpen,
            span,
        }) => Err(spans.eof_error("unterminated vector, expected `)`", span.start, span.end)),
        Some(Spanned { node, span }) => Err(spans.eof_error(
            format!("unterminated list, expected `{}`", closer_for(node)),
            span.start,
            span.end,
        )),
    }
}

/// One datum, then datum comments, then whatever tokens are left over.
fn document<'tokens, 'src: 'tokens, I>(
    spans: Rc<Spans<'src>>,
) -> impl Parser<'tokens, I, (Sexp, Option<Span>), extra::Err<ParseError<'tokens, Token>>>
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    let datum = datum(spans);
    let skipped = just(Token::DatumComment)
        .ignore_then(datum.clone())
        .repeated();

    datum.then_ignore(skipped).then(
        any()
            .map_with(|_, extra| extra.span())
            .then_ignore(any().repeated())
            .or_not(),
    )
}

fn datum<'tokens, 'src: 'tokens, I>(
    spans: Rc<Spans<'src>>,
) -> impl Parser<'tokens, I, Sexp, extra::Err<ParseError<'tokens, Token>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(move |datum| {
        let skipped = just(Token::DatumComment)
            .ignore_then(datum.clone())
            .repeated();
        let close = select! { Token::Close(_) => () };

        let atom = {
            let spans = Rc::clone(&spans);
            select! {
                Token::Bool(b) => SexpValue::Bool(b),
                Token::Int(i) => SexpValue::Int(i),
                Token::Float(x) => SexpValue::Float(x),
                Token::Str(s) => SexpValue::Str(s),
                Token::Char(c) => SexpValue::Char(c),
                Token::Symbol(name) => SexpValue::Symbol(Symbol::new(name)),
            }
            .map_with(move |value, extra| Sexp::new(value, spans.span_info(extra.span())))
        };

        // A dotted tail needs at least one item before the dot.
        let list = {
            let spans = Rc::clone(&spans);
            let items = datum
                .clone()
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>()
                .then(just(Token::Dot).ignore_then(datum.clone()).or_not())
                .or_not()
                .map(Option::unwrap_or_default);
            select! { Token::Open(_) => () }
                .ignore_then(items)
                .then_ignore(skipped.clone())
                .then_ignore(close.clone())
                .map_with(move |(items, tail), extra| {
                    build_list(&spans, items, tail, extra.span())
                })
        };

        let vector = {
            let spans = Rc::clone(&spans);
            just(Token::VectorOpen)
                .ignore_then(datum.clone().repeated().collect::<Vec<_>>())
                .then_ignore(skipped.clone())
                .then_ignore(close)
                .map_with(move |items, extra| {
                    Sexp::new(SexpValue::Vector(items), spans.span_info(extra.span()))
                })
        };

        let quote = {
            let spans = Rc::clone(&spans);
            just(Token::Quote)
                .map_with(|_, extra| extra.span())
                .then(datum)
                .map(move |(quote, quoted)| build_quote(&spans, quote, quoted))
        };

        skipped.ignore_then(choice((atom, list, vector, quote)))
    })
}

/// Chain items into pairs back to front. Each pair spans from its item to
/// the closing bracket; the first one starts at the opening bracket.
fn build_list(spans: &Spans<'_>, items: Vec<Sexp>, tail: Option<Sexp>, span: Span) -> Sexp {
    let (start, end) = (span.start, span.end);
    if items.is_empty() {
        // `()` is the empty list itself, spanning both brackets.
        return Sexp::new(SexpValue::Nil, spans.info(start, end));
    }

    let close_start = end.saturating_sub(1);
    let mut rest = tail.unwrap_or_else(|| Sexp::new(SexpValue::Nil, spans.info(close_start, end)));
    for (idx, item) in items.into_iter().enumerate().rev() {
        let pair_start = if idx == 0 { start } else { item.source_info.start_offset() };
        rest = Sexp::new(
            SexpValue::Pair(Box::new(item), Box::new(rest)),
            spans.info(pair_start, end),
        );
    }
    rest
}

/// `'x` reads as `(quote x)`.
fn build_quote(spans: &Spans<'_>, quote: Span, quoted: Sexp) -> Sexp {
    let end = quoted.source_info.end_offset();
    let symbol = Sexp::new(
        SexpValue::Symbol(Symbol::new("quote")),
        spans.info(quote.start, quote.end),
    );
    let nil = Sexp::new(SexpValue::Nil, spans.info(end, end));
    let inner = Sexp::new(
        SexpValue::Pair(Box::new(quoted), Box::new(nil)),
        spans.info(quote.end, end),
    );
    Sexp::new(
        SexpValue::Pair(Box::new(symbol), Box::new(inner)),
        spans.info(quote.start, end),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SexpType;

    #[test]
    fn test_alist_document() {
        let doc = parse("((test-cfg . ((int-prop . 42) (name . \"x\"))))").unwrap();
        assert_eq!(doc.to_string(), "((test-cfg (int-prop . 42) (name . \"x\")))");
    }

    #[test]
    fn test_dotted_pair() {
        let doc = parse("(a . 1)").unwrap();
        assert_eq!(doc.car().unwrap().to_string(), "a");
        assert_eq!(doc.cdr().unwrap(), &Sexp::int(1));
    }

    #[test]
    fn test_square_brackets() {
        let doc = parse("[a [b . 2]]").unwrap();
        assert_eq!(doc.to_string(), "(a (b . 2))");
    }

    #[test]
    fn test_quote_sugar() {
        let doc = parse("'sym").unwrap();
        assert_eq!(doc.to_string(), "(quote sym)");
    }

    #[test]
    fn test_empty_list() {
        let doc = parse("( )").unwrap();
        assert!(doc.is_nil());
        assert_eq!(doc.sexp_type(), SexpType::Unknown);
        assert_eq!(doc.source_info.end_offset(), 3);
    }

    #[test]
    fn test_vector() {
        let doc = parse("#(1 #\\a \"s\")").unwrap();
        assert_eq!(doc.to_string(), "#(1 #\\a \"s\")");
        assert_eq!(doc.sexp_type(), SexpType::Unknown);
    }

    #[test]
    fn test_datum_comments() {
        let doc = parse("#;(ignored) (a #;b c #;d)").unwrap();
        assert_eq!(doc.to_string(), "(a c)");
    }

    #[test]
    fn test_trailing_datum_rejected() {
        let err = parse("(a) (b)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error at 1:5: a document holds exactly one datum"
        );
    }

    #[test]
    fn test_empty_document() {
        let err = parse("  ; nothing here\n").unwrap_err();
        assert!(matches!(err, EvaluatorError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_unterminated_list() {
        let err = parse_file("((a . 1)", "cfg.scm").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected end of input at cfg.scm:1:1: unterminated list, expected `)`"
        );
    }

    #[test]
    fn test_mismatched_close() {
        let err = parse("(a]").unwrap_err();
        assert!(matches!(err, EvaluatorError::Parse { .. }));
    }

    #[test]
    fn test_bad_dots() {
        assert!(parse("(. a)").is_err());
        assert!(parse("(a . b c)").is_err());
        assert!(parse("(a . )").is_err());
        assert!(parse(".").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let options = ReaderOptions { max_depth: 2 };
        assert!(parse_with_options("((1))", None, &options).is_ok());

        let err = parse_with_options("(((1)))", None, &options).unwrap_err();
        match err {
            EvaluatorError::NestingTooDeep { max_depth, location } => {
                assert_eq!(max_depth, 2);
                assert_eq!(location.start_offset(), 2);
            }
            other => panic!("expected NestingTooDeep, got {:?}", other),
        }
    }

    #[test]
    fn test_vectors_count_toward_depth() {
        let options = ReaderOptions { max_depth: 1 };
        let err = parse_with_options("#(#(1))", None, &options).unwrap_err();
        assert!(matches!(err, EvaluatorError::NestingTooDeep { max_depth: 1, .. }));
    }

    #[test]
    fn test_lexical_errors_carry_locations() {
        assert_eq!(
            parse("#nope").unwrap_err().to_string(),
            "parse error at 1:1: unknown syntax `#nope`"
        );
        assert_eq!(
            parse("(a \"open)").unwrap_err().to_string(),
            "unexpected end of input at 1:4: unterminated string"
        );
        assert_eq!(
            parse("(n . 99999999999999999999)").unwrap_err().to_string(),
            "parse error at 1:6: integer `99999999999999999999` does not fit in 64 bits"
        );
    }

    #[test]
    fn test_stray_closer() {
        assert_eq!(
            parse("(a))").unwrap_err().to_string(),
            "parse error at 1:4: unexpected `)`"
        );
    }

    #[test]
    fn test_innermost_unterminated_vector() {
        let err = parse("(a #(1 2)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected end of input at 1:1: unterminated list, expected `)`"
        );
        let err = parse("(a #(1 2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected end of input at 1:4: unterminated vector, expected `)`"
        );
    }

    #[test]
    fn test_dotted_tail_must_close_the_list() {
        let err = parse("(a . b c)").unwrap_err();
        assert_eq!(err.to_string(), "parse error at 1:8: unexpected `c`");
    }

    #[test]
    fn test_default_depth_allows_deep_documents() {
        let depth = 200;
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_source_info_on_entries() {
        let source = "((test-cfg . ((int-prop . 42))))";
        let doc = parse_file(source, "cfg.scm").unwrap();

        let scope = doc.car().unwrap();
        let entries = scope.cdr().unwrap();
        let entry = entries.car().unwrap();
        let value = entry.cdr().unwrap();

        assert_eq!(&source[value.source_info.start_offset()..value.source_info.end_offset()], "42");
        assert_eq!(value.source_info.to_string(), "cfg.scm:1:27");
        assert_eq!(
            &source[entry.source_info.start_offset()..entry.source_info.end_offset()],
            "(int-prop . 42)"
        );
    }

    #[test]
    fn test_million_element_list() {
        let count = 1_000_000;
        let mut source = String::with_capacity(count * 2 + 2);
        source.push('(');
        for _ in 0..count {
            source.push_str(" 1");
        }
        source.push(')');

        let doc = parse(&source).unwrap();
        assert_eq!(doc.iter_list().count(), count);

        let copy = doc.clone();
        assert_eq!(copy, doc);

        let written = doc.to_string();
        assert_eq!(written.len(), count * 2 + 1);
        assert!(written.starts_with("(1 1 1"));

        drop(copy);
        drop(doc);
    }
}
