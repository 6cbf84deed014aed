//! Directive line parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::{DirectiveLine, Spanned, Term};
use super::lexer::Token;
use crate::error::DirectiveError;

/// Parse one non-blank directive line
///
/// `line` is the 1-based line number and `offset` the position of `text`
/// within the directive source; both only feed error reporting. Term spans
/// in the result are relative to the directive source as well.
pub fn parse_line(text: &str, line: usize, offset: usize) -> Result<DirectiveLine, DirectiveError> {
    let (incremental, body, body_offset) = match text.strip_prefix('+') {
        Some(rest) => (true, rest, offset + 1),
        None => (false, text, offset),
    };

    let len = body.len();
    let token_iter = super::lexer::lex(body).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    let terms = term_list_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => DirectiveError::from_rich(err, line, body_offset),
            None => DirectiveError::Syntax {
                line,
                span: body_offset..body_offset + len,
                message: "malformed directive".to_string(),
                expected: vec![],
            },
        })?;

    let terms = terms
        .into_iter()
        .map(|term| shift_term(term, body_offset))
        .collect();
    Ok(DirectiveLine { incremental, terms })
}

fn shift_term(term: Term, offset: usize) -> Term {
    let shift = |s: Spanned<String>| Spanned::new(s.node, s.span.start + offset..s.span.end + offset);
    Term {
        name: shift(term.name),
        opacity: term.opacity.map(shift),
    }
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn term_list_parser<'a, I>() -> impl Parser<'a, I, Vec<Term>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = select! {
        Token::Text(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
    .labelled("layer name");

    let opacity = select! {
        Token::Text(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
    .labelled("opacity");

    let term = name
        .then(just(Token::Star).ignore_then(opacity).or_not())
        .map(|(name, opacity)| Term { name, opacity });

    term.separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
}
