//! Lexer for directive lines using logos
//!
//! The leading `+` of an incremental line is stripped before lexing, so a
//! `+` anywhere else is ordinary layer-name text.

use logos::Logos;

use super::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token(",")]
    Comma,
    #[token("*")]
    Star,

    /// Anything between separators, whitespace included
    #[regex(r"[^,*]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex a directive line into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
