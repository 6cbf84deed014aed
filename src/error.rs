//! Error types for directive parsing

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::directive::lexer::Token;

/// Byte range in directive source text
pub type Span = std::ops::Range<usize>;

/// Errors raised while turning directive lines into slides
///
/// Spans index into the directive source: all input lines joined with `\n`
/// (see [`crate::directive::directive_source`]). Line numbers are 1-based
/// and count blank lines too.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    #[error(
        "no slide directives found: put a text box (with no flowRect) in the 'content' layer, \
         one line per slide"
    )]
    EmptyDirectives,

    #[error("line {line}: '+' on the first slide, there is no previous slide to extend")]
    IncrementalWithoutPriorSlide { line: usize, span: Span },

    #[error("line {line}: invalid opacity '{value}'")]
    InvalidOpacity {
        value: String,
        line: usize,
        span: Span,
    },

    #[error("line {line}: opacity {value} is outside [0, 1]")]
    OpacityOutOfRange { value: f64, line: usize, span: Span },

    #[error("line {line}: {message}")]
    Syntax {
        line: usize,
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl DirectiveError {
    /// Source span of the offending text, if any
    pub fn span(&self) -> Option<&Span> {
        match self {
            DirectiveError::EmptyDirectives => None,
            DirectiveError::IncrementalWithoutPriorSlide { span, .. }
            | DirectiveError::InvalidOpacity { span, .. }
            | DirectiveError::OpacityOutOfRange { span, .. }
            | DirectiveError::Syntax { span, .. } => Some(span),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };

        let label = match self {
            DirectiveError::Syntax { expected, .. } if !expected.is_empty() => {
                format!("expected {}", expected.join(", "))
            }
            DirectiveError::IncrementalWithoutPriorSlide { .. } => {
                "remove the '+' or add a slide above".to_string()
            }
            DirectiveError::InvalidOpacity { .. } => "not a number".to_string(),
            DirectiveError::OpacityOutOfRange { .. } => "must be between 0 and 1".to_string(),
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        // Spans are byte offsets into the directive source
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Convert a chumsky error for one line
    ///
    /// `offset` is the position of the lexed text within the directive
    /// source, used to shift the line-relative span.
    pub(crate) fn from_rich(err: Rich<'_, Token>, line: usize, offset: usize) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of line".to_string(),
                };
                format!("unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of line".to_string()),
                _ => None,
            })
            .collect();

        let span = err.span().into_range();
        DirectiveError::Syntax {
            line,
            span: span.start + offset..span.end + offset,
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Comma => "','".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Text(s) => format!("'{}'", s.trim()),
    }
}
