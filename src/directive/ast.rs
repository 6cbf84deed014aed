//! Syntax tree for a single directive line

/// Byte range in directive source text
pub type Span = std::ops::Range<usize>;

/// Syntax node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One `name [* opacity]` term, as written
///
/// Both parts are kept as raw text; trimming and number parsing happen when
/// the line is folded into a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub name: Spanned<String>,
    pub opacity: Option<Spanned<String>>,
}

/// A parsed directive line
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveLine {
    /// Line started with `+` and extends the previous slide
    pub incremental: bool,
    pub terms: Vec<Term>,
}
