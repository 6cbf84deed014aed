//! Slide directive language
//!
//! Each line of the content layer describes one slide:
//!
//! ```text
//! background, layer1
//! background, layer2 * 0.5
//! +layer3
//! ```
//!
//! A line is a comma-separated list of layer labels, each optionally
//! followed by `* opacity`. A line starting with `+` (no leading whitespace)
//! extends the previous slide instead of starting a fresh one.

pub mod ast;
pub mod config;
mod grammar;
pub mod lexer;
pub mod spec;

pub use config::{DirectiveConfig, OpacityRange};
pub use spec::SlideSpec;

use crate::error::DirectiveError;

use ast::Spanned;

/// Join directive lines into the text that error spans refer to
pub fn directive_source<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse ordered directive lines into ordered slide specifications
///
/// Blank lines are skipped. Fails if no slide remains.
///
/// # Example
///
/// ```rust
/// use inkslide::directive::{parse_directives, DirectiveConfig};
///
/// let slides = parse_directives(&["background, layer1", "+layer2 * 0.5"], &DirectiveConfig::default()).unwrap();
/// assert_eq!(slides.len(), 2);
/// assert_eq!(slides[1].get("layer2"), Some(Some(0.5)));
/// assert!(slides[1].contains("layer1"));
/// ```
pub fn parse_directives<S: AsRef<str>>(
    lines: &[S],
    config: &DirectiveConfig,
) -> Result<Vec<SlideSpec>, DirectiveError> {
    let mut slides: Vec<SlideSpec> = Vec::new();
    let mut offset = 0;

    for (index, raw) in lines.iter().enumerate() {
        let text = raw.as_ref();
        let line = index + 1;
        let line_offset = offset;
        offset += text.len() + 1;

        if text.trim().is_empty() {
            continue;
        }

        let parsed = grammar::parse_line(text, line, line_offset)?;

        let mut spec = if parsed.incremental {
            match slides.last() {
                Some(previous) => previous.clone(),
                None => {
                    return Err(DirectiveError::IncrementalWithoutPriorSlide {
                        line,
                        span: line_offset..line_offset + 1,
                    })
                }
            }
        } else {
            SlideSpec::new()
        };

        for term in parsed.terms {
            let name = term.name.node.trim();
            if name.is_empty() {
                return Err(DirectiveError::Syntax {
                    line,
                    span: term.name.span,
                    message: "empty layer name".to_string(),
                    expected: vec!["layer name".to_string()],
                });
            }
            let opacity = match term.opacity {
                Some(raw) => Some(parse_opacity(&raw, line, config.opacity_range)?),
                None => None,
            };
            spec.insert(name, opacity);
        }

        log::debug!("slide {}: {}", slides.len() + 1, spec);
        slides.push(spec);
    }

    if slides.is_empty() {
        return Err(DirectiveError::EmptyDirectives);
    }
    Ok(slides)
}

fn parse_opacity(
    raw: &Spanned<String>,
    line: usize,
    range: OpacityRange,
) -> Result<f64, DirectiveError> {
    let text = raw.node.trim();
    let value = match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            return Err(DirectiveError::InvalidOpacity {
                value: text.to_string(),
                line,
                span: raw.span.clone(),
            })
        }
    };

    if (0.0..=1.0).contains(&value) {
        return Ok(value);
    }
    match range {
        OpacityRange::Reject => Err(DirectiveError::OpacityOutOfRange {
            value,
            line,
            span: raw.span.clone(),
        }),
        OpacityRange::Clamp => {
            log::warn!("line {}: opacity {} clamped into [0, 1]", line, value);
            Ok(value.clamp(0.0, 1.0))
        }
        OpacityRange::Pass => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(lines: &[&str]) -> Result<Vec<SlideSpec>, DirectiveError> {
        parse_directives(lines, &DirectiveConfig::default())
    }

    fn labels(spec: &SlideSpec) -> Vec<&str> {
        let mut labels: Vec<_> = spec.labels().collect();
        labels.sort();
        labels
    }

    #[test]
    fn test_fresh_and_incremental_slides() {
        let slides = parse(&["background, layer1", "+layer2"]).expect("Should parse");
        assert_eq!(slides.len(), 2);
        assert_eq!(labels(&slides[0]), vec!["background", "layer1"]);
        assert_eq!(labels(&slides[1]), vec!["background", "layer1", "layer2"]);
    }

    #[test]
    fn test_incremental_inherits_opacity() {
        let slides = parse(&["A, B*0.5", "+X"]).expect("Should parse");
        let expected: SlideSpec = [("A", None), ("B", Some(0.5)), ("X", None)]
            .into_iter()
            .collect();
        assert_eq!(slides[1], expected);
    }

    #[test]
    fn test_incremental_replaces_opacity() {
        let slides = parse(&["A, B*0.5, X", "+X*0.3"]).expect("Should parse");
        let expected: SlideSpec = [("A", None), ("B", Some(0.5)), ("X", Some(0.3))]
            .into_iter()
            .collect();
        assert_eq!(slides[1], expected);
        // Base slide is untouched
        assert_eq!(slides[0].get("X"), Some(None));
    }

    #[test]
    fn test_fresh_line_discards_previous() {
        let slides = parse(&["a, b", "c"]).expect("Should parse");
        assert_eq!(labels(&slides[1]), vec!["c"]);
    }

    #[test]
    fn test_names_and_opacities_are_trimmed() {
        let slides = parse(&["  my layer  *  0.25 , other"]).expect("Should parse");
        assert_eq!(slides[0].get("my layer"), Some(Some(0.25)));
        assert_eq!(slides[0].get("other"), Some(None));
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let slides = parse(&["a*0.2, a*0.7"]).expect("Should parse");
        assert_eq!(slides[0].len(), 1);
        assert_eq!(slides[0].get("a"), Some(Some(0.7)));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let slides = parse(&["a", "", "   ", "+b"]).expect("Should parse");
        assert_eq!(slides.len(), 2);
        assert_eq!(labels(&slides[1]), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(parse(&empty), Err(DirectiveError::EmptyDirectives));
        assert_eq!(parse(&["", "  "]), Err(DirectiveError::EmptyDirectives));
    }

    #[test]
    fn test_incremental_first_line() {
        let err = parse(&["", "+a"]).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::IncrementalWithoutPriorSlide { line: 2, span: 1..2 }
        );
    }

    #[test]
    fn test_invalid_opacity() {
        let err = parse(&["a", "b * half"]).unwrap_err();
        assert_eq!(
            err,
            DirectiveError::InvalidOpacity {
                value: "half".to_string(),
                line: 2,
                span: 5..10,
            }
        );
    }

    #[test]
    fn test_non_finite_opacity_is_invalid() {
        let err = parse(&["a*NaN"]).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidOpacity { .. }));
    }

    #[test]
    fn test_opacity_range_policies() {
        let err = parse(&["a*1.5"]).unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::OpacityOutOfRange { value, line: 1, .. } if value == 1.5
        ));

        let clamp = DirectiveConfig::new().with_opacity_range(OpacityRange::Clamp);
        let slides = parse_directives(&["a*1.5, b*-0.5"], &clamp).expect("Should parse");
        assert_eq!(slides[0].get("a"), Some(Some(1.0)));
        assert_eq!(slides[0].get("b"), Some(Some(0.0)));

        let pass = DirectiveConfig::new().with_opacity_range(OpacityRange::Pass);
        let slides = parse_directives(&["a*1.5"], &pass).expect("Should parse");
        assert_eq!(slides[0].get("a"), Some(Some(1.5)));
    }

    #[test]
    fn test_zero_opacity_is_kept() {
        let slides = parse(&["a*0"]).expect("Should parse");
        assert_eq!(slides[0].get("a"), Some(Some(0.0)));
    }

    #[test]
    fn test_whitespace_only_name_is_error() {
        let err = parse(&["a,   ,b"]).unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::Syntax { ref message, .. } if message == "empty layer name"
        ));
    }

    #[test]
    fn test_directive_source_offsets() {
        let lines = ["a", "b * half"];
        let source = directive_source(&lines);
        let err = parse(&lines).unwrap_err();
        let span = err.span().unwrap().clone();
        assert_eq!(&source[span], " half");
    }
}
