//! Inline `style` attribute editing
//!
//! Layer visibility is expressed through the `display` and `opacity`
//! properties of a layer's inline style. The functions here treat the style
//! as an ordered list of `name:value` declarations separated by `;` and only
//! ever rewrite the value of the named property. Every other byte of the
//! string (unknown properties, ordering, whitespace, trailing separators) is
//! kept as-is.

/// A single `name:value` declaration inside a style string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Iterate over the well-formed declarations of a style string
///
/// Empty segments and segments without a `:` are skipped.
pub fn declarations(style: &str) -> impl Iterator<Item = Declaration<'_>> {
    style.split(';').filter_map(|segment| {
        let (name, value) = segment.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Declaration {
            name,
            value: value.trim(),
        })
    })
}

/// Read the value of `property`, if declared
///
/// When a property is declared more than once the last declaration wins,
/// as it does in CSS.
pub fn get_property<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    declarations(style)
        .filter(|decl| decl.name == property)
        .last()
        .map(|decl| decl.value)
}

/// Set `property` to `value`, returning the new style string
///
/// If the property is already declared, its value is replaced in place and
/// the whitespace around it is kept. Otherwise `property:value;` is
/// prepended to the existing style.
///
/// ```rust
/// use inkslide::style::set_property;
///
/// assert_eq!(set_property("fill:red;", "opacity", "0.5"), "opacity:0.5;fill:red;");
/// assert_eq!(set_property("opacity:1;fill:red;", "opacity", "0.5"), "opacity:0.5;fill:red;");
/// ```
pub fn set_property(style: &str, property: &str, value: &str) -> String {
    let mut replaced = false;
    let segments: Vec<String> = style
        .split(';')
        .map(|segment| match replace_value(segment, property, value) {
            Some(updated) => {
                replaced = true;
                updated
            }
            None => segment.to_string(),
        })
        .collect();

    if replaced {
        segments.join(";")
    } else {
        format!("{}:{};{}", property, value, style)
    }
}

/// Rewrite one `name:value` segment if its name is `property`
fn replace_value(segment: &str, property: &str, value: &str) -> Option<String> {
    let (name, raw_value) = segment.split_once(':')?;
    if name.trim() != property {
        return None;
    }

    let leading = raw_value.len() - raw_value.trim_start().len();
    let trailing = raw_value.len() - raw_value.trim_end().len();
    // An all-whitespace value is counted as leading only
    let trailing = if leading == raw_value.len() { 0 } else { trailing };

    Some(format!(
        "{}:{}{}{}",
        name,
        &raw_value[..leading],
        value,
        &raw_value[raw_value.len() - trailing..]
    ))
}
