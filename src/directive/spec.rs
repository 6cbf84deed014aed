//! Slide specifications produced by the directive parser

use std::fmt;

/// The layers shown on one slide, each with an optional forced opacity
///
/// Labels are unique; inserting a label again replaces its opacity but keeps
/// its original position, so the display order stays the order of first
/// mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideSpec {
    entries: Vec<(String, Option<f64>)>,
}

impl SlideSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `label`, or replace its opacity if already present
    pub fn insert(&mut self, label: impl Into<String>, opacity: Option<f64>) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = opacity,
            None => self.entries.push((label, opacity)),
        }
    }

    /// Look up a label
    ///
    /// Returns `None` when the label is not part of this slide, and
    /// `Some(None)` when it is shown without a forced opacity.
    pub fn get(&self, label: &str) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, opacity)| *opacity)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Labels in order of first mention
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(l, o)| (l.as_str(), *o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Option<f64>)> for SlideSpec {
    fn from_iter<T: IntoIterator<Item = (S, Option<f64>)>>(iter: T) -> Self {
        let mut spec = SlideSpec::new();
        for (label, opacity) in iter {
            spec.insert(label, opacity);
        }
        spec
    }
}

/// Formats back into directive syntax, e.g. `background, layer2*0.5`
impl fmt::Display for SlideSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, opacity)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match opacity {
                Some(o) => write!(f, "{}*{}", label, o)?,
                None => write!(f, "{}", label)?,
            }
        }
        Ok(())
    }
}
