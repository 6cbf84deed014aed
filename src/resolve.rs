//! Layer visibility resolution
//!
//! For every slide, each layer starts from the style it had when the
//! document was loaded, is hidden, and is shown again only if exactly one
//! label on its path to the root is named by the slide. Naming a group
//! therefore shows every layer below it.
//!
//! Resolution runs in two phases: [`LayerResolver::plan`] decides the state
//! of every layer and checks for ambiguous matches without touching the
//! document, then [`LayerResolver::apply`] writes the styles. A slide that
//! fails to plan leaves the document as it was.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::directive::SlideSpec;
use crate::document::{Document, NodeId};
use crate::style;

/// Errors that can occur while resolving a slide
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// A layer's label path names more than one label of the slide
    #[error("layer '{layer}' matches several labels of the slide: {}", labels.join(", "))]
    AmbiguousLayerMatch { layer: String, labels: Vec<String> },
}

/// Layer styles as they were before any slide was applied
#[derive(Debug, Clone)]
pub struct StyleSnapshot {
    styles: HashMap<NodeId, String>,
}

impl StyleSnapshot {
    pub fn capture(doc: &Document, layers: &[NodeId]) -> Self {
        Self {
            styles: layers
                .iter()
                .map(|id| (*id, doc.style(*id).to_string()))
                .collect(),
        }
    }

    pub fn original(&self, id: NodeId) -> &str {
        self.styles.get(&id).map(String::as_str).unwrap_or("")
    }
}

/// Decided state of one layer for one slide
#[derive(Debug, Clone, PartialEq)]
pub struct LayerState {
    /// The slide label that selected this layer, if any
    pub matched: Option<String>,
    /// Forced opacity; `None` keeps the original one
    pub opacity: Option<f64>,
}

impl LayerState {
    pub fn visible(&self) -> bool {
        self.matched.is_some()
    }
}

/// State of every layer for one slide, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct SlidePlan {
    states: Vec<(NodeId, LayerState)>,
}

impl SlidePlan {
    pub fn get(&self, id: NodeId) -> Option<&LayerState> {
        self.states.iter().find(|(n, _)| *n == id).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LayerState)> {
        self.states.iter().map(|(n, s)| (*n, s))
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|(_, s)| s.visible()).map(|(n, _)| n)
    }
}

/// Applies slide specifications to the layers of one document
#[derive(Debug, Clone)]
pub struct LayerResolver {
    layers: Vec<NodeId>,
    snapshot: StyleSnapshot,
}

impl LayerResolver {
    /// Collect the layers of `doc` and snapshot their current styles
    ///
    /// Must be called before the first slide is applied.
    pub fn new(doc: &Document) -> Self {
        let layers = doc.layers();
        let snapshot = StyleSnapshot::capture(doc, &layers);
        Self { layers, snapshot }
    }

    pub fn layers(&self) -> &[NodeId] {
        &self.layers
    }

    pub fn snapshot(&self) -> &StyleSnapshot {
        &self.snapshot
    }

    /// Decide the state of every layer for `spec`
    pub fn plan(&self, doc: &Document, spec: &SlideSpec) -> Result<SlidePlan, ResolveError> {
        let mut states = Vec::with_capacity(self.layers.len());

        for &layer in &self.layers {
            let path = label_path(doc, layer);
            let matches: Vec<&str> = spec.labels().filter(|l| path.contains(l)).collect();

            let state = match matches.as_slice() {
                [] => LayerState {
                    matched: None,
                    opacity: None,
                },
                [label] => LayerState {
                    matched: Some(label.to_string()),
                    opacity: spec.get(label).flatten(),
                },
                _ => {
                    return Err(ResolveError::AmbiguousLayerMatch {
                        layer: display_name(doc, layer),
                        labels: matches.iter().map(|l| l.to_string()).collect(),
                    })
                }
            };
            log::trace!(
                "{}: {}",
                display_name(doc, layer),
                match &state.matched {
                    Some(label) => format!("shown via '{}'", label),
                    None => "hidden".to_string(),
                }
            );
            states.push((layer, state));
        }

        Ok(SlidePlan { states })
    }

    /// Write the styles of a plan, each starting from the original style
    pub fn apply(&self, doc: &mut Document, plan: &SlidePlan) {
        for (layer, state) in plan.iter() {
            doc.set_style(layer, layer_style(self.snapshot.original(layer), state));
        }
    }

    /// Plan and apply `spec`
    pub fn resolve(&self, doc: &mut Document, spec: &SlideSpec) -> Result<SlidePlan, ResolveError> {
        let plan = self.plan(doc, spec)?;
        self.apply(doc, &plan);
        Ok(plan)
    }
}

/// Style for a layer in the given state
pub fn layer_style(original: &str, state: &LayerState) -> String {
    let mut style = style::set_property(original, "display", "none");
    if state.visible() {
        style = style::set_property(&style, "display", "inline");
        if let Some(opacity) = state.opacity {
            style = style::set_property(&style, "opacity", &opacity.to_string());
        }
    }
    style
}

/// Labels of `id` and of all its labelled ancestors
pub fn label_path(doc: &Document, id: NodeId) -> HashSet<&str> {
    std::iter::once(id)
        .chain(doc.ancestors(id))
        .filter_map(|n| doc.label(n))
        .collect()
}

fn display_name(doc: &Document, id: NodeId) -> String {
    doc.label(id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("<unlabelled layer #{}>", id.0))
}
