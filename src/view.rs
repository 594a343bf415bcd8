//! Per-frame visual attributes derived from the store and the highlight.
//!
//! `recompute_derived` is pure: the same inputs give the same `DerivedView`,
//! which is what lets the render layer redraw from scratch on every event.

use crate::camera::CameraView;
use crate::graph::model::{EdgeKind, Point};
use crate::graph::store::EntityStore;
use crate::highlight::{Highlight, OPACITY_DIM_EDGE, OPACITY_DIM_NODE, OPACITY_FULL};
use crate::search::SearchResults;

pub const STROKE_WIDTH: f64 = 1.5;
pub const FOCUSED_STROKE_WIDTH: f64 = 8.0;
/// Enzyme labels sit this far above the reaction midpoint.
pub const ENZYME_LABEL_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeColor {
    Synthesis,
    Decomposition,
    Neutral,
    Highlight,
}

impl StrokeColor {
    pub fn for_kind(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Synthesis => Self::Synthesis,
            EdgeKind::Decomposition => Self::Decomposition,
            _ => Self::Neutral,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Self::Synthesis => "#3498db",
            Self::Decomposition => "#e74c3c",
            Self::Neutral => "#000000",
            Self::Highlight => "#ff0000",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: String,
    pub position: Option<Point>,
    pub opacity: f64,
    pub emphasized: bool,
    pub search_match: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub stable_index: usize,
    /// Endpoint positions, when both nodes are placed.
    pub endpoints: Option<(Point, Point)>,
    pub opacity: f64,
    pub emphasized: bool,
    pub stroke: StrokeColor,
    pub stroke_width: f64,
    pub dashed: bool,
    pub search_match: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnzymeLabelView {
    pub stable_index: usize,
    pub text: String,
    pub anchor: Option<Point>,
    pub opacity: f64,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub enzyme_labels: Vec<EnzymeLabelView>,
    pub camera: CameraView,
}

impl DerivedView {
    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, stable_index: usize) -> Option<&EdgeView> {
        self.edges.iter().find(|e| e.stable_index == stable_index)
    }
}

pub fn recompute_derived(
    store: &EntityStore,
    highlight: &Highlight,
    camera: CameraView,
    search: &SearchResults,
) -> DerivedView {
    let focused = highlight.focused().and_then(|idx| store.edge(idx));

    let nodes = store
        .nodes()
        .iter()
        .map(|node| {
            let (opacity, emphasized) = match focused {
                None => (OPACITY_FULL, false),
                Some(edge) if edge.touches(&node.id) => (OPACITY_FULL, true),
                Some(_) => (OPACITY_DIM_NODE, false),
            };
            NodeView {
                id: node.id.clone(),
                position: node.position,
                opacity,
                emphasized,
                search_match: search.matches_node(&node.id),
            }
        })
        .collect();

    let mut edges = Vec::with_capacity(store.edges_in_order().len());
    let mut enzyme_labels = Vec::new();
    for edge in store.edges_in_order() {
        let emphasized = highlight.is_focused(edge.stable_index);
        let opacity = match focused {
            Some(_) if !emphasized => OPACITY_DIM_EDGE,
            _ => OPACITY_FULL,
        };
        let endpoints = store
            .resolve(edge)
            .and_then(|(source, target)| source.position.zip(target.position));

        edges.push(EdgeView {
            stable_index: edge.stable_index,
            endpoints,
            opacity,
            emphasized,
            stroke: if emphasized {
                StrokeColor::Highlight
            } else {
                StrokeColor::for_kind(edge.kind)
            },
            stroke_width: if emphasized {
                FOCUSED_STROKE_WIDTH
            } else {
                STROKE_WIDTH
            },
            dashed: edge.is_bidirectional(),
            search_match: search.matches_edge(edge.stable_index),
        });

        if let Some(text) = store.enzyme_label(edge) {
            enzyme_labels.push(EnzymeLabelView {
                stable_index: edge.stable_index,
                text: text.to_string(),
                anchor: endpoints.map(|(a, b)| {
                    let mid = a.midpoint(b);
                    Point::new(mid.x, mid.y - ENZYME_LABEL_OFFSET)
                }),
                opacity,
                emphasized,
            });
        }
    }

    DerivedView {
        nodes,
        edges,
        enzyme_labels,
        camera,
    }
}
