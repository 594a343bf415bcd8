//! JSON reader for reaction-network datasets.
//!
//! The on-disk shape is `{ "nodes": [...], "edges": [...] }`. Older exports
//! call the edge list `links` and store the exam annotation under `考点`;
//! both spellings are accepted.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::graph::model::{Directionality, EdgeKind, NodeKind};

/// The default dataset compiled into the binary.
const EMBEDDED_DATASET: &str = include_str!("../../data/biochem.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<RawNode>,
    #[serde(alias = "links", default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RawNodeKind,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub ec: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawNodeKind {
    Metabolite,
    Enzyme,
    Hormone,
}

impl From<RawNodeKind> for NodeKind {
    fn from(raw: RawNodeKind) -> Self {
        match raw {
            RawNodeKind::Metabolite => Self::Metabolite,
            RawNodeKind::Enzyme => Self::Enzyme,
            RawNodeKind::Hormone => Self::Hormone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RawEdgeKind,
    pub name: String,
    #[serde(default)]
    pub enzyme: Option<String>,
    #[serde(default)]
    pub direction: Option<RawDirection>,
    #[serde(default, alias = "考点")]
    pub exam_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawEdgeKind {
    Synthesis,
    Decomposition,
    Regulation,
    Activation,
    Inhibition,
}

impl From<RawEdgeKind> for EdgeKind {
    fn from(raw: RawEdgeKind) -> Self {
        match raw {
            RawEdgeKind::Synthesis => Self::Synthesis,
            RawEdgeKind::Decomposition => Self::Decomposition,
            RawEdgeKind::Regulation => Self::Regulation,
            RawEdgeKind::Activation => Self::Activation,
            RawEdgeKind::Inhibition => Self::Inhibition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawDirection {
    Forward,
    Bidirectional,
}

impl From<RawDirection> for Directionality {
    fn from(raw: RawDirection) -> Self {
        match raw {
            RawDirection::Forward => Self::Forward,
            RawDirection::Bidirectional => Self::Bidirectional,
        }
    }
}

/// Parse dataset JSON text.
pub fn parse(input: &str) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_str(input).context("invalid dataset JSON")?;
    if dataset.nodes.is_empty() {
        bail!("dataset has no nodes");
    }
    Ok(dataset)
}

/// The dataset shipped inside the binary.
pub fn embedded() -> Result<Dataset> {
    parse(EMBEDDED_DATASET).context("embedded dataset is malformed")
}

/// Load from `path` when given, otherwise fall back to the embedded dataset.
pub fn load(path: Option<&Path>) -> Result<Dataset> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?;
            parse(&text).with_context(|| format!("in {}", path.display()))
        }
        None => embedded(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_parses() {
        let dataset = embedded().unwrap();
        assert_eq!(dataset.nodes.len(), 83);
        assert_eq!(dataset.edges.len(), 58);
        assert_eq!(dataset.edges[0].exam_note.as_deref(), Some("关键限速步骤"));
    }

    #[test]
    fn accepts_legacy_key_spellings() {
        let text = r#"{
            "nodes": [
                { "id": "a", "name": "A", "type": "metabolite", "x": 1, "y": 2 },
                { "id": "b", "name": "B", "type": "enzyme", "ec": "1.1.1.1" }
            ],
            "links": [
                { "source": "a", "target": "b", "type": "activation", "name": "r", "考点": "note" }
            ]
        }"#;
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.edges.len(), 1);
        assert_eq!(dataset.edges[0].exam_note.as_deref(), Some("note"));
        assert_eq!(dataset.edges[0].direction, None);
        assert_eq!(dataset.nodes[1].x, None);
    }

    #[test]
    fn rejects_unknown_edge_type() {
        let text = r#"{
            "nodes": [{ "id": "a", "name": "A", "type": "metabolite" }],
            "edges": [{ "source": "a", "target": "a", "type": "teleport", "name": "r" }]
        }"#;
        assert!(parse(text).is_err());
    }

    #[test]
    fn rejects_empty_node_list() {
        assert!(parse(r#"{ "nodes": [], "edges": [] }"#).is_err());
    }
}
