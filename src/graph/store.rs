use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::graph::model::{Edge, Node, Point};
use crate::parser::dataset::Dataset;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),
}

/// What happened while loading: how many edges survived and which were dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub kept_edges: usize,
    /// Stable indices of edges whose endpoints did not resolve.
    pub dropped_edges: Vec<DroppedEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdge {
    pub stable_index: usize,
    pub source_id: String,
    pub target_id: String,
    pub label: String,
}

/// All nodes and reactions of the loaded network.
///
/// Populated once. Edge order is load order and `Edge::stable_index` is the
/// index the edge had in the dataset, so dropped edges leave gaps.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntityStore {
    nodes: Vec<Node>,
    index_by_id: HashMap<String, usize>,
    edges: Vec<Edge>,
    report: LoadReport,
}

impl EntityStore {
    pub fn load(dataset: &Dataset) -> Result<Self, StoreError> {
        let nodes = dataset
            .nodes
            .iter()
            .map(|raw| Node {
                id: raw.id.clone(),
                display_name: raw.name.clone(),
                kind: raw.kind.into(),
                formula: raw.formula.clone(),
                ec_number: raw.ec.clone(),
                position: match (raw.x, raw.y) {
                    (Some(x), Some(y)) => Some(Point::new(x, y)),
                    _ => None,
                },
            })
            .collect::<Vec<_>>();

        let edges = dataset
            .edges
            .iter()
            .enumerate()
            .map(|(stable_index, raw)| Edge {
                source_id: raw.source.clone(),
                target_id: raw.target.clone(),
                kind: raw.kind.into(),
                directionality: raw.direction.map(Into::into).unwrap_or_default(),
                enzyme_id: raw.enzyme.clone(),
                label: raw.name.clone(),
                exam_note: raw.exam_note.clone(),
                stable_index,
            })
            .collect::<Vec<_>>();

        Self::from_parts(nodes, edges)
    }

    /// Build a store from already-typed parts. Edges keep whatever
    /// `stable_index` they carry; indices must be strictly increasing.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, StoreError> {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if index_by_id.insert(node.id.clone(), idx).is_some() {
                return Err(StoreError::DuplicateNode(node.id.clone()));
            }
        }

        let mut report = LoadReport::default();
        let mut kept = Vec::with_capacity(edges.len());
        for edge in edges {
            if index_by_id.contains_key(&edge.source_id)
                && index_by_id.contains_key(&edge.target_id)
            {
                kept.push(edge);
            } else {
                debug!(
                    index = edge.stable_index,
                    source = %edge.source_id,
                    target = %edge.target_id,
                    "dropping edge with unresolved endpoint"
                );
                report.dropped_edges.push(DroppedEdge {
                    stable_index: edge.stable_index,
                    source_id: edge.source_id,
                    target_id: edge.target_id,
                    label: edge.label,
                });
            }
        }
        report.kept_edges = kept.len();

        Ok(Self {
            nodes,
            index_by_id,
            edges: kept,
            report,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn find_node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn edges_in_order(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up an edge by its stable index.
    pub fn edge(&self, stable_index: usize) -> Option<&Edge> {
        // Indices are strictly increasing, so the position is found by search.
        self.edges
            .binary_search_by_key(&stable_index, |e| e.stable_index)
            .ok()
            .map(|pos| &self.edges[pos])
    }

    /// Both endpoint nodes of `edge`, or `None` if either is unknown.
    pub fn resolve(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        let source = self.find_node_by_id(&edge.source_id)?;
        let target = self.find_node_by_id(&edge.target_id)?;
        Some((source, target))
    }

    /// The enzyme behind `edge`, when its reference names a loaded node.
    pub fn enzyme_for(&self, edge: &Edge) -> Option<&Node> {
        edge.enzyme_id
            .as_deref()
            .and_then(|id| self.find_node_by_id(id))
    }

    /// Text shown for the catalysing enzyme: the node's name, or the raw
    /// reference when it does not resolve.
    pub fn enzyme_label<'a>(&'a self, edge: &'a Edge) -> Option<&'a str> {
        match self.enzyme_for(edge) {
            Some(node) => Some(node.display_name.as_str()),
            None => edge.enzyme_id.as_deref(),
        }
    }

    /// Pin a node at a new position. Returns `false` for unknown ids.
    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        match self.index_by_id.get(id) {
            Some(&idx) => {
                self.nodes[idx].position = Some(position);
                true
            }
            None => false,
        }
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Edges touching `node_id`, in load order.
    pub fn edges_touching<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }
}
