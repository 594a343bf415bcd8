use crate::graph::store::EntityStore;

/// Most nodes or edges reported for one query.
pub const MATCH_LIMIT: usize = 10;
/// Most reactions reported as touching a matched node.
pub const RELATED_LIMIT: usize = 15;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    /// Ids of nodes whose name, formula or EC number matched.
    pub nodes: Vec<String>,
    /// Stable indices of edges whose label or exam note matched.
    pub edges: Vec<usize>,
    /// Stable indices of edges touching a matched node.
    pub related_edges: Vec<usize>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn matches_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    pub fn matches_edge(&self, stable_index: usize) -> bool {
        self.edges.contains(&stable_index) || self.related_edges.contains(&stable_index)
    }
}

/// Case-insensitive substring search. A blank query matches nothing.
pub fn search(store: &EntityStore, query: &str) -> SearchResults {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    let nodes = store
        .nodes()
        .iter()
        .filter(|n| {
            hit(&n.display_name)
                || n.formula.as_deref().is_some_and(hit)
                || n.ec_number.as_deref().is_some_and(hit)
        })
        .take(MATCH_LIMIT)
        .map(|n| n.id.clone())
        .collect::<Vec<_>>();

    let edges = store
        .edges_in_order()
        .iter()
        .filter(|e| hit(&e.label) || e.exam_note.as_deref().is_some_and(hit))
        .take(MATCH_LIMIT)
        .map(|e| e.stable_index)
        .collect::<Vec<_>>();

    let related_edges = store
        .edges_in_order()
        .iter()
        .filter(|e| nodes.iter().any(|id| e.touches(id)))
        .take(RELATED_LIMIT)
        .map(|e| e.stable_index)
        .collect();

    SearchResults {
        query: query.trim().to_string(),
        nodes,
        edges,
        related_edges,
    }
}
