//! `pathmap list`: print reactions grouped by pathway.

use std::path::Path;

use anyhow::Result;

use crate::graph::model::Edge;
use crate::graph::store::EntityStore;
use crate::pathway::group_by_pathway;

pub fn run(dataset: Option<&Path>) -> Result<()> {
    let store = super::load_store(dataset)?;
    let lines = list_reactions(&store);
    if lines.is_empty() {
        println!("  No reactions.");
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn list_reactions(store: &EntityStore) -> Vec<String> {
    let mut lines = Vec::new();
    for group in group_by_pathway(store.edges_in_order()) {
        lines.push(format!(
            "{} ({}) [{}]",
            group.category.title(),
            group.category.english_name(),
            group.count()
        ));
        for edge in group.edges.iter().filter_map(|&idx| store.edge(idx)) {
            lines.push(format!("  {}", reaction_line(store, edge)));
        }
    }
    lines
}

/// `#idx source -> target : label [enzyme]`
pub(crate) fn reaction_line(store: &EntityStore, edge: &Edge) -> String {
    let arrow = if edge.is_bidirectional() { "<->" } else { "->" };
    let mut line = format!(
        "#{:<3} {} {} {} : {}",
        edge.stable_index, edge.source_id, arrow, edge.target_id, edge.label
    );
    if let Some(enzyme) = store.enzyme_label(edge) {
        line.push_str(&format!(" [{}]", enzyme));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Directionality, EdgeKind, Node, NodeKind};

    fn store() -> EntityStore {
        let nodes = vec![
            Node::new("glucose", "葡萄糖", NodeKind::Metabolite),
            Node::new("g6p", "葡萄糖-6-磷酸", NodeKind::Metabolite),
            Node::new("hexokinase", "己糖激酶", NodeKind::Enzyme),
            Node::new("x", "X", NodeKind::Metabolite),
        ];
        let mut first = Edge::new(0, "glucose", "g6p", EdgeKind::Synthesis, "葡萄糖磷酸化");
        first.enzyme_id = Some("hexokinase".into());
        let mut second = Edge::new(1, "x", "g6p", EdgeKind::Regulation, "unknown step");
        second.directionality = Directionality::Bidirectional;
        EntityStore::from_parts(nodes, vec![first, second]).unwrap()
    }

    #[test]
    fn reactions_are_grouped_with_counts() {
        let lines = list_reactions(&store());
        assert_eq!(
            lines,
            vec![
                "能量代谢 (energy metabolism) [1]".to_string(),
                "  #0   glucose -> g6p : 葡萄糖磷酸化 [己糖激酶]".to_string(),
                "未分类 (unclassified) [1]".to_string(),
                "  #1   x <-> g6p : unknown step".to_string(),
            ]
        );
    }

    #[test]
    fn empty_network_lists_nothing() {
        let nodes = vec![Node::new("a", "A", NodeKind::Metabolite)];
        let store = EntityStore::from_parts(nodes, Vec::new()).unwrap();
        assert!(list_reactions(&store).is_empty());
    }
}
