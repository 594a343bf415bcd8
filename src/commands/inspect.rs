//! `pathmap inspect`: query the loaded network.

use std::path::Path;

use anyhow::Result;

use crate::commands::list::reaction_line;
use crate::graph::store::EntityStore;
use crate::pathway::classify;
use crate::tooltip::{Tooltip, edge_details, node_info};
use crate::view::StrokeColor;

pub fn run_dropped(dataset: Option<&Path>) -> Result<()> {
    let store = super::load_store(dataset)?;
    for line in dropped_lines(&store) {
        println!("  {}", line);
    }
    Ok(())
}

pub fn run_node(dataset: Option<&Path>, id: &str) -> Result<()> {
    let store = super::load_store(dataset)?;
    match node_lines(&store, id) {
        Some(lines) => lines.iter().for_each(|l| println!("  {}", l)),
        None => println!("  Node not found: {}", id),
    }
    Ok(())
}

pub fn run_edge(dataset: Option<&Path>, index: usize) -> Result<()> {
    let store = super::load_store(dataset)?;
    match edge_lines(&store, index) {
        Some(lines) => lines.iter().for_each(|l| println!("  {}", l)),
        None => println!("  No reaction #{} (out of range or dropped at load).", index),
    }
    Ok(())
}

fn dropped_lines(store: &EntityStore) -> Vec<String> {
    let report = store.report();
    if report.dropped_edges.is_empty() {
        return vec![format!(
            "No dropped reactions; {} kept.",
            report.kept_edges
        )];
    }
    report
        .dropped_edges
        .iter()
        .map(|d| {
            let missing = [&d.source_id, &d.target_id]
                .into_iter()
                .filter(|id| store.find_node_by_id(id).is_none())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "#{} {} -> {} : {} (missing: {})",
                d.stable_index, d.source_id, d.target_id, d.label, missing
            )
        })
        .collect()
}

fn tooltip_lines(tip: &Tooltip) -> Vec<String> {
    std::iter::once(tip.title.clone())
        .chain(tip.rows.iter().map(|(k, v)| format!("{}: {}", k, v)))
        .collect()
}

fn node_lines(store: &EntityStore, id: &str) -> Option<Vec<String>> {
    let node = store.find_node_by_id(id)?;
    let mut lines = tooltip_lines(&node_info(node));
    match node.position {
        Some(p) => lines.push(format!("位置: {}", p)),
        None => lines.push("位置: (unplaced)".to_string()),
    }
    let touching = store.edges_touching(&node.id).collect::<Vec<_>>();
    if touching.is_empty() {
        lines.push(format!("{} has no reactions.", node.id));
    } else {
        lines.push(format!("Reactions [{}]", touching.len()));
        lines.extend(
            touching
                .into_iter()
                .map(|e| format!("  {}", reaction_line(store, e))),
        );
    }
    Some(lines)
}

fn edge_lines(store: &EntityStore, index: usize) -> Option<Vec<String>> {
    let edge = store.edge(index)?;
    let mut lines = tooltip_lines(&edge_details(store, edge));
    lines.push(reaction_line(store, edge));
    lines.push(format!(
        "颜色: {}{}",
        StrokeColor::for_kind(edge.kind).hex(),
        if edge.is_bidirectional() { " (dashed)" } else { "" }
    ));
    let category = classify(edge);
    lines.push(format!(
        "通路: {} ({})",
        category.title(),
        category.english_name()
    ));
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Edge, EdgeKind, Node, NodeKind};
    use crate::parser::dataset;

    fn embedded_store() -> EntityStore {
        EntityStore::load(&dataset::embedded().unwrap()).unwrap()
    }

    #[test]
    fn dropped_lists_missing_endpoints() {
        let nodes = vec![Node::new("a", "A", NodeKind::Metabolite)];
        let edges = vec![Edge::new(0, "a", "ghost", EdgeKind::Synthesis, "vanishing")];
        let store = EntityStore::from_parts(nodes, edges).unwrap();
        assert_eq!(
            dropped_lines(&store),
            vec!["#0 a -> ghost : vanishing (missing: ghost)".to_string()]
        );
    }

    #[test]
    fn embedded_dataset_drops_nothing() {
        assert_eq!(
            dropped_lines(&embedded_store()),
            vec!["No dropped reactions; 58 kept.".to_string()]
        );
    }

    #[test]
    fn edge_details_include_exam_note_and_category() {
        let lines = edge_lines(&embedded_store(), 0).unwrap();
        assert_eq!(lines[0], "葡萄糖磷酸化");
        assert!(lines.contains(&"考点: 关键限速步骤".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("通路: 能量代谢")));
        assert!(lines.iter().any(|l| l.starts_with("颜色: #")));
        assert!(edge_lines(&embedded_store(), 999).is_none());
    }

    #[test]
    fn node_lists_touching_reactions() {
        let lines = node_lines(&embedded_store(), "glucose").unwrap();
        assert_eq!(lines[0], "葡萄糖");
        assert!(lines.iter().any(|l| l.starts_with("Reactions [")));
        assert!(node_lines(&embedded_store(), "missing").is_none());
    }
}
