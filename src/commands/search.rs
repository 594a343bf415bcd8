//! `pathmap search`: print nodes and reactions matching a query.

use std::path::Path;

use anyhow::Result;

use crate::commands::list::reaction_line;
use crate::graph::store::EntityStore;
use crate::search::{SearchResults, search};

pub fn run(dataset: Option<&Path>, query: &str) -> Result<()> {
    let store = super::load_store(dataset)?;
    let results = search(&store, query);
    if results.is_empty() {
        println!("  No matches for {:?}.", query.trim());
        return Ok(());
    }
    for line in render_results(&store, &results) {
        println!("{}", line);
    }
    Ok(())
}

fn render_results(store: &EntityStore, results: &SearchResults) -> Vec<String> {
    let mut lines = Vec::new();
    if !results.nodes.is_empty() {
        lines.push(format!("Nodes [{}]", results.nodes.len()));
        for node in results.nodes.iter().filter_map(|id| store.find_node_by_id(id)) {
            let mut line = format!("  {} ({}, {})", node.display_name, node.id, node.kind.label());
            if let Some(formula) = &node.formula {
                line.push_str(&format!(" {}", formula));
            }
            if let Some(ec) = &node.ec_number {
                line.push_str(&format!(" EC {}", ec));
            }
            lines.push(line);
        }
    }
    let mut section = |title: &str, indices: &[usize]| {
        if indices.is_empty() {
            return;
        }
        lines.push(format!("{} [{}]", title, indices.len()));
        for edge in indices.iter().filter_map(|&idx| store.edge(idx)) {
            lines.push(format!("  {}", reaction_line(store, edge)));
        }
    };
    section("Reactions", &results.edges);
    section("Related reactions", &results.related_edges);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dataset;

    #[test]
    fn prints_node_then_related_reactions() {
        let store = EntityStore::load(&dataset::embedded().unwrap()).unwrap();
        let results = search(&store, "2.7.1.11");
        let lines = render_results(&store, &results);
        assert_eq!(lines[0], "Nodes [1]");
        assert_eq!(lines[1], "  磷酸果糖激酶 (pfk, enzyme) EC 2.7.1.11");
        assert!(
            !lines.iter().any(|l| l.starts_with("Reactions")),
            "no reaction label contains an EC number"
        );
    }

    #[test]
    fn exam_note_matches_list_reactions() {
        let store = EntityStore::load(&dataset::embedded().unwrap()).unwrap();
        let results = search(&store, "限速");
        let lines = render_results(&store, &results);
        assert_eq!(lines[0], "Reactions [3]");
        assert!(lines[1].contains("葡萄糖磷酸化"));
    }
}
