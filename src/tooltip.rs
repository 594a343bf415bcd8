//! Info-box content for hovered and clicked elements.
//!
//! Exam notes appear only in the click/detail variants; hovering never
//! reveals them.

use crate::graph::model::{Edge, Node};
use crate::graph::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
}

impl Tooltip {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    fn row(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.rows.push((key, value.into()));
        self
    }

    fn row_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.row(key, v),
            None => self,
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub fn node_info(node: &Node) -> Tooltip {
    let ec = if node.is_enzyme() {
        node.ec_number.as_deref()
    } else {
        None
    };
    Tooltip::new(&node.display_name)
        .row("类型", node.kind.display_label())
        .row_opt("EC号", ec)
        .row_opt("分子式", node.formula.as_deref())
}

/// Hover content for a reaction: name, kind and enzyme, without the exam note.
pub fn edge_hover(store: &EntityStore, edge: &Edge) -> Tooltip {
    let mut tip = Tooltip::new(&edge.label).row("类型", edge.kind.display_label());
    if let Some(enzyme) = store.enzyme_for(edge) {
        tip = tip
            .row("酶", enzyme.display_name.as_str())
            .row_opt("EC号", enzyme.ec_number.as_deref());
    } else if let Some(raw) = edge.enzyme_id.as_deref() {
        tip = tip.row("酶", raw);
    }
    tip
}

/// Click content: hover content plus the exam note when there is one.
pub fn edge_details(store: &EntityStore, edge: &Edge) -> Tooltip {
    edge_hover(store, edge).row_opt("考点", edge.exam_note.as_deref())
}

/// The exam-point marker popup, or `None` for reactions without a note.
pub fn exam_point(store: &EntityStore, edge: &Edge) -> Option<Tooltip> {
    let note = edge.exam_note.as_deref()?;
    Some(
        Tooltip::new("考点提示")
            .row_opt("酶", store.enzyme_label(edge))
            .row("反应", edge.label.as_str())
            .row("考点", note),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dataset;

    fn embedded_store() -> EntityStore {
        EntityStore::load(&dataset::embedded().unwrap()).unwrap()
    }

    #[test]
    fn hover_never_shows_exam_note() {
        let store = embedded_store();
        let edge = store.edge(0).unwrap();
        let hover = edge_hover(&store, edge);
        assert_eq!(hover.title, "葡萄糖磷酸化");
        assert_eq!(hover.value("类型"), Some("合成反应"));
        assert_eq!(hover.value("酶"), Some("己糖激酶"));
        assert_eq!(hover.value("考点"), None);

        let details = edge_details(&store, edge);
        assert_eq!(details.value("考点"), Some("关键限速步骤"));
    }

    #[test]
    fn unresolved_enzyme_is_shown_verbatim() {
        let store = embedded_store();
        let edge = store.edge(33).unwrap();
        assert_eq!(edge_hover(&store, edge).value("酶"), Some("ATP酶"));
        assert_eq!(edge_hover(&store, edge).value("EC号"), None);
    }

    #[test]
    fn node_info_lists_ec_only_for_enzymes() {
        let store = embedded_store();
        let pfk = node_info(store.find_node_by_id("pfk").unwrap());
        assert_eq!(pfk.value("类型"), Some("酶"));
        assert_eq!(pfk.value("EC号"), Some("2.7.1.11"));

        let glucose = node_info(store.find_node_by_id("glucose").unwrap());
        assert_eq!(glucose.value("分子式"), Some("C6H12O6"));
        assert_eq!(glucose.value("EC号"), None);
    }

    #[test]
    fn exam_point_requires_note() {
        let store = embedded_store();
        assert!(exam_point(&store, store.edge(1).unwrap()).is_none());
        let tip = exam_point(&store, store.edge(20).unwrap()).unwrap();
        assert_eq!(tip.value("考点"), Some("磷酸戊糖途径的限速步骤"));
    }
}
