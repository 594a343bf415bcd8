use std::fmt;

/// A fixed position on the map plane. Units are dataset units, not cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Arithmetic midpoint between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Linear interpolation, `t` in `0.0..=1.0`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Metabolite,
    Enzyme,
    Hormone,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Metabolite => "metabolite",
            Self::Enzyme => "enzyme",
            Self::Hormone => "hormone",
        }
    }

    /// Label in the dataset's own language, used by tooltips.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Metabolite => "代谢物",
            Self::Enzyme => "酶",
            Self::Hormone => "激素",
        }
    }
}

/// A metabolite, enzyme or hormone on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable key, unique across the node set.
    pub id: String,
    pub display_name: String,
    pub kind: NodeKind,
    pub formula: Option<String>,
    pub ec_number: Option<String>,
    /// `None` when the dataset gave no coordinates; such nodes are not drawn.
    pub position: Option<Point>,
}

impl Node {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            formula: None,
            ec_number: None,
            position: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Text drawn on the map: the formula when known, otherwise the id.
    pub fn map_label(&self) -> &str {
        self.formula.as_deref().unwrap_or(&self.id)
    }

    pub fn is_enzyme(&self) -> bool {
        self.kind == NodeKind::Enzyme
    }
}

/// What a reaction does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Synthesis,
    Decomposition,
    Regulation,
    Activation,
    Inhibition,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Synthesis => "synthesis",
            Self::Decomposition => "decomposition",
            Self::Regulation => "regulation",
            Self::Activation => "activation",
            Self::Inhibition => "inhibition",
        }
    }

    pub fn display_label(self) -> &'static str {
        match self {
            Self::Synthesis => "合成反应",
            Self::Decomposition => "分解反应",
            Self::Regulation => "调节",
            Self::Activation => "激活",
            Self::Inhibition => "抑制",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directionality {
    #[default]
    Forward,
    Bidirectional,
}

/// A single reaction between two nodes.
///
/// Endpoints are ids only. Use `EntityStore::resolve` to reach the nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
    pub directionality: Directionality,
    /// Either an enzyme node id or, in older datasets, the enzyme's name.
    pub enzyme_id: Option<String>,
    pub label: String,
    pub exam_note: Option<String>,
    /// Position in the dataset's edge sequence. Never reassigned.
    pub stable_index: usize,
}

impl Edge {
    pub fn new(
        stable_index: usize,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: EdgeKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
            directionality: Directionality::Forward,
            enzyme_id: None,
            label: label.into(),
            exam_note: None,
            stable_index,
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }

    pub fn is_bidirectional(&self) -> bool {
        self.directionality == Directionality::Bidirectional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_arithmetic_mean() {
        let a = Point::new(100.0, 200.0);
        let b = Point::new(300.0, 200.0);
        assert_eq!(a.midpoint(b), Point::new(200.0, 200.0));
    }

    #[test]
    fn map_label_falls_back_to_id() {
        let mut node = Node::new("pi", "无机磷酸", NodeKind::Metabolite);
        assert_eq!(node.map_label(), "pi");
        node.formula = Some("H3PO4".into());
        assert_eq!(node.map_label(), "H3PO4");
    }

    #[test]
    fn edge_touches_either_endpoint() {
        let edge = Edge::new(0, "glucose", "g6p", EdgeKind::Synthesis, "葡萄糖磷酸化");
        assert!(edge.touches("glucose"));
        assert!(edge.touches("g6p"));
        assert!(!edge.touches("f6p"));
    }
}
