//! Pathway classification for the reaction list.
//!
//! Each reaction lands in exactly one category. Rules are checked in a fixed
//! order and the first match wins, so a reaction that mentions an energy
//! carrier is filed under energy metabolism even when it also names a
//! pathway intermediate. The order below is load-bearing; changing it
//! reclassifies multi-keyword reactions.

use crate::graph::model::Edge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathwayCategory {
    Glycolysis,
    TcaCycle,
    PentosePhosphate,
    GlycogenMetabolism,
    Gluconeogenesis,
    FattyAcidMetabolism,
    ElectronTransportChain,
    AminoAcidMetabolism,
    NucleotideMetabolism,
    EnergyMetabolism,
    GlyoxylateCycle,
    Photosynthesis,
    Unclassified,
}

impl PathwayCategory {
    /// Sidebar order. `Unclassified` always comes last.
    pub const DISPLAY_ORDER: [Self; 13] = [
        Self::Glycolysis,
        Self::TcaCycle,
        Self::PentosePhosphate,
        Self::GlycogenMetabolism,
        Self::Gluconeogenesis,
        Self::FattyAcidMetabolism,
        Self::ElectronTransportChain,
        Self::AminoAcidMetabolism,
        Self::NucleotideMetabolism,
        Self::EnergyMetabolism,
        Self::GlyoxylateCycle,
        Self::Photosynthesis,
        Self::Unclassified,
    ];

    /// Group title as shown in the sidebar.
    pub fn title(self) -> &'static str {
        match self {
            Self::Glycolysis => "糖酵解",
            Self::TcaCycle => "三羧酸循环",
            Self::PentosePhosphate => "磷酸戊糖途径",
            Self::GlycogenMetabolism => "糖原代谢",
            Self::Gluconeogenesis => "糖异生",
            Self::FattyAcidMetabolism => "脂肪酸代谢",
            Self::ElectronTransportChain => "电子传递链",
            Self::AminoAcidMetabolism => "氨基酸代谢",
            Self::NucleotideMetabolism => "核苷酸代谢",
            Self::EnergyMetabolism => "能量代谢",
            Self::GlyoxylateCycle => "乙醛酸循环",
            Self::Photosynthesis => "光合作用",
            Self::Unclassified => "未分类",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Self::Glycolysis => "glycolysis",
            Self::TcaCycle => "TCA cycle",
            Self::PentosePhosphate => "pentose phosphate pathway",
            Self::GlycogenMetabolism => "glycogen metabolism",
            Self::Gluconeogenesis => "gluconeogenesis",
            Self::FattyAcidMetabolism => "fatty-acid metabolism",
            Self::ElectronTransportChain => "electron transport chain",
            Self::AminoAcidMetabolism => "amino-acid metabolism",
            Self::NucleotideMetabolism => "nucleotide metabolism",
            Self::EnergyMetabolism => "energy metabolism",
            Self::GlyoxylateCycle => "glyoxylate cycle",
            Self::Photosynthesis => "photosynthesis",
            Self::Unclassified => "unclassified",
        }
    }
}

/// Lower-cased classifier inputs for one edge.
struct RuleInput {
    label: String,
    source: String,
    target: String,
}

impl RuleInput {
    fn new(edge: &Edge) -> Self {
        Self {
            label: edge.label.to_lowercase(),
            source: edge.source_id.to_lowercase(),
            target: edge.target_id.to_lowercase(),
        }
    }

    fn label_has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.label.contains(n))
    }

    fn label_has(&self, needle: &str) -> bool {
        self.label.contains(needle)
    }

    /// Substring test against either endpoint id.
    fn endpoint_contains_any(&self, needles: &[&str]) -> bool {
        needles
            .iter()
            .any(|n| self.source.contains(n) || self.target.contains(n))
    }

    /// Exact match against either endpoint id.
    fn endpoint_is_any(&self, ids: &[&str]) -> bool {
        ids.iter()
            .any(|id| self.source == *id || self.target == *id)
    }
}

type Rule = fn(&RuleInput) -> bool;

const RULES: [(PathwayCategory, Rule); 12] = [
    (PathwayCategory::EnergyMetabolism, is_energy),
    (PathwayCategory::Glycolysis, is_glycolysis),
    (PathwayCategory::TcaCycle, is_tca),
    (PathwayCategory::PentosePhosphate, is_pentose_phosphate),
    (PathwayCategory::GlycogenMetabolism, is_glycogen),
    (PathwayCategory::Gluconeogenesis, is_gluconeogenesis),
    (PathwayCategory::FattyAcidMetabolism, is_fatty_acid),
    (PathwayCategory::ElectronTransportChain, is_electron_transport),
    (PathwayCategory::AminoAcidMetabolism, is_amino_acid),
    (PathwayCategory::NucleotideMetabolism, is_nucleotide),
    (PathwayCategory::GlyoxylateCycle, is_glyoxylate),
    (PathwayCategory::Photosynthesis, is_photosynthesis),
];

/// Assign `edge` to its pathway category.
pub fn classify(edge: &Edge) -> PathwayCategory {
    let input = RuleInput::new(edge);
    RULES
        .iter()
        .find(|(_, rule)| rule(&input))
        .map(|(category, _)| *category)
        .unwrap_or(PathwayCategory::Unclassified)
}

fn is_energy(r: &RuleInput) -> bool {
    r.label_has_any(&[
        "atp",
        "adp",
        "nadp",
        "nadph",
        "nadh",
        "fadh2",
        "氧化磷酸化",
        "底物水平磷酸化",
        "gtp",
        "gdp",
        "能量",
        "磷酸化",
    ]) || r.endpoint_is_any(&["atp", "adp", "nadp", "nadph", "nadh", "fadh2", "pi"])
}

fn is_glycolysis(r: &RuleInput) -> bool {
    r.label_has("糖酵")
        // Unreachable after the energy rule; kept so the rule reads the same.
        || (r.label_has("磷酸化") && r.label_has("葡萄糖"))
        || r.label_has("二磷酸甘油酸")
        || r.label_has("磷酸烯醇式丙酮酸")
        || r.endpoint_contains_any(&["glucose", "pyruvate"])
}

fn is_tca(r: &RuleInput) -> bool {
    r.label_has_any(&[
        "三羧酸",
        "柠檬酸",
        "酮戊二酸",
        "琥珀酸",
        "草酰乙酸",
        "苹果酸",
        "延胡索酸",
    ]) || r.endpoint_contains_any(&["acetyl_coa"])
}

fn is_pentose_phosphate(r: &RuleInput) -> bool {
    r.label_has_any(&["戊糖", "己糖", "核糖", "木酮糖", "景天庚酮糖", "赤藓糖"])
}

fn is_glycogen(r: &RuleInput) -> bool {
    r.label_has("糖原") || r.endpoint_contains_any(&["glycogen", "udp_glucose"])
}

fn is_gluconeogenesis(r: &RuleInput) -> bool {
    r.label_has_any(&["糖异生", "乳酸"]) || r.endpoint_contains_any(&["lactate", "alanine"])
}

fn is_fatty_acid(r: &RuleInput) -> bool {
    r.label_has_any(&["脂肪酸", "脂酰", "肉碱", "丙二酰", "β-氧化"])
        || r.endpoint_contains_any(&["acyl_coa", "malonyl_coa"])
}

fn is_electron_transport(r: &RuleInput) -> bool {
    r.label_has_any(&["电子", "呼吸链", "atp合酶"])
        || (r.label_has("氧化") && (r.source.contains("nadh") || r.source.contains("fadh2")))
        || r.endpoint_contains_any(&["oxygen", "water"])
}

fn is_amino_acid(r: &RuleInput) -> bool {
    r.label_has_any(&["氨基酸", "谷氨", "转氨酶", "天冬氨酸", "尿素"])
        || r.endpoint_contains_any(&["glutamate", "glutamine", "aspartate", "urea"])
}

fn is_nucleotide(r: &RuleInput) -> bool {
    r.label_has_any(&["核苷酸", "嘌呤", "嘧啶", "prpp"])
        || r.endpoint_contains_any(&["prpp", "imp", "amp", "gmp"])
}

fn is_glyoxylate(r: &RuleInput) -> bool {
    r.label_has("乙醛酸")
}

fn is_photosynthesis(r: &RuleInput) -> bool {
    r.label_has_any(&["光合", "卡尔文"])
}

/// One sidebar group: a category and the stable indices filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayGroup {
    pub category: PathwayCategory,
    pub edges: Vec<usize>,
}

impl PathwayGroup {
    pub fn count(&self) -> usize {
        self.edges.len()
    }
}

/// Group edges by category in display order, dropping empty groups.
/// Load order is kept within each group.
pub fn group_by_pathway(edges: &[Edge]) -> Vec<PathwayGroup> {
    let classified = edges
        .iter()
        .map(|e| (classify(e), e.stable_index))
        .collect::<Vec<_>>();

    PathwayCategory::DISPLAY_ORDER
        .iter()
        .filter_map(|&category| {
            let members = classified
                .iter()
                .filter(|(c, _)| *c == category)
                .map(|(_, idx)| *idx)
                .collect::<Vec<_>>();
            (!members.is_empty()).then_some(PathwayGroup {
                category,
                edges: members,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::EdgeKind;
    use crate::graph::store::EntityStore;
    use crate::parser::dataset;

    fn edge(source: &str, target: &str, label: &str) -> Edge {
        Edge::new(0, source, target, EdgeKind::Synthesis, label)
    }

    #[test]
    fn energy_keyword_beats_pathway_keyword() {
        let e = edge("x", "y", "ATP驱动的糖酵解步骤");
        assert_eq!(classify(&e), PathwayCategory::EnergyMetabolism);
    }

    #[test]
    fn energy_endpoint_match_is_exact_not_substring() {
        // "pi" as an exact id is an energy carrier; "pip2" is not.
        assert_eq!(
            classify(&edge("pi", "x", "无机磷酸参与")),
            PathwayCategory::EnergyMetabolism
        );
        assert_eq!(
            classify(&edge("pip2", "x", "无关反应")),
            PathwayCategory::Unclassified
        );
    }

    #[test]
    fn glycolysis_matches_on_endpoint_ids() {
        assert_eq!(
            classify(&edge("pep", "pyruvate", "磷酸烯醇式丙酮酸转磷酸")),
            PathwayCategory::Glycolysis
        );
        // pyruvate beats the lactate rule because glycolysis is checked first.
        assert_eq!(
            classify(&edge("lactate", "pyruvate", "乳酸脱氢")),
            PathwayCategory::Glycolysis
        );
    }

    #[test]
    fn tca_label_and_acetyl_coa_both_select_tca() {
        assert_eq!(
            classify(&edge("a", "b", "三羧酸循环入口")),
            PathwayCategory::TcaCycle
        );
        assert_eq!(
            classify(&edge("acetyl_coa", "b", "缩合")),
            PathwayCategory::TcaCycle
        );
    }

    #[test]
    fn electron_transport_needs_oxidation_from_carrier_source() {
        assert_eq!(
            classify(&edge("q", "oxygen", "还原")),
            PathwayCategory::ElectronTransportChain
        );
        assert_eq!(
            classify(&edge("x", "y", "呼吸链复合体I")),
            PathwayCategory::ElectronTransportChain
        );
    }

    #[test]
    fn later_rules_are_reachable() {
        assert_eq!(
            classify(&edge("a", "b", "核糖转化")),
            PathwayCategory::PentosePhosphate
        );
        assert_eq!(
            classify(&edge("a", "udp_glucose", "转化")),
            PathwayCategory::Glycolysis,
            "udp_glucose contains glucose, so glycolysis wins"
        );
        assert_eq!(
            classify(&edge("a", "alanine", "转化")),
            PathwayCategory::Gluconeogenesis
        );
        assert_eq!(
            classify(&edge("a", "b", "β-氧化第一步")),
            PathwayCategory::FattyAcidMetabolism
        );
        assert_eq!(
            classify(&edge("a", "urea", "循环")),
            PathwayCategory::AminoAcidMetabolism
        );
        assert_eq!(
            classify(&edge("a", "gmp", "合成")),
            PathwayCategory::NucleotideMetabolism
        );
        assert_eq!(
            classify(&edge("a", "b", "乙醛酸生成")),
            PathwayCategory::GlyoxylateCycle
        );
        assert_eq!(
            classify(&edge("a", "b", "卡尔文循环")),
            PathwayCategory::Photosynthesis
        );
    }

    #[test]
    fn classification_is_total_and_deterministic() {
        let store = EntityStore::load(&dataset::embedded().unwrap()).unwrap();
        for e in store.edges_in_order() {
            let first = classify(e);
            assert!(PathwayCategory::DISPLAY_ORDER.contains(&first));
            assert_eq!(first, classify(e), "edge {} flipped", e.stable_index);
        }
    }

    #[test]
    fn embedded_dataset_group_counts() {
        let store = EntityStore::load(&dataset::embedded().unwrap()).unwrap();
        let groups = group_by_pathway(store.edges_in_order());
        let summary = groups
            .iter()
            .map(|g| (g.category, g.count()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (PathwayCategory::Glycolysis, 4),
                (PathwayCategory::TcaCycle, 10),
                (PathwayCategory::GlycogenMetabolism, 5),
                (PathwayCategory::FattyAcidMetabolism, 3),
                (PathwayCategory::AminoAcidMetabolism, 2),
                (PathwayCategory::NucleotideMetabolism, 2),
                (PathwayCategory::EnergyMetabolism, 17),
                (PathwayCategory::Unclassified, 15),
            ]
        );
        let total: usize = groups.iter().map(PathwayGroup::count).sum();
        assert_eq!(total, store.edges_in_order().len());
    }

    #[test]
    fn groups_keep_load_order() {
        let edges = vec![
            Edge::new(3, "a", "b", EdgeKind::Synthesis, "柠檬酸合成"),
            Edge::new(7, "a", "b", EdgeKind::Synthesis, "无关"),
            Edge::new(9, "a", "b", EdgeKind::Synthesis, "苹果酸氧化"),
        ];
        let groups = group_by_pathway(&edges);
        assert_eq!(groups[0].category, PathwayCategory::TcaCycle);
        assert_eq!(groups[0].edges, vec![3, 9]);
        assert_eq!(groups[1].category, PathwayCategory::Unclassified);
        assert_eq!(groups[1].edges, vec![7]);
    }
}
