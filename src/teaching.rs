//! Teaching-mode helpers: scripted reaction playback and the enzyme quiz.

use std::collections::HashSet;

use tracing::debug;

use crate::graph::model::{Edge, Node};

pub const MASKED_LABEL: &str = "?";

/// Steps through the reactions in load order, one per timer tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Playback {
    step: usize,
    playing: bool,
}

impl Playback {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Play/pause. Pausing keeps the step so playback resumes where it left off.
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.step = 0;
    }

    /// Advance one step. Returns the stable index of the reaction to focus,
    /// or `None` when paused or when the run has just finished.
    pub fn tick(&mut self, edges: &[Edge]) -> Option<usize> {
        if !self.playing {
            return None;
        }
        match edges.get(self.step) {
            Some(edge) => {
                self.step += 1;
                Some(edge.stable_index)
            }
            None => {
                debug!(steps = self.step, "playback finished");
                self.stop();
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub node_id: String,
    expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Correct { node_id: String },
    Incorrect { node_id: String, expected: String },
}

impl QuizOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }
}

/// Enzyme-naming self test. While active, enzyme names are masked until
/// answered correctly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Quiz {
    active: bool,
    prompt: Option<QuizPrompt>,
    revealed: HashSet<String>,
}

impl Quiz {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn prompt(&self) -> Option<&QuizPrompt> {
        self.prompt.as_ref()
    }

    /// Entering or leaving quiz mode re-masks every enzyme.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.prompt = None;
        self.revealed.clear();
        self.active
    }

    pub fn close(&mut self) {
        self.active = false;
        self.prompt = None;
        self.revealed.clear();
    }

    /// Open a prompt for `node`. Only enzymes can be quizzed.
    pub fn ask(&mut self, node: &Node) -> Option<&QuizPrompt> {
        if !self.active || !node.is_enzyme() {
            return None;
        }
        self.prompt = Some(QuizPrompt {
            node_id: node.id.clone(),
            expected: node.display_name.clone(),
        });
        self.prompt.as_ref()
    }

    pub fn cancel(&mut self) {
        self.prompt = None;
    }

    /// Check an answer against the open prompt, ignoring case and
    /// surrounding whitespace. Closes the prompt either way.
    pub fn submit(&mut self, answer: &str) -> Option<QuizOutcome> {
        let prompt = self.prompt.take()?;
        let correct = answer.trim().to_lowercase() == prompt.expected.to_lowercase();
        if correct {
            self.revealed.insert(prompt.node_id.clone());
            Some(QuizOutcome::Correct {
                node_id: prompt.node_id,
            })
        } else {
            Some(QuizOutcome::Incorrect {
                node_id: prompt.node_id,
                expected: prompt.expected,
            })
        }
    }

    pub fn is_masked(&self, node: &Node) -> bool {
        self.active && node.is_enzyme() && !self.revealed.contains(&node.id)
    }

    /// The name to draw for `node` under the current quiz state.
    pub fn label_for<'a>(&self, node: &'a Node) -> &'a str {
        if self.is_masked(node) {
            MASKED_LABEL
        } else {
            &node.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{EdgeKind, NodeKind};

    fn edges() -> Vec<Edge> {
        [0, 2, 5]
            .into_iter()
            .map(|i| Edge::new(i, "a", "b", EdgeKind::Synthesis, format!("r{i}")))
            .collect()
    }

    #[test]
    fn playback_visits_edges_in_order_then_resets() {
        let edges = edges();
        let mut playback = Playback::default();
        assert_eq!(playback.tick(&edges), None, "paused playback must not advance");

        playback.toggle();
        let visited = (0..3).filter_map(|_| playback.tick(&edges)).collect::<Vec<_>>();
        assert_eq!(visited, vec![0, 2, 5]);
        assert!(playback.is_playing());

        assert_eq!(playback.tick(&edges), None);
        assert!(!playback.is_playing());
        assert_eq!(playback.step(), 0);
    }

    #[test]
    fn pause_keeps_position() {
        let edges = edges();
        let mut playback = Playback::default();
        playback.toggle();
        playback.tick(&edges);
        playback.toggle();
        assert_eq!(playback.tick(&edges), None);
        playback.toggle();
        assert_eq!(playback.tick(&edges), Some(2));
    }

    #[test]
    fn quiz_accepts_trimmed_case_insensitive_answer() {
        let enzyme = Node::new("atp_synthase", "ATP合酶", NodeKind::Enzyme);
        let mut quiz = Quiz::default();
        quiz.toggle();
        assert!(quiz.is_masked(&enzyme));
        assert_eq!(quiz.label_for(&enzyme), MASKED_LABEL);

        quiz.ask(&enzyme);
        let outcome = quiz.submit("  atp合酶 ").unwrap();
        assert!(outcome.is_correct());
        assert!(!quiz.is_masked(&enzyme));
        assert_eq!(quiz.label_for(&enzyme), "ATP合酶");
        assert!(quiz.prompt().is_none());
    }

    #[test]
    fn wrong_answer_reports_expected_name() {
        let enzyme = Node::new("pfk", "磷酸果糖激酶", NodeKind::Enzyme);
        let mut quiz = Quiz::default();
        quiz.toggle();
        quiz.ask(&enzyme);
        assert_eq!(
            quiz.submit("己糖激酶"),
            Some(QuizOutcome::Incorrect {
                node_id: "pfk".into(),
                expected: "磷酸果糖激酶".into()
            })
        );
        assert!(quiz.is_masked(&enzyme));
    }

    #[test]
    fn only_enzymes_are_quizzed() {
        let metabolite = Node::new("glucose", "葡萄糖", NodeKind::Metabolite);
        let enzyme = Node::new("pfk", "磷酸果糖激酶", NodeKind::Enzyme);
        let mut quiz = Quiz::default();
        assert!(quiz.ask(&enzyme).is_none(), "inactive quiz asks nothing");
        quiz.toggle();
        assert!(quiz.ask(&metabolite).is_none());
        assert!(!quiz.is_masked(&metabolite));
        assert!(quiz.submit("葡萄糖").is_none());
    }

    #[test]
    fn toggling_off_and_on_masks_again() {
        let enzyme = Node::new("pfk", "磷酸果糖激酶", NodeKind::Enzyme);
        let mut quiz = Quiz::default();
        quiz.toggle();
        quiz.ask(&enzyme);
        quiz.submit("磷酸果糖激酶");
        quiz.toggle();
        assert!(!quiz.is_masked(&enzyme));
        quiz.toggle();
        assert!(quiz.is_masked(&enzyme));
    }
}
