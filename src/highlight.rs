//! Single-selection focus state for reactions.

use tracing::warn;

use crate::graph::store::EntityStore;

/// Opacity of everything while nothing is focused, and of focused elements.
pub const OPACITY_FULL: f64 = 1.0;
/// Opacity of edges and enzyme labels that are not the focused reaction.
pub const OPACITY_DIM_EDGE: f64 = 0.3;
/// Opacity of nodes that are not an endpoint of the focused reaction.
/// Dimmed less than edges so node names stay readable.
pub const OPACITY_DIM_NODE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Idle,
    Focused(usize),
}

/// What a call to `select`/`clear` did. Entering `Focused` obliges the caller
/// to recentre the camera on the focused edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Focused {
        index: usize,
        previous: Option<usize>,
    },
    Cleared {
        previous: usize,
    },
    Unchanged,
}

impl Transition {
    pub fn entered_focus(self) -> Option<usize> {
        match self {
            Self::Focused { index, .. } => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlight {
    state: HighlightState,
}

impl Highlight {
    pub fn state(&self) -> HighlightState {
        self.state
    }

    pub fn focused(&self) -> Option<usize> {
        match self.state {
            HighlightState::Idle => None,
            HighlightState::Focused(idx) => Some(idx),
        }
    }

    pub fn is_focused(&self, stable_index: usize) -> bool {
        self.focused() == Some(stable_index)
    }

    /// Click semantics: focus `index`, or clear when it is already focused.
    ///
    /// An index that names no loaded edge clears the selection.
    pub fn select(&mut self, store: &EntityStore, index: usize) -> Transition {
        let previous = self.focused();
        if previous == Some(index) {
            return self.clear();
        }
        if store.edge(index).is_none() {
            warn!(index, "select: no such edge, clearing selection");
            return self.clear();
        }
        self.state = HighlightState::Focused(index);
        Transition::Focused { index, previous }
    }

    /// Unconditional reset. Repeated calls are no-ops.
    pub fn clear(&mut self) -> Transition {
        match std::mem::take(&mut self.state) {
            HighlightState::Idle => Transition::Unchanged,
            HighlightState::Focused(previous) => Transition::Cleared { previous },
        }
    }
}
