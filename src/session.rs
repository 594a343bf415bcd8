//! Application state for one loaded dataset.
//!
//! The store is populated once by `initialize`; everything else (highlight,
//! camera, search, playback, quiz) is derived state that `reset` tears down.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::bail;
use tracing::{debug, info};

use crate::camera::Camera;
use crate::graph::model::Point;
use crate::graph::store::{EntityStore, StoreError};
use crate::highlight::{Highlight, Transition};
use crate::parser::config::Config;
use crate::parser::dataset::Dataset;
use crate::pathway::{PathwayGroup, group_by_pathway};
use crate::search::{self, SearchResults};
use crate::teaching::{Playback, Quiz, QuizOutcome, QuizPrompt};
use crate::view::{DerivedView, recompute_derived};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Research,
    Teaching,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Teaching => "teaching",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Research => Self::Teaching,
            Self::Teaching => Self::Research,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "research" => Ok(Self::Research),
            "teaching" => Ok(Self::Teaching),
            other => bail!("unknown mode {other:?} (expected research or teaching)"),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    store: EntityStore,
    groups: Vec<PathwayGroup>,
    mode: Mode,
    highlight: Highlight,
    camera: Camera,
    search: SearchResults,
    playback: Playback,
    quiz: Quiz,
    recenter: Duration,
}

impl Session {
    pub fn initialize(dataset: &Dataset, config: &Config) -> Result<Self, StoreError> {
        let store = EntityStore::load(dataset)?;
        let groups = group_by_pathway(store.edges_in_order());
        info!(
            nodes = store.nodes().len(),
            edges = store.edges_in_order().len(),
            dropped = store.report().dropped_edges.len(),
            groups = groups.len(),
            "session initialised"
        );
        let camera = Camera::with_home(home_point(&store));
        Ok(Self {
            store,
            groups,
            mode: config.mode,
            highlight: Highlight::default(),
            camera,
            search: SearchResults::default(),
            playback: Playback::default(),
            quiz: Quiz::default(),
            recenter: config.recenter_duration(),
        })
    }

    /// Drop all derived state, keeping the loaded store.
    pub fn reset(&mut self, now: Instant) {
        self.highlight.clear();
        self.playback.stop();
        self.quiz.close();
        self.search = SearchResults::default();
        self.camera.reset(now);
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn groups(&self) -> &[PathwayGroup] {
        &self.groups
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn search_results(&self) -> &SearchResults {
        &self.search
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Click on a reaction. Entering focus recentres the camera on it.
    pub fn select(&mut self, stable_index: usize, now: Instant) -> Transition {
        let transition = self.highlight.select(&self.store, stable_index);
        if let Some(index) = transition.entered_focus()
            && let Some(edge) = self.store.edge(index)
        {
            self.camera
                .recenter_on_edge(&self.store, edge, now, self.recenter);
        }
        transition
    }

    pub fn clear(&mut self) -> Transition {
        self.highlight.clear()
    }

    pub fn switch_mode(&mut self, mode: Mode, now: Instant) {
        debug!(from = %self.mode, to = %mode, "switching mode");
        self.mode = mode;
        self.reset(now);
    }

    /// Play/pause scripted playback. Only available in teaching mode.
    pub fn toggle_playback(&mut self) -> bool {
        if self.mode != Mode::Teaching {
            return false;
        }
        self.playback.toggle()
    }

    /// One playback timer tick: focus the next reaction and recentre on it.
    pub fn tick_playback(&mut self, now: Instant) -> Option<usize> {
        let index = self.playback.tick(self.store.edges_in_order())?;
        self.highlight.clear();
        self.select(index, now);
        Some(index)
    }

    /// Run a search and fly to the first matched node that has a position.
    pub fn search(&mut self, query: &str, now: Instant) -> &SearchResults {
        self.search = search::search(&self.store, query);
        let first = self
            .search
            .nodes
            .iter()
            .find_map(|id| self.store.find_node_by_id(id)?.position);
        if let Some(point) = first {
            self.camera.focus_point(point, now, self.recenter);
        }
        &self.search
    }

    pub fn clear_search(&mut self) {
        self.search = SearchResults::default();
    }

    /// Shift a node by a drag offset. Unplaced nodes start at the origin.
    pub fn drag_node(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        let Some(node) = self.store.find_node_by_id(id) else {
            return false;
        };
        let from = node.position.unwrap_or(Point::ORIGIN);
        self.store
            .move_node(id, Point::new(from.x + dx, from.y + dy))
    }

    pub fn toggle_quiz(&mut self) -> bool {
        if self.mode != Mode::Teaching {
            return false;
        }
        self.quiz.toggle()
    }

    pub fn ask_quiz(&mut self, node_id: &str) -> Option<&QuizPrompt> {
        let node = self.store.find_node_by_id(node_id)?;
        self.quiz.ask(node)
    }

    pub fn submit_quiz(&mut self, answer: &str) -> Option<QuizOutcome> {
        self.quiz.submit(answer)
    }

    pub fn cancel_quiz(&mut self) {
        self.quiz.cancel();
    }

    pub fn derived_view(&self, now: Instant) -> DerivedView {
        recompute_derived(
            &self.store,
            &self.highlight,
            self.camera.current(now),
            &self.search,
        )
    }
}

/// Centre of the bounding box of placed nodes, or the origin when none are.
fn home_point(store: &EntityStore) -> Point {
    let mut placed = store.nodes().iter().filter_map(|n| n.position);
    let Some(first) = placed.next() else {
        return Point::ORIGIN;
    };
    let (min, max) = placed.fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    });
    min.midpoint(max)
}
