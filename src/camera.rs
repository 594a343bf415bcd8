//! Pan/zoom state of the map view.
//!
//! The camera has a target (where it is going) and, while a move is in
//! flight, the point it started from. `current` interpolates between the two
//! so the render layer can draw a smooth transition.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::graph::model::{Edge, Point};
use crate::graph::store::EntityStore;

pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 5.0;
pub const ZOOM_IN_FACTOR: f64 = 1.2;
pub const ZOOM_OUT_FACTOR: f64 = 0.8;
pub const DEFAULT_RECENTER: Duration = Duration::from_millis(750);
pub const ZOOM_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    from: Point,
    from_zoom: f64,
    started: Instant,
    duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    target: Point,
    zoom: f64,
    flight: Option<Flight>,
    /// Where `reset` returns to.
    home: Point,
}

impl Default for Camera {
    fn default() -> Self {
        Self::with_home(Point::ORIGIN)
    }
}

/// A snapshot of where the camera is looking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub center: Point,
    pub zoom: f64,
}

impl Camera {
    /// A settled camera centred on `home` at zoom 1.
    pub fn with_home(home: Point) -> Self {
        Self {
            target: home,
            zoom: 1.0,
            flight: None,
            home,
        }
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Destination of the camera, ignoring any in-flight move.
    pub fn settled(&self) -> CameraView {
        CameraView {
            center: self.target,
            zoom: self.zoom,
        }
    }

    /// Centre the view on the midpoint of `edge`'s endpoints.
    ///
    /// If either endpoint is unknown or unplaced the camera does not move.
    pub fn recenter_on_edge(
        &mut self,
        store: &EntityStore,
        edge: &Edge,
        now: Instant,
        duration: Duration,
    ) -> bool {
        let endpoints = store
            .resolve(edge)
            .and_then(|(source, target)| source.position.zip(target.position));
        let Some((from, to)) = endpoints else {
            warn!(
                index = edge.stable_index,
                source = %edge.source_id,
                target = %edge.target_id,
                "cannot locate both endpoints, skipping recentre"
            );
            return false;
        };
        self.fly_to(from.midpoint(to), self.zoom, now, duration);
        true
    }

    pub fn focus_point(&mut self, point: Point, now: Instant, duration: Duration) {
        self.fly_to(point, self.zoom, now, duration);
    }

    pub fn zoom_in(&mut self, now: Instant) {
        self.zoom_by(ZOOM_IN_FACTOR, now);
    }

    pub fn zoom_out(&mut self, now: Instant) {
        self.zoom_by(ZOOM_OUT_FACTOR, now);
    }

    fn zoom_by(&mut self, factor: f64, now: Instant) {
        let zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.fly_to(self.target, zoom, now, ZOOM_TRANSITION);
    }

    /// Back to the home point (the origin unless set) at zoom 1.
    pub fn reset(&mut self, now: Instant) {
        self.fly_to(self.home, 1.0, now, ZOOM_TRANSITION);
    }

    /// Immediate pan; cancels any in-flight move.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.target = Point::new(self.target.x + dx, self.target.y + dy);
        self.flight = None;
    }

    pub fn is_moving(&self, now: Instant) -> bool {
        self.flight
            .is_some_and(|f| now.saturating_duration_since(f.started) < f.duration)
    }

    /// Where the camera is at `now`, interpolating an in-flight move.
    pub fn current(&self, now: Instant) -> CameraView {
        let Some(flight) = self.flight else {
            return self.settled();
        };
        if flight.duration.is_zero() {
            return self.settled();
        }
        let elapsed = now.saturating_duration_since(flight.started);
        let t = (elapsed.as_secs_f64() / flight.duration.as_secs_f64()).min(1.0);
        let eased = ease_cubic_in_out(t);
        CameraView {
            center: flight.from.lerp(self.target, eased),
            zoom: flight.from_zoom + (self.zoom - flight.from_zoom) * eased,
        }
    }

    fn fly_to(&mut self, target: Point, zoom: f64, now: Instant, duration: Duration) {
        let here = self.current(now);
        self.flight = Some(Flight {
            from: here.center,
            from_zoom: here.zoom,
            started: now,
            duration,
        });
        self.target = target;
        self.zoom = zoom;
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{EdgeKind, Node, NodeKind};

    fn store() -> EntityStore {
        let nodes = vec![
            Node::new("a", "A", NodeKind::Metabolite).at(100.0, 200.0),
            Node::new("b", "B", NodeKind::Metabolite).at(300.0, 200.0),
            Node::new("c", "C", NodeKind::Metabolite),
        ];
        let edges = vec![
            Edge::new(0, "a", "b", EdgeKind::Synthesis, "ab"),
            Edge::new(1, "a", "c", EdgeKind::Synthesis, "ac"),
        ];
        EntityStore::from_parts(nodes, edges).unwrap()
    }

    #[test]
    fn recenter_targets_edge_midpoint() {
        let store = store();
        let mut camera = Camera::default();
        let now = Instant::now();
        let moved = camera.recenter_on_edge(&store, store.edge(0).unwrap(), now, DEFAULT_RECENTER);
        assert!(moved);
        assert_eq!(camera.target(), Point::new(200.0, 200.0));
        assert_eq!(
            camera.current(now + DEFAULT_RECENTER).center,
            Point::new(200.0, 200.0)
        );
    }

    #[test]
    fn recenter_skips_unplaced_endpoint() {
        let store = store();
        let mut camera = Camera::with_home(Point::new(5.0, 7.0));
        let moved = camera.recenter_on_edge(
            &store,
            store.edge(1).unwrap(),
            Instant::now(),
            DEFAULT_RECENTER,
        );
        assert!(!moved);
        assert_eq!(camera.target(), Point::new(5.0, 7.0));
    }

    #[test]
    fn flight_interpolates_from_start_to_target() {
        let mut camera = Camera::default();
        let start = Instant::now();
        camera.focus_point(Point::new(100.0, 0.0), start, Duration::from_millis(1000));
        assert_eq!(camera.current(start).center, Point::ORIGIN);
        let mid = camera.current(start + Duration::from_millis(500)).center;
        assert!((mid.x - 50.0).abs() < 1e-9, "eased midpoint should be halfway");
        assert!(camera.is_moving(start + Duration::from_millis(999)));
        assert!(!camera.is_moving(start + Duration::from_millis(1000)));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        let now = Instant::now();
        for _ in 0..40 {
            camera.zoom_in(now);
        }
        assert_eq!(camera.zoom(), MAX_ZOOM);
        for _ in 0..80 {
            camera.zoom_out(now);
        }
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.reset(now);
        assert_eq!(camera.settled(), CameraView { center: Point::ORIGIN, zoom: 1.0 });
    }

    #[test]
    fn reset_returns_home() {
        let home = Point::new(600.0, 350.0);
        let mut camera = Camera::with_home(home);
        let now = Instant::now();
        camera.focus_point(Point::new(10.0, 10.0), now, DEFAULT_RECENTER);
        camera.zoom_in(now);
        camera.reset(now);
        assert_eq!(camera.settled(), CameraView { center: home, zoom: 1.0 });
    }

    #[test]
    fn pan_cancels_flight() {
        let mut camera = Camera::default();
        let now = Instant::now();
        camera.focus_point(Point::new(10.0, 10.0), now, DEFAULT_RECENTER);
        camera.pan(5.0, -5.0);
        assert!(!camera.is_moving(now));
        assert_eq!(camera.current(now).center, Point::new(15.0, 5.0));
    }
}
