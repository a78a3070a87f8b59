//! Composition controller: a pure reducer over diagram state.
//!
//! Every input the rendering surface forwards is an [`Event`]; [`apply`]
//! folds one event into the state and never fails. Invalid input is
//! ignored or clamped so the state is always renderable.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::classifier::{classify_composition, TextureClass};
use crate::composition::{Axis, Composition, LockState};
use crate::config::DiagramConfig;
use crate::error::TextureError;
use crate::geometry::{self, ScreenPoint};
use crate::regions;
use crate::scene::{build_scene, Scene};
use crate::solver;

// ── Events ────────────────────────────────────────────────────────────────────

/// Raw input from the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Starts a drag and moves the point.
    PointerDown { x: f64, y: f64 },
    /// Moves the point while a drag is active.
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Slider position in percent, 0–100.
    Slider { axis: Axis, value: f64 },
    /// Keystroke in a numeric field; staged only.
    Input { axis: Axis, text: String },
    /// Numeric field committed (blur / enter).
    Commit { axis: Axis },
    ToggleLock { axis: Axis },
    /// Legend click.
    SelectClass { class: TextureClass },
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Everything the controller owns for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramState {
    pub composition: Composition,
    pub locks: LockState,
    pub dragging: bool,
    /// Numeric field contents, indexed by [`Axis::index`].
    pub inputs: [String; 3],
    pub center: ScreenPoint,
    pub size: f64,
}

impl DiagramState {
    pub fn new(config: &DiagramConfig) -> Self {
        Self {
            composition: config.initial,
            locks: LockState::default(),
            dragging: false,
            inputs: config.initial.display_strings(),
            center: config.center,
            size: config.size,
        }
    }

    pub fn class(&self) -> TextureClass {
        classify_composition(self.composition)
    }

    pub fn input(&self, axis: Axis) -> &str {
        &self.inputs[axis.index()]
    }

    /// A slider can move unless its axis is locked or fully determined by
    /// two locks elsewhere.
    pub fn slider_enabled(&self, axis: Axis) -> bool {
        !self.locks.is_locked(axis) && self.locks.determined_axis() != Some(axis)
    }

    fn commit(&mut self, composition: Composition) {
        trace!("commit {composition}");
        self.composition = composition;
        self.inputs = composition.display_strings();
    }
}

// ── Reducer ───────────────────────────────────────────────────────────────────

/// Fold one event into the state.
pub fn apply(event: Event, mut state: DiagramState) -> DiagramState {
    match event {
        Event::PointerDown { x, y } => {
            state.dragging = true;
            pointer(state, x, y)
        }
        Event::PointerMove { x, y } => {
            if state.dragging {
                pointer(state, x, y)
            } else {
                state
            }
        }
        Event::PointerUp | Event::PointerLeave => {
            state.dragging = false;
            state
        }
        Event::Slider { axis, value } => slide(state, axis, value),
        Event::Input { axis, text } => {
            state.inputs[axis.index()] = text;
            state
        }
        Event::Commit { axis } => {
            let percent = state.input(axis)
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0);
            let mut state = slide(state, axis, percent);
            state.inputs[axis.index()] = state.composition.percent(axis).to_string();
            state
        }
        Event::ToggleLock { axis } => {
            if !state.locks.toggle(axis) {
                debug!("lock on {axis} refused: two axes already locked");
                return state;
            }
            if state.locks.determined_axis().is_some() {
                let solved = solver::solve(state.composition, state.locks);
                state.commit(solved);
            }
            state
        }
        Event::SelectClass { class } => {
            state.commit(regions::centroid_of(class));
            state
        }
    }
}

fn pointer(mut state: DiagramState, x: f64, y: f64) -> DiagramState {
    let raw = geometry::inverse(ScreenPoint::new(x, y), state.center, state.size);
    if !raw.is_finite() || raw.has_negative() {
        debug!("pointer ({x:.1}, {y:.1}) outside the triangle, ignored");
        return state;
    }
    match solver::apply_locks(raw.clamped(), state.composition, state.locks) {
        Some(next) => state.commit(next),
        None => debug!("pointer ({x:.1}, {y:.1}) has no freedom under current locks, ignored"),
    }
    state
}

fn slide(mut state: DiagramState, axis: Axis, percent: f64) -> DiagramState {
    let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    match solver::redistribute(state.composition, axis, percent / 100.0, state.locks) {
        Some(next) => state.commit(next),
        None => debug!("{axis} slider refused under current locks"),
    }
    state
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Owns the session state and hands out render snapshots.
#[derive(Debug, Clone)]
pub struct Controller {
    config: DiagramConfig,
    state: DiagramState,
}

impl Controller {
    pub fn new(config: DiagramConfig) -> Result<Self, TextureError> {
        config.validate()?;
        let state = DiagramState::new(&config);
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn composition(&self) -> Composition {
        self.state.composition
    }

    pub fn class(&self) -> TextureClass {
        self.state.class()
    }

    /// Apply one event. Returns true when the composition changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let before = self.state.composition;
        self.state = apply(event, self.state.clone());
        self.state.composition != before
    }

    pub fn replay<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.dispatch(event);
        }
    }

    /// Back to the configured initial composition with no locks.
    pub fn reset(&mut self) {
        self.state = DiagramState::new(&self.config);
    }

    pub fn scene(&self) -> Scene {
        build_scene(&self.config, &self.state)
    }
}

impl Default for Controller {
    fn default() -> Self {
        let config = DiagramConfig::default();
        let state = DiagramState::new(&config);
        Self { config, state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::TOLERANCE;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn controller_at(clay: f64, silt: f64, sand: f64) -> Controller {
        let config = DiagramConfig {
            initial: Composition::new(clay, silt, sand),
            ..DiagramConfig::default()
        };
        Controller::new(config).unwrap()
    }

    fn screen_of(ctl: &Controller, c: Composition) -> ScreenPoint {
        ctl.config().triangle().forward(c)
    }

    fn assert_invariants(state: &DiagramState) {
        let c = state.composition;
        assert_abs_diff_eq!(c.sum(), 1.0, epsilon = TOLERANCE);
        assert!(!c.has_negative(), "{c} has a negative component");
        assert!(state.locks.count() <= 2);
        if let Some(free) = state.locks.determined_axis() {
            let locked: f64 = state.locks.locked_axes().map(|a| c.get(a)).sum();
            assert_abs_diff_eq!(c.get(free), (1.0 - locked).max(0.0), epsilon = TOLERANCE);
        }
    }

    #[test]
    fn new_state_mirrors_initial_composition() {
        let ctl = controller_at(0.30, 0.40, 0.30);
        assert_eq!(ctl.state().inputs, ["30", "40", "30"]);
        assert_eq!(ctl.class(), TextureClass::ClayLoam);
        assert!(!ctl.state().dragging);
    }

    #[test]
    fn drag_moves_point_and_release_clears_flag() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        let target = Composition::new(0.10, 0.20, 0.70);
        let p = screen_of(&ctl, target);

        assert!(ctl.dispatch(Event::PointerDown { x: p.x, y: p.y }));
        assert!(ctl.state().dragging);
        assert_abs_diff_eq!(ctl.composition().clay, 0.10, epsilon = 1e-9);
        assert_abs_diff_eq!(ctl.composition().sand, 0.70, epsilon = 1e-9);
        assert_eq!(ctl.state().inputs, ["10", "20", "70"]);

        ctl.dispatch(Event::PointerUp);
        assert!(!ctl.state().dragging);

        // Moves after release are ignored.
        let q = screen_of(&ctl, Composition::new(0.5, 0.25, 0.25));
        assert!(!ctl.dispatch(Event::PointerMove { x: q.x, y: q.y }));
    }

    #[test]
    fn pointer_leave_ends_an_abandoned_drag() {
        let mut ctl = Controller::default();
        let p = screen_of(&ctl, Composition::new(0.2, 0.3, 0.5));
        ctl.dispatch(Event::PointerDown { x: p.x, y: p.y });
        ctl.dispatch(Event::PointerLeave);
        assert!(!ctl.state().dragging);
    }

    #[test]
    fn pointer_outside_triangle_is_ignored() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        let top = ctl.config().triangle().top;
        let changed = ctl.dispatch(Event::PointerDown { x: top.x, y: top.y - 40.0 });
        assert!(!changed);
        assert_eq!(ctl.composition(), Composition::new(0.30, 0.40, 0.30));
        // The drag still started; re-entering the triangle moves the point.
        let inside = screen_of(&ctl, Composition::new(0.5, 0.25, 0.25));
        assert!(ctl.dispatch(Event::PointerMove { x: inside.x, y: inside.y }));
    }

    #[test]
    fn drag_with_one_lock_keeps_locked_axis() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::ToggleLock { axis: Axis::Clay });

        let p = screen_of(&ctl, Composition::new(0.60, 0.10, 0.30));
        ctl.dispatch(Event::PointerDown { x: p.x, y: p.y });
        let c = ctl.composition();
        assert_abs_diff_eq!(c.clay, 0.30, epsilon = 1e-12);
        assert_abs_diff_eq!(c.silt, 0.70 * 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(c.sand, 0.70 * 0.75, epsilon = 1e-9);
        assert_invariants(ctl.state());
    }

    #[test]
    fn drag_with_two_locks_is_ignored() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::ToggleLock { axis: Axis::Clay });
        ctl.dispatch(Event::ToggleLock { axis: Axis::Sand });
        let p = screen_of(&ctl, Composition::new(0.1, 0.1, 0.8));
        assert!(!ctl.dispatch(Event::PointerDown { x: p.x, y: p.y }));
    }

    #[test]
    fn slider_on_locked_axis_is_refused() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::ToggleLock { axis: Axis::Clay });
        ctl.dispatch(Event::ToggleLock { axis: Axis::Silt });

        let before = ctl.composition();
        assert!(!ctl.dispatch(Event::Slider { axis: Axis::Sand, value: 60.0 }));
        assert!(!ctl.dispatch(Event::Slider { axis: Axis::Clay, value: 10.0 }));
        assert_eq!(ctl.composition(), before);
        assert!(!ctl.state().slider_enabled(Axis::Sand));
        assert!(!ctl.state().slider_enabled(Axis::Clay));
    }

    #[test]
    fn slider_without_locks_keeps_ratio() {
        let mut ctl = controller_at(0.20, 0.20, 0.60);
        ctl.dispatch(Event::Slider { axis: Axis::Clay, value: 60.0 });
        let c = ctl.composition();
        assert_abs_diff_eq!(c.silt, 0.10, epsilon = 1e-9);
        assert_abs_diff_eq!(c.sand, 0.30, epsilon = 1e-9);
        assert_eq!(ctl.state().inputs, ["60", "10", "30"]);
    }

    #[test]
    fn input_is_staged_until_commit() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        let changed = ctl.dispatch(Event::Input { axis: Axis::Clay, text: "50".into() });
        assert!(!changed);
        assert_eq!(ctl.state().input(Axis::Clay), "50");
        assert_eq!(ctl.composition().clay, 0.30);

        assert!(ctl.dispatch(Event::Commit { axis: Axis::Clay }));
        assert_abs_diff_eq!(ctl.composition().clay, 0.50, epsilon = 1e-12);
        assert_eq!(ctl.state().input(Axis::Clay), "50");
    }

    #[test]
    fn commit_treats_garbage_as_zero_and_clamps() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::Input { axis: Axis::Silt, text: "abc".into() });
        ctl.dispatch(Event::Commit { axis: Axis::Silt });
        assert_eq!(ctl.composition().silt, 0.0);
        assert_eq!(ctl.state().input(Axis::Silt), "0");

        ctl.dispatch(Event::Input { axis: Axis::Sand, text: " 150 ".into() });
        ctl.dispatch(Event::Commit { axis: Axis::Sand });
        assert_abs_diff_eq!(ctl.composition().sand, 1.0, epsilon = 1e-12);
        assert_eq!(ctl.state().input(Axis::Sand), "100");

        ctl.dispatch(Event::Input { axis: Axis::Clay, text: "NaN".into() });
        ctl.dispatch(Event::Commit { axis: Axis::Clay });
        assert_eq!(ctl.composition().clay, 0.0);
        assert_invariants(ctl.state());
    }

    #[test]
    fn commit_on_locked_axis_restores_display() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::ToggleLock { axis: Axis::Clay });
        ctl.dispatch(Event::Input { axis: Axis::Clay, text: "80".into() });
        assert!(!ctl.dispatch(Event::Commit { axis: Axis::Clay }));
        assert_eq!(ctl.state().input(Axis::Clay), "30");
    }

    #[test]
    fn third_lock_is_refused_and_two_locks_solve_free_axis() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::ToggleLock { axis: Axis::Clay });
        ctl.dispatch(Event::ToggleLock { axis: Axis::Sand });
        assert_eq!(ctl.state().locks.count(), 2);
        assert_abs_diff_eq!(ctl.composition().silt, 0.40, epsilon = 1e-12);

        ctl.dispatch(Event::ToggleLock { axis: Axis::Silt });
        assert!(!ctl.state().locks.is_locked(Axis::Silt));
        assert_eq!(ctl.state().locks.count(), 2);
        assert_invariants(ctl.state());
    }

    #[test]
    fn legend_jump_ignores_locks() {
        let mut ctl = controller_at(0.30, 0.40, 0.30);
        ctl.dispatch(Event::ToggleLock { axis: Axis::Clay });
        ctl.dispatch(Event::ToggleLock { axis: Axis::Silt });

        ctl.dispatch(Event::SelectClass { class: TextureClass::Sand });
        let expected = regions::centroid_of(TextureClass::Sand);
        assert_eq!(ctl.composition(), expected);
        assert_eq!(ctl.class(), TextureClass::Sand);
        // Locks survive the jump.
        assert_eq!(ctl.state().locks.count(), 2);
        assert_invariants(ctl.state());
    }

    #[test]
    fn events_replay_from_json() {
        let log = r#"[
            { "type": "toggle_lock", "axis": "clay" },
            { "type": "slider", "axis": "sand", "value": 50 },
            { "type": "input", "axis": "silt", "text": "10" },
            { "type": "commit", "axis": "silt" },
            { "type": "select_class", "class": "Silt Loam" }
        ]"#;
        let events: Vec<Event> = serde_json::from_str(log).unwrap();
        assert_eq!(events.len(), 5);

        let mut ctl = controller_at(0.30, 0.40, 0.30);
        let mut state = ctl.state().clone();
        for event in events.iter().take(4).cloned() {
            state = apply(event, state);
        }
        assert_abs_diff_eq!(state.composition.clay, 0.30, epsilon = 1e-12);
        assert_abs_diff_eq!(state.composition.silt, 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(state.composition.sand, 0.60, epsilon = 1e-12);

        ctl.replay(events);
        assert_eq!(ctl.class(), TextureClass::SiltLoam);
    }

    #[test]
    fn random_event_streams_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut ctl = Controller::default();
        let tri = ctl.config().triangle();
        for _ in 0..3000 {
            let axis = Axis::ALL[rng.gen_range(0..3)];
            let event = match rng.gen_range(0..8) {
                0 => {
                    let p = ScreenPoint::new(
                        rng.gen_range(tri.bottom_left.x - 30.0..tri.bottom_right.x + 30.0),
                        rng.gen_range(tri.top.y - 30.0..tri.bottom_left.y + 30.0),
                    );
                    Event::PointerDown { x: p.x, y: p.y }
                }
                1 => Event::PointerUp,
                2 => Event::Slider { axis, value: rng.gen_range(0.0..=100.0_f64).round() },
                3 => Event::Input { axis, text: format!("{}", rng.gen_range(-20..140)) },
                4 => Event::Commit { axis },
                5 | 6 => Event::ToggleLock { axis },
                _ => Event::SelectClass { class: TextureClass::ALL[rng.gen_range(0..12)] },
            };
            ctl.dispatch(event);
            assert_invariants(ctl.state());
        }
    }
}
