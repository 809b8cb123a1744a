// src/gesture.rs - Per-frame gesture interpretation: resize, hover, pinch-click
//!
//! Turns the hands detected in one frame into discrete outfit switches and a
//! smoothed avatar scale. Each tick runs, in order: cooldown decay, hover
//! reset, per-hand resize / pointer / pinch / hotspot test, scale smoothing.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{MirrorError, Result};
use crate::tracking::{FrameInput, HandSnapshot, Viewport, INDEX_TIP};

// ── Defaults ───────────────────────────────────────────────

/// Thumb-to-index distance (normalized) below which a hand is pinching.
pub const PINCH_THRESHOLD: f64 = 0.05;
/// Thumb-to-pinky spread at or below which a hand does not resize.
pub const SPREAD_DEADBAND: f64 = 0.05;
pub const SPREAD_DOMAIN: [f64; 2] = [0.15, 0.35];
pub const SCALE_RANGE: [f64; 2] = [0.8, 1.5];
pub const BUTTON_RADIUS_PX: f64 = 100.0;
/// Distance of each hotspot centre from its side of the viewport.
pub const BUTTON_INSET_PX: f64 = 80.0;
pub const HOVER_LEVEL: u32 = 15;
/// ~0.67s at 30 ticks/sec.
pub const COOLDOWN_TICKS: u32 = 20;
pub const SMOOTHING_FACTOR: f64 = 0.1;

// ── Config ─────────────────────────────────────────────────

/// Gesture thresholds. Missing keys in a config file fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub pinch_threshold: f64,
    pub spread_deadband: f64,
    /// Spread values mapped onto `scale_range`; outside values saturate.
    pub spread_domain: [f64; 2],
    pub scale_range: [f64; 2],
    pub button_radius_px: f64,
    pub button_inset_px: f64,
    pub hover_level: u32,
    pub cooldown_ticks: u32,
    /// Fraction of the remaining gap closed per tick.
    pub smoothing_factor: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: PINCH_THRESHOLD,
            spread_deadband: SPREAD_DEADBAND,
            spread_domain: SPREAD_DOMAIN,
            scale_range: SCALE_RANGE,
            button_radius_px: BUTTON_RADIUS_PX,
            button_inset_px: BUTTON_INSET_PX,
            hover_level: HOVER_LEVEL,
            cooldown_ticks: COOLDOWN_TICKS,
            smoothing_factor: SMOOTHING_FACTOR,
        }
    }
}

impl GestureConfig {
    /// Reject settings that would break the scale or hotspot guarantees.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MirrorError::InvalidConfig(msg));

        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return invalid(format!("smoothing_factor {} not in (0, 1]", self.smoothing_factor));
        }
        let [d0, d1] = self.spread_domain;
        if !(d0.is_finite() && d1.is_finite() && d0 < d1) {
            return invalid(format!("spread_domain [{}, {}] must be increasing", d0, d1));
        }
        let [r0, r1] = self.scale_range;
        if !(r0.is_finite() && r1.is_finite() && r0 > 0.0 && r0 <= r1) {
            return invalid(format!("scale_range [{}, {}] must be positive and ordered", r0, r1));
        }
        for (name, value) in [
            ("pinch_threshold", self.pinch_threshold),
            ("spread_deadband", self.spread_deadband),
            ("button_radius_px", self.button_radius_px),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{} {} must be positive", name, value));
            }
        }
        if !self.button_inset_px.is_finite() {
            return invalid(format!("button_inset_px {} must be finite", self.button_inset_px));
        }
        Ok(())
    }
}

// ── State ──────────────────────────────────────────────────

/// Uniform avatar scale; `w` and `h` always move together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale2 {
    pub w: f64,
    pub h: f64,
}

impl Scale2 {
    pub fn uniform(s: f64) -> Self {
        Self { w: s, h: s }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HoverLevel {
    pub prev: u32,
    pub next: u32,
}

/// Which way an outfit switch goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Previous, Direction::Next];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }

    fn offset(&self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Emitted when a pinch over a hotspot commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GestureEvent {
    OutfitChanged { direction: Direction, index: usize },
}

/// Everything the renderer reads after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub scale_target: Scale2,
    pub scale_current: Scale2,
    pub hover: HoverLevel,
    /// Ticks left before another click may commit. Zero means armed.
    pub cooldown_ticks: u32,
    pub selected_index: usize,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            scale_target: Scale2::uniform(1.0),
            scale_current: Scale2::uniform(1.0),
            hover: HoverLevel::default(),
            cooldown_ticks: 0,
            selected_index: 0,
        }
    }
}

impl InteractionState {
    pub fn is_armed(&self) -> bool {
        self.cooldown_ticks == 0
    }

    pub fn hover_for(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Previous => self.hover.prev,
            Direction::Next => self.hover.next,
        }
    }

    fn hover_mut(&mut self, direction: Direction) -> &mut u32 {
        match direction {
            Direction::Previous => &mut self.hover.prev,
            Direction::Next => &mut self.hover.next,
        }
    }
}

// ── Geometry ───────────────────────────────────────────────

/// Linear map of `spread` from `spread_domain` onto `scale_range`.
/// Spreads outside the domain saturate at the range bounds.
pub fn spread_to_scale(config: &GestureConfig, spread: f64) -> f64 {
    let [d0, d1] = config.spread_domain;
    let [r0, r1] = config.scale_range;
    if spread <= d0 {
        return r0;
    }
    if spread >= d1 {
        return r1;
    }
    r0 + (spread - d0) / (d1 - d0) * (r1 - r0)
}

/// Index fingertip in screen pixels, mirrored horizontally to match the preview.
pub fn project_pointer(hand: &HandSnapshot, viewport: &Viewport) -> Vector2<f64> {
    let tip = hand.planar(INDEX_TIP);
    Vector2::new((1.0 - tip.x) * viewport.width(), tip.y * viewport.height())
}

pub fn hotspot_center(
    config: &GestureConfig,
    direction: Direction,
    viewport: &Viewport,
) -> Vector2<f64> {
    let y = viewport.height() / 2.0;
    match direction {
        Direction::Previous => Vector2::new(config.button_inset_px, y),
        Direction::Next => Vector2::new(viewport.width() - config.button_inset_px, y),
    }
}

/// Strictly inside the hotspot circle. A non-finite pointer is never inside.
pub fn hotspot_contains(
    config: &GestureConfig,
    direction: Direction,
    viewport: &Viewport,
    pointer: Vector2<f64>,
) -> bool {
    (pointer - hotspot_center(config, direction, viewport)).norm() < config.button_radius_px
}

fn wrap_index(index: usize, offset: isize, count: usize) -> usize {
    (index as isize + offset).rem_euclid(count as isize) as usize
}

// ── Transition ─────────────────────────────────────────────

/// One tick of the interaction state machine.
///
/// Hands are processed in the order received. The last hand above the spread
/// deadband sets the scale target. The first committed click arms the
/// cooldown, so nothing else can commit in the same tick.
pub fn step(
    config: &GestureConfig,
    state: &InteractionState,
    frame: &FrameInput,
    outfit_count: usize,
) -> (InteractionState, Vec<GestureEvent>) {
    let mut next = *state;
    let mut events = Vec::new();

    next.cooldown_ticks = next.cooldown_ticks.saturating_sub(1);
    next.hover = HoverLevel::default();

    for (i, hand) in frame.hands.iter().enumerate() {
        let spread = hand.spread();
        if spread > config.spread_deadband {
            let s = spread_to_scale(config, spread);
            next.scale_target = Scale2::uniform(s);
            trace!("hand {} spread {:.3} -> scale target {:.3}", i, spread, s);
        }

        let pointer = project_pointer(hand, &frame.viewport);
        let pinching = hand.pinch_distance() < config.pinch_threshold;

        for direction in Direction::ALL {
            if !hotspot_contains(config, direction, &frame.viewport, pointer) {
                continue;
            }
            *next.hover_mut(direction) = config.hover_level;

            if pinching && next.is_armed() {
                next.selected_index =
                    wrap_index(next.selected_index, direction.offset(), outfit_count);
                next.cooldown_ticks = config.cooldown_ticks;
                debug!(
                    "hand {} pinched {} at ({:.0}, {:.0})",
                    i,
                    direction.as_str(),
                    pointer.x,
                    pointer.y
                );
                events.push(GestureEvent::OutfitChanged {
                    direction,
                    index: next.selected_index,
                });
            }
        }
    }

    let k = config.smoothing_factor;
    next.scale_current.w += (next.scale_target.w - next.scale_current.w) * k;
    next.scale_current.h += (next.scale_target.h - next.scale_current.h) * k;

    (next, events)
}

// ── Controller ─────────────────────────────────────────────

/// Owns the interaction state for the lifetime of the mirror.
pub struct GestureController {
    config: GestureConfig,
    state: InteractionState,
    outfit_count: usize,
    ticks: u64,
}

impl GestureController {
    pub fn new(config: GestureConfig, outfit_count: usize) -> Result<Self> {
        if outfit_count == 0 {
            return Err(MirrorError::NoOutfits);
        }
        config.validate()?;
        Ok(Self {
            config,
            state: InteractionState::default(),
            outfit_count,
            ticks: 0,
        })
    }

    /// Advance one tick and return the events it produced.
    pub fn update(&mut self, frame: &FrameInput) -> Vec<GestureEvent> {
        let (state, events) = step(&self.config, &self.state, frame, self.outfit_count);
        self.state = state;
        self.ticks += 1;

        for event in &events {
            let GestureEvent::OutfitChanged { direction, index } = event;
            info!("outfit -> {} ({}), tick {}", index, direction.as_str(), self.ticks);
        }
        trace!(
            "tick {}: hands={} scale={:.3}/{:.3} hover={}/{} cooldown={}",
            self.ticks,
            frame.hands.len(),
            self.state.scale_current.w,
            self.state.scale_target.w,
            self.state.hover.prev,
            self.state.hover.next,
            self.state.cooldown_ticks
        );
        events
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn selected_index(&self) -> usize {
        self.state.selected_index
    }

    pub fn outfit_count(&self) -> usize {
        self.outfit_count
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Back to startup defaults.
    pub fn reset(&mut self) {
        self.state = InteractionState::default();
        self.ticks = 0;
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0).unwrap()
}

/// Hand whose index tip projects to screen `(sx, sy)` on `viewport`.
#[cfg(test)]
fn hand_at_screen(
    viewport: &Viewport,
    sx: f64,
    sy: f64,
    pinching: bool,
    spread: f64,
) -> HandSnapshot {
    let index = Vector2::new(1.0 - sx / viewport.width(), sy / viewport.height());
    let thumb = if pinching {
        index + Vector2::new(0.0, 0.02)
    } else {
        index + Vector2::new(0.0, 0.1)
    };
    let pinky = thumb + Vector2::new(spread, 0.0);
    HandSnapshot::posed(index + Vector2::new(0.0, 0.3), thumb, index, pinky)
}

#[cfg(test)]
fn frame(hands: Vec<HandSnapshot>) -> FrameInput {
    FrameInput::new(hands, viewport())
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller() -> GestureController {
        GestureController::new(GestureConfig::default(), 6).unwrap()
    }

    fn pinch_next() -> FrameInput {
        let v = viewport();
        frame(vec![hand_at_screen(&v, v.width() - 80.0, v.height() / 2.0, true, 0.0)])
    }

    fn pinch_prev() -> FrameInput {
        let v = viewport();
        frame(vec![hand_at_screen(&v, 80.0, v.height() / 2.0, true, 0.0)])
    }

    fn hover_next() -> FrameInput {
        let v = viewport();
        frame(vec![hand_at_screen(&v, v.width() - 80.0, v.height() / 2.0, false, 0.0)])
    }

    fn open_hand(spread: f64) -> FrameInput {
        let v = viewport();
        frame(vec![hand_at_screen(&v, v.width() / 2.0, v.height() / 2.0, false, spread)])
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        let s = c.state();
        assert_eq!(s.scale_target, Scale2::uniform(1.0));
        assert_eq!(s.scale_current, Scale2::uniform(1.0));
        assert_eq!(s.hover, HoverLevel { prev: 0, next: 0 });
        assert_eq!(s.cooldown_ticks, 0);
        assert_eq!(s.selected_index, 0);
        assert!(c.is_armed());
    }

    #[test]
    fn test_zero_outfits_rejected() {
        assert!(matches!(
            GestureController::new(GestureConfig::default(), 0),
            Err(MirrorError::NoOutfits)
        ));
    }

    #[test]
    fn test_spread_mapping_bounds() {
        let config = GestureConfig::default();
        assert_eq!(spread_to_scale(&config, 0.15), 0.8);
        assert_eq!(spread_to_scale(&config, 0.35), 1.5);
        assert_eq!(spread_to_scale(&config, 0.06), 0.8);
        assert_eq!(spread_to_scale(&config, 0.9), 1.5);
        assert!((spread_to_scale(&config, 0.25) - 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_pointer_is_mirrored() {
        let v = viewport();
        let hand = hand_at_screen(&v, 200.0, 100.0, false, 0.0);
        let p = project_pointer(&hand, &v);
        assert!((p.x - 200.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
        assert!(hand.planar(INDEX_TIP).x > 0.8);
    }

    #[test]
    fn test_hotspot_centers() {
        let config = GestureConfig::default();
        let v = viewport();
        assert_eq!(hotspot_center(&config, Direction::Previous, &v), Vector2::new(80.0, 360.0));
        assert_eq!(hotspot_center(&config, Direction::Next, &v), Vector2::new(1200.0, 360.0));
    }

    #[test]
    fn test_pinch_next_increments_and_arms_cooldown() {
        let mut c = controller();
        let events = c.update(&pinch_next());
        assert_eq!(
            events,
            vec![GestureEvent::OutfitChanged { direction: Direction::Next, index: 1 }]
        );
        assert_eq!(c.selected_index(), 1);
        assert_eq!(c.state().cooldown_ticks, 20);
        assert_eq!(c.state().hover.next, 15);
        assert_eq!(c.state().hover.prev, 0);
        assert!(!c.is_armed());
    }

    #[test]
    fn test_pinch_prev_wraps() {
        let mut c = controller();
        let events = c.update(&pinch_prev());
        assert_eq!(c.selected_index(), 5);
        assert_eq!(c.state().cooldown_ticks, 20);
        assert_eq!(
            events,
            vec![GestureEvent::OutfitChanged { direction: Direction::Previous, index: 5 }]
        );
    }

    #[test]
    fn test_next_wraps_to_zero() {
        let mut c = GestureController::new(GestureConfig::default(), 2).unwrap();
        c.update(&pinch_next());
        for _ in 0..20 {
            c.update(&frame(vec![]));
        }
        c.update(&pinch_next());
        assert_eq!(c.selected_index(), 0);
    }

    #[test]
    fn test_sustained_pinch_is_debounced() {
        let mut c = controller();
        assert_eq!(c.update(&pinch_next()).len(), 1);
        for tick in 1..20 {
            let events = c.update(&pinch_next());
            assert!(events.is_empty(), "tick {} should be cooling, got {:?}", tick, events);
            assert_eq!(c.selected_index(), 1);
            assert_eq!(c.state().cooldown_ticks, 20 - tick);
        }
        // Twentieth decay reaches zero in the same tick, so this pinch commits.
        let events = c.update(&pinch_next());
        assert_eq!(events.len(), 1);
        assert_eq!(c.selected_index(), 2);
        assert_eq!(c.state().cooldown_ticks, 20);
    }

    #[test]
    fn test_cooldown_decays_to_armed() {
        let mut c = controller();
        c.update(&pinch_next());
        for _ in 0..20 {
            c.update(&frame(vec![]));
        }
        assert_eq!(c.state().cooldown_ticks, 0);
        assert!(c.is_armed());
        for _ in 0..5 {
            c.update(&frame(vec![]));
        }
        assert_eq!(c.state().cooldown_ticks, 0);
        assert_eq!(c.update(&pinch_prev()).len(), 1);
        assert_eq!(c.selected_index(), 0);
    }

    #[test]
    fn test_hover_without_pinch_does_not_click() {
        let mut c = controller();
        let events = c.update(&hover_next());
        assert!(events.is_empty());
        assert_eq!(c.state().hover.next, 15);
        assert_eq!(c.selected_index(), 0);
        assert!(c.is_armed());
    }

    #[test]
    fn test_hover_resets_each_tick() {
        let mut c = controller();
        c.update(&hover_next());
        assert_eq!(c.state().hover.next, 15);
        c.update(&open_hand(0.0));
        assert_eq!(c.state().hover, HoverLevel::default());
        c.update(&hover_next());
        c.update(&frame(vec![]));
        assert_eq!(c.state().hover, HoverLevel::default());
    }

    #[test]
    fn test_hotspot_edge_is_exclusive() {
        let mut c = controller();
        let v = viewport();
        let just_inside = hand_at_screen(&v, 80.0 + 99.0, 360.0, false, 0.0);
        c.update(&frame(vec![just_inside]));
        assert_eq!(c.state().hover.prev, 15);

        let outside = hand_at_screen(&v, 80.0 + 101.0, 360.0, true, 0.0);
        let events = c.update(&frame(vec![outside]));
        assert_eq!(c.state().hover.prev, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_small_spread_keeps_target() {
        let mut c = controller();
        c.update(&open_hand(0.4));
        assert_eq!(c.state().scale_target, Scale2::uniform(1.5));
        c.update(&open_hand(0.04));
        assert_eq!(c.state().scale_target, Scale2::uniform(1.5));
    }

    #[test]
    fn test_spread_just_above_deadband_clamps_low() {
        let mut c = controller();
        c.update(&open_hand(0.1));
        assert_eq!(c.state().scale_target, Scale2::uniform(0.8));
    }

    #[test]
    fn test_last_hand_wins_scale() {
        let v = viewport();
        let small = hand_at_screen(&v, 400.0, 300.0, false, 0.1);
        let large = hand_at_screen(&v, 800.0, 300.0, false, 0.4);
        let closed = hand_at_screen(&v, 600.0, 300.0, false, 0.01);

        let mut c = controller();
        c.update(&frame(vec![small.clone(), large.clone()]));
        assert_eq!(c.state().scale_target.w, 1.5);

        c.update(&frame(vec![large, small.clone()]));
        assert_eq!(c.state().scale_target.w, 0.8);

        // A closed hand after an open one does not override it.
        c.update(&frame(vec![hand_at_screen(&v, 400.0, 300.0, false, 0.4), closed]));
        assert_eq!(c.state().scale_target.w, 1.5);
    }

    #[test]
    fn test_two_hands_pinching_commit_once() {
        let v = viewport();
        let a = hand_at_screen(&v, 1200.0, 360.0, true, 0.0);
        let b = hand_at_screen(&v, 80.0, 360.0, true, 0.0);
        let mut c = controller();
        let events = c.update(&frame(vec![a, b]));
        assert_eq!(
            events,
            vec![GestureEvent::OutfitChanged { direction: Direction::Next, index: 1 }]
        );
        // Both hotspots still show hover.
        assert_eq!(c.state().hover, HoverLevel { prev: 15, next: 15 });
    }

    #[test]
    fn test_scale_converges_without_hands() {
        let mut c = controller();
        c.update(&open_hand(0.4));
        let mut last = c.state().scale_current.w;
        for _ in 0..100 {
            c.update(&frame(vec![]));
            let now = c.state().scale_current.w;
            assert!(now >= last);
            assert!(now <= 1.5);
            last = now;
        }
        assert!((1.5 - last).abs() < 1e-4);
    }

    #[test]
    fn test_scale_within_one_percent_after_45_ticks() {
        let config = GestureConfig::default();
        let mut state = InteractionState {
            scale_target: Scale2::uniform(1.5),
            ..InteractionState::default()
        };
        let empty = frame(vec![]);
        for _ in 0..45 {
            state = step(&config, &state, &empty, 6).0;
        }
        assert!((1.5 - state.scale_current.w) / 1.5 < 0.01);
        assert_eq!(state.scale_current.w, state.scale_current.h);
    }

    #[test]
    fn test_step_is_pure() {
        let config = GestureConfig::default();
        let before = InteractionState::default();
        let input = pinch_next();
        let (a, ea) = step(&config, &before, &input, 6);
        let (b, eb) = step(&config, &before, &input, 6);
        assert_eq!(a, b);
        assert_eq!(ea, eb);
        assert_eq!(before, InteractionState::default());
    }

    #[test]
    fn test_reset() {
        let mut c = controller();
        c.update(&pinch_next());
        c.update(&open_hand(0.4));
        c.reset();
        assert_eq!(*c.state(), InteractionState::default());
        assert_eq!(c.ticks(), 0);
    }

    #[test]
    fn test_partial_config_json() {
        let config: GestureConfig = serde_json::from_str(r#"{"cooldown_ticks": 5}"#).unwrap();
        assert_eq!(config.cooldown_ticks, 5);
        assert_eq!(config.pinch_threshold, PINCH_THRESHOLD);
        assert_eq!(config.spread_domain, SPREAD_DOMAIN);
    }

    #[test]
    fn test_nan_pointer_is_outside_both_hotspots() {
        let config = GestureConfig::default();
        let v = viewport();
        for pointer in [Vector2::new(f64::NAN, 360.0), Vector2::new(80.0, f64::NAN)] {
            for direction in Direction::ALL {
                assert!(!hotspot_contains(&config, direction, &v, pointer));
            }
        }
        assert!(hotspot_contains(&config, Direction::Previous, &v, Vector2::new(80.0, 360.0)));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GestureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let bad = [
            r#"{"smoothing_factor": 2.5}"#,
            r#"{"smoothing_factor": 0.0}"#,
            r#"{"spread_domain": [0.35, 0.35]}"#,
            r#"{"spread_domain": [0.35, 0.15]}"#,
            r#"{"scale_range": [1.5, 0.8]}"#,
            r#"{"scale_range": [0.0, 1.5]}"#,
            r#"{"pinch_threshold": -0.01}"#,
            r#"{"button_radius_px": 0}"#,
        ];
        for json in bad {
            let config: GestureConfig = serde_json::from_str(json).unwrap();
            assert!(
                matches!(config.validate(), Err(MirrorError::InvalidConfig(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_controller_rejects_invalid_config() {
        let config = GestureConfig {
            smoothing_factor: 1.5,
            ..GestureConfig::default()
        };
        assert!(matches!(
            GestureController::new(config, 6),
            Err(MirrorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_direction_as_str() {
        assert_eq!(Direction::Previous.as_str(), "previous");
        assert_eq!(Direction::Next.as_str(), "next");
    }

    proptest! {
        #[test]
        fn prop_mapped_scale_stays_in_range(spread in 0.0f64..2.0) {
            let s = spread_to_scale(&GestureConfig::default(), spread);
            prop_assert!((0.8..=1.5).contains(&s));
        }

        #[test]
        fn prop_deadband_spread_never_moves_target(spread in 0.0f64..0.049) {
            let mut c = controller();
            c.update(&open_hand(0.4));
            c.update(&open_hand(spread));
            prop_assert_eq!(c.state().scale_target, Scale2::uniform(1.5));
        }

        #[test]
        fn prop_hover_is_binary(
            sx in 0.0f64..1280.0,
            sy in 0.0f64..720.0,
            pinching in any::<bool>(),
        ) {
            let v = viewport();
            let mut c = controller();
            c.update(&frame(vec![hand_at_screen(&v, sx, sy, pinching, 0.0)]));
            let h = c.state().hover;
            prop_assert!(h.prev == 0 || h.prev == 15);
            prop_assert!(h.next == 0 || h.next == 15);
            prop_assert_eq!(c.state().scale_target.w, c.state().scale_target.h);
        }
    }
}
