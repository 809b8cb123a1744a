// src/tracking.rs - Landmark model and hand sources feeding the gesture controller
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use crate::error::{MirrorError, Result};

// MediaPipe hand landmark indices
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const RING_MCP: usize = 13;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

pub const HAND_LANDMARK_COUNT: usize = 21;

/// Normalized `(x, y)` in `[0, 1]` relative to the camera frame, plus depth.
pub type LandmarkPoint = Vector3<f64>;

/// One detected hand for one frame. Always exactly 21 landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSnapshot {
    landmarks: [LandmarkPoint; HAND_LANDMARK_COUNT],
}

impl HandSnapshot {
    pub fn from_landmarks(points: Vec<LandmarkPoint>) -> Result<Self> {
        let found = points.len();
        let landmarks: [LandmarkPoint; HAND_LANDMARK_COUNT] =
            points.try_into().map_err(|_| MirrorError::MalformedHand {
                expected: HAND_LANDMARK_COUNT,
                found,
            })?;
        if let Some(joint) = landmarks.iter().position(|p| !p.iter().all(|c| c.is_finite())) {
            return Err(MirrorError::NonFiniteLandmark { joint });
        }
        Ok(Self { landmarks })
    }

    pub fn from_coords(coords: &[[f64; 3]]) -> Result<Self> {
        Self::from_landmarks(
            coords
                .iter()
                .map(|c| Vector3::new(c[0], c[1], c[2]))
                .collect(),
        )
    }

    pub fn to_coords(&self) -> Vec<[f64; 3]> {
        self.landmarks.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    pub fn landmark(&self, joint: usize) -> &LandmarkPoint {
        &self.landmarks[joint]
    }

    /// Landmark projected onto the image plane (depth dropped).
    pub fn planar(&self, joint: usize) -> Vector2<f64> {
        self.landmarks[joint].xy()
    }

    pub fn planar_distance(&self, a: usize, b: usize) -> f64 {
        (self.planar(a) - self.planar(b)).norm()
    }

    /// Thumb tip to pinky tip; the open-hand resize signal.
    pub fn spread(&self) -> f64 {
        self.planar_distance(THUMB_TIP, PINKY_TIP)
    }

    /// Thumb tip to index tip; the click signal.
    pub fn pinch_distance(&self) -> f64 {
        self.planar_distance(THUMB_TIP, INDEX_TIP)
    }

    /// Build a plausible hand from a wrist position and three fingertips.
    ///
    /// Each finger's four joints are spaced evenly from the wrist to its tip.
    /// Middle and ring tips are interpolated between the index and pinky tips.
    pub fn posed(
        wrist: Vector2<f64>,
        thumb_tip: Vector2<f64>,
        index_tip: Vector2<f64>,
        pinky_tip: Vector2<f64>,
    ) -> Self {
        let middle_tip = index_tip.lerp(&pinky_tip, 1.0 / 3.0);
        let ring_tip = index_tip.lerp(&pinky_tip, 2.0 / 3.0);
        let fingers = [
            (THUMB_CMC, thumb_tip),
            (INDEX_MCP, index_tip),
            (MIDDLE_MCP, middle_tip),
            (RING_MCP, ring_tip),
            (PINKY_MCP, pinky_tip),
        ];

        let mut landmarks = [Vector3::new(wrist.x, wrist.y, 0.0); HAND_LANDMARK_COUNT];
        for (base, tip) in fingers {
            for segment in 0..4 {
                let t = (segment + 1) as f64 / 4.0;
                let p = wrist.lerp(&tip, t);
                landmarks[base + segment] = Vector3::new(p.x, p.y, 0.0);
            }
        }
        Self { landmarks }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ViewportDims {
    width: f64,
    height: f64,
}

/// Screen dimensions in pixels used to project normalized landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportDims", into = "ViewportDims")]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// 1280x720, the camera resolution the mirror requests.
    pub const HD: Viewport = Viewport {
        width: 1280.0,
        height: 720.0,
    };

    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MirrorError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl TryFrom<ViewportDims> for Viewport {
    type Error = MirrorError;

    fn try_from(dims: ViewportDims) -> Result<Self> {
        Viewport::new(dims.width, dims.height)
    }
}

impl From<Viewport> for ViewportDims {
    fn from(v: Viewport) -> Self {
        Self {
            width: v.width,
            height: v.height,
        }
    }
}

/// Everything the controller sees for one tick.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub hands: Vec<HandSnapshot>,
    pub viewport: Viewport,
}

impl FrameInput {
    pub fn new(hands: Vec<HandSnapshot>, viewport: Viewport) -> Self {
        Self { hands, viewport }
    }
}

/// The vision collaborator: yields the hands detected in each frame.
pub trait HandSource {
    /// Hands for the next frame, or `None` once the source is exhausted.
    fn next_hands(&mut self) -> Option<Vec<HandSnapshot>>;

    fn name(&self) -> &str;
}

/// Length of one pass through the simulation script, in ticks.
pub const SIMULATION_CYCLE: u64 = 240;

/// Scripted stand-in for camera + landmark model so the mirror runs headless.
///
/// One cycle: an open hand sweeping its spread, a pointer drifting onto the
/// "next" hotspot and pinching, the same on "previous", two open hands at
/// once, then an empty stretch.
pub struct SimulatedHands {
    tick: u64,
    viewport: Viewport,
    hotspot_inset_px: f64,
}

impl SimulatedHands {
    pub fn new(viewport: Viewport, hotspot_inset_px: f64) -> Self {
        Self {
            tick: 0,
            viewport,
            hotspot_inset_px,
        }
    }

    /// Normalized x of a hotspot centre, inset from the mirrored edge.
    fn hotspot_x(&self, next: bool) -> f64 {
        let from_left = self.hotspot_inset_px / self.viewport.width();
        // The preview is mirrored, so "next" (screen right) is camera left.
        if next {
            from_left
        } else {
            1.0 - from_left
        }
    }

    fn frame_at(&self, t: u64) -> Vec<HandSnapshot> {
        let phase = t % SIMULATION_CYCLE;
        match phase {
            0..=59 => {
                let spread = 0.25 + 0.12 * (phase as f64 * 0.1).sin();
                vec![open_hand(Vector2::new(0.5, 0.55), spread)]
            }
            60..=119 => {
                let local = phase - 60;
                let target = Vector2::new(self.hotspot_x(true), 0.5);
                let pointer = approach(Vector2::new(0.5, 0.5), target, local as f64 / 30.0);
                vec![pointer_hand(pointer, (40..=45).contains(&local))]
            }
            120..=179 => {
                let local = phase - 120;
                let target = Vector2::new(self.hotspot_x(false), 0.5);
                let pointer = approach(Vector2::new(0.5, 0.5), target, local as f64 / 30.0);
                vec![pointer_hand(pointer, (40..=45).contains(&local))]
            }
            180..=209 => vec![
                open_hand(Vector2::new(0.3, 0.6), 0.2),
                open_hand(Vector2::new(0.7, 0.6), 0.3),
            ],
            _ => Vec::new(),
        }
    }
}

impl HandSource for SimulatedHands {
    fn next_hands(&mut self) -> Option<Vec<HandSnapshot>> {
        let hands = self.frame_at(self.tick);
        self.tick += 1;
        Some(hands)
    }

    fn name(&self) -> &str {
        "simulation"
    }
}

fn approach(from: Vector2<f64>, to: Vector2<f64>, t: f64) -> Vector2<f64> {
    from.lerp(&to, t.clamp(0.0, 1.0))
}

/// Open palm centred at `center` with the given thumb-to-pinky spread.
fn open_hand(center: Vector2<f64>, spread: f64) -> HandSnapshot {
    let half = spread / 2.0;
    HandSnapshot::posed(
        Vector2::new(center.x, center.y + 0.2),
        Vector2::new(center.x - half, center.y),
        Vector2::new(center.x - half * 0.4, center.y - 0.15),
        Vector2::new(center.x + half, center.y),
    )
}

/// Pointing hand; thumb and pinky stay close so it never triggers a resize.
fn pointer_hand(index_tip: Vector2<f64>, pinching: bool) -> HandSnapshot {
    let thumb_tip = if pinching {
        index_tip + Vector2::new(0.0, 0.02)
    } else {
        index_tip + Vector2::new(0.0, 0.08)
    };
    let pinky_tip = thumb_tip + Vector2::new(0.03, 0.0);
    HandSnapshot::posed(
        index_tip + Vector2::new(0.0, 0.25),
        thumb_tip,
        index_tip,
        pinky_tip,
    )
}

/// Plays back frames captured earlier, in order.
pub struct ReplaySource {
    name: String,
    frames: VecDeque<Vec<HandSnapshot>>,
}

impl ReplaySource {
    pub fn new(name: impl Into<String>, frames: Vec<Vec<HandSnapshot>>) -> Self {
        let name = name.into();
        debug!("replay source {} loaded with {} frames", name, frames.len());
        Self {
            name,
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl HandSource for ReplaySource {
    fn next_hands(&mut self) -> Option<Vec<HandSnapshot>> {
        self.frames.pop_front()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0).unwrap()
    }

    #[test]
    fn test_from_landmarks_rejects_short_hand() {
        let points = vec![Vector3::zeros(); 20];
        let err = HandSnapshot::from_landmarks(points).unwrap_err();
        assert!(matches!(
            err,
            MirrorError::MalformedHand { expected: 21, found: 20 }
        ));
    }

    #[test]
    fn test_from_landmarks_rejects_long_hand() {
        let points = vec![Vector3::zeros(); 22];
        assert!(HandSnapshot::from_landmarks(points).is_err());
    }

    #[test]
    fn test_coords_preserve_order() {
        let coords: Vec<[f64; 3]> = (0..21).map(|i| [i as f64 / 21.0, 0.5, -0.1]).collect();
        let hand = HandSnapshot::from_coords(&coords).unwrap();
        assert_eq!(hand.landmark(INDEX_TIP).x, 8.0 / 21.0);
        assert_eq!(hand.to_coords(), coords);
    }

    #[test]
    fn test_posed_places_tips_exactly() {
        let hand = HandSnapshot::posed(
            Vector2::new(0.5, 0.9),
            Vector2::new(0.3, 0.5),
            Vector2::new(0.45, 0.3),
            Vector2::new(0.7, 0.5),
        );
        assert_eq!(hand.planar(THUMB_TIP), Vector2::new(0.3, 0.5));
        assert_eq!(hand.planar(INDEX_TIP), Vector2::new(0.45, 0.3));
        assert_eq!(hand.planar(PINKY_TIP), Vector2::new(0.7, 0.5));
        assert_eq!(hand.planar(WRIST), Vector2::new(0.5, 0.9));
        assert!((hand.spread() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_distances_ignore_depth() {
        let mut coords = vec![[0.0, 0.0, 0.0]; 21];
        coords[THUMB_TIP] = [0.1, 0.1, 5.0];
        coords[INDEX_TIP] = [0.1, 0.13, -5.0];
        let hand = HandSnapshot::from_coords(&coords).unwrap();
        assert!((hand.pinch_distance() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_from_landmarks_rejects_non_finite() {
        let mut coords = vec![[0.5, 0.5, 0.0]; HAND_LANDMARK_COUNT];
        coords[INDEX_TIP] = [f64::NAN, 0.5, 0.0];
        assert!(matches!(
            HandSnapshot::from_coords(&coords),
            Err(MirrorError::NonFiniteLandmark { joint: INDEX_TIP })
        ));
        coords[INDEX_TIP] = [0.5, 0.5, f64::INFINITY];
        assert!(HandSnapshot::from_coords(&coords).is_err());
    }

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(0.0, 720.0).is_err());
        assert!(Viewport::new(1280.0, -1.0).is_err());
        assert!(Viewport::new(f64::NAN, 720.0).is_err());
        assert!(Viewport::new(f64::INFINITY, 720.0).is_err());
        let v = viewport();
        assert_eq!(v.width(), 1280.0);
        assert_eq!(v.height(), 720.0);
    }

    #[test]
    fn test_viewport_deserialize_validates() {
        let ok: Viewport = serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        assert_eq!(ok.width(), 640.0);
        let bad = serde_json::from_str::<Viewport>(r#"{"width": 0, "height": 480}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_simulation_cycle_shape() {
        let mut sim = SimulatedHands::new(viewport(), 80.0);
        let counts: Vec<usize> = (0..SIMULATION_CYCLE)
            .map(|_| sim.next_hands().unwrap().len())
            .collect();
        assert!(counts[..180].iter().all(|&c| c == 1));
        assert!(counts[180..210].iter().all(|&c| c == 2));
        assert!(counts[210..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_simulation_pointer_never_resizes() {
        let sim = SimulatedHands::new(viewport(), 80.0);
        for t in 60..180 {
            for hand in sim.frame_at(t) {
                assert!(hand.spread() <= 0.05, "tick {} spread {}", t, hand.spread());
            }
        }
    }

    #[test]
    fn test_replay_source_drains_in_order() {
        let a = HandSnapshot::posed(
            Vector2::new(0.5, 0.9),
            Vector2::new(0.3, 0.5),
            Vector2::new(0.4, 0.3),
            Vector2::new(0.7, 0.5),
        );
        let frames = vec![vec![a.clone()], vec![], vec![a.clone(), a]];
        let mut source = ReplaySource::new("test", frames);
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.next_hands().unwrap().len(), 1);
        assert_eq!(source.next_hands().unwrap().len(), 0);
        assert_eq!(source.next_hands().unwrap().len(), 2);
        assert!(source.next_hands().is_none());
        assert_eq!(source.name(), "test");
    }
}
