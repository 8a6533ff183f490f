//! Fast single-pointer flick recognition, judged at release

use std::fmt;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::GestureEvent;
use crate::input::{EventKind, InputState, NormalizedInputEvent, PointerId, Recognizer};

/// Elapsed time floor so a same-timestamp release cannot divide by zero
const MIN_ELAPSED: Duration = Duration::from_millis(1);

/// Which axes a swipe may be reported along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAxis {
    Horizontal,
    Vertical,
    #[default]
    Both,
}

impl SwipeAxis {
    fn allows(self, direction: SwipeDirection) -> bool {
        match self {
            SwipeAxis::Both => true,
            SwipeAxis::Horizontal => direction.is_horizontal(),
            SwipeAxis::Vertical => !direction.is_horizontal(),
        }
    }
}

/// Swipe tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Average speed over the whole stroke, pixels per second
    pub min_velocity: f32,
    /// Net displacement in pixels
    pub min_distance: f32,
    pub direction: SwipeAxis,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_velocity: 300.0,
            min_distance: 50.0,
            direction: SwipeAxis::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Dominant axis of a displacement; ties go to the horizontal axis
    pub fn from_delta(delta: Vec2) -> Self {
        if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            }
        } else if delta.y < 0.0 {
            SwipeDirection::Up
        } else {
            SwipeDirection::Down
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, SwipeDirection::Left | SwipeDirection::Right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeEvent {
    pub direction: SwipeDirection,
    pub distance: f32,
    /// Pixels per second
    pub velocity: f32,
}

#[derive(Debug, Clone, Copy)]
struct SwipeCandidate {
    pointer: PointerId,
    origin: Vec2,
    start_time: Duration,
}

/// Emits at most one swipe per release of a lone pointer
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    config: SwipeConfig,
    candidate: Option<SwipeCandidate>,
}

impl SwipeRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            candidate: None,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    fn on_down(&mut self, event: &NormalizedInputEvent, state: &InputState) {
        if self.candidate.take().is_some() {
            debug!("swipe abandoned by additional pointer");
            return;
        }
        // Only a stroke that begins with a single pointer can become a swipe
        if state.pointer_count() > 1 {
            return;
        }
        if let (Some(pointer), Some(origin)) = (event.pointer_id(), event.position()) {
            self.candidate = Some(SwipeCandidate {
                pointer,
                origin,
                start_time: event.timestamp,
            });
        }
    }

    fn on_up(&mut self, event: &NormalizedInputEvent, out: &mut Vec<GestureEvent>) {
        let Some(candidate) = self.candidate else {
            return;
        };
        let Some(position) = event.position_of(candidate.pointer) else {
            return;
        };
        self.candidate = None;

        let delta = position - candidate.origin;
        let distance = delta.length();
        let elapsed = event
            .timestamp
            .saturating_sub(candidate.start_time)
            .max(MIN_ELAPSED);
        let velocity = distance / elapsed.as_secs_f32();
        let direction = SwipeDirection::from_delta(delta);

        trace!(distance, velocity, %direction, "swipe candidate released");
        if distance < self.config.min_distance
            || velocity < self.config.min_velocity
            || !self.config.direction.allows(direction)
        {
            return;
        }

        debug!(%direction, distance, velocity, "swipe recognized");
        out.push(GestureEvent::Swipe(SwipeEvent {
            direction,
            distance,
            velocity,
        }));
    }
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(SwipeConfig::default())
    }
}

impl Recognizer for SwipeRecognizer {
    fn name(&self) -> &str {
        "swipe"
    }

    fn handle(
        &mut self,
        event: &NormalizedInputEvent,
        state: &InputState,
        out: &mut Vec<GestureEvent>,
    ) {
        if !event.is_pointer() {
            return;
        }
        match event.kind {
            EventKind::Down => self.on_down(event, state),
            EventKind::Up => self.on_up(event, out),
            EventKind::Cancel => {
                if let Some(candidate) = self.candidate
                    && event.involves_pointer(candidate.pointer)
                {
                    self.candidate = None;
                }
            }
            EventKind::Move | EventKind::Wheel => {}
        }
    }

    fn cancel(&mut self, _out: &mut Vec<GestureEvent>) {
        self.candidate = None;
    }

    fn is_active(&self) -> bool {
        self.candidate.is_some()
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DevicePayload, Modifiers, TouchPoint};

    struct Harness {
        state: InputState,
        swipe: SwipeRecognizer,
        out: Vec<GestureEvent>,
    }

    impl Harness {
        fn new(config: SwipeConfig) -> Self {
            Self {
                state: InputState::new(),
                swipe: SwipeRecognizer::new(config),
                out: Vec::new(),
            }
        }

        fn touch(&mut self, kind: EventKind, id: i64, x: f32, y: f32, ms: u64) {
            let point = TouchPoint {
                id: PointerId(id),
                position: Vec2::new(x, y),
            };
            let event = NormalizedInputEvent {
                kind,
                timestamp: Duration::from_millis(ms),
                modifiers: Modifiers::empty(),
                payload: DevicePayload::Touch {
                    changed: vec![point],
                    touches: vec![point],
                },
            };
            self.state.update(&event);
            self.swipe.handle(&event, &self.state, &mut self.out);
        }

        fn swipes(&mut self) -> Vec<SwipeEvent> {
            self.out
                .drain(..)
                .map(|e| match e {
                    GestureEvent::Swipe(s) => s,
                    other => panic!("unexpected {other:?}"),
                })
                .collect()
        }
    }

    #[test]
    fn test_fast_stroke_is_a_swipe() {
        let mut h = Harness::new(SwipeConfig::default());
        h.touch(EventKind::Down, 1, 0.0, 0.0, 0);
        h.touch(EventKind::Move, 1, 60.0, 5.0, 50);
        h.touch(EventKind::Up, 1, 100.0, 10.0, 100);

        let swipes = h.swipes();
        assert_eq!(swipes.len(), 1);
        assert_eq!(swipes[0].direction, SwipeDirection::Right);
        assert!((swipes[0].velocity - 1004.99).abs() < 0.1);
    }

    #[test]
    fn test_slow_or_short_strokes_are_ignored() {
        let mut h = Harness::new(SwipeConfig::default());
        h.touch(EventKind::Down, 1, 0.0, 0.0, 0);
        h.touch(EventKind::Up, 1, 0.0, -100.0, 1000);
        assert!(h.swipes().is_empty());

        h.touch(EventKind::Down, 1, 0.0, 0.0, 2000);
        h.touch(EventKind::Up, 1, 0.0, -30.0, 2010);
        assert!(h.swipes().is_empty());
    }

    #[test]
    fn test_direction_by_dominant_axis() {
        assert_eq!(SwipeDirection::from_delta(Vec2::new(-10.0, 3.0)), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_delta(Vec2::new(2.0, -9.0)), SwipeDirection::Up);
        assert_eq!(SwipeDirection::from_delta(Vec2::new(2.0, 9.0)), SwipeDirection::Down);
    }

    #[test]
    fn test_axis_filter_rejects_other_axis() {
        let mut h = Harness::new(SwipeConfig {
            direction: SwipeAxis::Horizontal,
            ..SwipeConfig::default()
        });
        h.touch(EventKind::Down, 1, 0.0, 0.0, 0);
        h.touch(EventKind::Up, 1, 10.0, 200.0, 100);
        assert!(h.swipes().is_empty());
    }

    #[test]
    fn test_same_timestamp_release_does_not_divide_by_zero() {
        let mut h = Harness::new(SwipeConfig::default());
        h.touch(EventKind::Down, 1, 0.0, 0.0, 5);
        h.touch(EventKind::Up, 1, 0.0, 80.0, 5);
        let swipes = h.swipes();
        assert_eq!(swipes.len(), 1);
        assert!(swipes[0].velocity.is_finite());
    }

    #[test]
    fn test_second_pointer_abandons_candidate() {
        let mut h = Harness::new(SwipeConfig::default());
        h.touch(EventKind::Down, 1, 0.0, 0.0, 0);
        h.touch(EventKind::Down, 2, 50.0, 50.0, 10);
        h.touch(EventKind::Up, 2, 300.0, 50.0, 50);
        h.touch(EventKind::Up, 1, 300.0, 0.0, 60);
        assert!(h.swipes().is_empty());
        assert!(!h.swipe.is_active());
    }

    #[test]
    fn test_platform_cancel_drops_candidate() {
        let mut h = Harness::new(SwipeConfig::default());
        h.touch(EventKind::Down, 1, 0.0, 0.0, 0);
        h.touch(EventKind::Cancel, 1, 200.0, 0.0, 50);
        h.touch(EventKind::Up, 1, 200.0, 0.0, 60);
        assert!(h.swipes().is_empty());
    }
}
