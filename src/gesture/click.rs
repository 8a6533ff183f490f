//! Single/double/triple/N-click detection
//!
//! Every down is evaluated against the run's anchor, the first down of the
//! run, rather than the immediately preceding down. A run therefore spans at
//! most `timeout` from its first press no matter how quickly the following
//! presses arrive, and never drifts away from where it started.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::GestureEvent;
use crate::input::{EventKind, InputState, MouseButton, NormalizedInputEvent, Recognizer};

/// Click detector tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    /// Max milliseconds between the run's first down and a later down
    pub timeout_ms: u64,
    /// Max distance in pixels from the run's first down
    pub radius: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 300,
            radius: 5.0,
        }
    }
}

impl ClickConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Click notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickEvent {
    Click { position: Vec2 },
    DoubleClick { position: Vec2 },
    TripleClick { position: Vec2 },
    NClick { count: u32, position: Vec2 },
}

impl ClickEvent {
    fn for_count(count: u32, position: Vec2) -> Self {
        match count {
            1 => Self::Click { position },
            2 => Self::DoubleClick { position },
            3 => Self::TripleClick { position },
            count => Self::NClick { count, position },
        }
    }

    /// Position in the run
    pub fn count(&self) -> u32 {
        match self {
            Self::Click { .. } => 1,
            Self::DoubleClick { .. } => 2,
            Self::TripleClick { .. } => 3,
            Self::NClick { count, .. } => *count,
        }
    }

    /// Where the down happened
    pub fn position(&self) -> Vec2 {
        match self {
            Self::Click { position }
            | Self::DoubleClick { position }
            | Self::TripleClick { position }
            | Self::NClick { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClickRun {
    anchor: Vec2,
    anchor_time: Duration,
    button: Option<MouseButton>,
    count: u32,
}

/// Counts consecutive downs that stay within `timeout` and `radius` of the
/// run's first down
#[derive(Debug, Clone)]
pub struct ClickDetector {
    config: ClickConfig,
    run: Option<ClickRun>,
}

impl ClickDetector {
    pub fn new(config: ClickConfig) -> Self {
        Self { config, run: None }
    }

    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Count of the live run, 0 when no run exists
    pub fn count(&self) -> u32 {
        self.run.map_or(0, |run| run.count)
    }

    /// Forget the current run
    pub fn reset(&mut self) {
        self.run = None;
    }

    /// Register one down and return the click it completes
    pub fn register_down(
        &mut self,
        position: Vec2,
        timestamp: Duration,
        button: Option<MouseButton>,
    ) -> ClickEvent {
        let continues = self.run.is_some_and(|run| {
            run.button == button
                && timestamp.saturating_sub(run.anchor_time) <= self.config.timeout()
                && position.distance(run.anchor) <= self.config.radius
        });

        let count = if continues && let Some(run) = self.run.as_mut() {
            run.count += 1;
            run.count
        } else {
            self.run = Some(ClickRun {
                anchor: position,
                anchor_time: timestamp,
                button,
                count: 1,
            });
            1
        };

        trace!(count, ?position, "click registered");
        ClickEvent::for_count(count, position)
    }
}

impl Default for ClickDetector {
    fn default() -> Self {
        Self::new(ClickConfig::default())
    }
}

impl Recognizer for ClickDetector {
    fn name(&self) -> &str {
        "click"
    }

    fn handle(
        &mut self,
        event: &NormalizedInputEvent,
        _state: &InputState,
        out: &mut Vec<GestureEvent>,
    ) {
        if event.kind != EventKind::Down || !event.is_pointer() {
            return;
        }
        if let Some(position) = event.position() {
            let click = self.register_down(position, event.timestamp, event.button());
            out.push(GestureEvent::Click(click));
        }
    }

    fn cancel(&mut self, _out: &mut Vec<GestureEvent>) {
        self.reset();
    }

    fn is_active(&self) -> bool {
        self.run.is_some()
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
