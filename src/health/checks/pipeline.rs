//! End-to-end replay of synthetic input through a configured pipeline

use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec2;

use crate::config::EngineConfig;
use crate::gesture::{
    ClickEvent, GestureEvent, LongPressEvent, PanEvent, PinchEvent, RotateEvent, SwipeAxis,
    SwipeDirection,
};
use crate::health::check::{CheckResult, CheckStatus, Finding, SystemCheck};
use crate::input::{
    EngineError, InputPipeline, ManualClock, Modifiers, RawEvent, RawKeyEvent, RawKeyPhase,
    RawMouseEvent, RawPhase, RawTouch, RawTouchEvent, Rect,
};
use crate::shortcuts::{ActionEvent, Chord, ShortcutBinding, Trigger};

const STEP_MS: u64 = 10;
const ROTATE_STEP_DEG: f32 = 5.0;
const ROTATE_LIMIT_DEG: f32 = 720.0;

const MODIFIER_KEYS: [(Modifiers, &str); 4] = [
    (Modifiers::CTRL, "Control"),
    (Modifiers::ALT, "Alt"),
    (Modifiers::SHIFT, "Shift"),
    (Modifiers::META, "Meta"),
];

/// Drives a pipeline with scripted events on a manual clock
struct Replay {
    pipeline: InputPipeline,
    clock: ManualClock,
    surface: Rect,
    touches: BTreeMap<i64, Vec2>,
    held: Modifiers,
}

impl Replay {
    fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let clock = ManualClock::new();
        let pipeline = InputPipeline::from_config(config, clock.clone())?;
        Ok(Self {
            pipeline,
            clock,
            surface: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            touches: BTreeMap::new(),
            held: Modifiers::empty(),
        })
    }

    fn advance(&mut self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.pipeline.tick();
    }

    fn send(&mut self, raw: RawEvent) {
        self.pipeline.dispatch(&raw, &self.surface);
    }

    fn mouse(&mut self, phase: RawPhase, position: Vec2, button: i16, buttons: u16) {
        let raw = RawEvent::Mouse(RawMouseEvent {
            phase,
            client: position,
            button,
            buttons,
            modifiers: self.held,
            timestamp: self.pipeline.now(),
        });
        self.send(raw);
    }

    fn left(&mut self, phase: RawPhase, position: Vec2) {
        let buttons = if phase == RawPhase::Up { 0 } else { 1 };
        self.mouse(phase, position, 0, buttons);
    }

    fn touch(&mut self, phase: RawPhase, id: i64, position: Vec2) {
        match phase {
            RawPhase::Up | RawPhase::Cancel => {
                self.touches.remove(&id);
            }
            RawPhase::Down | RawPhase::Move => {
                self.touches.insert(id, position);
            }
        }
        let raw = RawEvent::Touch(RawTouchEvent {
            phase,
            changed: vec![RawTouch {
                identifier: id,
                client: position,
            }],
            touches: self
                .touches
                .iter()
                .map(|(&identifier, &client)| RawTouch { identifier, client })
                .collect(),
            modifiers: self.held,
            timestamp: self.pipeline.now(),
        });
        self.send(raw);
    }

    fn key(&mut self, phase: RawKeyPhase, name: &str) {
        let raw = RawEvent::Key(RawKeyEvent {
            phase,
            key: name.to_string(),
            repeat: false,
            modifiers: self.held,
            timestamp: self.pipeline.now(),
        });
        self.send(raw);
    }

    /// Hold the chord's modifiers, press and release its trigger, let go
    fn press_chord(&mut self, chord: &Chord) {
        for (flag, name) in MODIFIER_KEYS {
            if chord.modifiers.contains(flag) {
                self.held |= flag;
                self.key(RawKeyPhase::Down, name);
                self.advance(STEP_MS);
            }
        }
        match chord.trigger {
            Trigger::Key(key) => {
                self.key(RawKeyPhase::Down, key.name());
                self.advance(STEP_MS);
                self.key(RawKeyPhase::Up, key.name());
            }
            Trigger::Mouse(button) => {
                let at = Vec2::splat(500.0);
                let flag = button.flag().bits();
                self.mouse(RawPhase::Down, at, button.index(), flag);
                self.advance(STEP_MS);
                self.mouse(RawPhase::Up, at, button.index(), 0);
            }
        }
        self.advance(STEP_MS);
        for (flag, name) in MODIFIER_KEYS.into_iter().rev() {
            if chord.modifiers.contains(flag) {
                self.held.remove(flag);
                self.key(RawKeyPhase::Up, name);
                self.advance(STEP_MS);
            }
        }
    }

    fn gestures(&mut self) -> Vec<GestureEvent> {
        self.pipeline
            .take_gestures()
            .into_iter()
            .map(|(_, gesture)| gesture)
            .collect()
    }

    fn actions(&mut self) -> Vec<ActionEvent> {
        self.pipeline.take_actions()
    }

    /// Forget everything and move far enough ahead that nothing carries over
    fn settle(&mut self) {
        self.pipeline.reset();
        self.touches.clear();
        self.held = Modifiers::empty();
        self.advance(10_000);
        self.pipeline.take_gestures();
        self.pipeline.take_actions();
    }
}

type Scenario = fn(&mut Replay, &EngineConfig) -> Result<String, String>;

fn double_click(replay: &mut Replay, config: &EngineConfig) -> Result<String, String> {
    let at = Vec2::new(300.0, 300.0);
    let gap = config.click.timeout_ms / 4;
    replay.left(RawPhase::Down, at);
    replay.left(RawPhase::Up, at);
    replay.advance(gap);
    replay.left(RawPhase::Down, at);
    replay.left(RawPhase::Up, at);

    let double = replay.gestures().into_iter().any(|g| {
        matches!(g, GestureEvent::Click(ClickEvent::DoubleClick { .. }))
    });
    if double {
        Ok(format!("double click with a {gap}ms gap"))
    } else {
        Err(format!("two clicks {gap}ms apart did not double click"))
    }
}

fn long_press(replay: &mut Replay, config: &EngineConfig) -> Result<String, String> {
    let at = Vec2::new(500.0, 500.0);
    replay.left(RawPhase::Down, at);
    replay.advance(config.long_press.duration_ms);
    let fired = replay.gestures().into_iter().any(|g| {
        matches!(g, GestureEvent::LongPress(LongPressEvent::LongPress { .. }))
    });
    replay.left(RawPhase::Up, at);

    if fired {
        Ok(format!("long press after {}ms", config.long_press.duration_ms))
    } else {
        Err(format!(
            "holding still for {}ms did not long press",
            config.long_press.duration_ms
        ))
    }
}

fn pan(replay: &mut Replay, config: &EngineConfig) -> Result<String, String> {
    let from = Vec2::new(200.0, 200.0);
    let to = from + Vec2::new(config.pan.threshold * 2.0 + 1.0, 0.0);
    replay.left(RawPhase::Down, from);
    replay.advance(STEP_MS);
    replay.left(RawPhase::Move, to);
    replay.advance(STEP_MS);
    replay.left(RawPhase::Up, to);

    let gestures = replay.gestures();
    let started = gestures
        .iter()
        .any(|g| matches!(g, GestureEvent::Pan(PanEvent::Start { .. })));
    let ended = gestures
        .iter()
        .any(|g| matches!(g, GestureEvent::Pan(PanEvent::End { .. })));
    if started && ended {
        Ok(format!("pan over {:.0}px", from.distance(to)))
    } else {
        Err(format!("a {:.0}px drag did not pan", from.distance(to)))
    }
}

fn swipe(replay: &mut Replay, config: &EngineConfig) -> Result<String, String> {
    let distance = config.swipe.min_distance.max(1.0) * 2.0;
    let velocity = config.swipe.min_velocity.max(1.0) * 2.0;
    let elapsed = ((distance / velocity * 1000.0) as u64).max(1);
    let (offset, expected) = match config.swipe.direction {
        SwipeAxis::Vertical => (Vec2::new(0.0, distance), SwipeDirection::Down),
        SwipeAxis::Horizontal | SwipeAxis::Both => {
            (Vec2::new(distance, 0.0), SwipeDirection::Right)
        }
    };

    let from = Vec2::new(100.0, 100.0);
    replay.left(RawPhase::Down, from);
    replay.advance(elapsed);
    replay.left(RawPhase::Up, from + offset);

    let swiped = replay.gestures().into_iter().find_map(|g| match g {
        GestureEvent::Swipe(event) => Some(event),
        _ => None,
    });
    match swiped {
        Some(event) if event.direction == expected => Ok(format!(
            "swipe {} at {:.0}px/s",
            event.direction, event.velocity
        )),
        Some(event) => Err(format!(
            "swipe reported {} instead of {expected}",
            event.direction
        )),
        None => Err(format!("a {distance:.0}px stroke in {elapsed}ms did not swipe")),
    }
}

fn pinch(replay: &mut Replay, config: &EngineConfig) -> Result<String, String> {
    let spread = config.pinch.min_distance.max(10.0) * 2.0;
    let anchor = Vec2::new(400.0, 500.0);
    replay.touch(RawPhase::Down, 10, anchor);
    replay.advance(STEP_MS);
    replay.touch(RawPhase::Down, 11, anchor + Vec2::new(spread, 0.0));
    replay.advance(STEP_MS);
    replay.touch(RawPhase::Move, 11, anchor + Vec2::new(spread * 2.0, 0.0));
    replay.advance(STEP_MS);
    replay.touch(RawPhase::Up, 11, anchor + Vec2::new(spread * 2.0, 0.0));
    replay.touch(RawPhase::Up, 10, anchor);

    let scale = replay.gestures().into_iter().find_map(|g| match g {
        GestureEvent::Pinch(PinchEvent::Update { scale }) => Some(scale),
        _ => None,
    });
    match scale {
        Some(scale) => Ok(format!("pinch to {scale:.2}x")),
        None => Err(format!("spreading two touches {spread:.0}px apart did not pinch")),
    }
}

fn rotate(replay: &mut Replay, config: &EngineConfig) -> Result<String, String> {
    let target = (config.rotate.min_angle * 2.0 + 10.0).min(ROTATE_LIMIT_DEG);
    let pivot = Vec2::new(500.0, 500.0);
    let radius = 200.0;
    let orbit = |degrees: f32| pivot + Vec2::from_angle(degrees.to_radians()) * radius;

    replay.touch(RawPhase::Down, 10, pivot);
    replay.touch(RawPhase::Down, 11, orbit(0.0));
    let mut angle = 0.0;
    while angle < target {
        angle += ROTATE_STEP_DEG;
        replay.advance(STEP_MS);
        replay.touch(RawPhase::Move, 11, orbit(angle));
    }
    replay.touch(RawPhase::Up, 11, orbit(angle));
    replay.touch(RawPhase::Up, 10, pivot);

    let total = replay.gestures().into_iter().find_map(|g| match g {
        GestureEvent::Rotate(RotateEvent::End { total }) => Some(total),
        _ => None,
    });
    match total {
        Some(total) => Ok(format!("rotate by {total:.0}°")),
        None => Err(format!("turning two touches by {angle:.0}° did not rotate")),
    }
}

const SCENARIOS: [(&str, Scenario); 6] = [
    ("click", double_click),
    ("long-press", long_press),
    ("pan", pan),
    ("swipe", swipe),
    ("pinch", pinch),
    ("rotate", rotate),
];

/// Type every chord of `binding` and report whether its action fired
fn replay_binding(replay: &mut Replay, binding: &ShortcutBinding) -> Finding {
    replay.pipeline.shortcuts_mut().set_context(&binding.context);
    for chord in binding.pattern.steps() {
        replay.press_chord(chord);
    }

    let label = format!("'{}' ({})", binding.action_id, binding.context);
    let actions = replay.actions();
    if actions.iter().any(|a| a.action_id == binding.action_id) {
        Finding::pass(format!("{label}: `{}` fires", binding.pattern))
    } else if let Some(other) = actions.first() {
        Finding::warn(format!(
            "{label}: `{}` fired '{}' instead",
            binding.pattern, other.action_id
        ))
    } else {
        Finding::warn(format!("{label}: `{}` fired nothing", binding.pattern))
    }
}

/// Replays scripted gestures and every binding through a live pipeline
pub struct PipelineCheck {
    config: EngineConfig,
}

impl PipelineCheck {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl SystemCheck for PipelineCheck {
    fn name(&self) -> &'static str {
        "Input Pipeline"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Replays synthetic gestures and shortcuts through the configured pipeline")
    }

    fn check(&self) -> CheckResult {
        let mut replay = match Replay::new(&self.config) {
            Ok(replay) => replay,
            Err(e) => return CheckResult::fail(format!("Pipeline could not be built: {e}")),
        };

        let mut findings = Vec::new();
        let mut recognized = 0;
        for (name, scenario) in SCENARIOS {
            match scenario(&mut replay, &self.config) {
                Ok(detail) => {
                    recognized += 1;
                    findings.push(Finding::pass(format!("{name}: {detail}")));
                }
                Err(reason) => findings.push(Finding::warn(format!("{name}: {reason}"))),
            }
            replay.settle();
        }

        let bindings: Vec<ShortcutBinding> =
            replay.pipeline.shortcuts().all_bindings().cloned().collect();
        let mut fired = 0;
        for binding in &bindings {
            let finding = replay_binding(&mut replay, binding);
            if finding.status == CheckStatus::Pass {
                fired += 1;
            }
            findings.push(finding);
            replay.settle();
        }

        CheckResult::new(
            format!(
                "{}/{} gestures, {}/{} shortcuts",
                recognized,
                SCENARIOS.len(),
                fired,
                bindings.len()
            ),
            findings,
        )
    }
}
