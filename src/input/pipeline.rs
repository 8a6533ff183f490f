//! Event dispatch through state, recognizers and shortcuts

use std::fmt;
use std::time::Duration;

use config::ConfigError;
use thiserror::Error;
use tracing::{debug, trace};

use super::clock::{Clock, Deadline};
use super::events::NormalizedInputEvent;
use super::handler::Recognizer;
use super::normalize::normalize_event;
use super::raw::{RawEvent, Surface};
use super::state::InputState;
use crate::config::EngineConfig;
use crate::gesture::{
    ClickDetector, GestureEvent, LongPressDetector, PanRecognizer, PinchRecognizer,
    RotateRecognizer, SwipeRecognizer,
};
use crate::shortcuts::{ActionEvent, InvalidBindingError, ShortcutEngine};

/// Errors building a pipeline
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid shortcut binding: {0}")]
    Binding(#[from] InvalidBindingError),
}

/// Handle for an attached recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerId(u64);

impl fmt::Display for RecognizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Slot {
    id: RecognizerId,
    recognizer: Box<dyn Recognizer>,
}

/// Owns the input state and drives every attached recognizer
///
/// Each event goes through the normalizer, then [`InputState::update`],
/// then each recognizer in attach order, then the shortcut engine.
/// Results queue up until the host drains them with
/// [`InputPipeline::take_gestures`] and [`InputPipeline::take_actions`].
pub struct InputPipeline {
    clock: Box<dyn Clock>,
    state: InputState,
    recognizers: Vec<Slot>,
    shortcuts: ShortcutEngine,
    next_id: u64,
    gestures: Vec<(RecognizerId, GestureEvent)>,
    actions: Vec<ActionEvent>,
    scratch: Vec<GestureEvent>,
}

impl InputPipeline {
    /// Creates an empty pipeline with no recognizers attached
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            state: InputState::new(),
            recognizers: Vec::new(),
            shortcuts: ShortcutEngine::default(),
            next_id: 0,
            gestures: Vec::new(),
            actions: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Creates a pipeline with every built-in recognizer attached and the
    /// configured bindings installed
    ///
    /// Recognizers are attached in the order click, long-press, pan, pinch,
    /// rotate, swipe.
    pub fn from_config(
        config: &EngineConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, EngineError> {
        let mut pipeline = Self::new(clock);
        pipeline.shortcuts = ShortcutEngine::from_config(&config.shortcuts)?;
        pipeline.attach(ClickDetector::new(config.click));
        pipeline.attach(LongPressDetector::new(config.long_press));
        pipeline.attach(PanRecognizer::new(config.pan));
        pipeline.attach(PinchRecognizer::new(config.pinch));
        pipeline.attach(RotateRecognizer::new(config.rotate));
        pipeline.attach(SwipeRecognizer::new(config.swipe));
        debug!(
            profile = %config.profile,
            recognizers = pipeline.recognizers.len(),
            bindings = pipeline.shortcuts.binding_count(),
            "input pipeline configured"
        );
        Ok(pipeline)
    }

    /// Attach a recognizer; it sees every event dispatched from now on
    pub fn attach(&mut self, recognizer: impl Recognizer + 'static) -> RecognizerId {
        let id = RecognizerId(self.next_id);
        self.next_id += 1;
        debug!(%id, name = recognizer.name(), "recognizer attached");
        self.recognizers.push(Slot {
            id,
            recognizer: Box::new(recognizer),
        });
        id
    }

    /// Detach a recognizer, forcing its session to a terminal state first
    ///
    /// Events produced by the forced transition are queued like any other.
    pub fn detach(&mut self, id: RecognizerId) -> Option<Box<dyn Recognizer>> {
        let index = self.recognizers.iter().position(|slot| slot.id == id)?;
        let mut slot = self.recognizers.remove(index);
        slot.recognizer.cancel(&mut self.scratch);
        self.flush(id);
        debug!(%id, name = slot.recognizer.name(), "recognizer detached");
        Some(slot.recognizer)
    }

    /// Normalize and dispatch a raw event
    ///
    /// Returns false when the normalizer rejected the event, in which case
    /// nothing else happened.
    pub fn dispatch(&mut self, raw: &RawEvent, surface: &dyn Surface) -> bool {
        match normalize_event(raw, surface) {
            Some(event) => {
                self.dispatch_normalized(&event);
                true
            }
            None => {
                trace!(?raw, "raw event dropped");
                false
            }
        }
    }

    /// Dispatch an already normalized event
    pub fn dispatch_normalized(&mut self, event: &NormalizedInputEvent) {
        self.state.update(event);

        for index in 0..self.recognizers.len() {
            let slot = &mut self.recognizers[index];
            slot.recognizer.handle(event, &self.state, &mut self.scratch);
            let id = slot.id;
            self.flush(id);
        }

        if let Some(action) = self.shortcuts.process(event, &self.state) {
            self.actions.push(action);
        }
    }

    /// Check every armed deadline against the clock
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for index in 0..self.recognizers.len() {
            let slot = &mut self.recognizers[index];
            slot.recognizer.poll(now, &mut self.scratch);
            let id = slot.id;
            self.flush(id);
        }
        self.shortcuts.poll(now);
    }

    /// Deliver a host timer previously read from [`InputPipeline::deadlines`]
    ///
    /// Stale deadlines are ignored by the recognizer.
    pub fn deliver_timer(&mut self, id: RecognizerId, deadline: Deadline) {
        let now = self.clock.now();
        if let Some(slot) = self.recognizers.iter_mut().find(|slot| slot.id == id) {
            slot.recognizer.on_timer(deadline, now, &mut self.scratch);
            self.flush(id);
        }
    }

    /// Armed deadlines of every recognizer
    pub fn deadlines(&self) -> Vec<(RecognizerId, Deadline)> {
        self.recognizers
            .iter()
            .filter_map(|slot| slot.recognizer.next_deadline().map(|d| (slot.id, d)))
            .collect()
    }

    /// Earliest time at which [`InputPipeline::tick`] has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        self.recognizers
            .iter()
            .filter_map(|slot| slot.recognizer.next_deadline())
            .map(|deadline| deadline.at)
            .chain(self.shortcuts.next_deadline())
            .min()
    }

    /// Focus loss: end every session, forget held keys and pointers and
    /// drop any partial shortcut sequence
    pub fn reset(&mut self) {
        debug!("input pipeline reset");
        for index in 0..self.recognizers.len() {
            let slot = &mut self.recognizers[index];
            slot.recognizer.cancel(&mut self.scratch);
            let id = slot.id;
            self.flush(id);
        }
        self.state.clear();
        self.shortcuts.reset();
    }

    /// Drain recognized gestures in the order they were produced
    pub fn take_gestures(&mut self) -> Vec<(RecognizerId, GestureEvent)> {
        std::mem::take(&mut self.gestures)
    }

    /// Drain fired shortcut actions in the order they were produced
    pub fn take_actions(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.actions)
    }

    /// Get current input state
    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn shortcuts(&self) -> &ShortcutEngine {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutEngine {
        &mut self.shortcuts
    }

    /// Current time on the pipeline's clock
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn recognizer_count(&self) -> usize {
        self.recognizers.len()
    }

    /// Names of attached recognizers in dispatch order
    pub fn recognizer_names(&self) -> Vec<(RecognizerId, String)> {
        self.recognizers
            .iter()
            .map(|slot| (slot.id, slot.recognizer.name().to_string()))
            .collect()
    }

    /// Get a mutable reference to an attached recognizer by concrete type
    pub fn recognizer_mut<R: Recognizer + 'static>(
        &mut self,
        id: RecognizerId,
    ) -> Option<&mut R> {
        self.recognizers
            .iter_mut()
            .find(|slot| slot.id == id)
            .and_then(|slot| slot.recognizer.as_any_mut().downcast_mut::<R>())
    }

    fn flush(&mut self, id: RecognizerId) {
        for gesture in self.scratch.drain(..) {
            trace!(%id, family = gesture.family(), ?gesture, "gesture");
            self.gestures.push((id, gesture));
        }
    }
}
