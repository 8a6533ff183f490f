//! Running input state

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;

use super::events::{DevicePayload, EventKind, NormalizedInputEvent, PointerId};
use super::keys::{Buttons, Key, Modifiers};

/// A pointer that is physically down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub buttons: Buttons,
}

/// Snapshot of everything currently held
///
/// `update` is the only writer. Recognizers read it after the event they
/// are processing has been applied.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    modifiers: Modifiers,
    /// Ordered by pointer id so pairs are picked deterministically
    active_pointers: BTreeMap<PointerId, PointerState>,
    last_position: Option<Vec2>,
}

impl InputState {
    /// Creates a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one normalized event
    pub fn update(&mut self, event: &NormalizedInputEvent) {
        if let Some(position) = event.position() {
            self.last_position = Some(position);
        }

        match &event.payload {
            DevicePayload::Keyboard { key, .. } => {
                match event.kind {
                    EventKind::Down => {
                        self.keys_down.insert(*key);
                    }
                    EventKind::Up | EventKind::Cancel => {
                        self.keys_down.remove(key);
                    }
                    EventKind::Move | EventKind::Wheel => {}
                }
                self.recompute_modifiers(event.modifiers);
            }
            DevicePayload::Mouse(_) | DevicePayload::Pointer { .. } => {
                let buttons = event.buttons();
                for (id, position) in event.changed_pointers() {
                    self.apply_pointer(event.kind, id, position, buttons);
                }
                self.recompute_modifiers(event.modifiers);
            }
            DevicePayload::Touch { .. } => {
                for (id, position) in event.changed_pointers() {
                    self.apply_pointer(event.kind, id, position, Buttons::empty());
                }
            }
            DevicePayload::Wheel { .. } => {}
        }
    }

    fn apply_pointer(&mut self, kind: EventKind, id: PointerId, position: Vec2, buttons: Buttons) {
        match kind {
            EventKind::Down => {
                self.active_pointers
                    .insert(id, PointerState { position, buttons });
            }
            EventKind::Move => {
                if let Some(pointer) = self.active_pointers.get_mut(&id) {
                    pointer.position = position;
                    pointer.buttons = buttons;
                }
            }
            EventKind::Up | EventKind::Cancel => {
                // A mouse releasing one of several held buttons stays down
                if !buttons.is_empty() && kind == EventKind::Up {
                    if let Some(pointer) = self.active_pointers.get_mut(&id) {
                        pointer.position = position;
                        pointer.buttons = buttons;
                    }
                } else {
                    self.active_pointers.remove(&id);
                }
            }
            EventKind::Wheel => {}
        }
    }

    fn recompute_modifiers(&mut self, reported: Modifiers) {
        let held = self
            .keys_down
            .iter()
            .filter_map(|key| key.modifier_flag())
            .fold(Modifiers::empty(), |acc, flag| acc | flag);
        self.modifiers = held | reported;
    }

    /// Drop every held key and pointer (focus loss)
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.active_pointers.clear();
        self.modifiers = Modifiers::empty();
    }

    /// Keys currently held
    pub fn keys_down(&self) -> &HashSet<Key> {
        &self.keys_down
    }

    /// Returns true if the key is held
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Modifiers currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Pointers currently down, ordered by id
    pub fn active_pointers(&self) -> &BTreeMap<PointerId, PointerState> {
        &self.active_pointers
    }

    /// Number of pointers currently down
    pub fn pointer_count(&self) -> usize {
        self.active_pointers.len()
    }

    /// State of one pointer
    pub fn pointer(&self, id: PointerId) -> Option<&PointerState> {
        self.active_pointers.get(&id)
    }

    /// The two lowest-id pointers when exactly two are down
    pub fn pointer_pair(&self) -> Option<[(PointerId, Vec2); 2]> {
        if self.active_pointers.len() != 2 {
            return None;
        }
        let mut iter = self
            .active_pointers
            .iter()
            .map(|(id, pointer)| (*id, pointer.position));
        Some([iter.next()?, iter.next()?])
    }

    /// Last position seen from any positioned event
    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }
}
