//! Key, modifier and mouse-button vocabulary

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifiers
    ///
    /// Declaration order is the canonical order used everywhere a chord is
    /// printed or compared: Ctrl, Alt, Shift, Meta.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Human-readable labels in canonical order
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::CTRL, "Ctrl"),
            (Self::ALT, "Alt"),
            (Self::SHIFT, "Shift"),
            (Self::META, "Meta"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, label)| label)
    }

    /// Parse a single modifier token ("ctrl", "Cmd", ...)
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" | "option" | "opt" => Some(Self::ALT),
            "shift" => Some(Self::SHIFT),
            "meta" | "cmd" | "command" | "super" | "win" | "windows" | "os" => Some(Self::META),
            _ => None,
        }
    }
}

bitflags! {
    /// Set of pressed mouse/pen buttons
    ///
    /// Bit values follow the DOM `buttons` bitmask so a raw mask can be
    /// decoded with `from_bits_truncate`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        const LEFT = 1;
        const RIGHT = 2;
        const MIDDLE = 4;
        const BACK = 8;
        const FORWARD = 16;
    }
}

impl Buttons {
    /// Pressed buttons in canonical (bit) order
    pub fn iter_buttons(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL
            .into_iter()
            .filter(move |button| self.contains(button.flag()))
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    /// All buttons in canonical order
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    /// Decode the DOM `button` index of the button that changed state
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            3 => Some(Self::Back),
            4 => Some(Self::Forward),
            _ => None,
        }
    }

    /// DOM `button` index, the inverse of [`MouseButton::from_index`]
    pub fn index(self) -> i16 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
            Self::Back => 3,
            Self::Forward => 4,
        }
    }

    /// Bit for this button inside a [`Buttons`] set
    pub fn flag(self) -> Buttons {
        match self {
            Self::Left => Buttons::LEFT,
            Self::Right => Buttons::RIGHT,
            Self::Middle => Buttons::MIDDLE,
            Self::Back => Buttons::BACK,
            Self::Forward => Buttons::FORWARD,
        }
    }

    /// Parse a mouse chord token ("LeftClick", "MouseRight", "MMB", ...)
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "leftclick" | "click" | "mouseleft" | "lmb" => Some(Self::Left),
            "rightclick" | "mouseright" | "rmb" => Some(Self::Right),
            "middleclick" | "mousemiddle" | "mmb" => Some(Self::Middle),
            "backclick" | "mouseback" | "mouse4" => Some(Self::Back),
            "forwardclick" | "mouseforward" | "mouse5" => Some(Self::Forward),
            _ => None,
        }
    }

    /// Token used when printing a mouse chord
    pub fn chord_label(self) -> &'static str {
        match self {
            Self::Left => "LeftClick",
            Self::Right => "RightClick",
            Self::Middle => "MiddleClick",
            Self::Back => "BackClick",
            Self::Forward => "ForwardClick",
        }
    }
}

/// Physical/logical key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Editing and navigation
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    // Punctuation
    Minus,
    Equal,
    Comma,
    Period,
    Slash,
    Backslash,
    Semicolon,
    Quote,
    BracketLeft,
    BracketRight,
    Backquote,

    // Modifier keys
    Control,
    Alt,
    Shift,
    Meta,
    CapsLock,

    /// A key the host reported but this vocabulary has no name for
    Unidentified,
}

const LETTERS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

const DIGITS: [Key; 10] = [
    Key::Num0,
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

const FUNCTION_KEYS: [Key; 12] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
];

impl Key {
    /// Resolve a key name
    ///
    /// Accepts logical key values ("a", "ArrowLeft", " ", "Control"),
    /// physical codes ("KeyA", "Digit1", "ShiftLeft") and the short names
    /// used in shortcut strings ("Esc", "Del", "Up"). Letters are
    /// case-insensitive. Returns `None` for names outside the vocabulary.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.clone().next()) {
            return Self::from_char(ch);
        }

        let lower = name.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("key")
            && rest.len() == 1
        {
            return rest.chars().next().and_then(Self::from_char);
        }
        if let Some(rest) = lower.strip_prefix("digit")
            && rest.len() == 1
        {
            return rest.chars().next().and_then(Self::from_char);
        }
        if let Some(rest) = lower.strip_prefix('f')
            && let Ok(n) = rest.parse::<usize>()
            && (1..=12).contains(&n)
        {
            return Some(FUNCTION_KEYS[n - 1]);
        }

        let key = match lower.as_str() {
            "arrowleft" | "left" => Self::Left,
            "arrowright" | "right" => Self::Right,
            "arrowup" | "up" => Self::Up,
            "arrowdown" | "down" => Self::Down,
            "space" | "spacebar" => Self::Space,
            "enter" | "return" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "backspace" => Self::Backspace,
            "tab" => Self::Tab,
            "delete" | "del" => Self::Delete,
            "insert" | "ins" => Self::Insert,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" | "pgup" => Self::PageUp,
            "pagedown" | "pgdn" => Self::PageDown,
            "minus" => Self::Minus,
            "equal" | "equals" => Self::Equal,
            "comma" => Self::Comma,
            "period" => Self::Period,
            "slash" => Self::Slash,
            "backslash" => Self::Backslash,
            "semicolon" => Self::Semicolon,
            "quote" => Self::Quote,
            "bracketleft" => Self::BracketLeft,
            "bracketright" => Self::BracketRight,
            "backquote" => Self::Backquote,
            "control" | "ctrl" | "controlleft" | "controlright" => Self::Control,
            "alt" | "altleft" | "altright" | "altgraph" | "option" => Self::Alt,
            "shift" | "shiftleft" | "shiftright" => Self::Shift,
            "meta" | "metaleft" | "metaright" | "os" | "super" | "superleft" | "superright"
            | "cmd" | "command" => Self::Meta,
            "capslock" => Self::CapsLock,
            _ => return None,
        };
        Some(key)
    }

    fn from_char(ch: char) -> Option<Self> {
        if ch.is_ascii_alphabetic() {
            let index = (ch.to_ascii_uppercase() as u8 - b'A') as usize;
            return Some(LETTERS[index]);
        }
        if let Some(digit) = ch.to_digit(10) {
            return Some(DIGITS[digit as usize]);
        }
        let key = match ch {
            ' ' => Self::Space,
            '-' => Self::Minus,
            '=' => Self::Equal,
            ',' => Self::Comma,
            '.' => Self::Period,
            '/' => Self::Slash,
            '\\' => Self::Backslash,
            ';' => Self::Semicolon,
            '\'' => Self::Quote,
            '[' => Self::BracketLeft,
            ']' => Self::BracketRight,
            '`' => Self::Backquote,
            _ => return None,
        };
        Some(key)
    }

    /// Modifier bit carried by this key, if it is a modifier key
    pub fn modifier_flag(self) -> Option<Modifiers> {
        match self {
            Self::Control => Some(Modifiers::CTRL),
            Self::Alt => Some(Modifiers::ALT),
            Self::Shift => Some(Modifiers::SHIFT),
            Self::Meta => Some(Modifiers::META),
            _ => None,
        }
    }

    /// True for Ctrl, Alt, Shift and Meta
    pub fn is_modifier(self) -> bool {
        self.modifier_flag().is_some()
    }

    /// Canonical display name
    pub fn name(self) -> &'static str {
        if let Some(index) = LETTERS.iter().position(|k| *k == self) {
            const NAMES: [&str; 26] = [
                "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P",
                "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
            ];
            return NAMES[index];
        }
        if let Some(index) = DIGITS.iter().position(|k| *k == self) {
            const NAMES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
            return NAMES[index];
        }
        if let Some(index) = FUNCTION_KEYS.iter().position(|k| *k == self) {
            const NAMES: [&str; 12] = [
                "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
            ];
            return NAMES[index];
        }
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Space => "Space",
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Backspace => "Backspace",
            Self::Tab => "Tab",
            Self::Delete => "Delete",
            Self::Insert => "Insert",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Minus => "Minus",
            Self::Equal => "Equal",
            Self::Comma => "Comma",
            Self::Period => "Period",
            Self::Slash => "Slash",
            Self::Backslash => "Backslash",
            Self::Semicolon => "Semicolon",
            Self::Quote => "Quote",
            Self::BracketLeft => "BracketLeft",
            Self::BracketRight => "BracketRight",
            Self::Backquote => "Backquote",
            Self::Control => "Ctrl",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Meta => "Meta",
            Self::CapsLock => "CapsLock",
            _ => "Unidentified",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert from winit key code
impl From<winit::keyboard::KeyCode> for Key {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as WK;
        match key {
            WK::Space => Self::Space,
            WK::Enter | WK::NumpadEnter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,
            WK::Delete => Self::Delete,
            WK::Insert => Self::Insert,
            WK::Home => Self::Home,
            WK::End => Self::End,
            WK::PageUp => Self::PageUp,
            WK::PageDown => Self::PageDown,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            WK::Minus => Self::Minus,
            WK::Equal => Self::Equal,
            WK::Comma => Self::Comma,
            WK::Period => Self::Period,
            WK::Slash => Self::Slash,
            WK::Backslash => Self::Backslash,
            WK::Semicolon => Self::Semicolon,
            WK::Quote => Self::Quote,
            WK::BracketLeft => Self::BracketLeft,
            WK::BracketRight => Self::BracketRight,
            WK::Backquote => Self::Backquote,

            WK::ControlLeft | WK::ControlRight => Self::Control,
            WK::AltLeft | WK::AltRight => Self::Alt,
            WK::ShiftLeft | WK::ShiftRight => Self::Shift,
            WK::SuperLeft | WK::SuperRight => Self::Meta,
            WK::CapsLock => Self::CapsLock,

            _ => Self::Unidentified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_logical_and_physical_names() {
        assert_eq!(Key::from_name("a"), Some(Key::A));
        assert_eq!(Key::from_name("A"), Some(Key::A));
        assert_eq!(Key::from_name("KeyA"), Some(Key::A));
        assert_eq!(Key::from_name("Digit7"), Some(Key::Num7));
        assert_eq!(Key::from_name("7"), Some(Key::Num7));
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("F12"), Some(Key::F12));
        assert_eq!(Key::from_name("F13"), None);
        assert_eq!(Key::from_name("ShiftRight"), Some(Key::Shift));
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("Dead"), None);
    }

    #[test]
    fn test_modifier_keys() {
        assert!(Key::Control.is_modifier());
        assert!(Key::Meta.is_modifier());
        assert!(!Key::CapsLock.is_modifier());
        assert!(!Key::K.is_modifier());
        assert_eq!(Key::Shift.modifier_flag(), Some(Modifiers::SHIFT));
    }

    #[test]
    fn test_modifier_labels_are_canonically_ordered() {
        let mods = Modifiers::META | Modifiers::SHIFT | Modifiers::CTRL;
        let labels: Vec<_> = mods.labels().collect();
        assert_eq!(labels, vec!["Ctrl", "Shift", "Meta"]);
    }

    #[test]
    fn test_buttons_iterate_in_bit_order() {
        let buttons = Buttons::from_bits_truncate(0b10110);
        let list: Vec<_> = buttons.iter_buttons().collect();
        assert_eq!(
            list,
            vec![MouseButton::Right, MouseButton::Middle, MouseButton::Forward]
        );
    }

    #[test]
    fn test_button_index_decoding() {
        assert_eq!(MouseButton::from_index(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_index(1), Some(MouseButton::Middle));
        assert_eq!(MouseButton::from_index(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_index(-1), None);
    }

    #[test]
    fn test_winit_key_conversion() {
        use winit::keyboard::KeyCode as WK;
        assert_eq!(Key::from(WK::KeyK), Key::K);
        assert_eq!(Key::from(WK::ControlRight), Key::Control);
        assert_eq!(Key::from(WK::ArrowUp), Key::Up);
        assert_eq!(Key::from(WK::NumLock), Key::Unidentified);
    }
}
