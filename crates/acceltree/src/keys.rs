//! Key codes, modifier state, and accelerator eligibility.
//!
//! This module provides the input-side vocabulary of the crate:
//!
//! - [`Key`]: logical key codes, following web KeyboardEvent.code naming
//! - [`KeyboardModifiers`]: modifier state held during a key event
//! - [`modifiers_to_raw`] / [`modifiers_from_raw`]: reconciliation with the
//!   platform's packed modifier bitmask
//! - [`is_accelerator_key`]: whether a key may participate in an accelerator
//! - [`text_input_has_priority`]: whether plain text entry should win over
//!   accelerator resolution for this key press
//!
//! The two classifier functions are pure and advisory: the key-event pipeline
//! consults them to decide whether to run accelerator resolution at all, but
//! nothing in this module dispatches anything.

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: true,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
        meta: false,
    };

    /// Control + Alt modifiers.
    pub const CTRL_ALT: Self = Self {
        shift: false,
        control: true,
        alt: true,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

// =============================================================================
// Raw modifier bitmask
// =============================================================================

/// Control bit in the packed platform modifier mask.
pub const RAW_CONTROL: u32 = 0x1;
/// Alt/Menu bit in the packed platform modifier mask.
pub const RAW_MENU: u32 = 0x2;
/// Shift bit in the packed platform modifier mask.
pub const RAW_SHIFT: u32 = 0x4;
/// Meta/Windows bit in the packed platform modifier mask.
pub const RAW_WINDOWS: u32 = 0x8;

/// Pack modifier state into the platform's raw bitmask encoding.
///
/// The Alt branch assigns instead of or-ing, so Alt discards any Control bit
/// accumulated before it. This asymmetry matches long-shipped behavior and is
/// kept as-is; see DESIGN.md.
pub fn modifiers_to_raw(modifiers: KeyboardModifiers) -> u32 {
    let mut raw = 0;
    if modifiers.control {
        raw |= RAW_CONTROL;
    }
    if modifiers.alt {
        raw = RAW_MENU;
    }
    if modifiers.shift {
        raw |= RAW_SHIFT;
    }
    if modifiers.meta {
        raw |= RAW_WINDOWS;
    }
    raw
}

/// Unpack the platform's raw bitmask encoding into modifier state.
pub fn modifiers_from_raw(raw: u32) -> KeyboardModifiers {
    KeyboardModifiers {
        shift: raw & RAW_SHIFT != 0,
        control: raw & RAW_CONTROL != 0,
        alt: raw & RAW_MENU != 0,
        meta: raw & RAW_WINDOWS != 0,
    }
}

// =============================================================================
// Key codes
// =============================================================================

/// Keyboard key codes.
///
/// This enum represents the logical keys on a keyboard. It follows a similar
/// structure to web KeyboardEvent.code values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Numbers (main keyboard)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    F13, F14, F15, F16, F17, F18, F19, F20, F21, F22, F23, F24,

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab,

    // Whitespace
    Space,

    // Modifiers (also tracked via KeyboardModifiers, but useful as key events)
    ShiftLeft, ShiftRight,
    ControlLeft, ControlRight,
    AltLeft, AltRight,
    MetaLeft, MetaRight,

    // Punctuation and symbols (the OEM block)
    Minus, Equal,
    BracketLeft, BracketRight, Backslash,
    Semicolon, Quote,
    Comma, Period, Slash,
    Grave,

    // Control
    Escape,
    CapsLock, NumLock, ScrollLock,
    PrintScreen, Pause,

    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide,
    NumpadDecimal, NumpadEnter,

    // Unknown/unmapped key
    Unknown(u16),
}

impl Key {
    /// Check if this is a letter key.
    pub fn is_letter(&self) -> bool {
        matches!(
            self,
            Self::A
                | Self::B
                | Self::C
                | Self::D
                | Self::E
                | Self::F
                | Self::G
                | Self::H
                | Self::I
                | Self::J
                | Self::K
                | Self::L
                | Self::M
                | Self::N
                | Self::O
                | Self::P
                | Self::Q
                | Self::R
                | Self::S
                | Self::T
                | Self::U
                | Self::V
                | Self::W
                | Self::X
                | Self::Y
                | Self::Z
        )
    }

    /// Check if this is a digit key (main keyboard, not numpad).
    pub fn is_digit(&self) -> bool {
        matches!(
            self,
            Self::Digit0
                | Self::Digit1
                | Self::Digit2
                | Self::Digit3
                | Self::Digit4
                | Self::Digit5
                | Self::Digit6
                | Self::Digit7
                | Self::Digit8
                | Self::Digit9
        )
    }

    /// Check if this is a numpad key.
    pub fn is_numpad(&self) -> bool {
        matches!(
            self,
            Self::Numpad0
                | Self::Numpad1
                | Self::Numpad2
                | Self::Numpad3
                | Self::Numpad4
                | Self::Numpad5
                | Self::Numpad6
                | Self::Numpad7
                | Self::Numpad8
                | Self::Numpad9
                | Self::NumpadAdd
                | Self::NumpadSubtract
                | Self::NumpadMultiply
                | Self::NumpadDivide
                | Self::NumpadDecimal
                | Self::NumpadEnter
        )
    }

    /// Check if this is a function key (F1 through F24).
    pub fn is_function_key(&self) -> bool {
        matches!(
            self,
            Self::F1
                | Self::F2
                | Self::F3
                | Self::F4
                | Self::F5
                | Self::F6
                | Self::F7
                | Self::F8
                | Self::F9
                | Self::F10
                | Self::F11
                | Self::F12
                | Self::F13
                | Self::F14
                | Self::F15
                | Self::F16
                | Self::F17
                | Self::F18
                | Self::F19
                | Self::F20
                | Self::F21
                | Self::F22
                | Self::F23
                | Self::F24
        )
    }

    /// Check if this is one of the OEM punctuation/symbol keys.
    pub fn is_oem_symbol(&self) -> bool {
        matches!(
            self,
            Self::Minus
                | Self::Equal
                | Self::BracketLeft
                | Self::BracketRight
                | Self::Backslash
                | Self::Semicolon
                | Self::Quote
                | Self::Comma
                | Self::Period
                | Self::Slash
                | Self::Grave
        )
    }
}

// =============================================================================
// Accelerator eligibility
// =============================================================================

/// Check whether a key may participate in a keyboard accelerator.
///
/// Valid keys are letters, digits, numpad keys, function keys (F1–F24), the
/// OEM symbol block, and a fixed whitelist of navigation/editing keys. Tab is
/// only valid with Control held, so plain Tab stays available for focus
/// traversal.
pub fn is_accelerator_key(key: Key, modifiers: KeyboardModifiers) -> bool {
    if key.is_letter()
        || key.is_digit()
        || key.is_numpad()
        || key.is_function_key()
        || key.is_oem_symbol()
    {
        return true;
    }

    match key {
        Key::Enter | Key::Escape | Key::Backspace => true,
        Key::Tab => modifiers.control,
        // The Space..ArrowDown navigation block.
        Key::Space
        | Key::PageUp
        | Key::PageDown
        | Key::End
        | Key::Home
        | Key::ArrowLeft
        | Key::ArrowUp
        | Key::ArrowRight
        | Key::ArrowDown => true,
        // The PrintScreen..Delete block.
        Key::PrintScreen | Key::Insert | Key::Delete => true,
        _ => false,
    }
}

/// Check whether plain text entry should take priority over accelerator
/// resolution for this key press.
///
/// Returns `false` (the accelerator wins) when Control or Alt is held, or
/// when the key is a function key, Escape, or PrintScreen — none of which
/// produce text. Otherwise returns `true` and the caller should skip
/// accelerator resolution so the key reaches the focused text input.
///
/// This is advisory only: callers decide whether to invoke resolution based
/// on the result.
pub fn text_input_has_priority(key: Key, modifiers: KeyboardModifiers) -> bool {
    if modifiers.control || modifiers.alt {
        return false;
    }
    if key.is_function_key() {
        return false;
    }
    !matches!(key, Key::Escape | Key::PrintScreen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_key_boundaries() {
        assert!(is_accelerator_key(Key::F1, KeyboardModifiers::NONE));
        assert!(is_accelerator_key(Key::F24, KeyboardModifiers::NONE));
        // Neighbours of the function block are not eligible on their own.
        assert!(!is_accelerator_key(Key::CapsLock, KeyboardModifiers::NONE));
        assert!(!is_accelerator_key(Key::Pause, KeyboardModifiers::NONE));
    }

    #[test]
    fn test_tab_requires_control() {
        assert!(!is_accelerator_key(Key::Tab, KeyboardModifiers::NONE));
        assert!(!is_accelerator_key(Key::Tab, KeyboardModifiers::SHIFT));
        assert!(is_accelerator_key(Key::Tab, KeyboardModifiers::CTRL));
        assert!(is_accelerator_key(Key::Tab, KeyboardModifiers::CTRL_SHIFT));
    }

    #[test]
    fn test_navigation_and_editing_whitelist() {
        for key in [
            Key::Enter,
            Key::Escape,
            Key::Backspace,
            Key::Space,
            Key::PageUp,
            Key::PageDown,
            Key::End,
            Key::Home,
            Key::ArrowLeft,
            Key::ArrowUp,
            Key::ArrowRight,
            Key::ArrowDown,
            Key::PrintScreen,
            Key::Insert,
            Key::Delete,
        ] {
            assert!(is_accelerator_key(key, KeyboardModifiers::NONE), "{key:?}");
        }
        assert!(!is_accelerator_key(Key::ShiftLeft, KeyboardModifiers::NONE));
        assert!(!is_accelerator_key(Key::Unknown(0), KeyboardModifiers::NONE));
    }

    #[test]
    fn test_oem_and_numpad_keys_are_eligible() {
        assert!(is_accelerator_key(Key::Semicolon, KeyboardModifiers::NONE));
        assert!(is_accelerator_key(Key::Grave, KeyboardModifiers::NONE));
        assert!(is_accelerator_key(Key::Numpad0, KeyboardModifiers::NONE));
        assert!(is_accelerator_key(Key::NumpadEnter, KeyboardModifiers::NONE));
    }

    #[test]
    fn test_text_input_priority() {
        // Ctrl or Alt held: the accelerator wins, whatever the key.
        assert!(!text_input_has_priority(Key::A, KeyboardModifiers::CTRL));
        assert!(!text_input_has_priority(Key::A, KeyboardModifiers::ALT));
        assert!(!text_input_has_priority(Key::Space, KeyboardModifiers::CTRL_ALT));
        // Non-text keys never reach the text input.
        assert!(!text_input_has_priority(Key::Escape, KeyboardModifiers::NONE));
        assert!(!text_input_has_priority(Key::F5, KeyboardModifiers::NONE));
        assert!(!text_input_has_priority(Key::PrintScreen, KeyboardModifiers::NONE));
        // Plain printable keys go to the text input.
        assert!(text_input_has_priority(Key::A, KeyboardModifiers::NONE));
        assert!(text_input_has_priority(Key::A, KeyboardModifiers::SHIFT));
        assert!(text_input_has_priority(Key::Space, KeyboardModifiers::NONE));
    }

    #[test]
    fn test_raw_mask_round_trip() {
        let mods = KeyboardModifiers::CTRL_SHIFT;
        assert_eq!(modifiers_from_raw(modifiers_to_raw(mods)), mods);

        let mods = KeyboardModifiers::META;
        assert_eq!(modifiers_from_raw(modifiers_to_raw(mods)), mods);
    }

    #[test]
    fn test_raw_round_trip_drops_ctrl_under_alt() {
        // The Alt branch assigns instead of or-ing, so Ctrl+Alt packs to a
        // mask without the Control bit.
        let raw = modifiers_to_raw(KeyboardModifiers::CTRL_ALT);
        assert_eq!(raw & RAW_CONTROL, 0);
        assert_eq!(modifiers_from_raw(raw), KeyboardModifiers::ALT);

        // Shift and Meta still accumulate after Alt.
        let raw = modifiers_to_raw(KeyboardModifiers {
            shift: true,
            control: false,
            alt: true,
            meta: true,
        });
        assert_eq!(raw, RAW_MENU | RAW_SHIFT | RAW_WINDOWS);
    }
}
