use bitflags::bitflags;

/// Sentinel returned as `unicode` when a keysym has no Unicode
/// representation (function keys, navigation keys, bare modifiers, ...).
pub const INVALID_UNICODE: u32 = 0xffff_ffff;

bitflags! {
    /// Active modifier mask, X-keyboard-style. Bit positions are an
    /// implementation detail; `MOD3`/`MOD5` are reserved, always-zero
    /// placeholders kept for parity with richer backends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        /// Either Shift key is held.
        const SHIFT   = 1 << 0;
        /// Caps Lock is toggled on.
        const LOCK    = 1 << 1;
        /// Either Control key is held.
        const CONTROL = 1 << 2;
        /// Either Alt key is held.
        const MOD1    = 1 << 3;
        /// Num Lock is toggled on.
        const MOD2    = 1 << 4;
        /// Reserved, never set by the dumb backend.
        const MOD3    = 1 << 5;
        /// Either Meta/Super key is held.
        const MOD4    = 1 << 6;
        /// Reserved, never set by the dumb backend.
        const MOD5    = 1 << 7;
    }
}

/// Physical state of a key event, as delivered by the kernel's `EV_KEY`
/// event value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// The key was released.
    Release,
    /// The key was pressed.
    Press,
    /// The kernel reported an autorepeat of an already-held key.
    Repeat,
}

impl KeyState {
    /// Translate a raw kernel `EV_KEY` value (0, 1, 2). Any other value
    /// is not produced by the kernel for `EV_KEY` and is treated as
    /// `Repeat` defensively.
    pub fn from_raw(value: i32) -> KeyState {
        match value {
            0 => KeyState::Release,
            1 => KeyState::Press,
            _ => KeyState::Repeat,
        }
    }
}

/// A translated keystroke, delivered to every registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Raw kernel keycode (`KEY_*` from `linux/input.h`).
    pub keycode: u16,
    /// X-style keysym identifier for the key under the active modifiers.
    pub keysym: u32,
    /// Unicode code point, or [`INVALID_UNICODE`] if the keysym has none.
    pub unicode: u32,
    /// Modifiers active at the time of this keystroke.
    pub mods: Modifiers,
}
