//! The "dumb" keymap engine: a fixed, non-configurable US PC layout that
//! maps kernel keycodes straight to X-style keysyms. Real layout/variant/
//! options handling is a job for a richer backend sharing this same
//! contract; this one ignores them.

pub(crate) mod tables;

use crate::error::NoEvent;
use crate::event::{InputEvent, KeyState, Modifiers, INVALID_UNICODE};
use crate::keysym::keysym_to_ucs4;
use tables::{key, ModifierKind, KEYTAB_SIZE};

pub use tables::KEY_MIN_INTERESTING;

/// A keymap description. In the dumb backend this carries no state of
/// its own: layout/variant/options are accepted (for parity with richer
/// backends behind the same constructor) and then discarded.
#[derive(Debug)]
pub struct KbdDesc {
    normal: [u32; KEYTAB_SIZE],
    numlock: [u32; KEYTAB_SIZE],
    shift: [u32; KEYTAB_SIZE],
    capslock: [u32; KEYTAB_SIZE],
    modmap: [Option<tables::ModifierEntry>; KEYTAB_SIZE],
}

impl KbdDesc {
    /// Builds the fixed lookup tables. `layout`, `variant`, and
    /// `options` are accepted but ignored by this backend.
    pub fn new(layout: &str, variant: &str, options: &str) -> KbdDesc {
        tracing::debug!(layout, variant, options, "new keyboard description");
        KbdDesc {
            normal: tables::keytab_normal(),
            numlock: tables::keytab_numlock(),
            shift: tables::keytab_shift(),
            capslock: tables::keytab_capslock(),
            modmap: tables::modmap(),
        }
    }
}

/// Per-device keymap state: just the currently active modifier mask.
#[derive(Debug, Clone)]
pub struct KbdDev {
    mods: Modifiers,
}

impl KbdDev {
    /// Creates a fresh state with no modifiers active.
    pub fn new(_desc: &KbdDesc) -> KbdDev {
        KbdDev {
            mods: Modifiers::empty(),
        }
    }

    /// Currently active modifier mask.
    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    /// Re-synchronises lock-modifier state from kernel LED bits
    /// (`EVIOCGLED`). Non-lock modifiers are always cleared: there is no
    /// way to read a key's physical state out of band, so waking a
    /// device always starts with no `Shift`/`Control`/`Alt`/`Meta` held.
    pub fn reset(&mut self, ledbits: &[libc::c_ulong]) {
        use crate::bitset::bit_is_set;
        use crate::sys::{LED_CAPSL, LED_NUML};

        self.mods = Modifiers::empty();
        if bit_is_set(ledbits, LED_NUML as usize) {
            self.mods |= Modifiers::MOD2;
        }
        if bit_is_set(ledbits, LED_CAPSL as usize) {
            self.mods |= Modifiers::LOCK;
        }
    }

    /// Feeds one `(key_state, code)` pair through the layered lookup.
    ///
    /// Returns [`NoEvent`] for modifier keys (they only update `mods`),
    /// pure releases of non-modifier keys, and unmapped keycodes.
    pub fn process_key(
        &mut self,
        desc: &KbdDesc,
        key_state: KeyState,
        code: u16,
    ) -> Result<InputEvent, NoEvent> {
        if code as usize >= KEYTAB_SIZE {
            return Err(NoEvent);
        }

        if let Some(entry) = desc.modmap[code as usize] {
            match (entry.kind, key_state) {
                (ModifierKind::Normal, KeyState::Press) => self.mods |= entry.mask,
                (ModifierKind::Normal, KeyState::Release) => self.mods.remove(entry.mask),
                (ModifierKind::Lock, KeyState::Press) => self.mods.toggle(entry.mask),
                _ => {}
            }
            // Modifiers never surface as events on their own.
            return Err(NoEvent);
        }

        if key_state == KeyState::Release {
            return Err(NoEvent);
        }

        let mut keysym = 0;
        if keysym == 0 && self.mods.contains(Modifiers::MOD2) {
            keysym = desc.numlock[code as usize];
        }
        if keysym == 0 && self.mods.contains(Modifiers::SHIFT) {
            keysym = desc.shift[code as usize];
        }
        if keysym == 0 && self.mods.contains(Modifiers::LOCK) {
            keysym = desc.capslock[code as usize];
        }
        if keysym == 0 {
            keysym = desc.normal[code as usize];
        }

        if keysym == 0 {
            return Err(NoEvent);
        }

        let unicode = keysym_to_ucs4(keysym);
        Ok(InputEvent {
            keycode: code,
            keysym,
            unicode: if unicode == 0 { INVALID_UNICODE } else { unicode },
            mods: self.mods,
        })
    }
}

/// A human-readable rendering of a keysym, for debug logging only.
pub fn keysym_to_string(keysym: u32) -> String {
    format!("{:#x}", keysym)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc() -> KbdDesc {
        KbdDesc::new("us", "", "")
    }

    #[test]
    fn plain_letter_produces_lowercase() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        let ev = kbd
            .process_key(&desc, KeyState::Press, key::A)
            .expect("letter should produce an event");
        assert_eq!(ev.keysym, crate::keysym::XK_a);
        assert_eq!(ev.unicode, 'a' as u32);
        assert!(ev.mods.is_empty());
    }

    #[test]
    fn shift_held_uppercases_letter() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        assert!(kbd
            .process_key(&desc, KeyState::Press, key::LEFTSHIFT)
            .is_err());
        let ev = kbd
            .process_key(&desc, KeyState::Press, key::A)
            .expect("shifted letter should produce an event");
        assert_eq!(ev.keysym, crate::keysym::XK_A);
        assert!(ev.mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn shift_does_not_affect_punctuation_under_capslock() {
        // Capslock must not uppercase punctuation, unlike shift.
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        kbd.process_key(&desc, KeyState::Press, key::CAPSLOCK)
            .unwrap_err();
        assert!(kbd.mods().contains(Modifiers::LOCK));
        let ev = kbd
            .process_key(&desc, KeyState::Press, key::KEY_1)
            .expect("digit row should still produce an event under capslock");
        assert_eq!(ev.keysym, crate::keysym::XK_1);
    }

    #[test]
    fn capslock_toggles_on_press_only() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        kbd.process_key(&desc, KeyState::Press, key::CAPSLOCK)
            .unwrap_err();
        assert!(kbd.mods().contains(Modifiers::LOCK));
        kbd.process_key(&desc, KeyState::Release, key::CAPSLOCK)
            .unwrap_err();
        assert!(
            kbd.mods().contains(Modifiers::LOCK),
            "capslock release must not clear the lock bit"
        );
        kbd.process_key(&desc, KeyState::Press, key::CAPSLOCK)
            .unwrap_err();
        assert!(!kbd.mods().contains(Modifiers::LOCK));
    }

    #[test]
    fn numlock_remaps_keypad_to_digits() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        let without = kbd.process_key(&desc, KeyState::Press, key::KP7).unwrap();
        assert_eq!(without.keysym, crate::keysym::XK_KP_Home);

        kbd.process_key(&desc, KeyState::Press, key::NUMLOCK)
            .unwrap_err();
        let with = kbd.process_key(&desc, KeyState::Press, key::KP7).unwrap();
        assert_eq!(with.keysym, crate::keysym::XK_KP_7);
        assert_eq!(with.unicode, '7' as u32);
    }

    #[test]
    fn pure_release_of_ordinary_key_produces_no_event() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        assert_eq!(
            kbd.process_key(&desc, KeyState::Release, key::A),
            Err(NoEvent)
        );
    }

    #[test]
    fn autorepeat_is_press_like() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        let ev = kbd
            .process_key(&desc, KeyState::Repeat, key::A)
            .expect("autorepeat on a non-modifier must still produce an event");
        assert_eq!(ev.keysym, crate::keysym::XK_a);
    }

    #[test]
    fn unmapped_keycode_produces_no_event() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        assert_eq!(
            kbd.process_key(&desc, KeyState::Press, KEYTAB_SIZE as u16 + 5),
            Err(NoEvent)
        );
    }

    #[test]
    fn reset_resyncs_lock_modifiers_from_led_state() {
        let desc = desc();
        let mut kbd = KbdDev::new(&desc);
        kbd.process_key(&desc, KeyState::Press, key::LEFTSHIFT)
            .unwrap_err();
        assert!(kbd.mods().contains(Modifiers::SHIFT));

        let mut ledbits = [0 as libc::c_ulong; 1];
        ledbits[0] |= 1 << crate::sys::LED_CAPSL;
        kbd.reset(&ledbits);

        assert!(!kbd.mods().contains(Modifiers::SHIFT));
        assert!(kbd.mods().contains(Modifiers::LOCK));
        assert!(!kbd.mods().contains(Modifiers::MOD2));
    }
}
