//! Kernel keycodes and the fixed US PC lookup tables for the dumb
//! keymap backend, transcribed from the reference implementation's
//! `keytab_normal`/`keytab_numlock`/`keytab_shift`/`keytab_capslock`/
//! `modmap`.

use crate::event::Modifiers;
use crate::keysym::*;

pub mod key {
    //! `KEY_*` constants from `linux/input-event-codes.h`, limited to
    //! the codes these tables actually index.
    #![allow(dead_code)]

    pub const RESERVED: u16 = 0;
    pub const ESC: u16 = 1;
    pub const KEY_1: u16 = 2;
    pub const KEY_2: u16 = 3;
    pub const KEY_3: u16 = 4;
    pub const KEY_4: u16 = 5;
    pub const KEY_5: u16 = 6;
    pub const KEY_6: u16 = 7;
    pub const KEY_7: u16 = 8;
    pub const KEY_8: u16 = 9;
    pub const KEY_9: u16 = 10;
    pub const KEY_0: u16 = 11;
    pub const MINUS: u16 = 12;
    pub const EQUAL: u16 = 13;
    pub const BACKSPACE: u16 = 14;
    pub const TAB: u16 = 15;
    pub const Q: u16 = 16;
    pub const W: u16 = 17;
    pub const E: u16 = 18;
    pub const R: u16 = 19;
    pub const T: u16 = 20;
    pub const Y: u16 = 21;
    pub const U: u16 = 22;
    pub const I: u16 = 23;
    pub const O: u16 = 24;
    pub const P: u16 = 25;
    pub const LEFTBRACE: u16 = 26;
    pub const RIGHTBRACE: u16 = 27;
    pub const ENTER: u16 = 28;
    pub const LEFTCTRL: u16 = 29;
    pub const A: u16 = 30;
    pub const S: u16 = 31;
    pub const D: u16 = 32;
    pub const F: u16 = 33;
    pub const G: u16 = 34;
    pub const H: u16 = 35;
    pub const J: u16 = 36;
    pub const K: u16 = 37;
    pub const L: u16 = 38;
    pub const SEMICOLON: u16 = 39;
    pub const APOSTROPHE: u16 = 40;
    pub const GRAVE: u16 = 41;
    pub const LEFTSHIFT: u16 = 42;
    pub const BACKSLASH: u16 = 43;
    pub const Z: u16 = 44;
    pub const X: u16 = 45;
    pub const C: u16 = 46;
    pub const V: u16 = 47;
    pub const B: u16 = 48;
    pub const N: u16 = 49;
    pub const M: u16 = 50;
    pub const COMMA: u16 = 51;
    pub const DOT: u16 = 52;
    pub const SLASH: u16 = 53;
    pub const RIGHTSHIFT: u16 = 54;
    pub const KPASTERISK: u16 = 55;
    pub const LEFTALT: u16 = 56;
    pub const SPACE: u16 = 57;
    pub const CAPSLOCK: u16 = 58;
    pub const F1: u16 = 59;
    pub const F2: u16 = 60;
    pub const F3: u16 = 61;
    pub const F4: u16 = 62;
    pub const F5: u16 = 63;
    pub const F6: u16 = 64;
    pub const F7: u16 = 65;
    pub const F8: u16 = 66;
    pub const F9: u16 = 67;
    pub const F10: u16 = 68;
    pub const NUMLOCK: u16 = 69;
    pub const SCROLLLOCK: u16 = 70;
    pub const KP7: u16 = 71;
    pub const KP8: u16 = 72;
    pub const KP9: u16 = 73;
    pub const KPMINUS: u16 = 74;
    pub const KP4: u16 = 75;
    pub const KP5: u16 = 76;
    pub const KP6: u16 = 77;
    pub const KPPLUS: u16 = 78;
    pub const KP1: u16 = 79;
    pub const KP2: u16 = 80;
    pub const KP3: u16 = 81;
    pub const KP0: u16 = 82;
    pub const KPDOT: u16 = 83;
    pub const F11: u16 = 87;
    pub const F12: u16 = 88;
    pub const KPENTER: u16 = 96;
    pub const RIGHTCTRL: u16 = 97;
    pub const KPSLASH: u16 = 98;
    pub const MUTE: u16 = 113;
    pub const RIGHTALT: u16 = 100;
    pub const LINEFEED: u16 = 101;
    pub const HOME: u16 = 102;
    pub const UP: u16 = 103;
    pub const PAGEUP: u16 = 104;
    pub const LEFT: u16 = 105;
    pub const RIGHT: u16 = 106;
    pub const END: u16 = 107;
    pub const DOWN: u16 = 108;
    pub const PAGEDOWN: u16 = 109;
    pub const INSERT: u16 = 110;
    pub const DELETE: u16 = 111;
    pub const KPEQUAL: u16 = 117;
    pub const LEFTMETA: u16 = 125;
    pub const RIGHTMETA: u16 = 126;
}

/// Upper bound (exclusive) on keycodes this engine knows about, matching
/// the reference implementation's `KEYTAB_SIZE = KEY_RIGHTMETA + 1`.
pub const KEYTAB_SIZE: usize = key::RIGHTMETA as usize + 1;

/// The demarcation the capability probe uses to decide whether a device
/// "looks like a typing device": any supported key in
/// `[KEY_RESERVED, KEY_MIN_INTERESTING]` qualifies.
pub const KEY_MIN_INTERESTING: u16 = key::MUTE;

/// Whether a modifier follows physical key state (`Normal`) or toggles
/// on press (`Lock`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Normal,
    Lock,
}

/// One entry of the modifier map: which mask bit a modifier key
/// controls, and how.
#[derive(Debug, Clone, Copy)]
pub struct ModifierEntry {
    pub mask: Modifiers,
    pub kind: ModifierKind,
}

fn table() -> [u32; KEYTAB_SIZE] {
    [0; KEYTAB_SIZE]
}

fn set(table: &mut [u32; KEYTAB_SIZE], code: u16, sym: u32) {
    table[code as usize] = sym;
}

/// Base keysym for every key the dumb backend recognizes, used when no
/// modifier-specific table produces a match.
pub fn keytab_normal() -> [u32; KEYTAB_SIZE] {
    let mut t = table();
    set(&mut t, key::ESC, XK_Escape);
    set(&mut t, key::KEY_1, XK_1);
    set(&mut t, key::KEY_2, XK_2);
    set(&mut t, key::KEY_3, XK_3);
    set(&mut t, key::KEY_4, XK_4);
    set(&mut t, key::KEY_5, XK_5);
    set(&mut t, key::KEY_6, XK_6);
    set(&mut t, key::KEY_7, XK_7);
    set(&mut t, key::KEY_8, XK_8);
    set(&mut t, key::KEY_9, XK_9);
    set(&mut t, key::KEY_0, XK_0);
    set(&mut t, key::MINUS, XK_minus);
    set(&mut t, key::EQUAL, XK_equal);
    set(&mut t, key::BACKSPACE, XK_BackSpace);
    set(&mut t, key::TAB, XK_Tab);
    set(&mut t, key::Q, XK_q);
    set(&mut t, key::W, XK_w);
    set(&mut t, key::E, XK_e);
    set(&mut t, key::R, XK_r);
    set(&mut t, key::T, XK_t);
    set(&mut t, key::Y, XK_y);
    set(&mut t, key::U, XK_u);
    set(&mut t, key::I, XK_i);
    set(&mut t, key::O, XK_o);
    set(&mut t, key::P, XK_p);
    set(&mut t, key::LEFTBRACE, XK_bracketleft);
    set(&mut t, key::RIGHTBRACE, XK_bracketright);
    set(&mut t, key::ENTER, XK_Return);
    set(&mut t, key::LEFTCTRL, XK_Control_L);
    set(&mut t, key::A, XK_a);
    set(&mut t, key::S, XK_s);
    set(&mut t, key::D, XK_d);
    set(&mut t, key::F, XK_f);
    set(&mut t, key::G, XK_g);
    set(&mut t, key::H, XK_h);
    set(&mut t, key::J, XK_j);
    set(&mut t, key::K, XK_k);
    set(&mut t, key::L, XK_l);
    set(&mut t, key::SEMICOLON, XK_semicolon);
    set(&mut t, key::APOSTROPHE, XK_apostrophe);
    set(&mut t, key::GRAVE, XK_grave);
    set(&mut t, key::LEFTSHIFT, XK_Shift_L);
    set(&mut t, key::BACKSLASH, XK_backslash);
    set(&mut t, key::Z, XK_z);
    set(&mut t, key::X, XK_x);
    set(&mut t, key::C, XK_c);
    set(&mut t, key::V, XK_v);
    set(&mut t, key::B, XK_b);
    set(&mut t, key::N, XK_n);
    set(&mut t, key::M, XK_m);
    set(&mut t, key::COMMA, XK_comma);
    set(&mut t, key::DOT, XK_period);
    set(&mut t, key::SLASH, XK_slash);
    set(&mut t, key::RIGHTSHIFT, XK_Shift_R);
    set(&mut t, key::KPASTERISK, XK_KP_Multiply);
    set(&mut t, key::LEFTALT, XK_Alt_L);
    set(&mut t, key::SPACE, XK_space);
    set(&mut t, key::CAPSLOCK, XK_Caps_Lock);
    set(&mut t, key::F1, XK_F1);
    set(&mut t, key::F2, XK_F2);
    set(&mut t, key::F3, XK_F3);
    set(&mut t, key::F4, XK_F4);
    set(&mut t, key::F5, XK_F5);
    set(&mut t, key::F6, XK_F6);
    set(&mut t, key::F7, XK_F7);
    set(&mut t, key::F8, XK_F8);
    set(&mut t, key::F9, XK_F9);
    set(&mut t, key::F10, XK_F10);
    set(&mut t, key::NUMLOCK, XK_Num_Lock);
    set(&mut t, key::SCROLLLOCK, XK_Scroll_Lock);
    set(&mut t, key::KP7, XK_KP_Home);
    set(&mut t, key::KP8, XK_KP_Up);
    set(&mut t, key::KP9, XK_KP_Page_Up);
    set(&mut t, key::KPMINUS, XK_KP_Subtract);
    set(&mut t, key::KP4, XK_KP_Left);
    set(&mut t, key::KP5, XK_KP_Begin);
    set(&mut t, key::KP6, XK_KP_Right);
    set(&mut t, key::KPPLUS, XK_KP_Add);
    set(&mut t, key::KP1, XK_KP_End);
    set(&mut t, key::KP2, XK_KP_Down);
    set(&mut t, key::KP3, XK_KP_Page_Down);
    set(&mut t, key::KP0, XK_KP_Insert);
    set(&mut t, key::KPDOT, XK_KP_Delete);
    set(&mut t, key::F11, XK_F11);
    set(&mut t, key::F12, XK_F12);
    set(&mut t, key::KPENTER, XK_KP_Enter);
    set(&mut t, key::RIGHTCTRL, XK_Control_R);
    set(&mut t, key::KPSLASH, XK_KP_Divide);
    set(&mut t, key::RIGHTALT, XK_Alt_R);
    set(&mut t, key::LINEFEED, XK_Linefeed);
    set(&mut t, key::HOME, XK_Home);
    set(&mut t, key::UP, XK_Up);
    set(&mut t, key::PAGEUP, XK_Page_Up);
    set(&mut t, key::LEFT, XK_Left);
    set(&mut t, key::RIGHT, XK_Right);
    set(&mut t, key::END, XK_End);
    set(&mut t, key::DOWN, XK_Down);
    set(&mut t, key::PAGEDOWN, XK_Page_Down);
    set(&mut t, key::INSERT, XK_Insert);
    set(&mut t, key::DELETE, XK_Delete);
    set(&mut t, key::KPEQUAL, XK_KP_Equal);
    set(&mut t, key::LEFTMETA, XK_Meta_L);
    set(&mut t, key::RIGHTMETA, XK_Meta_R);
    t
}

/// Keypad digits under Num Lock.
pub fn keytab_numlock() -> [u32; KEYTAB_SIZE] {
    let mut t = table();
    set(&mut t, key::KP7, XK_KP_7);
    set(&mut t, key::KP8, XK_KP_8);
    set(&mut t, key::KP9, XK_KP_9);
    set(&mut t, key::KP4, XK_KP_4);
    set(&mut t, key::KP5, XK_KP_5);
    set(&mut t, key::KP6, XK_KP_6);
    set(&mut t, key::KP1, XK_KP_1);
    set(&mut t, key::KP2, XK_KP_2);
    set(&mut t, key::KP3, XK_KP_3);
    set(&mut t, key::KP0, XK_KP_0);
    t
}

/// Shifted symbols for the number row, letters, and punctuation.
pub fn keytab_shift() -> [u32; KEYTAB_SIZE] {
    let mut t = table();
    set(&mut t, key::KEY_1, XK_exclam);
    set(&mut t, key::KEY_2, XK_at);
    set(&mut t, key::KEY_3, XK_numbersign);
    set(&mut t, key::KEY_4, XK_dollar);
    set(&mut t, key::KEY_5, XK_percent);
    set(&mut t, key::KEY_6, XK_asciicircum);
    set(&mut t, key::KEY_7, XK_ampersand);
    set(&mut t, key::KEY_8, XK_asterisk);
    set(&mut t, key::KEY_9, XK_parenleft);
    set(&mut t, key::KEY_0, XK_parenright);
    set(&mut t, key::MINUS, XK_underscore);
    set(&mut t, key::EQUAL, XK_plus);
    set(&mut t, key::Q, XK_Q);
    set(&mut t, key::W, XK_W);
    set(&mut t, key::E, XK_E);
    set(&mut t, key::R, XK_R);
    set(&mut t, key::T, XK_T);
    set(&mut t, key::Y, XK_Y);
    set(&mut t, key::U, XK_U);
    set(&mut t, key::I, XK_I);
    set(&mut t, key::O, XK_O);
    set(&mut t, key::P, XK_P);
    set(&mut t, key::LEFTBRACE, XK_braceleft);
    set(&mut t, key::RIGHTBRACE, XK_braceright);
    set(&mut t, key::A, XK_A);
    set(&mut t, key::S, XK_S);
    set(&mut t, key::D, XK_D);
    set(&mut t, key::F, XK_F);
    set(&mut t, key::G, XK_G);
    set(&mut t, key::H, XK_H);
    set(&mut t, key::J, XK_J);
    set(&mut t, key::K, XK_K);
    set(&mut t, key::L, XK_L);
    set(&mut t, key::SEMICOLON, XK_colon);
    set(&mut t, key::APOSTROPHE, XK_quotedbl);
    set(&mut t, key::GRAVE, XK_asciitilde);
    set(&mut t, key::BACKSLASH, XK_bar);
    set(&mut t, key::Z, XK_Z);
    set(&mut t, key::X, XK_X);
    set(&mut t, key::C, XK_C);
    set(&mut t, key::V, XK_V);
    set(&mut t, key::B, XK_B);
    set(&mut t, key::N, XK_N);
    set(&mut t, key::M, XK_M);
    set(&mut t, key::COMMA, XK_less);
    set(&mut t, key::DOT, XK_greater);
    set(&mut t, key::SLASH, XK_question);
    t
}

/// Upper-case letters only; capslock never affects punctuation (kernel
/// console convention, not XKB's group-shift model).
pub fn keytab_capslock() -> [u32; KEYTAB_SIZE] {
    let mut t = table();
    set(&mut t, key::Q, XK_Q);
    set(&mut t, key::W, XK_W);
    set(&mut t, key::E, XK_E);
    set(&mut t, key::R, XK_R);
    set(&mut t, key::T, XK_T);
    set(&mut t, key::Y, XK_Y);
    set(&mut t, key::U, XK_U);
    set(&mut t, key::I, XK_I);
    set(&mut t, key::O, XK_O);
    set(&mut t, key::P, XK_P);
    set(&mut t, key::A, XK_A);
    set(&mut t, key::S, XK_S);
    set(&mut t, key::D, XK_D);
    set(&mut t, key::F, XK_F);
    set(&mut t, key::G, XK_G);
    set(&mut t, key::H, XK_H);
    set(&mut t, key::J, XK_J);
    set(&mut t, key::K, XK_K);
    set(&mut t, key::L, XK_L);
    set(&mut t, key::Z, XK_Z);
    set(&mut t, key::X, XK_X);
    set(&mut t, key::C, XK_C);
    set(&mut t, key::V, XK_V);
    set(&mut t, key::B, XK_B);
    set(&mut t, key::N, XK_N);
    set(&mut t, key::M, XK_M);
    t
}

/// Maps a modifier keycode to the mask bit and toggle kind it controls.
/// Keys absent from this map are ordinary, non-modifier keys.
pub fn modmap() -> [Option<ModifierEntry>; KEYTAB_SIZE] {
    let mut m: [Option<ModifierEntry>; KEYTAB_SIZE] = [None; KEYTAB_SIZE];
    m[key::LEFTCTRL as usize] = Some(ModifierEntry {
        mask: Modifiers::CONTROL,
        kind: ModifierKind::Normal,
    });
    m[key::LEFTSHIFT as usize] = Some(ModifierEntry {
        mask: Modifiers::SHIFT,
        kind: ModifierKind::Normal,
    });
    m[key::RIGHTSHIFT as usize] = Some(ModifierEntry {
        mask: Modifiers::SHIFT,
        kind: ModifierKind::Normal,
    });
    m[key::LEFTALT as usize] = Some(ModifierEntry {
        mask: Modifiers::MOD1,
        kind: ModifierKind::Normal,
    });
    m[key::CAPSLOCK as usize] = Some(ModifierEntry {
        mask: Modifiers::LOCK,
        kind: ModifierKind::Lock,
    });
    m[key::NUMLOCK as usize] = Some(ModifierEntry {
        mask: Modifiers::MOD2,
        kind: ModifierKind::Lock,
    });
    m[key::RIGHTCTRL as usize] = Some(ModifierEntry {
        mask: Modifiers::CONTROL,
        kind: ModifierKind::Normal,
    });
    m[key::RIGHTALT as usize] = Some(ModifierEntry {
        mask: Modifiers::MOD1,
        kind: ModifierKind::Normal,
    });
    m[key::LEFTMETA as usize] = Some(ModifierEntry {
        mask: Modifiers::MOD4,
        kind: ModifierKind::Normal,
    });
    m[key::RIGHTMETA as usize] = Some(ModifierEntry {
        mask: Modifiers::MOD4,
        kind: ModifierKind::Normal,
    });
    m
}
