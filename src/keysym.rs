//! X11-style keysym constants and the pure `keysym -> Unicode` lookup.
//!
//! Only the keysyms the dumb keymap tables in [`crate::keymap`] can
//! produce are named here; this is not a general keysym table.

#![allow(non_upper_case_globals)]

pub const XK_BackSpace: u32 = 0xff08;
pub const XK_Tab: u32 = 0xff09;
pub const XK_Linefeed: u32 = 0xff0a;
pub const XK_Return: u32 = 0xff0d;
pub const XK_Scroll_Lock: u32 = 0xff14;
pub const XK_Escape: u32 = 0xff1b;
pub const XK_Delete: u32 = 0xffff;

pub const XK_Home: u32 = 0xff50;
pub const XK_Left: u32 = 0xff51;
pub const XK_Up: u32 = 0xff52;
pub const XK_Right: u32 = 0xff53;
pub const XK_Down: u32 = 0xff54;
pub const XK_Page_Up: u32 = 0xff55;
pub const XK_Page_Down: u32 = 0xff56;
pub const XK_End: u32 = 0xff57;
pub const XK_Insert: u32 = 0xff63;
pub const XK_Num_Lock: u32 = 0xff7f;

pub const XK_KP_Enter: u32 = 0xff8d;
pub const XK_KP_Home: u32 = 0xff95;
pub const XK_KP_Left: u32 = 0xff96;
pub const XK_KP_Up: u32 = 0xff97;
pub const XK_KP_Right: u32 = 0xff98;
pub const XK_KP_Down: u32 = 0xff99;
pub const XK_KP_Page_Up: u32 = 0xff9a;
pub const XK_KP_Page_Down: u32 = 0xff9b;
pub const XK_KP_End: u32 = 0xff9c;
pub const XK_KP_Begin: u32 = 0xff9d;
pub const XK_KP_Insert: u32 = 0xff9e;
pub const XK_KP_Delete: u32 = 0xff9f;
pub const XK_KP_Equal: u32 = 0xffbd;
pub const XK_KP_Multiply: u32 = 0xffaa;
pub const XK_KP_Add: u32 = 0xffab;
pub const XK_KP_Subtract: u32 = 0xffad;
pub const XK_KP_Divide: u32 = 0xffaf;
pub const XK_KP_0: u32 = 0xffb0;
pub const XK_KP_1: u32 = 0xffb1;
pub const XK_KP_2: u32 = 0xffb2;
pub const XK_KP_3: u32 = 0xffb3;
pub const XK_KP_4: u32 = 0xffb4;
pub const XK_KP_5: u32 = 0xffb5;
pub const XK_KP_6: u32 = 0xffb6;
pub const XK_KP_7: u32 = 0xffb7;
pub const XK_KP_8: u32 = 0xffb8;
pub const XK_KP_9: u32 = 0xffb9;

pub const XK_F1: u32 = 0xffbe;
pub const XK_F2: u32 = 0xffbf;
pub const XK_F3: u32 = 0xffc0;
pub const XK_F4: u32 = 0xffc1;
pub const XK_F5: u32 = 0xffc2;
pub const XK_F6: u32 = 0xffc3;
pub const XK_F7: u32 = 0xffc4;
pub const XK_F8: u32 = 0xffc5;
pub const XK_F9: u32 = 0xffc6;
pub const XK_F10: u32 = 0xffc7;
pub const XK_F11: u32 = 0xffc8;
pub const XK_F12: u32 = 0xffc9;

pub const XK_Shift_L: u32 = 0xffe1;
pub const XK_Shift_R: u32 = 0xffe2;
pub const XK_Control_L: u32 = 0xffe3;
pub const XK_Control_R: u32 = 0xffe4;
pub const XK_Caps_Lock: u32 = 0xffe5;
pub const XK_Meta_L: u32 = 0xffe7;
pub const XK_Meta_R: u32 = 0xffe8;
pub const XK_Alt_L: u32 = 0xffe9;
pub const XK_Alt_R: u32 = 0xffea;

pub const XK_space: u32 = 0x0020;
pub const XK_exclam: u32 = 0x0021;
pub const XK_quotedbl: u32 = 0x0022;
pub const XK_numbersign: u32 = 0x0023;
pub const XK_dollar: u32 = 0x0024;
pub const XK_percent: u32 = 0x0025;
pub const XK_ampersand: u32 = 0x0026;
pub const XK_apostrophe: u32 = 0x0027;
pub const XK_parenleft: u32 = 0x0028;
pub const XK_parenright: u32 = 0x0029;
pub const XK_asterisk: u32 = 0x002a;
pub const XK_plus: u32 = 0x002b;
pub const XK_comma: u32 = 0x002c;
pub const XK_minus: u32 = 0x002d;
pub const XK_period: u32 = 0x002e;
pub const XK_slash: u32 = 0x002f;
pub const XK_0: u32 = 0x0030;
pub const XK_1: u32 = 0x0031;
pub const XK_2: u32 = 0x0032;
pub const XK_3: u32 = 0x0033;
pub const XK_4: u32 = 0x0034;
pub const XK_5: u32 = 0x0035;
pub const XK_6: u32 = 0x0036;
pub const XK_7: u32 = 0x0037;
pub const XK_8: u32 = 0x0038;
pub const XK_9: u32 = 0x0039;
pub const XK_colon: u32 = 0x003a;
pub const XK_semicolon: u32 = 0x003b;
pub const XK_less: u32 = 0x003c;
pub const XK_equal: u32 = 0x003d;
pub const XK_greater: u32 = 0x003e;
pub const XK_question: u32 = 0x003f;
pub const XK_at: u32 = 0x0040;
pub const XK_A: u32 = 0x0041;
pub const XK_B: u32 = 0x0042;
pub const XK_C: u32 = 0x0043;
pub const XK_D: u32 = 0x0044;
pub const XK_E: u32 = 0x0045;
pub const XK_F: u32 = 0x0046;
pub const XK_G: u32 = 0x0047;
pub const XK_H: u32 = 0x0048;
pub const XK_I: u32 = 0x0049;
pub const XK_J: u32 = 0x004a;
pub const XK_K: u32 = 0x004b;
pub const XK_L: u32 = 0x004c;
pub const XK_M: u32 = 0x004d;
pub const XK_N: u32 = 0x004e;
pub const XK_O: u32 = 0x004f;
pub const XK_P: u32 = 0x0050;
pub const XK_Q: u32 = 0x0051;
pub const XK_R: u32 = 0x0052;
pub const XK_S: u32 = 0x0053;
pub const XK_T: u32 = 0x0054;
pub const XK_U: u32 = 0x0055;
pub const XK_V: u32 = 0x0056;
pub const XK_W: u32 = 0x0057;
pub const XK_X: u32 = 0x0058;
pub const XK_Y: u32 = 0x0059;
pub const XK_Z: u32 = 0x005a;
pub const XK_bracketleft: u32 = 0x005b;
pub const XK_backslash: u32 = 0x005c;
pub const XK_bracketright: u32 = 0x005d;
pub const XK_asciicircum: u32 = 0x005e;
pub const XK_underscore: u32 = 0x005f;
pub const XK_grave: u32 = 0x0060;
pub const XK_a: u32 = 0x0061;
pub const XK_b: u32 = 0x0062;
pub const XK_c: u32 = 0x0063;
pub const XK_d: u32 = 0x0064;
pub const XK_e: u32 = 0x0065;
pub const XK_f: u32 = 0x0066;
pub const XK_g: u32 = 0x0067;
pub const XK_h: u32 = 0x0068;
pub const XK_i: u32 = 0x0069;
pub const XK_j: u32 = 0x006a;
pub const XK_k: u32 = 0x006b;
pub const XK_l: u32 = 0x006c;
pub const XK_m: u32 = 0x006d;
pub const XK_n: u32 = 0x006e;
pub const XK_o: u32 = 0x006f;
pub const XK_p: u32 = 0x0070;
pub const XK_q: u32 = 0x0071;
pub const XK_r: u32 = 0x0072;
pub const XK_s: u32 = 0x0073;
pub const XK_t: u32 = 0x0074;
pub const XK_u: u32 = 0x0075;
pub const XK_v: u32 = 0x0076;
pub const XK_w: u32 = 0x0077;
pub const XK_x: u32 = 0x0078;
pub const XK_y: u32 = 0x0079;
pub const XK_z: u32 = 0x007a;
pub const XK_braceleft: u32 = 0x007b;
pub const XK_bar: u32 = 0x007c;
pub const XK_braceright: u32 = 0x007d;
pub const XK_asciitilde: u32 = 0x007e;

/// Maps a keysym to its Unicode code point, or `0` if it has none.
///
/// Mirrors the subset of X11's `imKStoUCS` this crate's keymap tables can
/// ever produce: printable Latin-1 keysyms (`0x20..=0xff`) are their own
/// code point, keypad keysyms map to the digit/punctuation they stand in
/// for, and everything else (function keys, navigation keys, bare
/// modifiers) has no Unicode representation.
pub fn keysym_to_ucs4(keysym: u32) -> u32 {
    if (0x0020..=0x00ff).contains(&keysym) {
        return keysym;
    }

    match keysym {
        XK_KP_0 => '0' as u32,
        XK_KP_1 => '1' as u32,
        XK_KP_2 => '2' as u32,
        XK_KP_3 => '3' as u32,
        XK_KP_4 => '4' as u32,
        XK_KP_5 => '5' as u32,
        XK_KP_6 => '6' as u32,
        XK_KP_7 => '7' as u32,
        XK_KP_8 => '8' as u32,
        XK_KP_9 => '9' as u32,
        XK_KP_Equal => '=' as u32,
        XK_KP_Multiply => '*' as u32,
        XK_KP_Add => '+' as u32,
        XK_KP_Subtract => '-' as u32,
        XK_KP_Divide => '/' as u32,
        XK_KP_Enter => '\r' as u32,
        XK_Return => '\r' as u32,
        XK_Linefeed => '\n' as u32,
        XK_Tab => '\t' as u32,
        XK_BackSpace => 0x08,
        XK_Escape => 0x1b,
        XK_Delete => 0x7f,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_keysyms_pass_through() {
        assert_eq!(keysym_to_ucs4(XK_a), 'a' as u32);
        assert_eq!(keysym_to_ucs4(XK_Z), 'Z' as u32);
        assert_eq!(keysym_to_ucs4(XK_exclam), '!' as u32);
    }

    #[test]
    fn keypad_digits_map_to_ascii() {
        assert_eq!(keysym_to_ucs4(XK_KP_5), '5' as u32);
    }

    #[test]
    fn function_and_navigation_keys_have_no_unicode() {
        assert_eq!(keysym_to_ucs4(XK_F1), 0);
        assert_eq!(keysym_to_ucs4(XK_Up), 0);
        assert_eq!(keysym_to_ucs4(XK_Shift_L), 0);
    }
}
