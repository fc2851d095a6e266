/// Construction-time configuration for [`crate::manager::InputManager`].
///
/// Reading the actual environment (CLI flags, a config file, `$XKB_*`
/// variables) is the embedder's job; this crate only consumes the
/// resulting values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Logical seat to restrict device discovery to.
    pub seat: String,
    /// Keymap layout, passed through to [`crate::keymap::KbdDesc::new`].
    /// Ignored by the dumb backend, but still validated/logged.
    pub xkb_layout: String,
    /// Keymap variant, passed through unchanged.
    pub xkb_variant: String,
    /// Keymap options, passed through unchanged.
    pub xkb_options: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seat: "seat0".to_owned(),
            xkb_layout: String::new(),
            xkb_variant: String::new(),
            xkb_options: String::new(),
        }
    }
}
