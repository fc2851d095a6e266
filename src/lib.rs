#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! # termkbd
//!
//! Input subsystem for a standalone terminal: discovers evdev keyboard
//! devices on a given seat, tracks hot-plug and sleep/wake, and
//! translates raw kernel keycodes into keysym + Unicode + modifier-mask
//! events for a small set of registered observers.
//!
//! ## Structure of the crate
//!
//! [`manager`] is the entry point: [`manager::InputManager`] owns seat
//! discovery (via `udev`), the AWAKE/ASLEEP device lifecycle, and
//! observer fan-out. [`device`] is a single tracked device's fd and
//! drain loop. [`keymap`] is the "dumb", non-configurable keycode-to-
//! keysym engine, backed by a fixed set of lookup tables and the
//! keysym-to-Unicode table in [`keysym`]. [`sys`] and [`bitset`] hold the
//! raw evdev ioctl and bit-array plumbing neither `rustix` nor `libc`
//! wrap directly.
//!
//! ## The event loop and state handling
//!
//! Like the rest of this codebase, this crate is built around
//! [`calloop`], a callback-oriented event loop. [`manager::InputManager`]
//! is generic over the embedder's shared calloop data type (see
//! [`manager::AsInputManager`]), so it can reach itself back from inside
//! a registered callback without `Rc`/`Arc` indirection on the manager
//! itself.
//!
//! ## Logging
//!
//! This crate logs through `tracing` rather than returning diagnostic
//! detail for conditions it can recover from on its own (a device that
//! fails to wake, a short read, an unreadable LED state): set up a
//! `tracing` subscriber in the embedding application to see them.

pub mod bitset;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod keymap;
pub mod keysym;
pub mod manager;
pub mod sys;

pub use config::Config;
pub use device::{DeviceFeatures, DeviceId, InputDevice};
pub use error::{Error, NoEvent};
pub use event::{InputEvent, KeyState, Modifiers, INVALID_UNICODE};
pub use keymap::{KbdDesc, KbdDev};
pub use manager::{AsInputManager, InputManager, ObserverId};
