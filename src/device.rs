//! A single evdev keyboard device: fd lifecycle, LED/key-bit probing,
//! and the frame-drain loop that feeds raw kernel events into the
//! keymap engine.

use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use rustix::fs::{Mode, OFlags};
use rustix::io::Errno;

use crate::error::Error;
use crate::event::{InputEvent, KeyState};
use crate::keymap::{KbdDesc, KbdDev};
use crate::sys::{self, InputEventRaw, EV_KEY, INPUT_EVENT_SIZE, LED_CNT};

bitflags! {
    /// What a device's capability probe found.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DeviceFeatures: u32 {
        /// Supports `EV_KEY` with at least one "ordinary" key, i.e.
        /// looks like a typing device rather than a remote-control or
        /// power button.
        const HAS_KEYS = 1 << 0;
        /// Supports `EV_LED` (so its LED state can be read/synced).
        const HAS_LEDS = 1 << 1;
    }
}

/// Identifies a device across add/remove/readability notifications
/// without relying on its position in [`crate::manager::InputManager`]'s
/// device list, which shifts as devices come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub(crate) u64);

/// Outcome of draining one readability notification.
pub(crate) enum DrainOutcome {
    Continue,
    /// The device hit EOF or an unrecoverable read error and must be
    /// removed.
    Remove,
}

/// One evdev keyboard device. Owns its device-node path, capability
/// mask, and keymap state; the open fd (when awake) is owned by the
/// `calloop::generic::Generic` source registered on its behalf, not by
/// this struct directly — removing that registration is what closes it.
pub struct InputDevice {
    pub(crate) id: DeviceId,
    path: PathBuf,
    features: DeviceFeatures,
    kbd: KbdDev,
    awake: bool,
}

impl InputDevice {
    pub(crate) fn new(id: DeviceId, path: PathBuf, features: DeviceFeatures, desc: &KbdDesc) -> InputDevice {
        InputDevice {
            id,
            path,
            features,
            kbd: KbdDev::new(desc),
            awake: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn features(&self) -> DeviceFeatures {
        self.features
    }

    /// Whether this device currently owns an open, loop-registered fd.
    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Opens the device node and returns the fd to register with the
    /// event loop, having already reset the keymap state from the
    /// device's current LED state. The caller is responsible for
    /// registering the returned fd and recording success via
    /// [`InputDevice::mark_awake`].
    pub(crate) fn open_for_wake(&mut self) -> Result<OwnedFd, Error> {
        let fd = rustix::fs::open(
            &self.path,
            OFlags::RDONLY | OFlags::NONBLOCK | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(|errno| Error::Io(errno.into()))?;

        let mut ledbits = [0 as libc::c_ulong; sys::bits_to_longs(LED_CNT)];
        if self.features.contains(DeviceFeatures::HAS_LEDS) {
            if let Err(err) = sys::led_bits(fd.as_fd(), &mut ledbits) {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read LED state");
                ledbits = [0; sys::bits_to_longs(LED_CNT)];
            }
        }

        if self.features.contains(DeviceFeatures::HAS_KEYS) {
            self.kbd.reset(&ledbits);
        }

        Ok(fd)
    }

    pub(crate) fn mark_awake(&mut self) {
        self.awake = true;
    }

    pub(crate) fn mark_asleep(&mut self) {
        self.awake = false;
    }

    /// Drains as many whole `input_event` frames as are currently
    /// available on `fd`, translating `EV_KEY` events into
    /// [`InputEvent`]s pushed onto `out`. Returns whether the device
    /// should be removed (EOF or an unrecoverable read error).
    pub(crate) fn drain(
        &mut self,
        desc: &KbdDesc,
        fd: BorrowedFd<'_>,
        out: &mut Vec<InputEvent>,
    ) -> DrainOutcome {
        let mut buf = [InputEventRaw {
            tv_sec: 0,
            tv_usec: 0,
            type_: 0,
            code: 0,
            value: 0,
        }; 16];

        loop {
            let bytes = unsafe {
                std::slice::from_raw_parts_mut(
                    buf.as_mut_ptr() as *mut u8,
                    std::mem::size_of_val(&buf),
                )
            };
            match rustix::io::read(fd, bytes) {
                Ok(0) => {
                    tracing::debug!(path = %self.path.display(), "device reached EOF");
                    return DrainOutcome::Remove;
                }
                Ok(n) => {
                    if n % INPUT_EVENT_SIZE != 0 {
                        tracing::warn!(
                            path = %self.path.display(),
                            n,
                            "short input_event read, discarding frame"
                        );
                        return DrainOutcome::Continue;
                    }
                    let count = n / INPUT_EVENT_SIZE;
                    for ev in &buf[..count] {
                        if ev.type_ == EV_KEY {
                            self.notify_key(desc, KeyState::from_raw(ev.value), ev.code, out);
                        }
                    }
                    if count < buf.len() {
                        return DrainOutcome::Continue;
                    }
                }
                Err(Errno::WOULDBLOCK) => return DrainOutcome::Continue,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "read failed");
                    return DrainOutcome::Remove;
                }
            }
        }
    }

    fn notify_key(&mut self, desc: &KbdDesc, state: KeyState, code: u16, out: &mut Vec<InputEvent>) {
        if let Ok(event) = self.kbd.process_key(desc, state, code) {
            out.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::tables::key;
    use rustix::pipe::{pipe_with, PipeFlags};

    fn desc() -> KbdDesc {
        KbdDesc::new("us", "", "")
    }

    fn device(desc: &KbdDesc) -> InputDevice {
        InputDevice::new(
            DeviceId(0),
            PathBuf::from("/test/fake-kbd"),
            DeviceFeatures::HAS_KEYS,
            desc,
        )
    }

    fn raw(type_: u16, code: u16, value: i32) -> InputEventRaw {
        InputEventRaw {
            tv_sec: 0,
            tv_usec: 0,
            type_,
            code,
            value,
        }
    }

    fn write_raw(fd: &OwnedFd, events: &[InputEventRaw]) {
        let bytes = unsafe {
            std::slice::from_raw_parts(
                events.as_ptr() as *const u8,
                std::mem::size_of_val(events),
            )
        };
        rustix::io::write(fd, bytes).expect("pipe write should not block on a fresh pipe");
    }

    #[test]
    fn drain_translates_a_key_press() {
        let desc = desc();
        let mut dev = device(&desc);
        let (rx, tx) = pipe_with(PipeFlags::NONBLOCK).unwrap();
        write_raw(&tx, &[raw(EV_KEY, key::A, 1)]);

        let mut out = Vec::new();
        let outcome = dev.drain(&desc, rx.as_fd(), &mut out);

        assert!(matches!(outcome, DrainOutcome::Continue));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].keysym, crate::keysym::XK_a);
    }

    #[test]
    fn drain_ignores_non_key_events() {
        let desc = desc();
        let mut dev = device(&desc);
        let (rx, tx) = pipe_with(PipeFlags::NONBLOCK).unwrap();
        write_raw(
            &tx,
            &[raw(sys::EV_LED, sys::LED_CAPSL, 1), raw(EV_KEY, key::A, 1)],
        );

        let mut out = Vec::new();
        dev.drain(&desc, rx.as_fd(), &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn drain_with_no_data_available_continues() {
        let desc = desc();
        let mut dev = device(&desc);
        let (rx, _tx) = pipe_with(PipeFlags::NONBLOCK).unwrap();

        let mut out = Vec::new();
        let outcome = dev.drain(&desc, rx.as_fd(), &mut out);

        assert!(matches!(outcome, DrainOutcome::Continue));
        assert!(out.is_empty());
    }

    #[test]
    fn drain_stops_after_a_misaligned_read_instead_of_retrying() {
        // A retry-the-read implementation and a stop-here implementation
        // both look like `Continue` with an empty `out` when there is
        // nothing else queued up (see the test above). They diverge once
        // the *next* read would observe something else, like EOF: a retry
        // would loop straight into that read within the same `drain` call
        // and report `Remove`, while stopping after the misaligned frame
        // must leave EOF to be discovered on the device's next
        // readability notification.
        let desc = desc();
        let mut dev = device(&desc);
        let (rx, tx) = pipe_with(PipeFlags::NONBLOCK).unwrap();
        let truncated = raw(EV_KEY, key::A, 1);
        let partial =
            unsafe { std::slice::from_raw_parts(&truncated as *const _ as *const u8, 3) };
        rustix::io::write(&tx, partial).unwrap();
        drop(tx);

        let mut out = Vec::new();
        let outcome = dev.drain(&desc, rx.as_fd(), &mut out);

        assert!(
            matches!(outcome, DrainOutcome::Continue),
            "a misaligned read must end the drain call, not fall through to observe EOF"
        );
        assert!(out.is_empty());
    }

    #[test]
    fn drain_on_write_end_closed_signals_removal() {
        let desc = desc();
        let mut dev = device(&desc);
        let (rx, tx) = pipe_with(PipeFlags::NONBLOCK).unwrap();
        drop(tx);

        let mut out = Vec::new();
        let outcome = dev.drain(&desc, rx.as_fd(), &mut out);

        assert!(matches!(outcome, DrainOutcome::Remove));
    }

    #[test]
    fn drain_discards_a_misaligned_read_entirely() {
        // A read whose length isn't a multiple of one input_event frame
        // shouldn't happen on a real evdev node (the kernel always hands
        // back whole records), so the whole buffer is discarded rather
        // than guessed at.
        let desc = desc();
        let mut dev = device(&desc);
        let (rx, tx) = pipe_with(PipeFlags::NONBLOCK).unwrap();
        write_raw(&tx, &[raw(EV_KEY, key::A, 1)]);
        let truncated = raw(EV_KEY, key::B, 1);
        let partial =
            unsafe { std::slice::from_raw_parts(&truncated as *const _ as *const u8, 3) };
        rustix::io::write(&tx, partial).unwrap();

        let mut out = Vec::new();
        let outcome = dev.drain(&desc, rx.as_fd(), &mut out);

        assert!(matches!(outcome, DrainOutcome::Continue));
        assert!(out.is_empty());
    }

    #[test]
    fn wake_and_sleep_state_round_trips() {
        let desc = desc();
        let mut dev = device(&desc);
        assert!(!dev.is_awake());
        dev.mark_awake();
        assert!(dev.is_awake());
        dev.mark_asleep();
        assert!(!dev.is_awake());
    }
}
