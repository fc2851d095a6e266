//! Raw evdev syscall glue: the kernel `input_event` record layout and
//! the `EVIOCGBIT`/`EVIOCGLED` ioctls, which rustix does not wrap
//! itself. Follows the pattern used elsewhere in this codebase for
//! syscalls outside rustix's safe surface: issue the raw `libc` call
//! inside `unsafe {}` and translate a failure's errno into
//! `rustix::io::Errno`.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

use rustix::io::Errno;

/// `EV_KEY` from `linux/input-event-codes.h`: key press/release/repeat events.
pub const EV_KEY: u16 = 0x01;
/// `EV_LED` from `linux/input-event-codes.h`: LED state change events.
pub const EV_LED: u16 = 0x11;

/// `LED_NUML`: the Num Lock LED's bit position in an `EVIOCGLED` reply.
pub const LED_NUML: u16 = 0x00;
/// `LED_CAPSL`: the Caps Lock LED's bit position in an `EVIOCGLED` reply.
pub const LED_CAPSL: u16 = 0x01;
/// One past the highest LED bit the kernel defines.
pub const LED_CNT: usize = 0x0f + 1;

/// One kernel input event record, `#[repr(C)]` to match
/// `struct input_event` from `linux/input.h` byte for byte.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct InputEventRaw {
    /// Seconds component of the event timestamp. Unused; the kernel
    /// fills it in, we don't read it back.
    pub tv_sec: libc::c_long,
    /// Microseconds component of the event timestamp.
    pub tv_usec: libc::c_long,
    /// Event type, e.g. [`EV_KEY`] or [`EV_LED`].
    pub type_: u16,
    /// Event code, e.g. a `KEY_*` keycode when `type_ == EV_KEY`.
    pub code: u16,
    /// Event value: for `EV_KEY`, 0/1/2 for release/press/repeat.
    pub value: i32,
}

pub const INPUT_EVENT_SIZE: usize = std::mem::size_of::<InputEventRaw>();

/// How many `libc::c_ulong` words are needed to hold `n_bits` bits of an
/// `EVIOCGBIT`/`EVIOCGLED` reply.
pub const fn bits_to_longs(n_bits: usize) -> usize {
    crate::bitset::longs_for_bits(n_bits)
}

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;
const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;
const IOC_READ: u32 = 2;

const fn ioc(dir: u32, ty: u32, nr: u32, size: u32) -> u64 {
    ((dir << IOC_DIRSHIFT) | (ty << IOC_TYPESHIFT) | (nr << IOC_NRSHIFT) | (size << IOC_SIZESHIFT))
        as u64
}

/// `EVIOCGBIT(ev, len)`: fetch the bitmask of supported codes for event
/// type `ev` into a buffer of `len` bytes.
fn eviocgbit(ev: u32, len: usize) -> u64 {
    ioc(IOC_READ, b'E' as u32, 0x20 + ev, len as u32)
}

/// `EVIOCGLED(len)`: fetch the current LED state into a buffer of `len`
/// bytes.
fn eviocgled(len: usize) -> u64 {
    ioc(IOC_READ, b'E' as u32, 0x19, len as u32)
}

fn last_errno() -> Errno {
    Errno::from_raw_os_error(io::Error::last_os_error().raw_os_error().unwrap_or(0))
}

/// Fetches the set of event types (`EV_*`) supported by a device.
pub fn ev_bits(fd: BorrowedFd<'_>, out: &mut [libc::c_ulong]) -> Result<(), Errno> {
    ioctl_read(fd, eviocgbit(0, std::mem::size_of_val(out)), out)
}

/// Fetches the set of keycodes supported by a device (`EV_KEY`'s
/// sub-bitmask).
pub fn key_bits(fd: BorrowedFd<'_>, out: &mut [libc::c_ulong]) -> Result<(), Errno> {
    ioctl_read(
        fd,
        eviocgbit(EV_KEY as u32, std::mem::size_of_val(out)),
        out,
    )
}

/// Fetches the current LED state.
pub fn led_bits(fd: BorrowedFd<'_>, out: &mut [libc::c_ulong]) -> Result<(), Errno> {
    ioctl_read(fd, eviocgled(std::mem::size_of_val(out)), out)
}

fn ioctl_read(fd: BorrowedFd<'_>, request: u64, out: &mut [libc::c_ulong]) -> Result<(), Errno> {
    // SAFETY: `request` is one of the EVIOCG* codes built above, whose
    // reply size matches `out`'s byte length exactly, and `fd` stays
    // valid for the duration of the call.
    let rc = unsafe {
        libc::ioctl(fd.as_raw_fd(), request as libc::c_ulong, out.as_mut_ptr())
    };
    if rc < 0 {
        Err(last_errno())
    } else {
        Ok(())
    }
}
