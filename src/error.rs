/// Errors produced by the input subsystem.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter was missing or unsuitable (e.g. an empty device path).
    #[error("invalid argument")]
    InvalidArgument,

    /// A syscall (open, read, or an ioctl) failed, or udev reported an
    /// I/O error while scanning/monitoring devices.
    #[error("I/O error")]
    Io(#[source] std::io::Error),

    /// The operation requires a resource that has not been set up yet,
    /// e.g. calling a device operation before the manager is connected
    /// to an event loop.
    #[error("not ready")]
    NotReady,

    /// [`crate::manager::InputManager::connect`] was called on a manager
    /// that is already connected.
    #[error("already connected to an event loop")]
    AlreadyConnected,
}

/// Internal signal meaning "this keycode did not produce a deliverable
/// event" (it was a modifier, a pure release, or unmapped). Deliberately
/// not an [`Error`] variant: it must never be observable through a
/// `Result<_, Error>` returned to a caller outside the keymap engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoEvent;
