//! Seat-filtered device discovery, hot-plug tracking, and the
//! AWAKE/ASLEEP lifecycle that owns every device's fd.

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use calloop::generic::Generic;
use calloop::{Interest, LoopHandle, Mode, PostAction, RegistrationToken};

use crate::config::Config;
use crate::device::{DeviceFeatures, DeviceId, DrainOutcome, InputDevice};
use crate::error::Error;
use crate::event::InputEvent;
use crate::keymap::{KbdDesc, KEY_MIN_INTERESTING};
use crate::sys::{self, EV_KEY, EV_LED, LED_CNT};

/// Implemented by the calloop "shared data" type an embedder passes to
/// its [`calloop::EventLoop`], giving [`InputManager`] a way to reach
/// itself back from inside a loop callback.
pub trait AsInputManager: Sized + 'static {
    fn input_manager(&mut self) -> &mut InputManager<Self>;
}

/// Identifies a registered observer for [`InputManager::unregister_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type ObserverCallback = Rc<RefCell<dyn FnMut(InputEvent)>>;

struct Observer {
    id: ObserverId,
    callback: ObserverCallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagerState {
    Asleep,
    Awake,
}

/// A raw fd borrowed for readiness polling only; the real I/O happens
/// through the owner that keeps the fd open elsewhere (here,
/// [`InputManager`]'s own `monitor` field). Mirrors the "duplicate
/// descriptor for polling, real handle kept separately" shape this
/// codebase's own minimal polling sources use.
struct BorrowedMonitorFd(RawFd);

impl AsFd for BorrowedMonitorFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: this fd is owned by `InputManager::monitor`, which
        // outlives every registration built from it (disconnect removes
        // the registration before the manager itself can be dropped).
        unsafe { BorrowedFd::borrow_raw(self.0) }
    }
}

/// Seat-filtered evdev keyboard manager: discovers devices, tracks
/// hot-plug, and fans out translated keystrokes to observers.
///
/// Generic over the embedder's calloop "shared data" type `Data`, which
/// must implement [`AsInputManager`] so callbacks registered on its
/// behalf can find their way back to `self`.
pub struct InputManager<Data: AsInputManager> {
    config: Config,
    desc: Arc<KbdDesc>,
    state: ManagerState,
    devices: Vec<InputDevice>,
    device_tokens: HashMap<DeviceId, RegistrationToken>,
    next_device_id: u64,
    observers: Vec<Observer>,
    next_observer_id: u64,
    monitor: Option<udev::MonitorSocket>,
    monitor_token: Option<RegistrationToken>,
    loop_handle: Option<LoopHandle<'static, Data>>,
}

impl<Data: AsInputManager> InputManager<Data> {
    /// Creates the keymap description and the (not yet connected)
    /// hot-plug monitor for `config.seat`.
    pub fn new(config: Config) -> Result<InputManager<Data>, Error> {
        let desc = Arc::new(KbdDesc::new(
            &config.xkb_layout,
            &config.xkb_variant,
            &config.xkb_options,
        ));

        let monitor = udev::MonitorBuilder::new()
            .map_err(Error::Io)?
            .match_subsystem("input")
            .map_err(Error::Io)?
            .listen()
            .map_err(Error::Io)?;

        Ok(InputManager {
            config,
            desc,
            state: ManagerState::Asleep,
            devices: Vec::new(),
            device_tokens: HashMap::new(),
            next_device_id: 0,
            observers: Vec::new(),
            next_observer_id: 0,
            monitor: Some(monitor),
            monitor_token: None,
            loop_handle: None,
        })
    }

    /// Registers the hot-plug monitor with `loop_handle`, remembers the
    /// handle for later device (de)registration, and performs the
    /// initial device enumeration. Fails with
    /// [`Error::AlreadyConnected`] if already bound to a loop.
    pub fn connect(&mut self, loop_handle: LoopHandle<'static, Data>) -> Result<(), Error> {
        if self.monitor_token.is_some() {
            return Err(Error::AlreadyConnected);
        }

        let raw_fd = self.monitor.as_ref().ok_or(Error::NotReady)?.as_raw_fd();
        let source = Generic::new(BorrowedMonitorFd(raw_fd), Interest::READ, Mode::Level);
        let token = loop_handle
            .insert_source(source, move |_readiness, _fd, data: &mut Data| {
                data.input_manager().drain_monitor()
            })
            .map_err(|_| Error::NotReady)?;
        self.monitor_token = Some(token);
        self.loop_handle = Some(loop_handle);

        self.add_initial_devices();
        Ok(())
    }

    /// Tears down every device and the monitor registration. Idempotent.
    pub fn disconnect(&mut self) {
        let ids: Vec<DeviceId> = self.devices.iter().map(|d| d.id).collect();
        for id in ids {
            self.destroy_device(id);
        }

        if let (Some(handle), Some(token)) = (&self.loop_handle, self.monitor_token.take()) {
            handle.remove(token);
        }
        self.loop_handle = None;
    }

    /// Releases every device's fd. Idempotent; the monitor stays
    /// registered so hot-plug events aren't lost while asleep.
    pub fn sleep(&mut self) {
        if self.state == ManagerState::Asleep {
            return;
        }

        let ids: Vec<DeviceId> = self.devices.iter().map(|d| d.id).collect();
        for id in ids {
            self.sleep_device(id);
        }
        self.state = ManagerState::Asleep;
    }

    /// Re-opens every device's fd and resyncs its LED-derived modifier
    /// state. Idempotent. A device that fails to wake is dropped and
    /// logged; the rest continue.
    pub fn wake_up(&mut self) {
        if self.state == ManagerState::Awake {
            return;
        }

        let ids: Vec<DeviceId> = self.devices.iter().map(|d| d.id).collect();
        for id in ids {
            if let Err(err) = self.wake_device(id) {
                tracing::warn!(?err, "device failed to wake, removing it");
                self.destroy_device(id);
            }
        }
        self.state = ManagerState::Awake;
    }

    pub fn is_asleep(&self) -> bool {
        self.state == ManagerState::Asleep
    }

    /// Registers a callback invoked for every translated keystroke from
    /// every tracked device.
    pub fn register_observer<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(InputEvent) + 'static,
    {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push(Observer {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    pub fn unregister_observer(&mut self, id: ObserverId) {
        self.observers.retain(|o| o.id != id);
    }

    fn dispatch(&mut self, event: InputEvent) {
        // Snapshot the Rc targets before calling any of them, so a
        // callback that registers or unregisters another observer (or
        // itself) mid-dispatch can't invalidate this iteration.
        let targets: Vec<ObserverCallback> =
            self.observers.iter().map(|o| Rc::clone(&o.callback)).collect();
        for target in targets {
            (target.borrow_mut())(event);
        }
    }

    fn add_initial_devices(&mut self) {
        let mut enumerator = match udev::Enumerator::new() {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(%err, "failed to create udev enumerator");
                return;
            }
        };
        if let Err(err) = enumerator.match_subsystem("input") {
            tracing::warn!(%err, "failed to filter enumerator by subsystem");
            return;
        }
        if self.config.seat != "seat0" {
            if let Err(err) = enumerator.match_tag(&self.config.seat) {
                tracing::warn!(%err, seat = %self.config.seat, "failed to filter enumerator by seat tag");
                return;
            }
        }

        let devices: Vec<udev::Device> = match enumerator.scan_devices() {
            Ok(iter) => iter.collect(),
            Err(err) => {
                tracing::warn!(%err, "failed to scan for input devices");
                return;
            }
        };
        for device in devices {
            self.add_device(&device);
        }
    }

    fn drain_monitor(&mut self) -> std::io::Result<PostAction> {
        let monitor = match &self.monitor {
            Some(monitor) => monitor.clone(),
            None => return Ok(PostAction::Continue),
        };
        for event in monitor {
            match event.event_type() {
                udev::EventType::Add => self.add_device(&event),
                udev::EventType::Remove => {
                    if let Some(node) = event.devnode() {
                        self.remove_device_at(node);
                    }
                }
                _ => {}
            }
        }
        Ok(PostAction::Continue)
    }

    fn add_device(&mut self, udev_device: &udev::Device) {
        let path = match udev_device.devnode() {
            Some(path) => path.to_owned(),
            None => return,
        };

        let seat = udev_device
            .property_value("ID_SEAT")
            .and_then(|v| v.to_str())
            .unwrap_or("seat0");
        if seat != self.config.seat {
            tracing::debug!(path = %path.display(), seat, configured_seat = %self.config.seat, "ignoring device on another seat");
            return;
        }

        let features = match probe_device_features(&path) {
            Some(features) => features,
            None => return,
        };
        if !features.contains(DeviceFeatures::HAS_KEYS) {
            tracing::debug!(path = %path.display(), "ignoring device with no interesting keys");
            return;
        }

        let id = DeviceId(self.next_device_id);
        self.next_device_id += 1;
        let device = InputDevice::new(id, path, features, &self.desc);
        self.devices.push(device);

        if self.state == ManagerState::Awake {
            if let Err(err) = self.wake_device(id) {
                tracing::warn!(?err, "newly added device failed to wake, dropping it");
                self.destroy_device(id);
            }
        }
    }

    fn remove_device_at(&mut self, path: &Path) {
        if let Some(pos) = self.devices.iter().position(|d| d.path() == path) {
            let id = self.devices[pos].id;
            self.sleep_device(id);
            self.devices.remove(pos);
        }
    }

    fn wake_device(&mut self, id: DeviceId) -> Result<(), Error> {
        let already_awake = self
            .devices
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.is_awake())
            .unwrap_or(true);
        if already_awake {
            return Ok(());
        }

        let loop_handle = self.loop_handle.clone().ok_or(Error::NotReady)?;

        let fd = {
            let device = self
                .devices
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or(Error::NotReady)?;
            device.open_for_wake()?
        };

        let desc = Arc::clone(&self.desc);
        let source = Generic::new(fd, Interest::READ, Mode::Level);
        let token = loop_handle
            .insert_source(source, move |_readiness, fd, data: &mut Data| {
                data.input_manager().on_device_readable(id, &desc, fd.as_fd())
            })
            .map_err(|_| Error::NotReady)?;

        self.device_tokens.insert(id, token);
        if let Some(device) = self.devices.iter_mut().find(|d| d.id == id) {
            device.mark_awake();
        }
        Ok(())
    }

    fn sleep_device(&mut self, id: DeviceId) {
        if let (Some(handle), Some(token)) = (&self.loop_handle, self.device_tokens.remove(&id)) {
            handle.remove(token);
        }
        if let Some(device) = self.devices.iter_mut().find(|d| d.id == id) {
            device.mark_asleep();
        }
    }

    fn destroy_device(&mut self, id: DeviceId) {
        if let (Some(handle), Some(token)) = (&self.loop_handle, self.device_tokens.remove(&id)) {
            handle.remove(token);
        }
        self.devices.retain(|d| d.id != id);
    }

    fn on_device_readable(
        &mut self,
        id: DeviceId,
        desc: &KbdDesc,
        fd: BorrowedFd<'_>,
    ) -> std::io::Result<PostAction> {
        let mut events = Vec::new();
        let outcome = match self.devices.iter_mut().find(|d| d.id == id) {
            Some(device) => device.drain(desc, fd, &mut events),
            None => DrainOutcome::Remove,
        };

        for event in events {
            self.dispatch(event);
        }

        match outcome {
            DrainOutcome::Continue => Ok(PostAction::Continue),
            DrainOutcome::Remove => {
                self.device_tokens.remove(&id);
                self.devices.retain(|d| d.id != id);
                Ok(PostAction::Remove)
            }
        }
    }
}

/// Opens `path` for probing only (not kept open), and reports whether it
/// looks like a typing device (`HAS_KEYS`) and/or has LEDs (`HAS_LEDS`).
/// Returns `None` if the device can't be opened at all.
fn probe_device_features(path: &Path) -> Option<DeviceFeatures> {
    let fd = rustix::fs::open(
        path,
        rustix::fs::OFlags::RDONLY | rustix::fs::OFlags::NONBLOCK | rustix::fs::OFlags::CLOEXEC,
        rustix::fs::Mode::empty(),
    )
    .ok()?;

    let mut features = DeviceFeatures::empty();

    let mut ev_bits = [0 as libc::c_ulong; sys::bits_to_longs(EV_LED as usize + 1)];
    if let Err(err) = sys::ev_bits(fd.as_fd(), &mut ev_bits) {
        if err != rustix::io::Errno::NOTTY {
            tracing::warn!(path = %path.display(), %err, "EVIOCGBIT(0) failed");
        }
        return Some(features);
    }

    if crate::bitset::bit_is_set(&ev_bits, EV_KEY as usize) {
        let mut key_bits = [0 as libc::c_ulong; sys::bits_to_longs(KEY_MIN_INTERESTING as usize + 1)];
        match sys::key_bits(fd.as_fd(), &mut key_bits) {
            Ok(()) => {
                for code in 0..=(KEY_MIN_INTERESTING as usize) {
                    if crate::bitset::bit_is_set(&key_bits, code) {
                        features |= DeviceFeatures::HAS_KEYS;
                        break;
                    }
                }
            }
            Err(err) => {
                if err != rustix::io::Errno::NOTTY {
                    tracing::warn!(path = %path.display(), %err, "EVIOCGBIT(EV_KEY) failed");
                }
                return Some(DeviceFeatures::empty());
            }
        }
    }

    if crate::bitset::bit_is_set(&ev_bits, EV_LED as usize) {
        features |= DeviceFeatures::HAS_LEDS;
    }

    Some(features)
}

#[allow(dead_code)]
fn led_bitmap_len() -> usize {
    sys::bits_to_longs(LED_CNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;
    use crate::keymap::tables::key;
    use std::ffi::CString;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Minimal embedder shared-data type: just enough to satisfy
    /// [`AsInputManager`] for tests that drive a real [`calloop::EventLoop`].
    struct Harness {
        manager: InputManager<Harness>,
    }

    impl AsInputManager for Harness {
        fn input_manager(&mut self) -> &mut InputManager<Self> {
            &mut self.manager
        }
    }

    fn bare_manager() -> InputManager<Harness> {
        InputManager {
            config: Config::default(),
            desc: Arc::new(KbdDesc::new("us", "", "")),
            state: ManagerState::Asleep,
            devices: Vec::new(),
            device_tokens: HashMap::new(),
            next_device_id: 0,
            observers: Vec::new(),
            next_observer_id: 0,
            monitor: None,
            monitor_token: None,
            loop_handle: None,
        }
    }

    fn dummy_event(keycode: u16) -> InputEvent {
        InputEvent {
            keycode,
            keysym: 0,
            unicode: crate::event::INVALID_UNICODE,
            mods: Modifiers::empty(),
        }
    }

    #[test]
    fn dispatch_reaches_every_registered_observer() {
        let mut manager = bare_manager();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_a = Rc::clone(&seen);
        manager.register_observer(move |ev| seen_a.borrow_mut().push(ev.keycode));
        let seen_b = Rc::clone(&seen);
        manager.register_observer(move |ev| seen_b.borrow_mut().push(ev.keycode + 1000));

        manager.dispatch(dummy_event(30));

        assert_eq!(*seen.borrow(), vec![30, 1030]);
    }

    #[test]
    fn unregister_observer_stops_delivery() {
        let mut manager = bare_manager();
        let count = Rc::new(RefCell::new(0u32));
        let count_clone = Rc::clone(&count);
        let id = manager.register_observer(move |_| *count_clone.borrow_mut() += 1);

        manager.dispatch(dummy_event(1));
        let id_other = manager.register_observer(|_| {});
        manager.unregister_observer(id);
        manager.dispatch(dummy_event(2));

        assert_eq!(*count.borrow(), 1);
        manager.unregister_observer(id_other);
        assert!(manager.observers.is_empty());
    }

    #[test]
    fn sleep_and_wake_up_are_idempotent_with_no_devices() {
        let mut manager = bare_manager();
        assert!(manager.is_asleep());
        manager.sleep();
        assert!(manager.is_asleep());
        manager.wake_up();
        assert!(!manager.is_asleep());
        manager.wake_up();
        assert!(!manager.is_asleep());
    }

    fn unique_fifo_path() -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("termkbd-test-fifo-{}-{}", std::process::id(), n))
    }

    fn write_raw_event(file: &mut std::fs::File, type_: u16, code: u16, value: i32) {
        let ev = sys::InputEventRaw {
            tv_sec: 0,
            tv_usec: 0,
            type_,
            code,
            value,
        };
        let bytes = unsafe {
            std::slice::from_raw_parts(&ev as *const _ as *const u8, std::mem::size_of_val(&ev))
        };
        file.write_all(bytes).unwrap();
    }

    #[test]
    fn waking_a_device_delivers_its_events_through_the_event_loop() {
        let fifo = unique_fifo_path();
        let fifo_cstr = CString::new(fifo.to_str().unwrap()).unwrap();
        let rc = unsafe { libc::mkfifo(fifo_cstr.as_ptr(), 0o600) };
        assert_eq!(rc, 0, "mkfifo should succeed in a writable temp dir");

        let mut event_loop: calloop::EventLoop<Harness> = calloop::EventLoop::try_new().unwrap();

        let mut manager = bare_manager();
        manager.loop_handle = Some(event_loop.handle());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        manager.register_observer(move |ev| seen_clone.borrow_mut().push(ev.keysym));

        let id = DeviceId(manager.next_device_id);
        manager.next_device_id += 1;
        let device = InputDevice::new(id, fifo.clone(), DeviceFeatures::HAS_KEYS, &manager.desc);
        manager.devices.push(device);
        manager.wake_device(id).expect("fifo should open for reading");

        // The reader opened O_NONBLOCK above, so it didn't wait for a
        // writer; open one now and push a frame through.
        let mut writer = std::fs::OpenOptions::new().write(true).open(&fifo).unwrap();
        write_raw_event(&mut writer, EV_KEY, key::A, 1);
        drop(writer);

        let mut harness = Harness { manager };
        event_loop
            .dispatch(Some(Duration::from_millis(200)), &mut harness)
            .unwrap();

        assert_eq!(*seen.borrow(), vec![crate::keysym::XK_a]);

        std::fs::remove_file(&fifo).ok();
    }
}
