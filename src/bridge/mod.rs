//! The protocol bridge: device session, mode state machine, and the two
//! direction translators.
//!
//! Lock order is `session` → `wiring` → `controller_out`; the transport
//! callbacks only ever take the tail of that chain, so a lifecycle call can
//! tear down connections (joining callback threads) without deadlocking.

mod from_controller;
pub mod observer;
mod to_controller;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use crate::codec;
use crate::config::{MidiConfig, Mode};
use crate::error::GatewayError;
use crate::midi::{self, format_hex, MidiMessage};
use crate::pads::{self, PadTarget};
use crate::protocol::{self, LedUpdate};
use crate::transport::{DeviceDescriptor, InputConnection, MidiBackend, OutputConnection};
use observer::BridgeObserver;

/// Names of the five MIDI endpoints. `None` fields leave the previously
/// configured name in place.
#[derive(Debug, Clone, Default)]
pub struct DeviceSelection {
    pub host_in: Option<String>,
    pub host_out: Option<String>,
    pub host_out_native: Option<String>,
    pub controller_in: Option<String>,
    pub controller_out: Option<String>,
}

impl From<&MidiConfig> for DeviceSelection {
    fn from(midi: &MidiConfig) -> Self {
        Self {
            host_in: Some(midi.host_in.clone()),
            host_out: Some(midi.host_out.clone()),
            host_out_native: Some(midi.host_out_native.clone()),
            controller_in: Some(midi.controller_in.clone()),
            controller_out: Some(midi.controller_out.clone()),
        }
    }
}

/// Where the controller's input stream is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Session stopped; inbound controller messages are dropped.
    Idle,
    /// Program mode: translate grid events into the host's note/CC space.
    Translate,
    /// Native mode: forward the raw stream to the native host output.
    Passthrough,
}

/// Mode and controller-input routing. Both live under one lock and every
/// inbound controller message is handled entirely under it, so a message is
/// seen by exactly one route.
struct Wiring {
    mode: Mode,
    route: Route,
}

/// Endpoint names plus the connections held open for the session's lifetime.
struct Session {
    names: DeviceSelection,
    host_in: Option<Box<dyn InputConnection>>,
    controller_in: Option<Box<dyn InputConnection>>,
    running: bool,
}

/// The protocol bridge. Cheap to share; all state is interior.
pub struct Bridge {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn MidiBackend>,
    observer: RwLock<Option<Arc<dyn BridgeObserver>>>,
    session: Mutex<Session>,
    wiring: Mutex<Wiring>,
    host_out: Mutex<Option<Box<dyn OutputConnection>>>,
    host_out_native: Mutex<Option<Box<dyn OutputConnection>>>,
    /// Controller-output name and transaction gate. The port is opened,
    /// written, and closed per SysEx frame; the mutex serializes those
    /// transactions against concurrent LED updates and mode switches.
    controller_out: Mutex<Option<String>>,
}

impl Bridge {
    pub fn new(backend: Arc<dyn MidiBackend>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                observer: RwLock::new(None),
                session: Mutex::new(Session {
                    names: DeviceSelection::default(),
                    host_in: None,
                    controller_in: None,
                    running: false,
                }),
                wiring: Mutex::new(Wiring {
                    mode: Mode::Program,
                    route: Route::Idle,
                }),
                host_out: Mutex::new(None),
                host_out_native: Mutex::new(None),
                controller_out: Mutex::new(None),
            }),
        }
    }

    /// Attach the single status observer.
    pub fn set_observer(&self, observer: Arc<dyn BridgeObserver>) {
        *self.inner.observer.write() = Some(observer);
    }

    /// Stop any running session and take over the provided endpoint names.
    ///
    /// Every provided name is resolved against the transport's enumeration
    /// before any of them is committed; a resolution failure is reported via
    /// the observer and leaves the previous selection and the stopped state
    /// untouched.
    pub fn configure(&self, selection: DeviceSelection) {
        self.stop();
        if let Err(e) = self.inner.try_configure(selection) {
            warn!("configure failed: {}", e);
            self.inner.notify_connection_error();
        }
    }

    /// Open all endpoints and apply the current mode.
    ///
    /// On any open failure the observer is notified once and the session
    /// stays stopped with nothing held open.
    pub fn start(&self) {
        if let Err(e) = self.inner.clone().try_start() {
            warn!("start failed: {}", e);
            self.inner.notify_connection_error();
        }
    }

    /// Close the session. No-op when not running.
    ///
    /// A controller left in Program mode is reverted to Note mode first so
    /// the hardware keeps a usable display after disconnection.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Switch the controller mode. Takes effect live when running.
    pub fn set_mode(&self, mode: Mode) {
        let session = self.inner.session.lock();
        let mut wiring = self.inner.wiring.lock();
        wiring.mode = mode;
        if session.running {
            self.inner.apply_mode(&mut wiring);
        }
    }

    pub fn mode(&self) -> Mode {
        self.inner.wiring.lock().mode
    }

    pub fn is_running(&self) -> bool {
        self.inner.session.lock().running
    }

    /// Manual pad injection: a Note-On on channel 0 through the pad mapper,
    /// as if the grid cell had been pressed.
    pub fn press_pad(&self, pad: u8, velocity: u8) {
        self.inner.send_pad(midi::NOTE_ON, 0, pad, velocity);
    }
}

impl Inner {
    fn try_configure(&self, selection: DeviceSelection) -> Result<(), GatewayError> {
        let devices = self.backend.enumerate()?;

        resolve(&devices, selection.host_in.as_deref(), true)?;
        resolve(&devices, selection.controller_in.as_deref(), true)?;
        resolve(&devices, selection.host_out.as_deref(), false)?;
        resolve(&devices, selection.host_out_native.as_deref(), false)?;
        resolve(&devices, selection.controller_out.as_deref(), false)?;

        let mut session = self.session.lock();
        if selection.controller_out.is_some() {
            *self.controller_out.lock() = selection.controller_out.clone();
        }
        let names = &mut session.names;
        merge(&mut names.host_in, selection.host_in);
        merge(&mut names.host_out, selection.host_out);
        merge(&mut names.host_out_native, selection.host_out_native);
        merge(&mut names.controller_in, selection.controller_in);
        merge(&mut names.controller_out, selection.controller_out);
        debug!("endpoints configured: {:?}", names);
        Ok(())
    }

    fn try_start(self: Arc<Self>) -> Result<(), GatewayError> {
        let mut session = self.session.lock();
        if session.running {
            debug!("start ignored: already running");
            return Ok(());
        }

        let names = session.names.clone();
        let host_in = names.host_in.as_deref().ok_or_else(|| missing("host input"))?;
        let host_out = names
            .host_out
            .as_deref()
            .ok_or_else(|| missing("host output"))?;
        let host_out_native = names
            .host_out_native
            .as_deref()
            .ok_or_else(|| missing("native host output"))?;
        let controller_in = names
            .controller_in
            .as_deref()
            .ok_or_else(|| missing("controller input"))?;
        let controller_out = names
            .controller_out
            .as_deref()
            .ok_or_else(|| missing("controller output"))?;

        // open everything into locals first; an early return here must not
        // leave a partially started session behind
        let inner = Arc::clone(&self);
        let host_in_conn = self.backend.open_input(
            host_in,
            Box::new(move |_timestamp, bytes| to_controller::handle(&inner, bytes)),
        )?;
        let host_out_conn = self.backend.open_output(host_out)?;
        let host_out_native_conn = self.backend.open_output(host_out_native)?;
        let inner = Arc::clone(&self);
        let controller_in_conn = self.backend.open_input(
            controller_in,
            Box::new(move |_timestamp, bytes| from_controller::handle(&inner, bytes)),
        )?;
        // the controller output is opened per SysEx transaction; prove it
        // opens at all before declaring the session running
        drop(self.backend.open_output(controller_out)?);

        *self.host_out.lock() = Some(host_out_conn);
        *self.host_out_native.lock() = Some(host_out_native_conn);
        session.host_in = Some(host_in_conn);
        session.controller_in = Some(controller_in_conn);
        session.running = true;

        let mut wiring = self.wiring.lock();
        self.apply_mode(&mut wiring);
        info!("gateway started in {} mode", wiring.mode);
        Ok(())
    }

    fn stop(&self) {
        let mut session = self.session.lock();
        if !session.running {
            return;
        }

        {
            let mut wiring = self.wiring.lock();
            if wiring.mode == Mode::Program {
                // leave the hardware in its native display mode
                self.send_controller_sysex(protocol::NOTE_MODE_FRAME, &[]);
            }
            wiring.route = Route::Idle;
        }

        session.running = false;
        session.host_in = None;
        session.controller_in = None;
        *self.host_out.lock() = None;
        *self.host_out_native.lock() = None;
        info!("gateway stopped");
    }

    /// Send the mode-switch frame and swap the controller-input route, all
    /// under the wiring lock.
    fn apply_mode(&self, wiring: &mut Wiring) {
        match wiring.mode {
            Mode::Program => {
                self.send_controller_sysex(protocol::PROGRAM_MODE_FRAME, &[]);
                wiring.route = Route::Translate;
            }
            Mode::Native => {
                self.send_controller_sysex(protocol::NOTE_MODE_FRAME, &[]);
                wiring.route = Route::Passthrough;
            }
        }
        debug!("mode applied: {}", wiring.mode);
    }

    /// One transient open→send→close transaction on the controller output.
    ///
    /// The port is released on every exit path; the hardware expects
    /// discrete SysEx transactions rather than a long-lived writer.
    fn send_controller_sysex(&self, header: &str, payload: &[u8]) {
        let frame = match codec::build_sysex(header, payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("unusable SysEx template: {}", e);
                return;
            }
        };

        let gate = self.controller_out.lock();
        let Some(name) = gate.as_deref() else {
            debug!("controller output not configured; dropping SysEx");
            return;
        };

        match self.backend.open_output(name) {
            Ok(mut conn) => {
                debug!("controller TX: {}", format_hex(&frame));
                if let Err(e) = conn.send(&frame) {
                    warn!("controller SysEx send failed: {}", e);
                }
            }
            Err(e) => warn!("controller output unavailable: {}", e),
        }
    }

    /// Forward a pad event to the host output, partitioned by the pad mapper.
    fn send_pad(&self, command: u8, channel: u8, pad: u8, velocity: u8) {
        let msg = match pads::map(pad) {
            PadTarget::Note(note) => match command {
                midi::POLY_PRESSURE => MidiMessage::PolyPressure {
                    channel,
                    note,
                    pressure: velocity,
                },
                _ => MidiMessage::NoteOn {
                    channel,
                    note,
                    velocity,
                },
            },
            PadTarget::Control(cc) => MidiMessage::ControlChange {
                channel,
                cc,
                value: velocity,
            },
        };

        let bytes = msg.to_bytes();
        match self.host_out.lock().as_mut() {
            Some(conn) => {
                debug!("host TX: {} | {}", format_hex(&bytes), msg);
                if let Err(e) = conn.send(&bytes) {
                    warn!("host output send failed: {}", e);
                }
            }
            None => trace!("host output closed; dropping {}", msg),
        }
    }

    /// Forward raw controller bytes, unmodified, to the native host output.
    fn send_host_native(&self, bytes: &[u8]) {
        match self.host_out_native.lock().as_mut() {
            Some(conn) => {
                if let Err(e) = conn.send(bytes) {
                    warn!("native host output send failed: {}", e);
                }
            }
            None => trace!("native host output closed; dropping message"),
        }
    }

    fn observer(&self) -> Option<Arc<dyn BridgeObserver>> {
        self.observer.read().clone()
    }

    fn notify_connection_error(&self) {
        if let Some(observer) = self.observer() {
            observer.connection_error();
        }
    }

    fn notify_activity(&self) {
        if let Some(observer) = self.observer() {
            observer.activity();
        }
    }

    fn notify_pad_color(&self, led: LedUpdate) {
        if let Some(observer) = self.observer() {
            observer.pad_color(led);
        }
    }
}

fn missing(role: &str) -> GatewayError {
    GatewayError::DeviceUnavailable {
        name: role.to_string(),
        reason: "endpoint not configured".to_string(),
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

fn resolve(
    devices: &[DeviceDescriptor],
    name: Option<&str>,
    input: bool,
) -> Result<(), GatewayError> {
    let Some(name) = name else { return Ok(()) };
    let wanted = name.to_lowercase();
    let found = devices.iter().any(|d| {
        (if input { d.is_input } else { d.is_output }) && d.name.to_lowercase().contains(&wanted)
    });
    if found {
        Ok(())
    } else {
        Err(GatewayError::DeviceUnavailable {
            name: name.to_string(),
            reason: format!("no matching {} port", if input { "input" } else { "output" }),
        })
    }
}
