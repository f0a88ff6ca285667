//! `midir`-backed production transport.

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use tracing::debug;

use super::{DeviceDescriptor, InputConnection, InputHandler, MidiBackend, OutputConnection};
use crate::error::GatewayError;

const CLIENT_NAME: &str = "lpx-gw";

/// Opens real ports through the platform MIDI service.
///
/// Port names are matched case-insensitively as substrings, which keeps
/// configs portable across OSes that decorate port names differently.
#[derive(Debug, Default)]
pub struct MidirBackend;

impl MidirBackend {
    pub fn new() -> Self {
        Self
    }
}

fn unavailable(name: &str, reason: impl ToString) -> GatewayError {
    GatewayError::DeviceUnavailable {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn matches(port_name: &str, wanted: &str) -> bool {
    port_name.to_lowercase().contains(&wanted.to_lowercase())
}

impl MidiBackend for MidirBackend {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, GatewayError> {
        let midi_in =
            MidiInput::new(CLIENT_NAME).map_err(|e| unavailable("input scanner", e))?;
        let midi_out =
            MidiOutput::new(CLIENT_NAME).map_err(|e| unavailable("output scanner", e))?;

        let mut devices: Vec<DeviceDescriptor> = Vec::new();

        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                devices.push(DeviceDescriptor {
                    name,
                    is_input: true,
                    is_output: false,
                });
            }
        }

        for port in midi_out.ports() {
            if let Ok(name) = midi_out.port_name(&port) {
                if let Some(existing) = devices.iter_mut().find(|d| d.name == name) {
                    existing.is_output = true;
                } else {
                    devices.push(DeviceDescriptor {
                        name,
                        is_input: false,
                        is_output: true,
                    });
                }
            }
        }

        Ok(devices)
    }

    fn open_input(
        &self,
        name: &str,
        mut handler: InputHandler,
    ) -> Result<Box<dyn InputConnection>, GatewayError> {
        let mut midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| unavailable(name, e))?;
        // the host's LED frames are SysEx; midir filters them out by default
        midi_in.ignore(Ignore::None);

        let port = midi_in
            .ports()
            .into_iter()
            .find(|p| {
                midi_in
                    .port_name(p)
                    .map(|n| matches(&n, name))
                    .unwrap_or(false)
            })
            .ok_or_else(|| unavailable(name, "no matching input port"))?;

        let conn = midi_in
            .connect(
                &port,
                CLIENT_NAME,
                move |timestamp, bytes, _| handler(timestamp, bytes),
                (),
            )
            .map_err(|e| unavailable(name, e))?;

        debug!("input port opened: '{}'", name);
        Ok(Box::new(MidirInputConnection { _conn: conn }))
    }

    fn open_output(&self, name: &str) -> Result<Box<dyn OutputConnection>, GatewayError> {
        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| unavailable(name, e))?;

        let port = midi_out
            .ports()
            .into_iter()
            .find(|p| {
                midi_out
                    .port_name(p)
                    .map(|n| matches(&n, name))
                    .unwrap_or(false)
            })
            .ok_or_else(|| unavailable(name, "no matching output port"))?;

        let conn = midi_out
            .connect(&port, CLIENT_NAME)
            .map_err(|e| unavailable(name, e))?;

        debug!("output port opened: '{}'", name);
        Ok(Box::new(MidirOutputConnection {
            name: name.to_string(),
            conn,
        }))
    }
}

struct MidirInputConnection {
    _conn: MidiInputConnection<()>,
}

impl InputConnection for MidirInputConnection {}

struct MidirOutputConnection {
    name: String,
    conn: MidiOutputConnection,
}

impl OutputConnection for MidirOutputConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<(), GatewayError> {
        self.conn
            .send(bytes)
            .map_err(|e| unavailable(&self.name, e))
    }
}
