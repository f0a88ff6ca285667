//! MIDI transport abstraction.
//!
//! The bridge is written against a small backend trait so the behavioral
//! tests can run against an in-memory transport; [`MidirBackend`] is the
//! production implementation.
//!
//! [`MidirBackend`]: midir_backend::MidirBackend

pub mod midir_backend;
#[cfg(test)]
pub mod mock;

use crate::error::GatewayError;

/// A MIDI port visible to the platform transport.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    pub name: String,
    pub is_input: bool,
    pub is_output: bool,
}

/// Callback invoked for every message arriving on an open input port.
///
/// Arguments are the transport timestamp in microseconds and the raw bytes.
/// Invocations may be concurrent across ports but are sequential per port.
pub type InputHandler = Box<dyn FnMut(u64, &[u8]) + Send + 'static>;

/// Platform MIDI I/O surface consumed by the bridge.
pub trait MidiBackend: Send + Sync {
    /// Enumerate all ports currently visible to the transport.
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, GatewayError>;

    /// Open the first input port matching `name` and subscribe `handler` to
    /// its message stream.
    fn open_input(
        &self,
        name: &str,
        handler: InputHandler,
    ) -> Result<Box<dyn InputConnection>, GatewayError>;

    /// Open the first output port matching `name`.
    fn open_output(&self, name: &str) -> Result<Box<dyn OutputConnection>, GatewayError>;
}

/// An open input subscription. Dropping the connection closes the port.
pub trait InputConnection: Send {}

/// An open output port. Dropping the connection closes the port.
pub trait OutputConnection: Send {
    fn send(&mut self, bytes: &[u8]) -> Result<(), GatewayError>;
}

/// Print the transport's current port list.
pub fn list_ports_formatted(backend: &dyn MidiBackend) {
    use colored::*;

    println!("\n{}", "=== Available MIDI Ports ===".bold().cyan());

    let devices = match backend.enumerate() {
        Ok(devices) => devices,
        Err(e) => {
            println!("  {}", format!("enumeration failed: {}", e).red());
            return;
        }
    };

    println!("\n{}", "Input Ports:".bold());
    let inputs: Vec<_> = devices.iter().filter(|d| d.is_input).collect();
    if inputs.is_empty() {
        println!("  {}", "No input ports found".dimmed());
    } else {
        for device in inputs {
            println!("  {}", device.name);
        }
    }

    println!("\n{}", "Output Ports:".bold());
    let outputs: Vec<_> = devices.iter().filter(|d| d.is_output).collect();
    if outputs.is_empty() {
        println!("  {}", "No output ports found".dimmed());
    } else {
        for device in outputs {
            println!("  {}", device.name);
        }
    }

    println!();
}
