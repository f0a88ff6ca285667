//! In-memory transport used by the behavioral tests.
//!
//! Records every send per port, counts opens and closes, injects open
//! failures, and delivers synthetic input messages to subscribed handlers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::{DeviceDescriptor, InputConnection, InputHandler, MidiBackend, OutputConnection};
use crate::error::GatewayError;

#[derive(Default)]
struct State {
    devices: Vec<DeviceDescriptor>,
    fail_open: HashSet<String>,
    handlers: HashMap<String, Arc<Mutex<InputHandler>>>,
    sent: HashMap<String, Vec<Vec<u8>>>,
    opens: HashMap<String, usize>,
    closes: HashMap<String, usize>,
}

/// Shared-handle mock backend; clones observe the same state.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<State>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&self, name: &str, is_input: bool, is_output: bool) {
        self.state.lock().devices.push(DeviceDescriptor {
            name: name.to_string(),
            is_input,
            is_output,
        });
    }

    /// Make every subsequent open of `name` fail.
    pub fn fail_open(&self, name: &str) {
        self.state.lock().fail_open.insert(name.to_string());
    }

    /// Deliver a synthetic inbound message on an input port.
    ///
    /// Dropped silently when nothing is subscribed, like a real transport.
    pub fn deliver(&self, name: &str, bytes: &[u8]) {
        let handler = self.state.lock().handlers.get(name).cloned();
        match handler {
            // invoke outside the state lock: handlers re-enter the backend
            Some(handler) => {
                let mut handler = handler.lock();
                (*handler)(0, bytes);
            }
            None => trace!("mock delivery to closed port '{}'", name),
        }
    }

    /// Everything sent to an output port so far, oldest first.
    pub fn sent(&self, name: &str) -> Vec<Vec<u8>> {
        self.state.lock().sent.get(name).cloned().unwrap_or_default()
    }

    pub fn clear_sent(&self, name: &str) {
        self.state.lock().sent.remove(name);
    }

    pub fn opens(&self, name: &str) -> usize {
        self.state.lock().opens.get(name).copied().unwrap_or(0)
    }

    pub fn closes(&self, name: &str) -> usize {
        self.state.lock().closes.get(name).copied().unwrap_or(0)
    }
}

fn check_open(state: &mut State, name: &str, input: bool) -> Result<(), GatewayError> {
    let role_matches = state
        .devices
        .iter()
        .any(|d| d.name == name && (if input { d.is_input } else { d.is_output }));
    if !role_matches || state.fail_open.contains(name) {
        return Err(GatewayError::DeviceUnavailable {
            name: name.to_string(),
            reason: "mock open refused".to_string(),
        });
    }
    *state.opens.entry(name.to_string()).or_default() += 1;
    Ok(())
}

impl MidiBackend for MockBackend {
    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, GatewayError> {
        Ok(self.state.lock().devices.clone())
    }

    fn open_input(
        &self,
        name: &str,
        handler: InputHandler,
    ) -> Result<Box<dyn InputConnection>, GatewayError> {
        let mut state = self.state.lock();
        check_open(&mut state, name, true)?;
        state
            .handlers
            .insert(name.to_string(), Arc::new(Mutex::new(handler)));
        Ok(Box::new(MockInputConnection {
            state: self.state.clone(),
            name: name.to_string(),
        }))
    }

    fn open_output(&self, name: &str) -> Result<Box<dyn OutputConnection>, GatewayError> {
        let mut state = self.state.lock();
        check_open(&mut state, name, false)?;
        Ok(Box::new(MockOutputConnection {
            state: self.state.clone(),
            name: name.to_string(),
        }))
    }
}

struct MockInputConnection {
    state: Arc<Mutex<State>>,
    name: String,
}

impl InputConnection for MockInputConnection {}

impl Drop for MockInputConnection {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.handlers.remove(&self.name);
        *state.closes.entry(self.name.clone()).or_default() += 1;
    }
}

struct MockOutputConnection {
    state: Arc<Mutex<State>>,
    name: String,
}

impl OutputConnection for MockOutputConnection {
    fn send(&mut self, bytes: &[u8]) -> Result<(), GatewayError> {
        self.state
            .lock()
            .sent
            .entry(self.name.clone())
            .or_default()
            .push(bytes.to_vec());
        Ok(())
    }
}

impl Drop for MockOutputConnection {
    fn drop(&mut self) {
        *self
            .state
            .lock()
            .closes
            .entry(self.name.clone())
            .or_default() += 1;
    }
}
