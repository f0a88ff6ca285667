//! Gateway error taxonomy.

use thiserror::Error;

/// Errors surfaced by the transport and bridge layers.
///
/// Device failures during `configure`/`start` are caught at the bridge
/// boundary and reported once through the observer; they never propagate
/// past the public API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A named endpoint could not be resolved, opened, or written to.
    #[error("MIDI device unavailable: '{name}': {reason}")]
    DeviceUnavailable { name: String, reason: String },

    /// A token in a hex frame template did not start with two hex digits.
    #[error("malformed hex input: token '{token}'")]
    MalformedHexInput { token: String },
}
