//! Status observer surface exposed to an embedding UI.

use tracing::{debug, trace, warn};

use crate::protocol::LedUpdate;

/// Receives gateway status notifications.
///
/// All methods default to no-ops. Implementations must not block:
/// notifications are delivered synchronously from transport callbacks.
pub trait BridgeObserver: Send + Sync {
    /// A device failed to resolve or open during `configure`/`start`.
    fn connection_error(&self) {}

    /// A message arrived from the host (liveness indicator).
    fn activity(&self) {}

    /// A pad changed color during an RGB LED update.
    fn pad_color(&self, _led: LedUpdate) {}
}

/// Logs notifications through `tracing`; stands in for a status UI in
/// headless operation.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl BridgeObserver for ConsoleObserver {
    fn connection_error(&self) {
        warn!("gateway connection error; check device configuration");
    }

    fn activity(&self) {
        trace!("host activity");
    }

    fn pad_color(&self, led: LedUpdate) {
        debug!(
            "pad {} -> rgb({}, {}, {})",
            led.pad, led.red, led.green, led.blue
        );
    }
}
