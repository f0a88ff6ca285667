//! Host-originated SysEx frames, re-emitted as controller LED commands.

use tracing::{debug, trace};

use super::Inner;
use crate::midi::{format_hex, SYSEX_END};
use crate::protocol::{self, LedUpdate};

/// Handle one inbound message from the host's input stream.
pub(super) fn handle(inner: &Inner, bytes: &[u8]) {
    // frames without a sub-command byte are dropped before any notification
    if bytes.len() <= protocol::SUBCMD_OFFSET {
        debug!("host RX too short: {}", format_hex(bytes));
        return;
    }
    inner.notify_activity();

    match bytes[protocol::SUBCMD_OFFSET] {
        // layout selection stays with the mode machine
        protocol::SUBCMD_SET_LAYOUT => {}
        protocol::SUBCMD_SET_ALL_LEDS => {}
        protocol::SUBCMD_LED_RGB => forward_rgb(inner, bytes),
        other => trace!("host RX unhandled sub-command {:#04X}", other),
    }
}

/// Re-encode a host RGB update into one aggregated controller lighting
/// frame, notifying the observer per pad.
fn forward_rgb(inner: &Inner, bytes: &[u8]) {
    // between the header and the trailing F7: flat {index, r, g, b} groups
    // with components in the 0-63 range
    let first = protocol::SUBCMD_OFFSET + 1;
    let groups: &[u8] = if bytes.len() > first {
        &bytes[first..bytes.len() - 1]
    } else {
        &[]
    };

    let mut payload = Vec::with_capacity(groups.len() / 4 * 5 + 1);
    for group in groups.chunks_exact(4) {
        let led = LedUpdate {
            pad: group[0],
            red: 2 * group[1],
            green: 2 * group[2],
            blue: 2 * group[3],
        };
        payload.extend_from_slice(&[
            protocol::LED_RGB_COMMAND,
            led.pad,
            led.red,
            led.green,
            led.blue,
        ]);
        inner.notify_pad_color(led);
    }
    payload.push(SYSEX_END);

    inner.send_controller_sysex(protocol::LED_LIGHTING_HEADER, &payload);
}
