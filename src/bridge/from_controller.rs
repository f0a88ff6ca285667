//! Controller-originated events, translated into the host's vocabulary.

use tracing::trace;

use super::{Inner, Route};
use crate::midi::{self, format_hex, MidiMessage};

/// Handle one inbound message from the controller's input stream.
///
/// The whole message is processed under the wiring lock so a concurrent
/// mode switch can never split it between routes.
pub(super) fn handle(inner: &Inner, bytes: &[u8]) {
    let wiring = inner.wiring.lock();
    match wiring.route {
        Route::Idle => trace!("controller RX while stopped: {}", format_hex(bytes)),
        Route::Passthrough => inner.send_host_native(bytes),
        Route::Translate => translate(inner, bytes),
    }
}

fn translate(inner: &Inner, bytes: &[u8]) {
    match MidiMessage::parse(bytes) {
        Some(MidiMessage::NoteOn {
            channel,
            note,
            velocity,
        }) => inner.send_pad(midi::NOTE_ON, channel, note, velocity),
        Some(MidiMessage::PolyPressure {
            channel,
            note,
            pressure,
        }) => inner.send_pad(midi::POLY_PRESSURE, channel, note, pressure),
        // grid events arriving as CC (the top row) are forced into note
        // space on the host side; the raw data byte is kept as the pad
        Some(MidiMessage::ControlChange { channel, cc, value }) => {
            inner.send_pad(midi::NOTE_ON, channel, cc, value)
        }
        _ => trace!("controller RX ignored: {}", format_hex(bytes)),
    }
}
