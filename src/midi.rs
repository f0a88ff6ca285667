//! MIDI message parsing, encoding, and byte formatting.

use std::fmt;

/// Command nibble: Note Off.
pub const NOTE_OFF: u8 = 0x80;
/// Command nibble: Note On.
pub const NOTE_ON: u8 = 0x90;
/// Command nibble: Polyphonic Key Pressure.
pub const POLY_PRESSURE: u8 = 0xA0;
/// Command nibble: Control Change.
pub const CONTROL_CHANGE: u8 = 0xB0;

/// System Exclusive frame start.
pub const SYSEX_START: u8 = 0xF0;
/// System Exclusive frame terminator.
pub const SYSEX_END: u8 = 0xF7;

/// Parsed view of the MIDI messages the gateway routes.
///
/// Ephemeral — constructed per incoming message, never retained. Anything
/// the bridge does not translate stays out of this enum and is handled (or
/// dropped) as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },

    /// Note On: channel (0-15), note (0-127), velocity (0-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },

    /// Polyphonic Key Pressure: channel (0-15), note (0-127), pressure (0-127)
    PolyPressure { channel: u8, note: u8, pressure: u8 },

    /// Control Change: channel (0-15), cc (0-127), value (0-127)
    ControlChange { channel: u8, cc: u8, value: u8 },

    /// System Exclusive payload (without the F0/F7 delimiters)
    SysEx { data: Vec<u8> },
}

impl MidiMessage {
    /// Parse a MIDI message from raw bytes.
    ///
    /// Returns `None` for running-status data, truncated messages, and
    /// message kinds the gateway does not route.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let status = *data.first()?;

        // running status is never produced by the transports we bridge
        if status < 0x80 {
            return None;
        }

        if status < 0xF0 {
            if data.len() < 3 {
                return None;
            }
            let channel = status & 0x0F;
            let data1 = data[1] & 0x7F;
            let data2 = data[2] & 0x7F;

            match status & 0xF0 {
                NOTE_OFF => Some(MidiMessage::NoteOff {
                    channel,
                    note: data1,
                    velocity: data2,
                }),
                // velocity 0 stays a note-on; the host distinguishes
                // releases itself
                NOTE_ON => Some(MidiMessage::NoteOn {
                    channel,
                    note: data1,
                    velocity: data2,
                }),
                POLY_PRESSURE => Some(MidiMessage::PolyPressure {
                    channel,
                    note: data1,
                    pressure: data2,
                }),
                CONTROL_CHANGE => Some(MidiMessage::ControlChange {
                    channel,
                    cc: data1,
                    value: data2,
                }),
                _ => None,
            }
        } else if status == SYSEX_START {
            let end = data.iter().position(|&b| b == SYSEX_END)?;
            Some(MidiMessage::SysEx {
                data: data[1..end].to_vec(),
            })
        } else {
            None
        }
    }

    /// Encode the message to wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![NOTE_OFF | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![NOTE_ON | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::PolyPressure {
                channel,
                note,
                pressure,
            } => vec![
                POLY_PRESSURE | (channel & 0x0F),
                note & 0x7F,
                pressure & 0x7F,
            ],
            MidiMessage::ControlChange { channel, cc, value } => {
                vec![CONTROL_CHANGE | (channel & 0x0F), cc & 0x7F, value & 0x7F]
            }
            MidiMessage::SysEx { ref data } => {
                let mut bytes = Vec::with_capacity(data.len() + 2);
                bytes.push(SYSEX_START);
                bytes.extend_from_slice(data);
                bytes.push(SYSEX_END);
                bytes
            }
        }
    }

    /// Channel for channel messages (0-15), `None` for SysEx.
    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOff { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::PolyPressure { channel, .. }
            | MidiMessage::ControlChange { channel, .. } => Some(channel),
            MidiMessage::SysEx { .. } => None,
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => write!(f, "NoteOff ch:{} n:{} v:{}", channel + 1, note, velocity),
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => write!(f, "NoteOn ch:{} n:{} v:{}", channel + 1, note, velocity),
            MidiMessage::PolyPressure {
                channel,
                note,
                pressure,
            } => write!(f, "PolyPressure ch:{} n:{} p:{}", channel + 1, note, pressure),
            MidiMessage::ControlChange { channel, cc, value } => {
                write!(f, "CC ch:{} cc:{} v:{}", channel + 1, cc, value)
            }
            MidiMessage::SysEx { ref data } => write!(f, "SysEx {} bytes", data.len()),
        }
    }
}

/// Format MIDI bytes as a hex string for logging.
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
