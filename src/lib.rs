//! Gateway bridging a Launchpad X grid controller with a DAW's custom
//! note/SysEx control protocol.
//!
//! The bridge translates pad presses into the host's note/CC vocabulary,
//! re-emits host LED frames as controller lighting commands, and manages the
//! controller's Native/Program display mode.

pub mod bridge;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod midi;
pub mod pads;
pub mod protocol;
pub mod transport;
