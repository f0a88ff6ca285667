//! Wire formats shared by the two protocol dialects.
//!
//! Frame templates are kept in the reference manual's hex notation and
//! decoded through [`crate::codec`]. These byte sequences are fixed by the
//! hardware and the host plugin; they must match exactly.

/// Switches the controller into Program mode (custom SysEx framing).
pub const PROGRAM_MODE_FRAME: &str = "F0h 00h 20h 29h 02h 0Ch 00h 7Fh F7h";

/// Switches the controller back to Note mode (native display).
pub const NOTE_MODE_FRAME: &str = "F0h 00h 20h 29h 02h 0Ch 00h 01h F7h";

/// Header of the aggregated RGB LED lighting frame sent to the controller.
pub const LED_LIGHTING_HEADER: &str = "F0h 00h 20h 29h 02h 0Ch 03h";

/// Offset of the sub-command byte within an inbound host SysEx frame.
pub const SUBCMD_OFFSET: usize = 6;

/// Sub-command: set layout. Intentionally inert, reserved for layout
/// switching.
pub const SUBCMD_SET_LAYOUT: u8 = 0x22;

/// Sub-command: set all LEDs. Intentionally inert, reserved.
pub const SUBCMD_SET_ALL_LEDS: u8 = 0x0E;

/// Sub-command: RGB LED update.
pub const SUBCMD_LED_RGB: u8 = 0x0B;

/// Per-pad opcode inside the LED lighting payload.
pub const LED_RGB_COMMAND: u8 = 0x03;

/// One pad's target color, already scaled from the host's 0-63 range into
/// the controller's 0-127 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedUpdate {
    pub pad: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}
