//! Status light encoding
//!
//! Stateless writers for the controller's indicators. Each call emits the
//! outgoing message(s) immediately; nothing is retained or deduplicated —
//! the device tolerates redundant writes and the dispatch volume is tiny.

use crate::engine::MidiSender;
use crate::registry::chan;

/// Two-level light on value (maximum intensity)
pub const ON: u8 = 0x7F;
/// Two-level light off value
pub const OFF: u8 = 0x00;

/// VU meter address on each mixing channel's CC sub-channel
pub const VU_METER: u8 = 0x02;
/// Calibration constant mapping a 0.0-1.0 level onto the meter's scale
pub const VU_ADJUST: f64 = 125.0;

/// Loop indicator address on each mixing channel
pub const RELOOP: u8 = 0x14;
/// The loop indicator's shift-layer counterpart
pub const RELOOP_SHIFT: u8 = 0x50;

/// FX slot light addresses, indexed by slot (1-3)
pub const FX_SLOT: [u8; 3] = [0x70, 0x71, 0x72];
/// Shift-layer counterparts of the FX slot lights
pub const FX_SLOT_SHIFT: [u8; 3] = [0x63, 0x06, 0x07];

/// Set a two-level indicator at an address
pub fn set_indicator(out: &mut impl MidiSender, status: u8, address: u8, active: bool) {
    out.send(status, address, if active { ON } else { OFF });
}

/// Drive a channel's VU meter from a 0.0-1.0 level
pub fn set_vu_meter(out: &mut impl MidiSender, channel: u8, level: f64) {
    let scaled = (level * VU_ADJUST).round().clamp(0.0, 127.0) as u8;
    out.send(chan::CONTROL + channel, VU_METER, scaled);
}

/// Light or clear a channel's loop indicator
///
/// One logical loop state drives two physical LEDs (base and shift layer),
/// so the same value goes to both addresses.
pub fn set_reloop_light(out: &mut impl MidiSender, channel: u8, active: bool) {
    set_indicator(out, chan::NOTE + channel, RELOOP, active);
    set_indicator(out, chan::NOTE + channel, RELOOP_SHIFT, active);
}

/// Light or clear one FX slot, fixed and shifted addresses together
pub fn set_fx_light(out: &mut impl MidiSender, unit: u8, slot: u8, active: bool) {
    let status = chan::NOTE + chan::FX1 + (unit - 1);
    let idx = usize::from(slot - 1);
    set_indicator(out, status, FX_SLOT[idx], active);
    set_indicator(out, status, FX_SLOT_SHIFT[idx], active);
}
