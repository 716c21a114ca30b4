//! Per-control-class value decoding
//!
//! Pure transforms from raw 7-bit message values to engine-ready numbers:
//! pad-index extraction, the 14-bit MSB/LSB tempo slider, jog wheel deltas,
//! and the tempo-range cycle. The scratch physics constants live here too;
//! they are tuned for feel parity and must not drift.

/// Jog wheel rest point; values below it are reverse motion, above forward
pub const JOG_CENTER: i32 = 64;
/// Pitch-bend scale applied to jog deltas outside a scratch session
pub const BEND_SCALE: f64 = 0.8;
/// Scale for shift-held jog motion (fast seek through the track)
pub const FAST_SEEK_SCALE: f64 = 150.0;

/// Scratch session physics: ticks per wheel revolution
pub const SCRATCH_TICKS_PER_REV: u32 = 720;
/// Scratch session physics: reference platter speed
pub const SCRATCH_RPM: f64 = 33.0 + 1.0 / 3.0;
/// Scratch smoothing alpha (responsiveness)
pub const SCRATCH_ALPHA: f64 = 1.0 / 8.0;
/// Scratch smoothing beta (latency damping)
pub const SCRATCH_BETA: f64 = SCRATCH_ALPHA / 32.0;

/// Allowed rate-range magnitudes, in cycle order
pub const TEMPO_RANGES: [f64; 4] = [0.06, 0.10, 0.16, 0.25];

/// Extract the 1-based pad number from a pad control address
///
/// Pad addresses encode the pad in the low nibble (`0xMP`, M = mode,
/// P = pad index).
pub fn pad_number(address: u8) -> u8 {
    (address & 0x0F) + 1
}

/// Combine a stored MSB with an incoming LSB into a 14-bit value
pub fn high_res_value(msb: u8, lsb: u8) -> u16 {
    (u16::from(msb) << 7) + u16::from(lsb)
}

/// Map a 14-bit tempo slider value to a rate adjustment
///
/// Inverted so hardware "up" and on-screen "up" agree regardless of the
/// engine's configured rate direction.
pub fn rate_from_high_res(full: u16) -> f64 {
    1.0 - f64::from(full) / f64::from(0x2000u16)
}

/// Signed jog delta relative to the wheel's rest point
pub fn jog_delta(value: u8) -> i32 {
    i32::from(value) - JOG_CENTER
}

/// Advance to the next rate-range magnitude, wrapping after the last
///
/// A current value not in the list yields the first entry.
pub fn next_tempo_range(current: f64) -> f64 {
    let mut idx = 0;
    for (i, range) in TEMPO_RANGES.iter().enumerate() {
        if (current - range).abs() < f64::EPSILON {
            idx = (i + 1) % TEMPO_RANGES.len();
            break;
        }
    }
    TEMPO_RANGES[idx]
}
