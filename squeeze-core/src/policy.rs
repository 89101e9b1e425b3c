//! Preset-to-bitrate policy.
//!
//! Maps the source bitrate and the requested preset to a target bitrate by
//! dividing through a per-preset constant. The divisors are empirically
//! tuned values, not derived from content analysis, and must stay exactly
//! as listed for output compatibility across versions.

use crate::request::Preset;

/// The bitrate-reduction divisor for a preset.
pub fn divisor(preset: Preset) -> f64 {
    match preset {
        Preset::VeryLow => 1.3,
        Preset::Low => 1.6,
        Preset::Medium => 2.4,
        Preset::High => 3.2,
        Preset::VeryHigh => 4.4,
        Preset::Ultra => 5.6,
    }
}

/// Computes the target bitrate for an encode, truncated toward zero.
///
/// Pure: no I/O, no state. Well-formed input never fails.
pub fn target_bitrate(original_bps: u64, preset: Preset) -> u64 {
    (original_bps as f64 / divisor(preset)) as u64
}
