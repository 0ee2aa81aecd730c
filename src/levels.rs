//! Analyser level math: byte buffers to dBFS, dBFS to the 0-80 display scale.

/// Lowest level reported, in dB. Silence and empty buffers land here.
pub const DB_FLOOR: f64 = -80.0;

/// Stand-in RMS for silence so `log10` stays finite.
pub const SILENCE_RMS: f64 = 0.0001;

/// Exponent applied to the normalized level (< 1 lifts quiet signals).
pub const LEVEL_BOOST: f64 = 0.6;

/// Top of the display scale.
pub const LEVEL_SCALE: f64 = 80.0;

/// Round half-up to one decimal place.
///
/// Halves go towards positive infinity, so `-12.25` becomes `-12.2`.
pub fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Level in dBFS of an analyser's byte time-domain buffer.
///
/// Computes the RMS of the raw byte values, normalizes it by 255 and converts
/// it to decibels. The result is rounded to one decimal and never below
/// [`DB_FLOOR`]; an all-255 buffer gives exactly 0.
pub fn db_from_analyser(samples: &[u8]) -> f64 {
    if samples.is_empty() {
        return DB_FLOOR;
    }

    let sum: u64 = samples.iter().map(|&s| u64::from(s) * u64::from(s)).sum();
    let rms = (sum as f64 / samples.len() as f64).sqrt() / 255.0;
    let rms = if rms == 0.0 { SILENCE_RMS } else { rms };

    let db = 20.0 * rms.log10();
    round_tenth(db).max(DB_FLOOR)
}

/// Map a dB value onto the 0-80 meter scale with a perceptual boost.
pub fn db_to_level(db: f64) -> f64 {
    let norm = ((db - DB_FLOOR) / -DB_FLOOR).clamp(0.0, 1.0);
    let boosted = norm.powf(LEVEL_BOOST);
    round_tenth(boosted * LEVEL_SCALE)
}

/// dBFS per analyser frame of a raw 8-bit capture.
///
/// The capture is cut into `frame_size`-byte frames; a shorter trailing frame
/// is measured as is. A zero frame size yields no frames.
pub fn frame_dbs(capture: &[u8], frame_size: usize) -> Vec<f64> {
    if frame_size == 0 {
        return Vec::new();
    }
    capture.chunks(frame_size).map(db_from_analyser).collect()
}

/// Display levels (0-80) per analyser frame, see [`frame_dbs`].
pub fn frame_levels(capture: &[u8], frame_size: usize) -> Vec<f64> {
    frame_dbs(capture, frame_size)
        .into_iter()
        .map(db_to_level)
        .collect()
}

/// Whole seconds of audio before frame `index` starts
pub fn frame_offset_secs(index: usize, frame_size: usize, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    (index as u64 * frame_size as u64) / u64::from(sample_rate)
}
