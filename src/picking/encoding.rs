//! Packing of global pick indices into float color channels.
//!
//! Each of r, g, b carries 22 integer bits scaled into `[0, 1)`, which an
//! `f32` represents exactly. Index 0 is reserved for background.

/// Integer bits carried by one color channel.
pub const BITS_PER_CHANNEL: u32 = 22;

/// Largest encodable index. The high channel only needs 20 of its bits.
pub const MAX_PICK_INDEX: u64 = u64::MAX;

const CHANNEL_MASK: u64 = (1 << BITS_PER_CHANNEL) - 1;
const CHANNEL_SCALE: f32 = (1_u32 << BITS_PER_CHANNEL) as f32;

/// Encode a global pick index as an `[r, g, b]` color (low, mid, high).
#[must_use]
pub fn index_to_color(index: u64) -> [f32; 3] {
    let low = index & CHANNEL_MASK;
    let mid = (index >> BITS_PER_CHANNEL) & CHANNEL_MASK;
    let high = index >> (2 * BITS_PER_CHANNEL);
    [
        low as f32 / CHANNEL_SCALE,
        mid as f32 / CHANNEL_SCALE,
        high as f32 / CHANNEL_SCALE,
    ]
}

/// Decode an `[r, g, b]` color back to a global pick index.
///
/// Channels are rounded to the nearest integer step; negative or NaN
/// channels decode as zero.
#[must_use]
pub fn color_to_index(color: [f32; 3]) -> u64 {
    let [low, mid, high] = color.map(channel_value);
    low | (mid << BITS_PER_CHANNEL) | (high << (2 * BITS_PER_CHANNEL))
}

fn channel_value(c: f32) -> u64 {
    let v = (c * CHANNEL_SCALE).round();
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        (v as u64).min(CHANNEL_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_black() {
        assert_eq!(index_to_color(0), [0.0, 0.0, 0.0]);
        assert_eq!(color_to_index([0.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn channels_split_at_22_bits() {
        let i = 5 | (7 << 22) | (9 << 44);
        let c = index_to_color(i);
        assert_eq!(c[0] * CHANNEL_SCALE, 5.0);
        assert_eq!(c[1] * CHANNEL_SCALE, 7.0);
        assert_eq!(c[2] * CHANNEL_SCALE, 9.0);
        assert_eq!(color_to_index(c), i);
    }

    #[test]
    fn boundary_indices_survive() {
        for i in [1, CHANNEL_MASK, CHANNEL_MASK + 1, 1 << 44, MAX_PICK_INDEX] {
            assert_eq!(color_to_index(index_to_color(i)), i, "index {i}");
        }
    }

    #[test]
    fn small_drift_rounds_back() {
        let mut c = index_to_color(123_456);
        c[0] += 0.3 / CHANNEL_SCALE;
        assert_eq!(color_to_index(c), 123_456);
    }

    #[test]
    fn garbage_channels_decode_as_zero() {
        assert_eq!(color_to_index([f32::NAN, -1.0, 0.0]), 0);
    }
}
