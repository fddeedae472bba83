// Copyright @yucwang 2026

use crate::math::constants::{Float, MatrixXF};

/// Quantizes values to `bits` bits after normalizing them to the 8-bit
/// range by their maximum. Returns the quantized grid and its top level
/// `L = 2^bits - 1`, which becomes the clamping range of the colour map.
pub fn quantize(values: &MatrixXF, bits: u32) -> (MatrixXF, u32) {
    let bits = bits.max(1).min(8);
    let levels = (1u32 << bits) - 1;
    let max_value = values.iter().cloned().fold(0.0, Float::max);
    if !(max_value > 0.0) {
        return (MatrixXF::zeros(values.nrows(), values.ncols()), levels);
    }

    let quantized = values.map(|v| {
        let byte = ((v / max_value * 255.0).round().max(0.0).min(255.0)) as u32;
        (byte >> (8 - bits)) as Float
    });

    (quantized, levels)
}
