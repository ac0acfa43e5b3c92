//! Symmetric fixed-point quantization helpers.

use crate::error::{AqtError, Result};
use crate::tensor::Matrix;

pub const BIT_WIDTH: u32 = 8;

/// Symmetric signed range `[-(2^(b-1) - 1), 2^(b-1) - 1]`. The most negative
/// two's-complement value is left out so the range stays symmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantRange {
    lower: f32,
    upper: f32,
}

impl QuantRange {
    pub const INT8: QuantRange = QuantRange { lower: -127.0, upper: 127.0 };

    pub fn symmetric(bits: u32) -> Result<Self> {
        // f32 represents every integer up to 2^24 exactly
        if !(2..=24).contains(&bits) { return Err(AqtError::UnsupportedBitWidth(bits)); }
        let upper = ((1u32 << (bits - 1)) - 1) as f32;
        Ok(Self { lower: -upper, upper })
    }

    pub fn lower(&self) -> f32 { self.lower }
    pub fn upper(&self) -> f32 { self.upper }

    #[inline]
    pub fn clip(&self, x: f32) -> f32 { x.clamp(self.lower, self.upper) }

    #[inline]
    pub fn contains(&self, x: f32) -> bool { x >= self.lower && x <= self.upper }
}

/// `floor(x + 0.5)`: halves round toward +inf, so -0.5 -> 0 and -1.5 -> -1.
#[inline]
pub fn round_half_up(x: f32) -> f32 { (x + 0.5).floor() }

/// Scale, round and clip activations onto the integer grid.
pub fn quantize_activation(activation: &Matrix, activation_scale: f32, range: QuantRange) -> Matrix {
    activation.map(|v| range.clip(round_half_up(v * activation_scale)))
}

/// Per-tensor scale mapping the largest weight magnitude onto `range.upper`.
pub fn weight_scale(weights: &Matrix, range: QuantRange) -> Result<f32> {
    if !weights.is_finite() { return Err(AqtError::NonFinite("weights")); }
    let max_abs = weights.max_abs();
    if max_abs == 0.0 { return Err(AqtError::DegenerateWeights); }
    let s = range.upper / max_abs;
    if !s.is_finite() { return Err(AqtError::DegenerateWeights); }
    Ok(s)
}

/// Scale and round weights. No clip: the scale already bounds them.
pub fn quantize_weights(weights: &Matrix, weight_scale: f32) -> Matrix {
    weights.map(|v| round_half_up(v * weight_scale))
}

/// Number of elements the clip step actually moved.
pub fn count_saturated(activation: &Matrix, activation_scale: f32, range: QuantRange) -> usize {
    activation.as_slice().iter().filter(|&&v| !range.contains(round_half_up(v * activation_scale))).count()
}
