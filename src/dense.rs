use crate::error::{AqtError, Result};
use crate::quant::{self, QuantRange};
use crate::tensor::Matrix;
use log::debug;
use serde::{Deserialize, Serialize};

/// Weights `[in, out]`, bias `[out]` and the activation scale of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBundle")]
pub struct ParameterBundle {
    weights: Matrix,
    bias: Vec<f32>,
    activation_scale: f32,
}

#[derive(Deserialize)]
struct RawBundle {
    weights: Matrix,
    bias: Vec<f32>,
    activation_scale: f32,
}

impl TryFrom<RawBundle> for ParameterBundle {
    type Error = AqtError;
    fn try_from(r: RawBundle) -> Result<Self> { ParameterBundle::new(r.weights, r.bias, r.activation_scale) }
}

impl ParameterBundle {
    pub fn new(weights: Matrix, bias: Vec<f32>, activation_scale: f32) -> Result<Self> {
        if bias.len() != weights.cols() {
            return Err(AqtError::ShapeMismatch { op: "bias", expected: weights.cols(), actual: bias.len() });
        }
        if !(activation_scale.is_finite() && activation_scale > 0.0) {
            return Err(AqtError::NonPositiveScale(activation_scale));
        }
        Ok(Self { weights, bias, activation_scale })
    }

    pub fn weights(&self) -> &Matrix { &self.weights }
    pub fn bias(&self) -> &[f32] { &self.bias }
    pub fn activation_scale(&self) -> f32 { self.activation_scale }
    pub fn in_features(&self) -> usize { self.weights.rows() }
    pub fn out_features(&self) -> usize { self.weights.cols() }
}

/// Simulated 8-bit quantized dense layer.
pub fn dense(params: &ParameterBundle, activation: &Matrix) -> Result<Matrix> {
    dense_with_range(params, activation, QuantRange::INT8)
}

/// quantize -> integer matmul -> dequantize -> bias add, over `range`.
pub fn dense_with_range(params: &ParameterBundle, activation: &Matrix, range: QuantRange) -> Result<Matrix> {
    if activation.cols() != params.in_features() {
        return Err(AqtError::ShapeMismatch { op: "matmul", expected: params.in_features(), actual: activation.cols() });
    }
    if !activation.is_finite() { return Err(AqtError::NonFinite("activation")); }
    let a_scale = params.activation_scale;
    let a_q = quant::quantize_activation(activation, a_scale, range);

    let w_scale = quant::weight_scale(&params.weights, range)?;
    let w_q = quant::quantize_weights(&params.weights, w_scale);
    if log::log_enabled!(log::Level::Debug) {
        let sat = quant::count_saturated(activation, a_scale, range);
        debug!("dense {}x{} -> {}: activation_scale={} weight_scale={} saturated={}",
            activation.rows(), params.in_features(), params.out_features(), a_scale, w_scale, sat);
    }

    let scaled = a_q.matmul(&w_q)?;
    let denom = a_scale * w_scale;
    scaled.map(|v| v / denom).add_row_broadcast(&params.bias)
}
