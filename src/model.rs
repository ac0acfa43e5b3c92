use crate::dense::{dense, ParameterBundle};
use crate::error::{AqtError, Result};
use crate::quant::{self, QuantRange, BIT_WIDTH};
use crate::tensor::Matrix;
use std::fmt;

/// Runs `activation` through each bundle in order. An empty sequence is the identity.
pub fn forward(bundles: &[ParameterBundle], activation: &Matrix) -> Result<Matrix> {
    let mut x = activation.clone();
    for p in bundles { x = dense(p, &x)?; }
    Ok(x)
}

pub fn two_layer(first: &ParameterBundle, second: &ParameterBundle, activation: &Matrix) -> Result<Matrix> {
    let hidden = dense(first, activation)?;
    dense(second, &hidden)
}

/// `arange(30).reshape(5, 6) / 10.4`
pub fn example_activation() -> Matrix {
    Matrix::arange(5, 6).map(|v| v / 10.4)
}

pub fn example_params() -> Result<Vec<ParameterBundle>> {
    let b1 = (0..3).map(|i| i as f32 * 10.0).collect();
    let b2 = (0..9).map(|i| i as f32 * 3.0).collect();
    Ok(vec![
        ParameterBundle::new(Matrix::arange(6, 3).scale(0.001), b1, 5.0)?,
        ParameterBundle::new(Matrix::arange(3, 9).scale(0.01), b2, 5.0)?,
    ])
}

#[derive(Debug, Clone, PartialEq)]
pub struct AqtDenseModel {
    layers: Vec<ParameterBundle>,
}

impl AqtDenseModel {
    pub fn new(layers: Vec<ParameterBundle>) -> Result<Self> {
        if layers.is_empty() { return Err(AqtError::EmptyModel); }
        Ok(Self { layers })
    }

    pub fn example() -> Result<Self> { Self::new(example_params()?) }

    pub fn layers(&self) -> &[ParameterBundle] { &self.layers }

    pub fn forward(&self, activation: &Matrix) -> Result<Matrix> { forward(&self.layers, activation) }

    /// Specializes the model to `input` = (batch, features) and checks the
    /// shape chain without touching any activations.
    pub fn signature(&self, input: (usize, usize)) -> Result<ProgramSignature> {
        let (batch, mut features) = input;
        let mut layers = Vec::with_capacity(self.layers.len());
        for p in &self.layers {
            if p.in_features() != features {
                return Err(AqtError::ShapeMismatch { op: "matmul", expected: p.in_features(), actual: features });
            }
            let weight_scale = quant::weight_scale(p.weights(), QuantRange::INT8)?;
            layers.push(LayerSignature {
                input: (batch, features),
                weights: p.weights().shape(),
                output: (batch, p.out_features()),
                activation_scale: p.activation_scale(),
                weight_scale,
            });
            features = p.out_features();
        }
        Ok(ProgramSignature { input, output: (batch, features), layers })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSignature {
    pub input: (usize, usize),
    pub weights: (usize, usize),
    pub output: (usize, usize),
    pub activation_scale: f32,
    pub weight_scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSignature {
    pub input: (usize, usize),
    pub output: (usize, usize),
    pub layers: Vec<LayerSignature>,
}

fn shape_str(s: (usize, usize)) -> String { format!("f32[{}x{}]", s.0, s.1) }

impl fmt::Display for ProgramSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "compute_simulated(activation: {}) -> {}", shape_str(self.input), shape_str(self.output))?;
        for (i, l) in self.layers.iter().enumerate() {
            write!(f, "  layer {}: dense_int{} {} x {} -> {} (activation_scale={}, weight_scale={:.4})",
                i, BIT_WIDTH, shape_str(l.input), shape_str(l.weights), shape_str(l.output), l.activation_scale, l.weight_scale)?;
            if i + 1 < self.layers.len() { writeln!(f)?; }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_has_two_layers() {
        let m = AqtDenseModel::example().unwrap();
        assert_eq!(m.layers().len(), 2);
        assert_eq!(m.layers()[0].weights().shape(), (6, 3));
        assert_eq!(m.layers()[1].weights().shape(), (3, 9));
    }

    #[test]
    fn empty_model_rejected() {
        assert_eq!(AqtDenseModel::new(vec![]), Err(AqtError::EmptyModel));
    }

    #[test]
    fn empty_sequence_is_identity() {
        let x = example_activation();
        assert_eq!(forward(&[], &x).unwrap(), x);
    }
}
