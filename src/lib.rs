// Simulated AQT quantized dense layers
pub mod error;
pub mod tensor;
pub mod quant;
pub mod dense;
pub mod model;
pub mod loader;

pub use dense::{dense, dense_with_range, ParameterBundle};
pub use error::{AqtError, Result};
pub use model::{forward, two_layer, AqtDenseModel, ProgramSignature};
pub use tensor::Matrix;
