use crate::dense::ParameterBundle;
use crate::error::AqtError;
use crate::model::AqtDenseModel;
use crate::tensor::Matrix;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelFile {
    pub version: u32,
    pub layers: Vec<ParameterBundle>,
}

impl ModelFile {
    pub fn from_model(model: &AqtDenseModel) -> Self {
        Self { version: FORMAT_VERSION, layers: model.layers().to_vec() }
    }

    pub fn into_model(self) -> Result<AqtDenseModel> {
        if self.version != FORMAT_VERSION {
            return Err(AqtError::UnsupportedVersion(self.version).into());
        }
        Ok(AqtDenseModel::new(self.layers)?)
    }
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<AqtDenseModel> {
    // JSON layout:
    // { "version": 1,
    //   "layers": [ { "weights": [[f32; out]; in], "bias": [f32; out], "activation_scale": f32 }, ... ] }
    let f = File::open(&path).with_context(|| format!("open model file: {}", path.as_ref().display()))?;
    let file: ModelFile = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse model file: {}", path.as_ref().display()))?;
    file.into_model().with_context(|| format!("validate model file: {}", path.as_ref().display()))
}

pub fn save_model<P: AsRef<Path>>(model: &AqtDenseModel, path: P) -> Result<()> {
    let f = File::create(&path).with_context(|| format!("create model file: {}", path.as_ref().display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &ModelFile::from_model(model)).context("write model json")?;
    w.flush().context("flush model file")?;
    Ok(())
}

/// Activation files hold a nested-row array, e.g. `[[0.0, 1.0], [2.0, 3.0]]`.
pub fn load_activation<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    let f = File::open(&path).with_context(|| format!("open activation file: {}", path.as_ref().display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse activation file: {}", path.as_ref().display()))
}
