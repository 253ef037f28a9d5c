//! Sequence model capability and the LSTM artifact codec
//!
//! The pipeline depends only on the `ForecastModel` capability; the shipped
//! variant is a stacked-LSTM regressor whose weights (and the training-time
//! scaler state) live in a small binary artifact. Loading is pure weight
//! deserialization: no graph reconstruction, no retraining, no code
//! execution.

use crate::error::{AppError, Result};
use crate::forecast::scaler::MinMaxScaler;
use crate::forecast::WINDOW_SIZE;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Artifact file magic
const MAGIC: &[u8; 4] = b"GHGM";
/// Current artifact format version
const FORMAT_VERSION: u16 = 1;
/// Upper bound on any single weight tensor's element count. Trained
/// artifacts hold a few thousand values per tensor; dimensions anywhere near
/// this bound mean a corrupt file, not a model.
const MAX_TENSOR_ELEMS: usize = 1 << 20;

/// Capability interface: one scaled window in, one scaled prediction out
///
/// `predict` is pure given a loaded artifact; it mutates nothing and is safe
/// to call repeatedly with different windows.
pub trait ForecastModel {
    fn predict(&self, window: &[f64]) -> Result<f64>;
}

// ============================================================================
// LSTM layers
// ============================================================================

/// One LSTM layer (weight-only, inference forward pass)
///
/// Gate order in all stacked weight rows: input, forget, cell, output.
#[derive(Debug, Clone, PartialEq)]
pub struct LstmLayer {
    pub input_size: usize,
    pub hidden_size: usize,
    /// Input weights, `4 * hidden_size` rows of `input_size`, row-major
    pub w_ih: Vec<f64>,
    /// Recurrent weights, `4 * hidden_size` rows of `hidden_size`, row-major
    pub w_hh: Vec<f64>,
    /// Bias, `4 * hidden_size`
    pub bias: Vec<f64>,
}

impl LstmLayer {
    /// Layer with all weights zero (useful as a deterministic test fixture)
    pub fn zeros(input_size: usize, hidden_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            w_ih: vec![0.0; 4 * hidden_size * input_size],
            w_hh: vec![0.0; 4 * hidden_size * hidden_size],
            bias: vec![0.0; 4 * hidden_size],
        }
    }

    /// Run the layer over a sequence, returning the hidden state per step
    fn run(&self, inputs: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let h_size = self.hidden_size;
        let mut h = vec![0.0; h_size];
        let mut c = vec![0.0; h_size];
        let mut outputs = Vec::with_capacity(inputs.len());

        for x in inputs {
            let mut pre = self.bias.clone();
            for (row, pre_v) in pre.iter_mut().enumerate() {
                let w_ih_row = &self.w_ih[row * self.input_size..(row + 1) * self.input_size];
                for (i, xv) in x.iter().enumerate() {
                    *pre_v += w_ih_row[i] * xv;
                }
                let w_hh_row = &self.w_hh[row * h_size..(row + 1) * h_size];
                for (j, hv) in h.iter().enumerate() {
                    *pre_v += w_hh_row[j] * hv;
                }
            }

            for j in 0..h_size {
                let i_gate = sigmoid(pre[j]);
                let f_gate = sigmoid(pre[h_size + j]);
                let g_cell = pre[2 * h_size + j].tanh();
                let o_gate = sigmoid(pre[3 * h_size + j]);

                c[j] = f_gate * c[j] + i_gate * g_cell;
                h[j] = o_gate * c[j].tanh();
            }

            outputs.push(h.clone());
        }

        outputs
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Stacked-LSTM sequence-to-one regressor
#[derive(Debug, Clone, PartialEq)]
pub struct LstmModel {
    pub layers: Vec<LstmLayer>,
    /// Dense head weights over the last layer's final hidden state
    pub dense_w: Vec<f64>,
    pub dense_b: f64,
}

impl ForecastModel for LstmModel {
    fn predict(&self, window: &[f64]) -> Result<f64> {
        if window.len() != WINDOW_SIZE {
            return Err(AppError::Model(format!(
                "window length {} does not match trained length {}",
                window.len(),
                WINDOW_SIZE
            )));
        }

        // Scalar series enters the first layer as length-1 feature vectors
        let mut sequence: Vec<Vec<f64>> = window.iter().map(|&v| vec![v]).collect();
        for layer in &self.layers {
            sequence = layer.run(&sequence);
        }

        let last = sequence
            .last()
            .ok_or_else(|| AppError::Model("model has no layers".to_string()))?;
        if last.len() != self.dense_w.len() {
            return Err(AppError::Model(format!(
                "dense head expects {} features, got {}",
                self.dense_w.len(),
                last.len()
            )));
        }

        let mut out = self.dense_b;
        for (w, h) in self.dense_w.iter().zip(last) {
            out += w * h;
        }
        Ok(out)
    }
}

// ============================================================================
// Artifact codec
// ============================================================================

/// Trained forecast artifact: the model plus its training-time scaler
///
/// Persisting the scaler alongside the weights is what keeps train/inference
/// parity: the pipeline applies this state verbatim instead of refitting on
/// live data.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastArtifact {
    pub scaler: MinMaxScaler,
    pub model: LstmModel,
}

impl ForecastArtifact {
    /// Load an artifact from disk (weight deserialization only)
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::ModelLoad(format!("cannot open artifact {}: {}", path.display(), e))
        })?;
        let mut reader = BufReader::new(file);

        Self::read_from(&mut reader)
            .map_err(|e| AppError::ModelLoad(format!("{}: {}", path.display(), e)))
    }

    /// Save the artifact to disk (used by the offline trainer)
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "bad artifact magic",
            ));
        }

        let version = reader.read_u16::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported artifact version {version}"),
            ));
        }

        let min = reader.read_f64::<LittleEndian>()?;
        let max = reader.read_f64::<LittleEndian>()?;
        let scaler = MinMaxScaler { min, max };

        let n_layers = reader.read_u16::<LittleEndian>()? as usize;
        let mut layers = Vec::with_capacity(n_layers);
        for _ in 0..n_layers {
            let input_size = reader.read_u32::<LittleEndian>()? as usize;
            let hidden_size = reader.read_u32::<LittleEndian>()? as usize;
            let w_ih = read_f64_vec(reader, tensor_len(&[4, hidden_size, input_size])?)?;
            let w_hh = read_f64_vec(reader, tensor_len(&[4, hidden_size, hidden_size])?)?;
            let bias = read_f64_vec(reader, tensor_len(&[4, hidden_size])?)?;
            layers.push(LstmLayer {
                input_size,
                hidden_size,
                w_ih,
                w_hh,
                bias,
            });
        }

        let dense_in = reader.read_u32::<LittleEndian>()? as usize;
        let dense_w = read_f64_vec(reader, tensor_len(&[dense_in])?)?;
        let dense_b = reader.read_f64::<LittleEndian>()?;

        Ok(Self {
            scaler,
            model: LstmModel {
                layers,
                dense_w,
                dense_b,
            },
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u16::<LittleEndian>(FORMAT_VERSION)?;

        writer.write_f64::<LittleEndian>(self.scaler.min)?;
        writer.write_f64::<LittleEndian>(self.scaler.max)?;

        writer.write_u16::<LittleEndian>(self.model.layers.len() as u16)?;
        for layer in &self.model.layers {
            writer.write_u32::<LittleEndian>(layer.input_size as u32)?;
            writer.write_u32::<LittleEndian>(layer.hidden_size as u32)?;
            write_f64_slice(writer, &layer.w_ih)?;
            write_f64_slice(writer, &layer.w_hh)?;
            write_f64_slice(writer, &layer.bias)?;
        }

        writer.write_u32::<LittleEndian>(self.model.dense_w.len() as u32)?;
        write_f64_slice(writer, &self.model.dense_w)?;
        writer.write_f64::<LittleEndian>(self.model.dense_b)?;

        Ok(())
    }
}

/// Element count of a weight tensor with the given dimensions
///
/// Dimensions come from the file, so the product is checked against both
/// overflow and `MAX_TENSOR_ELEMS` before anything is allocated.
fn tensor_len(dims: &[usize]) -> std::io::Result<usize> {
    let mut len = 1usize;
    for &dim in dims {
        len = len
            .checked_mul(dim)
            .filter(|&l| l <= MAX_TENSOR_ELEMS)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "weight dimensions out of range",
                )
            })?;
    }
    Ok(len)
}

fn read_f64_vec<R: Read>(reader: &mut R, len: usize) -> std::io::Result<Vec<f64>> {
    let mut out = vec![0.0; len];
    reader.read_f64_into::<LittleEndian>(&mut out)?;
    Ok(out)
}

fn write_f64_slice<W: Write>(writer: &mut W, values: &[f64]) -> std::io::Result<()> {
    for &v in values {
        writer.write_f64::<LittleEndian>(v)?;
    }
    Ok(())
}
