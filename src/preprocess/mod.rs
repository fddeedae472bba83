// Copyright @yucwang 2026

//! Preprocessing of 2D simulation fields before they are colour mapped or
//! stacked into a volume. Grids are `MatrixXF` indexed `(y, x)`.

pub mod divergence;
pub mod filters;
pub mod flow;
pub mod normals;
pub mod quantization;
pub mod slicing;

use crate::math::constants::{Float, MatrixXF};

use self::slicing::{FrameHistory, SlicingDirection};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreprocessSettings {
    pub quantization_bits: Option<u32>,
    pub gaussian_blur: bool,
    pub gradients: bool,
    pub slicing: Option<(SlicingDirection, usize)>,
    pub history_window: usize,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            quantization_bits: None,
            gaussian_blur: false,
            gradients: false,
            slicing: None,
            history_window: 64,
        }
    }
}

/// Runs quantization, blur, gradient extraction and slicing, in that order,
/// on each incoming frame.
pub struct Preprocessor {
    settings: PreprocessSettings,
    history: FrameHistory,
    clamp_range: Option<(Float, Float)>,
}

impl Preprocessor {
    pub fn new(settings: PreprocessSettings) -> Self {
        Self {
            history: FrameHistory::new(settings.history_window),
            settings,
            clamp_range: None,
        }
    }

    /// Colour-map range forced by quantization, if it ran.
    pub fn clamp_range(&self) -> Option<(Float, Float)> {
        self.clamp_range
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn apply(&mut self, frame: MatrixXF) -> MatrixXF {
        let mut values = frame;

        if let Some(bits) = self.settings.quantization_bits {
            let (quantized, levels) = quantization::quantize(&values, bits);
            values = quantized;
            self.clamp_range = Some((0.0, levels as Float));
        }

        if self.settings.gaussian_blur {
            values = filters::gaussian_blur(&values);
        }

        if self.settings.gradients {
            values = filters::sobel_gradients(&values).magnitude;
        }

        self.history.push(values.clone());

        if let Some((direction, index)) = self.settings.slicing {
            match self.history.slice(direction, index) {
                Some(slice) => values = slice,
                None => log::warn!("Slice {:?}[{}] is outside the stored history.", direction, index),
            }
        }

        values
    }
}
