use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::gradient::ColorRamp;
use crate::grid::SampledField;

// How raw samples become 8-bit texels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Quantization {
    // normalize by the observed range, remap through the ramp, keep red
    Gradient {
        #[serde(default)]
        ramp: ColorRamp,
    },
    // floor(v * 255) on raw samples, saturating outside [0, 1]
    Linear,
}

impl Default for Quantization {
    fn default() -> Self {
        Quantization::Gradient {
            ramp: ColorRamp::default(),
        }
    }
}

impl Quantization {
    pub fn validate(&self) -> Result<()> {
        match self {
            Quantization::Gradient { ramp } => ramp.validate(),
            Quantization::Linear => Ok(()),
        }
    }
}

#[inline]
fn to_byte(v: f64) -> u8 {
    // `as` saturates and maps NaN to 0
    (v * 255.0).floor() as u8
}

// Convert a sampled field to one byte per sample, in the same order
pub fn quantize(field: &SampledField, quantization: &Quantization) -> Result<Vec<u8>> {
    match quantization {
        Quantization::Gradient { ramp } => {
            field.check_range().inspect_err(|e| {
                warn!(min = field.min, max = field.max, "{e}");
            })?;
            let sampler = ramp.compile()?;
            let bytes = field
                .normalized()?
                .into_iter()
                .map(|t| to_byte(f64::from(sampler.intensity(t))))
                .collect();
            Ok(bytes)
        }
        Quantization::Linear => Ok(field.values.iter().map(|&v| to_byte(v)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoiseError;
    use crate::gradient::{ColorKey, GradientMode};

    fn field(values: Vec<f64>) -> SampledField {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        SampledField {
            size: 2,
            values,
            min,
            max,
        }
    }

    #[test]
    fn gradient_spans_full_byte_range() {
        let f = field(vec![-3.0, -1.0, 0.0, 1.0, 2.0, 2.5, 4.0, 5.0]);
        let bytes = quantize(&f, &Quantization::default()).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[7], 255);
        assert!(bytes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn degenerate_range_aborts() {
        let f = field(vec![0.5; 8]);
        assert_eq!(
            quantize(&f, &Quantization::default()),
            Err(NoiseError::DegenerateRange { value: 0.5 })
        );
    }

    #[test]
    fn infinite_sample_aborts() {
        let f = field(vec![0.0, 0.1, 0.2, f64::INFINITY, 0.3, 0.4, 0.5, 0.6]);
        assert_eq!(
            quantize(&f, &Quantization::default()),
            Err(NoiseError::NonFiniteRange {
                min: 0.0,
                max: f64::INFINITY
            })
        );
    }

    #[test]
    fn ramp_shapes_output() {
        // inverted ramp
        let ramp = ColorRamp::new(
            vec![ColorKey::gray(0.0, 1.0), ColorKey::gray(1.0, 0.0)],
            GradientMode::Blend,
        )
        .unwrap();
        let f = field(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let bytes = quantize(&f, &Quantization::Gradient { ramp }).unwrap();
        assert_eq!(bytes, vec![255, 0, 255, 0, 255, 0, 255, 0]);
    }

    #[test]
    fn linear_passthrough_saturates() {
        let f = field(vec![-0.5, 0.0, 0.25, 0.5, 0.999, 1.0, 1.5, f64::NAN]);
        let bytes = quantize(&f, &Quantization::Linear).unwrap();
        assert_eq!(bytes, vec![0, 0, 63, 127, 254, 255, 255, 0]);
    }

    #[test]
    fn linear_passthrough_accepts_flat_fields() {
        let f = field(vec![0.5; 8]);
        let bytes = quantize(&f, &Quantization::Linear).unwrap();
        assert_eq!(bytes, vec![127; 8]);
    }

    #[test]
    fn serde_tagging() {
        let q: Quantization = serde_json::from_str(r#"{ "mode": "linear" }"#).unwrap();
        assert_eq!(q, Quantization::Linear);
        let q: Quantization = serde_json::from_str(
            r#"{ "mode": "gradient", "ramp": { "mode": "fixed" } }"#,
        )
        .unwrap();
        match q {
            Quantization::Gradient { ramp } => {
                assert_eq!(ramp.mode, GradientMode::Fixed);
                assert_eq!(ramp.keys.len(), 2);
            }
            Quantization::Linear => panic!("expected gradient"),
        }
    }
}
