use palette::{Gradient, LinSrgb};
use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, Result};

// A color stop of the ramp: position in [0,1], linear RGB in [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorKey {
    pub position: f32,
    pub color: [f32; 3],
}

impl ColorKey {
    pub fn new(position: f32, color: [f32; 3]) -> Self {
        Self { position, color }
    }

    pub fn gray(position: f32, level: f32) -> Self {
        Self::new(position, [level; 3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientMode {
    // linear interpolation between neighbouring keys
    #[default]
    Blend,
    // color of the first key at or after the position
    Fixed,
}

// Color ramp that remaps normalized samples before quantization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRamp {
    pub keys: Vec<ColorKey>,
    pub mode: GradientMode,
}

// black at 0, white at 1
impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            keys: vec![ColorKey::gray(0.0, 0.0), ColorKey::gray(1.0, 1.0)],
            mode: GradientMode::Blend,
        }
    }
}

impl ColorRamp {
    pub fn new(keys: Vec<ColorKey>, mode: GradientMode) -> Result<Self> {
        let ramp = Self { keys, mode };
        ramp.validate()?;
        Ok(ramp)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(NoiseError::InvalidParameter(
                "gradient needs at least one color key".into(),
            ));
        }
        for key in &self.keys {
            if !(0.0..=1.0).contains(&key.position) {
                return Err(NoiseError::InvalidParameter(format!(
                    "gradient key position must be in [0, 1], got {}",
                    key.position
                )));
            }
            if key.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(NoiseError::InvalidParameter(format!(
                    "gradient key color must be in [0, 1], got {:?}",
                    key.color
                )));
            }
        }
        Ok(())
    }

    // Sort the keys and build the interpolator used per sample
    pub fn compile(&self) -> Result<RampSampler> {
        self.validate()?;
        let mut stops: Vec<(f32, LinSrgb)> = self
            .keys
            .iter()
            .map(|k| (k.position, LinSrgb::new(k.color[0], k.color[1], k.color[2])))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(RampSampler {
            mode: self.mode,
            gradient: Gradient::with_domain(stops.clone()),
            stops,
        })
    }
}

// Compiled form of a ColorRamp, ready to evaluate
pub struct RampSampler {
    mode: GradientMode,
    stops: Vec<(f32, LinSrgb)>,
    gradient: Gradient<LinSrgb>,
}

impl RampSampler {
    // Positions outside the key range clamp to the end keys
    pub fn evaluate(&self, t: f64) -> LinSrgb {
        let t = t as f32;
        match self.mode {
            GradientMode::Blend => self.gradient.get(t),
            GradientMode::Fixed => self
                .stops
                .iter()
                .find(|(position, _)| *position >= t)
                .or(self.stops.last())
                .map(|(_, color)| *color)
                .unwrap_or_else(|| LinSrgb::new(0.0, 0.0, 0.0)),
        }
    }

    // Red channel, the only one an R8 volume keeps
    pub fn intensity(&self, t: f64) -> f32 {
        self.evaluate(t).red
    }
}
