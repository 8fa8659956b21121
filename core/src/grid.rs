use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::NoiseModule;
use crate::error::{NoiseError, Result};

// Largest supported side length; 512³ f64 samples is already 1 GiB
pub const MAX_GRID_SIZE: usize = 512;

// How lattice indices map into the module's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleDomain {
    // i / N - 0.5, in [-0.5, 0.5): the domain the seamless filter wraps into
    #[default]
    Centered,
    // i / N, in [0, 1)
    Unit,
}

impl SampleDomain {
    #[inline]
    pub fn coordinate(self, index: usize, size: usize) -> f64 {
        let scale = 1.0 / size as f64;
        match self {
            SampleDomain::Centered => index as f64 * scale - 0.5,
            SampleDomain::Unit => index as f64 * scale,
        }
    }
}

impl FromStr for SampleDomain {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "centered" | "centred" => Ok(SampleDomain::Centered),
            "unit" => Ok(SampleDomain::Unit),
            _ => Err(NoiseError::InvalidParameter(format!(
                "unknown sample domain `{s}`"
            ))),
        }
    }
}

// Dense N×N×N samples, x fastest and z slowest: index = x + y·N + z·N²
#[derive(Debug, Clone, PartialEq)]
pub struct SampledField {
    pub size: usize,
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl SampledField {
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size + z * self.size * self.size
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        if x >= self.size || y >= self.size || z >= self.size {
            return None;
        }
        self.values.get(self.index(x, y, z)).copied()
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    // The range normalization can divide by: finite ends and min < max.
    // An all-NaN field never updates min/max and ends as (+inf, -inf).
    pub fn check_range(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(NoiseError::NonFiniteRange {
                min: self.min,
                max: self.max,
            });
        }
        if self.is_degenerate() {
            return Err(NoiseError::DegenerateRange { value: self.min });
        }
        Ok(())
    }

    // Rescale every sample to [0, 1] by the observed range. The minimum
    // maps to exactly 0 and the maximum to exactly 1.
    pub fn normalized(&self) -> Result<Vec<f64>> {
        self.check_range()?;
        let range = self.max - self.min;
        Ok(self.values.iter().map(|&v| (v - self.min) / range).collect())
    }
}

// Total sample count for a side length, rejecting sizes we won't allocate
pub fn sample_count(size: usize) -> Result<usize> {
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(NoiseError::InvalidParameter(format!(
            "grid size must be in 1..={MAX_GRID_SIZE}, got {size}"
        )));
    }
    Ok(size * size * size)
}

// Evaluate `module` at every lattice point, tracking min/max on the way
pub fn sample_grid(
    module: &dyn NoiseModule,
    size: usize,
    domain: SampleDomain,
) -> Result<SampledField> {
    let count = sample_count(size)?;
    module.validate()?;

    let mut values = Vec::with_capacity(count);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for z in 0..size {
        let fz = domain.coordinate(z, size);
        for y in 0..size {
            let fy = domain.coordinate(y, size);
            for x in 0..size {
                let fx = domain.coordinate(x, size);
                let v = module.evaluate(fx, fy, fz)?;
                min = min.min(v);
                max = max.max(v);
                values.push(v);
            }
        }
    }

    debug!(size, ?domain, min, max, "sampled noise field");

    Ok(SampledField {
        size,
        values,
        min,
        max,
    })
}
