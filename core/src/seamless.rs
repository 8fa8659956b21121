use crate::NoiseModule;
use crate::error::{NoiseError, Result};

// Half-width of the blend band at each edge, as a fraction of the unit domain
pub const DEFAULT_SEAM_THICKNESS: f64 = 0.2;

// Makes its source periodic with period 1 along every axis so the sampled
// volume tiles without visible seams. The source itself need not be periodic.
//
// Each axis is handled by crossfading two samples of the inner function near
// the edges: one at the "home" position and one at the position of the
// neighbouring tile. The X blend feeds the Y blend which feeds the Z blend, so
// edges and corners where several bands overlap get blended along every axis
// without any special casing.
pub struct Seamless {
    source: Option<Box<dyn NoiseModule>>,
    seam_thickness: f64,
}

impl Default for Seamless {
    fn default() -> Self {
        Self {
            source: None,
            seam_thickness: DEFAULT_SEAM_THICKNESS,
        }
    }
}

impl Seamless {
    pub fn new(source: Box<dyn NoiseModule>) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    pub fn with_seam_thickness(mut self, seam_thickness: f64) -> Result<Self> {
        check_seam_thickness(seam_thickness)?;
        self.seam_thickness = seam_thickness;
        Ok(self)
    }

    pub fn seam_thickness(&self) -> f64 {
        self.seam_thickness
    }

    pub fn set_source(&mut self, source: Box<dyn NoiseModule>) {
        self.source = Some(source);
    }

    pub fn source(&self) -> Result<&dyn NoiseModule> {
        self.source
            .as_deref()
            .ok_or(NoiseError::MissingSource { module: "Seamless" })
    }

    fn seamless_x(&self, source: &dyn NoiseModule, x: f64, y: f64, z: f64) -> Result<f64> {
        blend_axis(x, self.seam_thickness, |nx| source.evaluate(nx, y, z))
    }

    fn seamless_xy(&self, source: &dyn NoiseModule, x: f64, y: f64, z: f64) -> Result<f64> {
        blend_axis(y, self.seam_thickness, |ny| {
            self.seamless_x(source, x, ny, z)
        })
    }

    fn seamless_xyz(&self, source: &dyn NoiseModule, x: f64, y: f64, z: f64) -> Result<f64> {
        blend_axis(z, self.seam_thickness, |nz| {
            self.seamless_xy(source, x, y, nz)
        })
    }
}

impl NoiseModule for Seamless {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        let source = self.source()?;
        self.seamless_xyz(
            source,
            wrap_centered(x),
            wrap_centered(y),
            wrap_centered(z),
        )
    }

    fn validate(&self) -> Result<()> {
        self.source()?.validate()
    }
}

// Bands wider than half the domain would overlap
pub fn check_seam_thickness(seam_thickness: f64) -> Result<()> {
    if !(seam_thickness > 0.0 && seam_thickness <= 0.5) {
        return Err(NoiseError::InvalidParameter(format!(
            "seam thickness must be in (0, 0.5], got {seam_thickness}"
        )));
    }
    Ok(())
}

// Map any finite value into [-0.5, 0.5) with period 1
pub fn wrap_centered(t: f64) -> f64 {
    let r = (t + 0.5).rem_euclid(1.0);
    // rem_euclid rounds tiny negatives up to exactly 1.0
    if r >= 1.0 { -0.5 } else { r - 0.5 }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

// One axis of the seam blend. `v` is already in [-0.5, 0.5); `inner` samples
// the next stage of the cascade at a remapped coordinate on this axis.
//
// The home sample squeezes the domain by 1 / (1 + 2 * thickness) so the bands
// on both sides have room to read from the neighbouring tile. Inside a band
// the result fades from the neighbour sample (t = 0, at the edge) to the home
// sample (t = 1, at the inner band boundary).
fn blend_axis<F>(v: f64, thickness: f64, inner: F) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    let mult = 1.0 / (1.0 + thickness * 2.0);
    let value = inner(wrap_centered(v * mult))?;

    if v < -0.5 + thickness {
        let neighbor = inner(wrap_centered((v + 1.0) * mult))?;
        let t = (v + 0.5 + thickness) / (thickness * 2.0);
        Ok(lerp(neighbor, value, t))
    } else if v > 0.5 - thickness {
        let neighbor = inner(wrap_centered((v - 1.0) * mult))?;
        let t = 1.0 - (v - (0.5 - thickness)) / (thickness * 2.0);
        Ok(lerp(neighbor, value, t))
    } else {
        Ok(value)
    }
}
