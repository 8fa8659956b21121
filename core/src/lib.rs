// volnoise builds seamless 3D noise volumes: module graph, sampling, quantization
pub mod error;
pub mod gradient;
pub mod grid;
pub mod invert;
pub mod params;
pub mod quantize;
pub mod seamless;
pub mod source;
pub mod texture;

pub use error::{NoiseError, Result};
pub use gradient::{ColorKey, ColorRamp, GradientMode};
pub use grid::{SampleDomain, SampledField, sample_grid};
pub use invert::Invert;
pub use params::{CellType, NoiseParams, NoiseQuality, NoiseType};
pub use quantize::{Quantization, quantize};
pub use seamless::{DEFAULT_SEAM_THICKNESS, Seamless, wrap_centered};
pub use source::{Constant, FnModule, Source, Spheres};
pub use texture::{TextureConfig, VolumeTexture, WrapMode, build, build_with_source, compose};

// A node of the noise graph: a scalar field over continuous 3D space.
// Parameters are fixed at construction, so evaluation is deterministic.
pub trait NoiseModule {
    // Sample the field at (x, y, z).
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64>;

    // Check that every source slot below this module is populated.
    // Filters override this; generators are always complete.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl<M: NoiseModule + ?Sized> NoiseModule for Box<M> {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        (**self).evaluate(x, y, z)
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}

impl<M: NoiseModule + ?Sized> NoiseModule for &M {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        (**self).evaluate(x, y, z)
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}
