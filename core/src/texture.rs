use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::NoiseModule;
use crate::error::Result;
use crate::grid::{SampleDomain, sample_count, sample_grid};
use crate::invert::Invert;
use crate::params::NoiseParams;
use crate::quantize::{Quantization, quantize};
use crate::seamless::{DEFAULT_SEAM_THICKNESS, Seamless, check_seam_thickness};
use crate::source::Source;

// Sampler addressing the texture consumer should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapMode {
    Repeat,
    Clamp,
}

// Everything one build needs. Immutable for the duration of the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub noise: NoiseParams,
    pub grid_size: usize,
    pub seamless: bool,
    pub inverse: bool,
    pub seam_thickness: f64,
    pub domain: SampleDomain,
    pub quantization: Quantization,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            noise: NoiseParams::default(),
            grid_size: 64,
            seamless: false,
            inverse: false,
            seam_thickness: DEFAULT_SEAM_THICKNESS,
            domain: SampleDomain::Centered,
            quantization: Quantization::default(),
        }
    }
}

impl TextureConfig {
    pub fn validate(&self) -> Result<()> {
        sample_count(self.grid_size)?;
        self.noise.validate()?;
        self.quantization.validate()?;
        check_seam_thickness(self.seam_thickness)
    }

    // Content is only seam-safe when the seamless filter ran
    pub fn wrap_mode(&self) -> WrapMode {
        if self.seamless {
            WrapMode::Repeat
        } else {
            WrapMode::Clamp
        }
    }
}

// Single-channel N×N×N volume, x fastest and z slowest
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeTexture {
    size: usize,
    data: Vec<u8>,
    wrap_mode: WrapMode,
    value_range: (f64, f64),
}

impl VolumeTexture {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dimensions(&self) -> [usize; 3] {
        [self.size; 3]
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    // Raw (min, max) of the field before quantization
    pub fn value_range(&self) -> (f64, f64) {
        self.value_range
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    // Hand the buffer to the texture consumer
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<u8> {
        if x >= self.size || y >= self.size || z >= self.size {
            return None;
        }
        self.data
            .get(x + y * self.size + z * self.size * self.size)
            .copied()
    }

    // One Z slice as a grayscale image, row y at image row y
    pub fn slice_image(&self, z: usize) -> Option<GrayImage> {
        if z >= self.size {
            return None;
        }
        let layer = self.size * self.size;
        let pixels = self.data[z * layer..(z + 1) * layer].to_vec();
        GrayImage::from_raw(self.size as u32, self.size as u32, pixels)
    }
}

// Source → Seamless → Invert, with empty slots rejected up front
pub fn compose(
    source: Box<dyn NoiseModule>,
    config: &TextureConfig,
) -> Result<Box<dyn NoiseModule>> {
    let mut module = source;
    if config.seamless {
        module = Box::new(Seamless::new(module).with_seam_thickness(config.seam_thickness)?);
    }
    if config.inverse {
        module = Box::new(Invert::new(module));
    }
    module.validate()?;
    debug!(
        seamless = config.seamless,
        inverse = config.inverse,
        "composed module graph"
    );
    Ok(module)
}

// Build a volume from the configured noise family
pub fn build(config: &TextureConfig) -> Result<VolumeTexture> {
    let source = Source::new(&config.noise)?;
    build_with_source(Box::new(source), config)
}

// Build a volume from a caller-supplied source module
pub fn build_with_source(
    source: Box<dyn NoiseModule>,
    config: &TextureConfig,
) -> Result<VolumeTexture> {
    config.validate()?;
    let root = compose(source, config)?;
    let field = sample_grid(root.as_ref(), config.grid_size, config.domain)?;
    let data = quantize(&field, &config.quantization)?;

    info!(
        size = config.grid_size,
        min = field.min,
        max = field.max,
        wrap_mode = ?config.wrap_mode(),
        "built volume texture"
    );

    Ok(VolumeTexture {
        size: field.size,
        data,
        wrap_mode: config.wrap_mode(),
        value_range: (field.min, field.max),
    })
}
