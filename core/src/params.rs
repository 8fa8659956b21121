use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, Result};

// Upper bound of the noise crate's fractal generators
pub const MAX_OCTAVES: usize = 32;

// Base noise family of the source module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseType {
    #[default]
    Perlin,
    Billow,
    RidgedMulti,
    Checkerboard,
    Cylinders,
    Spheres,
    Cell,
    Simplex,
}

impl NoiseType {
    pub const ALL: [NoiseType; 8] = [
        NoiseType::Perlin,
        NoiseType::Billow,
        NoiseType::RidgedMulti,
        NoiseType::Checkerboard,
        NoiseType::Cylinders,
        NoiseType::Spheres,
        NoiseType::Cell,
        NoiseType::Simplex,
    ];

    // Families driven by lacunarity / octaves / persistence / quality
    pub fn is_fractal(self) -> bool {
        matches!(
            self,
            NoiseType::Perlin | NoiseType::Billow | NoiseType::RidgedMulti | NoiseType::Simplex
        )
    }

    pub fn is_cell(self) -> bool {
        self == NoiseType::Cell
    }

    pub fn name(self) -> &'static str {
        match self {
            NoiseType::Perlin => "perlin",
            NoiseType::Billow => "billow",
            NoiseType::RidgedMulti => "ridged-multi",
            NoiseType::Checkerboard => "checkerboard",
            NoiseType::Cylinders => "cylinders",
            NoiseType::Spheres => "spheres",
            NoiseType::Cell => "cell",
            NoiseType::Simplex => "simplex",
        }
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseType {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_tag(s);
        NoiseType::ALL
            .into_iter()
            .find(|t| normalize_tag(t.name()) == key)
            .ok_or_else(|| NoiseError::InvalidParameter(format!("unknown noise type `{s}`")))
    }
}

// Fidelity tier handed to the fractal generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseQuality {
    Fast,
    #[default]
    Standard,
    Best,
}

impl FromStr for NoiseQuality {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_tag(s).as_str() {
            "fast" => Ok(NoiseQuality::Fast),
            "standard" => Ok(NoiseQuality::Standard),
            "best" => Ok(NoiseQuality::Best),
            _ => Err(NoiseError::InvalidParameter(format!(
                "unknown noise quality `{s}`"
            ))),
        }
    }
}

// Distance function of the cellular family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellType {
    #[default]
    Voronoi,
    Quadratic,
    Manhattan,
    Chebyshev,
}

impl FromStr for CellType {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_tag(s).as_str() {
            "voronoi" => Ok(CellType::Voronoi),
            "quadratic" => Ok(CellType::Quadratic),
            "manhattan" => Ok(CellType::Manhattan),
            "chebyshev" => Ok(CellType::Chebyshev),
            _ => Err(NoiseError::InvalidParameter(format!("unknown cell type `{s}`"))),
        }
    }
}

// lowercase, separators dropped: "Ridged_Multi" == "ridged-multi" == "ridgedmulti"
fn normalize_tag(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// Parameters of the source module. Families ignore the fields they don't use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub noise_type: NoiseType,
    pub seed: u32,
    pub frequency: f64,
    pub lacunarity: f64,
    pub octaves: usize,
    pub persistence: f64,
    pub quality: NoiseQuality,
    pub cell_type: CellType,
    // Scale of the cell value; None keeps the generator's unit range
    pub displacement: Option<f64>,
    // Output distance to the nearest cell point instead of the cell value
    pub enable_distance: bool,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            noise_type: NoiseType::Perlin,
            seed: 1,
            frequency: 1.0,
            lacunarity: 2.0,
            octaves: 1,
            persistence: 0.5,
            quality: NoiseQuality::Standard,
            cell_type: CellType::Voronoi,
            displacement: None,
            enable_distance: false,
        }
    }
}

impl NoiseParams {
    pub fn with_type(noise_type: NoiseType) -> Self {
        Self {
            noise_type,
            ..Self::default()
        }
    }

    // Reject structural parameters the generators can't honour
    pub fn validate(&self) -> Result<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(NoiseError::InvalidParameter(format!(
                "frequency must be a positive number, got {}",
                self.frequency
            )));
        }
        if self.noise_type.is_fractal() {
            if !(1..=MAX_OCTAVES).contains(&self.octaves) {
                return Err(NoiseError::InvalidParameter(format!(
                    "octaves must be in 1..={MAX_OCTAVES}, got {}",
                    self.octaves
                )));
            }
            if !self.lacunarity.is_finite() {
                return Err(NoiseError::InvalidParameter(format!(
                    "lacunarity must be finite, got {}",
                    self.lacunarity
                )));
            }
            if !self.persistence.is_finite() {
                return Err(NoiseError::InvalidParameter(format!(
                    "persistence must be finite, got {}",
                    self.persistence
                )));
            }
        }
        if let Some(d) = self.displacement {
            if !d.is_finite() {
                return Err(NoiseError::InvalidParameter(format!(
                    "displacement must be finite, got {d}"
                )));
            }
        }
        Ok(())
    }
}
