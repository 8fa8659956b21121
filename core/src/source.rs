use std::fmt;

use noise::core::worley::{ReturnType, distance_functions};
use noise::{
    Billow, Checkerboard, Cylinders, Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti, Seedable,
    Simplex, SuperSimplex, Value, Worley,
};
use tracing::debug;

use crate::NoiseModule;
use crate::error::Result;
use crate::params::{CellType, NoiseParams, NoiseQuality, NoiseType};

// Leaf of the graph: one base noise family from the `noise` crate,
// configured from NoiseParams.
pub struct Source {
    noise_type: NoiseType,
    generator: Box<dyn NoiseFn<f64, 3>>,
}

// Quality picks the gradient basis, cheapest first
macro_rules! with_basis {
    ($build:ident, $params:expr) => {
        match $params.quality {
            NoiseQuality::Fast => $build::<Value>($params),
            NoiseQuality::Standard => $build::<Perlin>($params),
            NoiseQuality::Best => $build::<SuperSimplex>($params),
        }
    };
}

impl Source {
    pub fn new(params: &NoiseParams) -> Result<Self> {
        params.validate()?;

        let generator: Box<dyn NoiseFn<f64, 3>> = match params.noise_type {
            NoiseType::Perlin => with_basis!(fbm, params),
            NoiseType::Billow => with_basis!(billow, params),
            NoiseType::RidgedMulti => with_basis!(ridged, params),
            NoiseType::Simplex => fbm::<Simplex>(params),
            NoiseType::Checkerboard => Box::new(Rescale {
                inner: Checkerboard::new(0),
                input: params.frequency,
                output: 1.0,
            }),
            NoiseType::Cylinders => Box::new(Cylinders::new().set_frequency(params.frequency)),
            NoiseType::Spheres => Box::new(Spheres::new(params.frequency)),
            NoiseType::Cell => cell(params),
        };

        debug!(
            noise_type = %params.noise_type,
            seed = params.seed,
            frequency = params.frequency,
            "created source module"
        );

        Ok(Self {
            noise_type: params.noise_type,
            generator,
        })
    }

    pub fn noise_type(&self) -> NoiseType {
        self.noise_type
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("noise_type", &self.noise_type)
            .finish_non_exhaustive()
    }
}

impl NoiseModule for Source {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        Ok(self.generator.get([x, y, z]))
    }
}

fn fbm<T>(p: &NoiseParams) -> Box<dyn NoiseFn<f64, 3>>
where
    T: Default + Seedable + NoiseFn<f64, 3> + 'static,
{
    Box::new(
        Fbm::<T>::new(p.seed)
            .set_frequency(p.frequency)
            .set_lacunarity(p.lacunarity)
            .set_octaves(p.octaves)
            .set_persistence(p.persistence),
    )
}

fn billow<T>(p: &NoiseParams) -> Box<dyn NoiseFn<f64, 3>>
where
    T: Default + Seedable + NoiseFn<f64, 3> + 'static,
{
    Box::new(
        Billow::<T>::new(p.seed)
            .set_frequency(p.frequency)
            .set_lacunarity(p.lacunarity)
            .set_octaves(p.octaves)
            .set_persistence(p.persistence),
    )
}

// Ridged output is shaped by its own weighting, persistence is not applied
fn ridged<T>(p: &NoiseParams) -> Box<dyn NoiseFn<f64, 3>>
where
    T: Default + Seedable + NoiseFn<f64, 3> + 'static,
{
    Box::new(
        RidgedMulti::<T>::new(p.seed)
            .set_frequency(p.frequency)
            .set_lacunarity(p.lacunarity)
            .set_octaves(p.octaves),
    )
}

fn cell(p: &NoiseParams) -> Box<dyn NoiseFn<f64, 3>> {
    let return_type = if p.enable_distance {
        ReturnType::Distance
    } else {
        ReturnType::Value
    };
    let worley = Worley::new(p.seed)
        .set_frequency(p.frequency)
        .set_return_type(return_type);
    let worley = match p.cell_type {
        CellType::Voronoi => worley.set_distance_function(distance_functions::euclidean),
        CellType::Quadratic => worley.set_distance_function(distance_functions::euclidean_squared),
        CellType::Manhattan => worley.set_distance_function(distance_functions::manhattan),
        CellType::Chebyshev => worley.set_distance_function(distance_functions::chebyshev),
    };

    match p.displacement {
        Some(displacement) if !p.enable_distance => Box::new(Rescale {
            inner: worley,
            input: 1.0,
            output: displacement,
        }),
        _ => Box::new(worley),
    }
}

// Scales the input point and the output value of a generator
struct Rescale<N> {
    inner: N,
    input: f64,
    output: f64,
}

impl<N: NoiseFn<f64, 3>> NoiseFn<f64, 3> for Rescale<N> {
    fn get(&self, [x, y, z]: [f64; 3]) -> f64 {
        self.inner.get([x * self.input, y * self.input, z * self.input]) * self.output
    }
}

// Concentric shells around the origin, one per unit of distance / frequency.
// Peaks at 1.0 on each shell and drops to -1.0 halfway between shells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spheres {
    pub frequency: f64,
}

impl Spheres {
    pub fn new(frequency: f64) -> Self {
        Self { frequency }
    }
}

impl NoiseFn<f64, 3> for Spheres {
    fn get(&self, [x, y, z]: [f64; 3]) -> f64 {
        let dist = (x * x + y * y + z * z).sqrt() * self.frequency;
        let small = dist - dist.floor();
        let nearest = small.min(1.0 - small);
        1.0 - nearest * 4.0
    }
}

// Same value everywhere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl NoiseModule for Constant {
    fn evaluate(&self, _x: f64, _y: f64, _z: f64) -> Result<f64> {
        Ok(self.0)
    }
}

// Any closure as a source module
pub struct FnModule<F>(pub F);

impl<F> FnModule<F>
where
    F: Fn(f64, f64, f64) -> f64,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> NoiseModule for FnModule<F>
where
    F: Fn(f64, f64, f64) -> f64,
{
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        Ok((self.0)(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [(f64, f64, f64); 5] = [
        (0.13, 0.57, -0.31),
        (-0.42, 0.08, 0.27),
        (0.49, -0.49, 0.01),
        (-0.05, -0.33, -0.46),
        (1.7, 2.3, -3.9),
    ];

    #[test]
    fn every_family_is_deterministic_and_finite() {
        for noise_type in NoiseType::ALL {
            let mut params = NoiseParams::with_type(noise_type);
            params.octaves = 3;
            params.frequency = 4.0;
            let a = Source::new(&params).unwrap();
            let b = Source::new(&params).unwrap();
            for &(x, y, z) in &POINTS {
                let va = a.evaluate(x, y, z).unwrap();
                let vb = b.evaluate(x, y, z).unwrap();
                assert!(va.is_finite(), "{noise_type} produced {va}");
                assert_eq!(va.to_bits(), vb.to_bits(), "{noise_type} not deterministic");
            }
        }
    }

    #[test]
    fn every_quality_builds() {
        for quality in [NoiseQuality::Fast, NoiseQuality::Standard, NoiseQuality::Best] {
            for noise_type in [NoiseType::Perlin, NoiseType::Billow, NoiseType::RidgedMulti] {
                let mut params = NoiseParams::with_type(noise_type);
                params.quality = quality;
                let source = Source::new(&params).unwrap();
                assert_eq!(source.noise_type(), noise_type);
                assert!(source.evaluate(0.3, 0.2, 0.1).unwrap().is_finite());
            }
        }
    }

    #[test]
    fn seed_changes_perlin() {
        let mut params = NoiseParams::with_type(NoiseType::Perlin);
        params.frequency = 3.0;
        let a = Source::new(&params).unwrap();
        params.seed = 77;
        let b = Source::new(&params).unwrap();
        let differs = POINTS
            .iter()
            .any(|&(x, y, z)| a.evaluate(x, y, z).unwrap() != b.evaluate(x, y, z).unwrap());
        assert!(differs);
    }

    #[test]
    fn cell_displacement_scales_value() {
        let mut params = NoiseParams::with_type(NoiseType::Cell);
        params.frequency = 5.0;
        let plain = Source::new(&params).unwrap();
        params.displacement = Some(2.5);
        let displaced = Source::new(&params).unwrap();
        for &(x, y, z) in &POINTS {
            let a = plain.evaluate(x, y, z).unwrap();
            let b = displaced.evaluate(x, y, z).unwrap();
            assert!((a * 2.5 - b).abs() < 1e-12);
        }
    }

    #[test]
    fn cell_types_all_build() {
        for cell_type in [
            CellType::Voronoi,
            CellType::Quadratic,
            CellType::Manhattan,
            CellType::Chebyshev,
        ] {
            let mut params = NoiseParams::with_type(NoiseType::Cell);
            params.cell_type = cell_type;
            params.enable_distance = true;
            let source = Source::new(&params).unwrap();
            assert!(source.evaluate(0.1, 0.2, 0.3).unwrap().is_finite());
        }
    }

    #[test]
    fn spheres_shells() {
        let s = Spheres::new(1.0);
        // on a shell
        assert!((s.get([0.0, 0.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!((s.get([0.0, 1.0, 0.0]) - 1.0).abs() < 1e-12);
        // halfway between shells
        assert!((s.get([0.5, 0.0, 0.0]) + 1.0).abs() < 1e-12);
        // frequency packs shells closer
        let dense = Spheres::new(2.0);
        assert!((dense.get([0.5, 0.0, 0.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_params_rejected() {
        let mut params = NoiseParams::default();
        params.frequency = -1.0;
        assert!(Source::new(&params).is_err());
    }

    #[test]
    fn helper_modules() {
        assert_eq!(Constant(0.5).evaluate(1.0, 2.0, 3.0).unwrap(), 0.5);
        let sum = FnModule::new(|x, y, z| x + y + z);
        assert_eq!(sum.evaluate(1.0, 2.0, 3.0).unwrap(), 6.0);
    }
}
