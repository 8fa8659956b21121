use crate::NoiseModule;
use crate::error::{NoiseError, Result};

// Negates the output of its source module
#[derive(Default)]
pub struct Invert {
    source: Option<Box<dyn NoiseModule>>,
}

impl Invert {
    pub fn new(source: Box<dyn NoiseModule>) -> Self {
        Self {
            source: Some(source),
        }
    }

    pub fn set_source(&mut self, source: Box<dyn NoiseModule>) {
        self.source = Some(source);
    }

    pub fn source(&self) -> Result<&dyn NoiseModule> {
        self.source
            .as_deref()
            .ok_or(NoiseError::MissingSource { module: "Invert" })
    }
}

impl NoiseModule for Invert {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> Result<f64> {
        Ok(-self.source()?.evaluate(x, y, z)?)
    }

    fn validate(&self) -> Result<()> {
        self.source()?.validate()
    }
}
