use thiserror::Error;

// Every error is fatal to the build that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NoiseError {
    #[error("{module} module has no source module")]
    MissingSource { module: &'static str },

    #[error("illegal value range: every sample equals {value}")]
    DegenerateRange { value: f64 },

    #[error("illegal value range: samples span {min} .. {max}")]
    NonFiniteRange { min: f64, max: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, NoiseError>;
