use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Cannot draw a non-finite {name} ({value})")]
    NonFiniteValue { name: &'static str, value: f64 },

    #[error("Chart dimensions are too small to hold a plot (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("The density curve needs at least 2 samples (got {0})")]
    TooFewSamples(usize),

    #[error("The density is zero everywhere between {min} and {max}, so there is nothing to draw")]
    FlatDensity { min: f64, max: f64 },

    #[error("The x range is empty ({min} to {max})")]
    EmptyRange { min: f64, max: f64 },
}
