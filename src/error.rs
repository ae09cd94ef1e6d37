use number_format::FormatOptionsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NumberFieldConfigError {
    #[error("min ({min}) is greater than max ({max}).")]
    MinGreaterThanMax { min: f64, max: f64 },
    #[error("{name} must be a positive, finite number, got {value}.")]
    InvalidStep { name: &'static str, value: f64 },
    #[error("Scrub pixel sensitivity must be a positive, finite number, got {0}.")]
    InvalidPixelSensitivity(f32),
    #[error("Scrub teleport distance can't be negative, got {0}.")]
    NegativeTeleportDistance(f32),
    #[error("Invalid format options: {0}")]
    Format(#[from] FormatOptionsError),
    #[error("Malformed number field config: {0}")]
    Json(#[from] serde_json::Error),
}
