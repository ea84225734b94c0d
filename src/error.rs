//! Error types for gplot.
//!
//! Every fallible construction in the crate (level generation, descriptor
//! building, orchestrator setup, table loading) reports one of these
//! variants. Drawing only fails on collaborator errors.

use thiserror::Error;

/// The main error type for gplot operations.
#[derive(Error, Debug)]
pub enum GplotError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (bad split mode, quantile fraction, level count...)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Coordinate/slab shape mismatches
    #[error("Shape error: {message}")]
    Shape { message: String },

    /// ndarray reshape failures
    #[error("Array shape error: {0}")]
    ArrayShape(#[from] ndarray::ShapeError),

    /// Violated numeric preconditions (two-slope pivot, degenerate regrid)
    #[error("Precondition violated: {message}")]
    Precondition { message: String },

    /// An optional collaborator was requested but is not compiled in
    #[error("Capability unavailable: {capability}")]
    CapabilityUnavailable { capability: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Interpolation errors
    #[error("Interpolation error: {message}")]
    Interpolation { message: String },

    /// Colormap table errors
    #[error("Colormap error: {message}")]
    Colormap { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// PNG encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Title pattern errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl GplotError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        GplotError::Config {
            message: message.into(),
        }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        GplotError::Shape {
            message: message.into(),
        }
    }

    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        GplotError::Precondition {
            message: message.into(),
        }
    }

    pub fn invalid(param: &str, message: impl Into<String>) -> Self {
        GplotError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with GplotError
pub type Result<T> = std::result::Result<T, GplotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GplotError::invalid("colormap", "Unknown colormap: foo");
        assert_eq!(
            err.to_string(),
            "Invalid parameter: colormap - Unknown colormap: foo"
        );
        let err = GplotError::CapabilityUnavailable {
            capability: "regrid".to_string(),
        };
        assert_eq!(err.to_string(), "Capability unavailable: regrid");
    }
}
