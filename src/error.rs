/*
This file is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

//! Error types for the no-go hotspot pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input file does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("layer not found in workspace: {0}")]
    LayerNotFound(String),

    #[error("field '{field}' not found in layer '{layer}'")]
    FieldNotFound { layer: String, field: String },

    #[error("invalid geometry type: expected {expected}, found {found}")]
    InvalidGeometryType {
        expected: &'static str,
        found: String,
    },

    #[error("invalid linear distance '{0}'")]
    InvalidDistance(String),

    #[error("invalid selection expression '{expression}': {msg}")]
    InvalidExpression { expression: String, msg: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("step '{step}' failed")]
    Step {
        step: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps an error with the name of the pipeline step that produced it.
    pub fn in_step(self, step: &str) -> Error {
        Error::Step {
            step: step.to_string(),
            source: Box::new(self),
        }
    }
}

/// Convenience Result type alias for Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn step_error_keeps_source() {
        let err = Error::LayerNotFound("nogo_points".to_string()).in_step("FeatureToPoint");
        assert_eq!(err.to_string(), "step 'FeatureToPoint' failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("layer not found in workspace: nogo_points")
        );
    }
}
