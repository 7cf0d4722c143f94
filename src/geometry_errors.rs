use thiserror::Error;

use crate::bodies::Body;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Invalid grid resolution: {0} (at least 2 samples per axis are required)")]
    InvalidResolution(usize),

    #[error("Ephemeris gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid rotation matrix: {0}")]
    InvalidRotation(String),

    #[error("Invalid time string: {0}")]
    InvalidTimeString(String),

    #[error("Unknown body name: {0}")]
    UnknownBody(String),

    #[error("Unknown reference frame: {0}")]
    UnknownFrame(String),

    #[error("Frame mismatch: expected {expected}, found {found}")]
    FrameMismatch { expected: String, found: String },

    #[error("Batch length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid occultation search: {0}")]
    InvalidSearch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error while reading a CSV snapshot: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Error while reading a JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GeometryError {
    /// Shorthand for the gateway failure raised when a body has no loaded data.
    pub(crate) fn missing_body(body: Body, what: &str) -> Self {
        GeometryError::GatewayUnavailable(format!("no {what} loaded for {body}"))
    }
}

impl PartialEq for GeometryError {
    fn eq(&self, other: &Self) -> bool {
        use GeometryError::*;
        match (self, other) {
            (InvalidResolution(a), InvalidResolution(b)) => a == b,
            (GatewayUnavailable(a), GatewayUnavailable(b)) => a == b,
            (DegenerateGeometry(a), DegenerateGeometry(b)) => a == b,
            (InvalidRotation(a), InvalidRotation(b)) => a == b,
            (InvalidTimeString(a), InvalidTimeString(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (UnknownFrame(a), UnknownFrame(b)) => a == b,
            (
                FrameMismatch {
                    expected: e1,
                    found: f1,
                },
                FrameMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (
                LengthMismatch {
                    left: l1,
                    right: r1,
                },
                LengthMismatch {
                    left: l2,
                    right: r2,
                },
            ) => l1 == l2 && r1 == r2,
            (InvalidSearch(a), InvalidSearch(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            // Foreign errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            _ => false,
        }
    }
}

#[cfg(test)]
mod geometry_errors_test {
    use super::*;

    #[test]
    fn test_variant_equality() {
        assert_eq!(
            GeometryError::InvalidResolution(1),
            GeometryError::InvalidResolution(1)
        );
        assert_ne!(
            GeometryError::InvalidResolution(1),
            GeometryError::InvalidResolution(0)
        );
        assert_ne!(
            GeometryError::GatewayUnavailable("x".into()),
            GeometryError::DegenerateGeometry("x".into())
        );

        let io_a = GeometryError::from(std::io::Error::other("a"));
        let io_b = GeometryError::from(std::io::Error::other("b"));
        assert_eq!(io_a, io_b);
    }

    #[test]
    fn test_missing_body_message() {
        let err = GeometryError::missing_body(Body::Europa, "state");
        assert_eq!(
            err.to_string(),
            "Ephemeris gateway unavailable: no state loaded for EUROPA"
        );
    }
}
