//! # Geometry configuration
//!
//! Settings shared by the grid, projection, illumination and occultation operations,
//! deserialised from JSON. Every field has a default, so a partial file (or `{}`) is valid:
//!
//! ```json
//! {
//!   "resolution": 3,
//!   "hemisphere": "FULL",
//!   "inertial_frame": "J2000",
//!   "aberration": "LT+S",
//!   "illumination_source": "SUN",
//!   "illumination_observer": "EARTH",
//!   "occluder": "JUPITER",
//!   "occultation_step_seconds": 300.0,
//!   "snapshot_path": null
//! }
//! ```
//!
//! Call [`GeometryConfig::validate`] before use; the loaders do it for you.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::bodies::Body;
use crate::frames::{AberrationCorrection, Frame};
use crate::geometry_errors::GeometryError;
use crate::surface_grid::HemisphereMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryConfig {
    /// Grid samples per axis.
    pub resolution: usize,
    pub hemisphere: HemisphereMode,
    /// Inertial frame used for sky coordinates.
    pub inertial_frame: Frame,
    pub aberration: AberrationCorrection,
    pub illumination_source: Body,
    pub illumination_observer: Body,
    /// Body whose shadow can dim the illumination source, if any.
    pub occluder: Option<Body>,
    pub occultation_step_seconds: f64,
    /// CSV state snapshot to load into a [`SnapshotGateway`](crate::gateway::snapshot::SnapshotGateway).
    pub snapshot_path: Option<Utf8PathBuf>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            resolution: 3,
            hemisphere: HemisphereMode::Full,
            inertial_frame: Frame::J2000,
            aberration: AberrationCorrection::LightTimeStellar,
            illumination_source: Body::Sun,
            illumination_observer: Body::Earth,
            occluder: Some(Body::Jupiter),
            occultation_step_seconds: 300.0,
            snapshot_path: None,
        }
    }
}

impl GeometryConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, GeometryError> {
        let config: GeometryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, GeometryError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, GeometryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the geometry operations cannot honour.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.resolution < 2 {
            return Err(GeometryError::InvalidResolution(self.resolution));
        }
        if !self.inertial_frame.is_inertial() {
            return Err(GeometryError::InvalidConfig(format!(
                "inertial_frame must be inertial, got {}",
                self.inertial_frame
            )));
        }
        if !(self.occultation_step_seconds.is_finite() && self.occultation_step_seconds > 0.0) {
            return Err(GeometryError::InvalidConfig(format!(
                "occultation_step_seconds must be positive, got {}",
                self.occultation_step_seconds
            )));
        }
        Ok(())
    }
}
