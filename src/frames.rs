//! # Reference frames, aberration corrections and shape models
//!
//! Vocabulary shared by the gateway interface and the geometry modules:
//!
//! - [`Frame`]: either the inertial `J2000` frame or the body-fixed `IAU_<BODY>` frame
//!   of one of the [`Body`] values.
//! - [`AberrationCorrection`]: light-time / stellar-aberration correction applied to
//!   apparent positions (`NONE`, `LT`, `LT+S`, `CN`, `CN+S`).
//! - [`ShapeModel`]: how a body's surface is modelled (triaxial ellipsoid or point).
//!
//! It also exposes [`rotmt`], the elementary axis rotation used to assemble body-fixed
//! orientation matrices.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::bodies::Body;
use crate::constants::Radian;
use crate::geometry_errors::GeometryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frame {
    /// Inertial frame aligned with the mean equator and equinox of J2000 (ICRF-aligned).
    J2000,
    /// Frame rotating with the body, named `IAU_<BODY>`.
    BodyFixed(Body),
}

impl Frame {
    pub fn is_inertial(&self) -> bool {
        matches!(self, Frame::J2000)
    }

    /// Body whose rotation defines this frame, if any.
    pub fn center(&self) -> Option<Body> {
        match self {
            Frame::J2000 => None,
            Frame::BodyFixed(body) => Some(*body),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::J2000 => write!(f, "J2000"),
            Frame::BodyFixed(body) => write!(f, "{}", body.fixed_frame_name()),
        }
    }
}

impl FromStr for Frame {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        if name == "J2000" {
            return Ok(Frame::J2000);
        }
        name.strip_prefix("IAU_")
            .and_then(|body| body.parse::<Body>().ok())
            .map(Frame::BodyFixed)
            .ok_or(GeometryError::UnknownFrame(name))
    }
}

impl TryFrom<String> for Frame {
    type Error = GeometryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Frame> for String {
    fn from(frame: Frame) -> Self {
        frame.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AberrationCorrection {
    /// Geometric positions.
    #[serde(rename = "NONE")]
    None,
    /// One-pass light-time correction.
    #[serde(rename = "LT")]
    LightTime,
    /// One-pass light time plus stellar aberration.
    #[default]
    #[serde(rename = "LT+S")]
    LightTimeStellar,
    /// Converged Newtonian light-time correction.
    #[serde(rename = "CN")]
    Converged,
    /// Converged Newtonian light time plus stellar aberration.
    #[serde(rename = "CN+S")]
    ConvergedStellar,
}

impl AberrationCorrection {
    /// Number of light-time iterations performed by the correction.
    pub fn light_time_iterations(&self) -> usize {
        match self {
            AberrationCorrection::None => 0,
            AberrationCorrection::LightTime | AberrationCorrection::LightTimeStellar => 1,
            AberrationCorrection::Converged | AberrationCorrection::ConvergedStellar => 5,
        }
    }

    pub fn uses_stellar_aberration(&self) -> bool {
        matches!(
            self,
            AberrationCorrection::LightTimeStellar | AberrationCorrection::ConvergedStellar
        )
    }
}

impl fmt::Display for AberrationCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AberrationCorrection::None => "NONE",
            AberrationCorrection::LightTime => "LT",
            AberrationCorrection::LightTimeStellar => "LT+S",
            AberrationCorrection::Converged => "CN",
            AberrationCorrection::ConvergedStellar => "CN+S",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AberrationCorrection {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_ascii_uppercase().as_str() {
            "NONE" => Ok(AberrationCorrection::None),
            "LT" => Ok(AberrationCorrection::LightTime),
            "LT+S" => Ok(AberrationCorrection::LightTimeStellar),
            "CN" => Ok(AberrationCorrection::Converged),
            "CN+S" => Ok(AberrationCorrection::ConvergedStellar),
            other => Err(GeometryError::InvalidConfig(format!(
                "unsupported aberration correction '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeModel {
    /// Triaxial ellipsoid built from the body radii.
    #[default]
    Ellipsoid,
    /// The body is reduced to its center.
    Point,
}

impl FromStr for ShapeModel {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ELLIPSOID" => Ok(ShapeModel::Ellipsoid),
            "POINT" => Ok(ShapeModel::Point),
            other => Err(GeometryError::InvalidConfig(format!(
                "unsupported shape model '{other}'"
            ))),
        }
    }
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes (X, Y, or Z).
///
/// The rotation is **active**: the returned matrix rotates a vector by `alpha` in the direct
/// sense around the chosen axis. A change of basis by `alpha` (a *frame* rotation) is therefore
/// `rotmt(-alpha, k)`.
///
/// Arguments
/// -----------------
/// * `alpha`: Rotation angle in **radians**.
/// * `k`: Index of the axis of rotation (`0` → X, `1` → Y, `2` → Z).
///
/// Return
/// ----------
/// * A 3×3 orthonormal matrix `R` such that the rotated vector is `x' = R · x`.
///
/// Panics
/// ----------
/// Panics if `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("rotmt: invalid axis index {k} (must be 0, 1 or 2)"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}
