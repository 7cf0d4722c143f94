//! # Surface grids
//!
//! Lattices of observation points on a body's surface, in its body-fixed frame.
//!
//! ## Sampling
//!
//! For a resolution `n ≥ 2`:
//!
//! - **Latitudes**: `−π/2 + k·π/n` for `k = 1 … n−1`. This samples `[−π/2, π/2)` uniformly
//!   and drops the south-pole row, so `n − 1` latitudes remain and neither pole is sampled.
//! - **Longitudes**, [`HemisphereMode::Full`]: `2π·i/n` for `i = 0 … n−1`.
//! - **Longitudes**, [`HemisphereMode::SunFacing`]: `n` values spread uniformly over
//!   `[λₛ − π/2, λₛ + π/2]` (both ends included), where `λₛ` is the longitude of the
//!   sub-solar point.
//!
//! Points are ordered longitude-major: all latitudes of the first longitude, then all
//! latitudes of the second, and so on. A grid therefore holds `n · (n − 1)` points.
//!
//! ## Example
//!
//! ```rust,ignore
//! use galilean::bodies::Body;
//! use galilean::surface_grid::{generate_grid, HemisphereMode};
//!
//! let grid = generate_grid(&gateway, Body::Europa, &epoch, 3, HemisphereMode::Full)?;
//! assert_eq!(grid.len(), 6);
//! ```

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use itertools::iproduct;
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::bodies::Body;
use crate::constants::{Radian, DPI};
use crate::frames::{Frame, ShapeModel};
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;

/// Which longitudes a grid covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HemisphereMode {
    /// The whole body.
    #[default]
    Full,
    /// The half of the body centred on the sub-solar longitude.
    SunFacing,
}

impl fmt::Display for HemisphereMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HemisphereMode::Full => write!(f, "FULL"),
            HemisphereMode::SunFacing => write!(f, "SUN_FACING"),
        }
    }
}

impl FromStr for HemisphereMode {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "FULL" => Ok(HemisphereMode::Full),
            "SUN_FACING" => Ok(HemisphereMode::SunFacing),
            other => Err(GeometryError::InvalidConfig(format!(
                "unknown hemisphere mode '{other}'"
            ))),
        }
    }
}

/// A body-fixed surface point and the planetocentric coordinates it was generated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Position wrt the body centre, in km.
    pub position: Vector3<f64>,
    pub longitude: Radian,
    pub latitude: Radian,
}

/// Surface points of one body at one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    pub body: Body,
    pub epoch: Epoch,
    /// Frame of the point positions (the body-fixed frame of `body`).
    pub frame: Frame,
    pub mode: HemisphereMode,
    pub points: Vec<SurfacePoint>,
}

impl SurfaceGrid {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurfacePoint> {
        self.points.iter()
    }

    /// Point positions, in grid order.
    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.points.iter().map(|p| p.position).collect()
    }
}

/// `n − 1` latitudes: `−π/2 + k·π/n`, `k = 1 … n−1`.
pub fn grid_latitudes(resolution: usize) -> Vec<Radian> {
    (1..resolution)
        .map(|k| -FRAC_PI_2 + k as f64 * PI / resolution as f64)
        .collect()
}

/// `n` longitudes `2π·i/n`.
pub fn full_longitudes(resolution: usize) -> Vec<Radian> {
    (0..resolution)
        .map(|i| DPI * i as f64 / resolution as f64)
        .collect()
}

/// `n` longitudes spread uniformly over `[center − π/2, center + π/2]`.
pub fn sun_facing_longitudes(center: Radian, resolution: usize) -> Vec<Radian> {
    let start = center - FRAC_PI_2;
    let step = PI / (resolution - 1) as f64;
    (0..resolution).map(|i| start + i as f64 * step).collect()
}

/// Generate the surface grid of `body` at `epoch`.
///
/// Arguments
/// -----------------
/// * `gateway`: ephemeris provider, asked for the sub-solar point (sun-facing mode) and for
///   every surface point.
/// * `body`: body whose surface is sampled.
/// * `epoch`: epoch of the grid.
/// * `resolution`: samples per axis, at least 2.
/// * `mode`: longitude coverage.
///
/// Return
/// ----------
/// * A grid of `resolution · (resolution − 1)` points in the body-fixed frame of `body`,
///   [`GeometryError::InvalidResolution`] if `resolution < 2`, or the first gateway error.
pub fn generate_grid<G>(
    gateway: &G,
    body: Body,
    epoch: &Epoch,
    resolution: usize,
    mode: HemisphereMode,
) -> Result<SurfaceGrid, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    if resolution < 2 {
        return Err(GeometryError::InvalidResolution(resolution));
    }

    let longitudes = match mode {
        HemisphereMode::Full => full_longitudes(resolution),
        HemisphereMode::SunFacing => {
            let sub_solar = gateway.sub_solar_point(body, epoch)?;
            let center = gateway.rectangular_to_latlon(&sub_solar).longitude;
            sun_facing_longitudes(center, resolution)
        }
    };
    let latitudes = grid_latitudes(resolution);
    let frame = Frame::BodyFixed(body);

    let points = iproduct!(longitudes.iter(), latitudes.iter())
        .map(|(&longitude, &latitude)| {
            gateway
                .surface_point(body, epoch, &frame, longitude, latitude, ShapeModel::Ellipsoid)
                .map(|position| SurfacePoint {
                    position,
                    longitude,
                    latitude,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "{mode} grid of {body} at {epoch}: {} longitudes × {} latitudes",
        longitudes.len(),
        latitudes.len()
    );

    Ok(SurfaceGrid {
        body,
        epoch: *epoch,
        frame,
        mode,
        points,
    })
}

#[cfg(test)]
mod surface_grid_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_latitudes_exclude_poles() {
        let lats = grid_latitudes(3);
        assert_eq!(lats.len(), 2);
        assert_relative_eq!(lats[0], -PI / 6.0, epsilon = 1e-15);
        assert_relative_eq!(lats[1], PI / 6.0, epsilon = 1e-15);

        for n in 2..20 {
            let lats = grid_latitudes(n);
            assert_eq!(lats.len(), n - 1);
            assert!(lats.iter().all(|l| l.abs() < FRAC_PI_2));
        }
    }

    #[test]
    fn test_longitudes() {
        let full = full_longitudes(4);
        assert_eq!(full, vec![0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2]);

        let facing = sun_facing_longitudes(1.0, 5);
        assert_relative_eq!(facing[0], 1.0 - FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(facing[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(facing[4], 1.0 + FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_hemisphere_mode_names() {
        assert_eq!(
            "sun-facing".parse::<HemisphereMode>().unwrap(),
            HemisphereMode::SunFacing
        );
        assert_eq!(HemisphereMode::SunFacing.to_string(), "SUN_FACING");
        assert!("NIGHT".parse::<HemisphereMode>().is_err());
    }
}
