//! # Celestial coordinate projection
//!
//! Project the direction from each observation point to a target body onto a
//! right ascension / declination pair expressed in the frame the points are given in.
//!
//! For a target position `T` (relative to the observer body's centre) and a point `P`
//! on the observer body, the line of sight is `d = T − P` and
//!
//! ```text
//! dec = asin(d̂_z)        ∈ [−π/2, π/2]
//! ra  = atan2(d̂_y, d̂_x)  ∈ (−π, π]
//! ```
//!
//! The argument of `asin` is clamped to `[−1, 1]` so that normalisation round-off never
//! produces NaN. Lines of sight shorter than [`MIN_DIRECTION_NORM`] have no direction and
//! are reported as [`GeometryError::DegenerateGeometry`] for that point only.
//!
//! ## See also
//! ------------
//! * [`crate::separation::angular_separation`] – Consumes the coordinates produced here.
//! * [`crate::disk::apparent_disks`] – Same lines of sight, with the target's angular size.

use hifitime::Epoch;
use log::{debug, warn};
use nalgebra::Vector3;

use crate::bodies::Body;
use crate::constants::{Radian, MIN_DIRECTION_NORM};
use crate::frames::{AberrationCorrection, Frame};
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;
use crate::surface_grid::SurfaceGrid;

/// Right ascension / declination of a direction, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialCoordinate {
    /// Right ascension in (−π, π].
    pub ra: Radian,
    /// Declination in [−π/2, π/2].
    pub dec: Radian,
}

impl CelestialCoordinate {
    /// Decompose a direction vector into (ra, dec).
    ///
    /// Arguments
    /// -----------------
    /// * `direction`: any non-zero vector; only its direction matters.
    ///
    /// Return
    /// ----------
    /// * The coordinate, or [`GeometryError::DegenerateGeometry`] if `|direction|` is below
    ///   [`MIN_DIRECTION_NORM`] or not finite.
    pub fn from_direction(direction: &Vector3<f64>) -> Result<Self, GeometryError> {
        let norm = direction.norm();
        if !norm.is_finite() || norm < MIN_DIRECTION_NORM {
            return Err(GeometryError::DegenerateGeometry(format!(
                "line of sight of length {norm:e} km has no direction"
            )));
        }
        let unit = direction / norm;
        Ok(CelestialCoordinate {
            ra: unit.y.atan2(unit.x),
            dec: unit.z.clamp(-1.0, 1.0).asin(),
        })
    }

    /// Unit vector pointing at this coordinate.
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let (sin_dec, cos_dec) = self.dec.sin_cos();
        let (sin_ra, cos_ra) = self.ra.sin_cos();
        Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
    }
}

/// Lines of sight from every point to a target position (`target − point`).
pub(crate) fn lines_of_sight(
    target: &Vector3<f64>,
    points: &[Vector3<f64>],
) -> Vec<Vector3<f64>> {
    points.iter().map(|p| target - p).collect()
}

/// Project the direction to `target` seen from each of `points`.
///
/// The target position relative to the centre of `observer` is looked up once, with the
/// requested aberration correction, and shared by every point.
///
/// Arguments
/// -----------------
/// * `gateway`: ephemeris provider.
/// * `observer`: body the points lie on.
/// * `target`: observed body.
/// * `epoch`: observation epoch.
/// * `frame`: frame of `points`, and of the returned coordinates.
/// * `points`: observation points relative to the observer's centre (km).
/// * `correction`: aberration correction of the target lookup.
///
/// Return
/// ----------
/// * One result per point, in input order. The outer error is reserved for the gateway
///   lookup; a degenerate point only fails its own entry.
pub fn project<G>(
    gateway: &G,
    observer: Body,
    target: Body,
    epoch: &Epoch,
    frame: &Frame,
    points: &[Vector3<f64>],
    correction: AberrationCorrection,
) -> Result<Vec<Result<CelestialCoordinate, GeometryError>>, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    let relative = gateway.relative_position(target, epoch, frame, correction, observer)?;
    debug!(
        "{target} seen from {observer} in {frame}: {:.3} km, light time {:.3} s",
        relative.position.norm(),
        relative.light_time
    );

    let coords: Vec<_> = lines_of_sight(&relative.position, points)
        .iter()
        .map(CelestialCoordinate::from_direction)
        .collect();

    let degenerate = coords.iter().filter(|c| c.is_err()).count();
    if degenerate > 0 {
        warn!("{degenerate} of {} points have no line of sight to {target}", points.len());
    }
    Ok(coords)
}

/// Same as [`project`] but stops at the first failing point.
pub fn project_fail_fast<G>(
    gateway: &G,
    observer: Body,
    target: Body,
    epoch: &Epoch,
    frame: &Frame,
    points: &[Vector3<f64>],
    correction: AberrationCorrection,
) -> Result<Vec<CelestialCoordinate>, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    project(gateway, observer, target, epoch, frame, points, correction)?
        .into_iter()
        .collect()
}

/// Project the direction to `target` from every point of a body-fixed grid.
///
/// Points and target are both expressed in the grid's frame, so the coordinates are
/// body-fixed right ascension / declination.
pub fn project_grid<G>(
    gateway: &G,
    grid: &SurfaceGrid,
    target: Body,
    correction: AberrationCorrection,
) -> Result<Vec<Result<CelestialCoordinate, GeometryError>>, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    project(
        gateway,
        grid.body,
        target,
        &grid.epoch,
        &grid.frame,
        &grid.positions(),
        correction,
    )
}
