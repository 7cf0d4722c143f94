//! # Ephemeris gateway
//!
//! The geometry core never interpolates ephemerides, evaluates rotation models or searches for
//! occultation intervals itself: it asks an [`EphemerisGateway`] for those quantities. The trait
//! is the narrow, explicit boundary between this crate and an ephemeris toolkit, and it is
//! **injected** into every operation that needs it (no process-wide kernel state).
//!
//! ## Operations
//!
//! | Operation | Meaning |
//! |---|---|
//! | [`time_to_epoch`](EphemerisGateway::time_to_epoch) | UTC/TDB time string → [`Epoch`] |
//! | [`surface_point`](EphemerisGateway::surface_point) | Planetocentric (lon, lat) → body-fixed rectangular point |
//! | [`sub_solar_point`](EphemerisGateway::sub_solar_point) | Body-fixed sub-solar point |
//! | [`rectangular_to_latlon`](EphemerisGateway::rectangular_to_latlon) | Rectangular → (radius, lon, lat) |
//! | [`frame_rotation_matrix`](EphemerisGateway::frame_rotation_matrix) | 3×3 rotation between two frames |
//! | [`relative_position`](EphemerisGateway::relative_position) | Apparent position of a target wrt an observer + light time |
//! | [`illumination_angles`](EphemerisGateway::illumination_angles) | Phase / incidence / emission at a surface point |
//! | [`body_radii`](EphemerisGateway::body_radii) | Triaxial radii |
//! | [`occultation_search`](EphemerisGateway::occultation_search) | Opaque interval search |
//!
//! ## Lifecycle
//!
//! Gateways own whatever data they were loaded with. Loading and unloading is an explicit part
//! of the implementing type's API (see [`SnapshotGateway`](crate::gateway::snapshot::SnapshotGateway)),
//! owned by the caller. Every query is atomic: it either returns a full result or an error.
//!
//! ## Errors
//!
//! Implementations report missing data (unknown body, epoch outside coverage, unloaded frame)
//! as [`GeometryError::GatewayUnavailable`]. These are not retried by the core.

pub mod iau_constants;
pub mod snapshot;

use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::bodies::Body;
use crate::constants::{Kilometer, Radian};
use crate::frames::{AberrationCorrection, Frame, ShapeModel};
use crate::geometry_errors::GeometryError;
use crate::occultation::{OccultationQuery, TimeWindow};

/// Latitudinal decomposition of a rectangular vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudinalCoordinates {
    pub radius: Kilometer,
    /// Planetocentric longitude in (−π, π].
    pub longitude: Radian,
    /// Planetocentric latitude in [−π/2, π/2].
    pub latitude: Radian,
}

/// Apparent position of a target relative to an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativePosition {
    /// Target position wrt the observer, in km, expressed in the requested frame.
    pub position: Vector3<f64>,
    /// One-way light time between observer and target, in seconds.
    pub light_time: f64,
}

/// Illumination geometry at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationAngles {
    /// Epoch at the surface point (observation epoch minus light time).
    pub epoch_at_point: Epoch,
    /// Vector from the observer to the surface point, in the target's body-fixed frame (km).
    pub observer_to_point: Vector3<f64>,
    pub phase: Radian,
    pub incidence: Radian,
    pub emission: Radian,
}

/// Convert a rectangular vector into radius, longitude and latitude.
///
/// The zero vector maps to a zero radius with zero angles.
pub fn reclat(vector: &Vector3<f64>) -> LatitudinalCoordinates {
    let radius = vector.norm();
    if radius == 0.0 {
        return LatitudinalCoordinates {
            radius,
            longitude: 0.0,
            latitude: 0.0,
        };
    }
    let longitude = if vector.x == 0.0 && vector.y == 0.0 {
        0.0
    } else {
        vector.y.atan2(vector.x)
    };
    let latitude = (vector.z / radius).clamp(-1.0, 1.0).asin();
    LatitudinalCoordinates {
        radius,
        longitude,
        latitude,
    }
}

/// Access to ephemerides, orientation models and shape data.
///
/// All positions are in kilometers and all angles in radians.
pub trait EphemerisGateway {
    /// Convert a UTC (default) or TDB time string into an epoch.
    fn time_to_epoch(&self, time: &str) -> Result<Epoch, GeometryError> {
        crate::time::parse_epoch(time)
    }

    /// Point on the surface of `body` at planetocentric `longitude` / `latitude`, expressed in
    /// `frame` (normally the body-fixed frame of `body`).
    fn surface_point(
        &self,
        body: Body,
        epoch: &Epoch,
        frame: &Frame,
        longitude: Radian,
        latitude: Radian,
        shape: ShapeModel,
    ) -> Result<Vector3<f64>, GeometryError>;

    /// Sub-solar point on `body`, in its body-fixed frame.
    fn sub_solar_point(&self, body: Body, epoch: &Epoch) -> Result<Vector3<f64>, GeometryError>;

    /// Rectangular → latitudinal coordinates. Pure; gateways rarely need to override it.
    fn rectangular_to_latlon(&self, vector: &Vector3<f64>) -> LatitudinalCoordinates {
        reclat(vector)
    }

    /// Rotation matrix `R` such that `v_to = R · v_from` at `epoch`.
    fn frame_rotation_matrix(
        &self,
        from: &Frame,
        to: &Frame,
        epoch: &Epoch,
    ) -> Result<Matrix3<f64>, GeometryError>;

    /// Position of `target` relative to `observer` at `epoch`, expressed in `frame`.
    fn relative_position(
        &self,
        target: Body,
        epoch: &Epoch,
        frame: &Frame,
        correction: AberrationCorrection,
        observer: Body,
    ) -> Result<RelativePosition, GeometryError>;

    /// Illumination angles at `surface_point` (given in `frame`, the body-fixed frame of
    /// `target`), lit by `source` and seen from `observer`.
    #[allow(clippy::too_many_arguments)]
    fn illumination_angles(
        &self,
        shape: ShapeModel,
        target: Body,
        epoch: &Epoch,
        frame: &Frame,
        correction: AberrationCorrection,
        source: Body,
        observer: Body,
        surface_point: &Vector3<f64>,
    ) -> Result<IlluminationAngles, GeometryError>;

    /// Triaxial radii (a, b, c) of `body`.
    fn body_radii(&self, body: Body) -> Result<Vector3<f64>, GeometryError>;

    /// Intervals of the confinement window during which the requested occultation occurs.
    fn occultation_search(
        &self,
        query: &OccultationQuery,
    ) -> Result<Vec<TimeWindow>, GeometryError>;
}
