//! # Snapshot gateway
//!
//! An in-process [`EphemerisGateway`] backed by **state snapshots**: for each body, its
//! position and velocity relative to the solar-system barycenter in J2000 at a reference
//! epoch. States are propagated linearly, which is accurate over the short spans (hours)
//! used for surface illumination studies and synthetic occultation tests.
//!
//! ## Data
//!
//! | Data | Source |
//! |---|---|
//! | Body states | [`SnapshotGateway::load_states_csv`] / [`SnapshotGateway::load_states`] |
//! | Radii, rotation models | [`SnapshotGateway::with_iau_constants`] or `insert_*` |
//!
//! The CSV snapshot has one row per body:
//!
//! ```text
//! body,et,x,y,z,vx,vy,vz,coverage_seconds
//! JUPITER,6.7e8,-7.2e8,3.9e8,1.8e8,-7.1,-10.1,-4.1,86400
//! ```
//!
//! `et` is TDB seconds past J2000, positions in km, velocities in km/s. An empty
//! `coverage_seconds` means the state is valid at every epoch.
//!
//! ## Lifecycle
//!
//! Loading and unloading are explicit calls on the gateway value, owned by the caller.
//! Querying a body whose data is not loaded, or an epoch outside a state's coverage,
//! fails with [`GeometryError::GatewayUnavailable`].
//!
//! ## Corrections
//!
//! Light time is solved by fixed-point iteration on the target epoch (one pass for `LT`,
//! up to five for `CN`); stellar aberration (`+S`) shifts the apparent direction by the
//! observer's barycentric velocity over `c`, to first order.
//!
//! ## See also
//! ------------
//! * [`crate::gateway::iau_constants`] – Radii and rotation models installed by `with_iau_constants`.
//! * [`crate::disk`] – Disk overlap used by the occultation search.

use std::collections::HashMap;

use camino::Utf8Path;
use hifitime::Epoch;
use log::{debug, info};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::iau_constants::{iau_radii, iau_rotation, RotationModel};
use super::{reclat, EphemerisGateway, IlluminationAngles, RelativePosition};
use crate::bodies::Body;
use crate::constants::{
    EphemerisTime, Kilometer, Radian, LIGHT_TIME_TOLERANCE, MIN_DIRECTION_NORM, VLIGHT,
    WINDOW_EDGE_TOLERANCE,
};
use crate::disk::{mean_radius, ApparentDisk, Overlap};
use crate::frames::{AberrationCorrection, Frame, ShapeModel};
use crate::geometry_errors::GeometryError;
use crate::occultation::{OccultationQuery, TimeWindow};
use crate::time::{epoch_from_ephemeris_time, ephemeris_time};

/// One row of a state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyStateRecord {
    pub body: Body,
    /// Reference epoch, TDB seconds past J2000.
    pub et: EphemerisTime,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    /// Half-width (s) of the interval around `et` where the state may be propagated.
    #[serde(default)]
    pub coverage_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BodyState {
    et: EphemerisTime,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    coverage: f64,
}

impl From<BodyStateRecord> for BodyState {
    fn from(rec: BodyStateRecord) -> Self {
        BodyState {
            et: rec.et,
            position: Vector3::new(rec.x, rec.y, rec.z),
            velocity: Vector3::new(rec.vx, rec.vy, rec.vz),
            coverage: rec.coverage_seconds.unwrap_or(f64::INFINITY),
        }
    }
}

impl BodyState {
    fn propagate(
        &self,
        body: Body,
        et: EphemerisTime,
    ) -> Result<(Vector3<f64>, Vector3<f64>), GeometryError> {
        let dt = et - self.et;
        if dt.abs() > self.coverage {
            return Err(GeometryError::GatewayUnavailable(format!(
                "{body} state covers {:.1} s around ET {:.3}, requested ET {et:.3}",
                self.coverage, self.et
            )));
        }
        Ok((self.position + self.velocity * dt, self.velocity))
    }
}

/// Gateway answering every query from loaded state snapshots and body constants.
#[derive(Debug, Clone, Default)]
pub struct SnapshotGateway {
    states: HashMap<Body, BodyState>,
    radii: HashMap<Body, Vector3<Kilometer>>,
    rotations: HashMap<Body, RotationModel>,
}

/// Angle between two vectors, well conditioned near 0 and π.
fn vector_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> Radian {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Apparent direction of `position` for an observer moving at `velocity` (first order).
fn stellar_aberration(position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
    let distance = position.norm();
    if distance < MIN_DIRECTION_NORM {
        return *position;
    }
    let apparent = position / distance + velocity / VLIGHT;
    apparent.normalize() * distance
}

/// Planetocentric unit direction.
fn direction(longitude: Radian, latitude: Radian) -> Vector3<f64> {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Bisect the switch of `condition` inside `[lo, hi]`, given its value at `lo`.
fn refine_edge<F>(
    condition: F,
    mut lo: EphemerisTime,
    mut hi: EphemerisTime,
    at_lo: bool,
) -> Result<EphemerisTime, GeometryError>
where
    F: Fn(EphemerisTime) -> Result<bool, GeometryError>,
{
    while hi - lo > WINDOW_EDGE_TOLERANCE {
        let mid = 0.5 * (lo + hi);
        if condition(mid)? == at_lo {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

impl SnapshotGateway {
    /// A gateway with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway preloaded with IAU radii and rotation models for every known body.
    pub fn with_iau_constants() -> Self {
        let mut gateway = Self::new();
        for body in Body::ALL {
            gateway.insert_radii(body, iau_radii(body));
            gateway.insert_rotation(body, iau_rotation(body));
        }
        gateway
    }

    /// Load body states from a CSV snapshot, replacing states already loaded for the same
    /// bodies.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: CSV file with a `body,et,x,y,z,vx,vy,vz,coverage_seconds` header.
    ///
    /// Return
    /// ----------
    /// * The number of states read, or a [`GeometryError::CsvError`] /
    ///   [`GeometryError::IoError`] if the file cannot be read.
    pub fn load_states_csv(&mut self, path: &Utf8Path) -> Result<usize, GeometryError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let records = reader
            .deserialize::<BodyStateRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        let count = self.load_states(records);
        info!("Loaded {count} body states from {path}");
        Ok(count)
    }

    /// Load body states, replacing states already loaded for the same bodies.
    pub fn load_states<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = BodyStateRecord>,
    {
        records
            .into_iter()
            .map(|rec| self.states.insert(rec.body, rec.into()))
            .count()
    }

    pub fn insert_radii(&mut self, body: Body, radii: Vector3<Kilometer>) {
        self.radii.insert(body, radii);
    }

    pub fn insert_rotation(&mut self, body: Body, model: RotationModel) {
        self.rotations.insert(body, model);
    }

    /// Drop every piece of data held for `body`. Returns whether anything was loaded.
    pub fn unload(&mut self, body: Body) -> bool {
        let had_state = self.states.remove(&body).is_some();
        let had_radii = self.radii.remove(&body).is_some();
        let had_rotation = self.rotations.remove(&body).is_some();
        let unloaded = had_state || had_radii || had_rotation;
        if unloaded {
            info!("Unloaded {body}");
        }
        unloaded
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.states.clear();
        self.radii.clear();
        self.rotations.clear();
        info!("Cleared snapshot gateway");
    }

    /// Bodies with a loaded state, by NAIF id.
    pub fn loaded_bodies(&self) -> Vec<Body> {
        let mut bodies: Vec<Body> = self.states.keys().copied().collect();
        bodies.sort_by_key(|b| b.to_id());
        bodies
    }

    fn state(
        &self,
        body: Body,
        et: EphemerisTime,
    ) -> Result<(Vector3<f64>, Vector3<f64>), GeometryError> {
        self.states
            .get(&body)
            .ok_or_else(|| GeometryError::missing_body(body, "state"))?
            .propagate(body, et)
    }

    /// Rotation from J2000 to `frame`.
    fn from_j2000(&self, frame: &Frame, et: EphemerisTime) -> Result<Matrix3<f64>, GeometryError> {
        match frame {
            Frame::J2000 => Ok(Matrix3::identity()),
            Frame::BodyFixed(body) => Ok(self
                .rotations
                .get(body)
                .ok_or_else(|| GeometryError::missing_body(*body, "rotation model"))?
                .j2000_to_body_fixed(et)),
        }
    }

    fn rotation(
        &self,
        from: &Frame,
        to: &Frame,
        et: EphemerisTime,
    ) -> Result<Matrix3<f64>, GeometryError> {
        if from == to {
            return Ok(Matrix3::identity());
        }
        Ok(self.from_j2000(to, et)? * self.from_j2000(from, et)?.transpose())
    }

    /// Apparent J2000 position of `target` wrt `observer`, with its one-way light time.
    fn apparent_j2000(
        &self,
        target: Body,
        et: EphemerisTime,
        correction: AberrationCorrection,
        observer: Body,
    ) -> Result<(Vector3<f64>, f64), GeometryError> {
        let (observer_pos, observer_vel) = self.state(observer, et)?;
        let (target_pos, _) = self.state(target, et)?;
        let mut relative = target_pos - observer_pos;
        let mut light_time = relative.norm() / VLIGHT;

        let mut previous = 0.0;
        for _ in 0..correction.light_time_iterations() {
            let (target_pos, _) = self.state(target, et - light_time)?;
            relative = target_pos - observer_pos;
            previous = light_time;
            light_time = relative.norm() / VLIGHT;
            if (light_time - previous).abs() < LIGHT_TIME_TOLERANCE {
                break;
            }
        }
        if correction.light_time_iterations() > 0 {
            // the position corresponds to the light time it was evaluated with
            light_time = previous;
        }

        if correction.uses_stellar_aberration() {
            relative = stellar_aberration(&relative, &observer_vel);
        }
        Ok((relative, light_time))
    }

    fn radius_for(&self, body: Body, shape: ShapeModel) -> Result<Kilometer, GeometryError> {
        match shape {
            ShapeModel::Point => Ok(0.0),
            ShapeModel::Ellipsoid => Ok(mean_radius(&self.body_radii(body)?)),
        }
    }

    /// Overlap of the front and back disks seen from the observer centre at `et`.
    fn overlap_at(
        &self,
        query: &OccultationQuery,
        front_radius: Kilometer,
        back_radius: Kilometer,
        et: EphemerisTime,
    ) -> Result<Overlap, GeometryError> {
        let (front, _) = self.apparent_j2000(query.front, et, query.correction, query.observer)?;
        let (back, _) = self.apparent_j2000(query.back, et, query.correction, query.observer)?;
        let front = ApparentDisk::from_line_of_sight(&front, front_radius)?;
        let back = ApparentDisk::from_line_of_sight(&back, back_radius)?;
        Ok(Overlap::classify(&front, &back))
    }
}

impl EphemerisGateway for SnapshotGateway {
    fn surface_point(
        &self,
        body: Body,
        epoch: &Epoch,
        frame: &Frame,
        longitude: Radian,
        latitude: Radian,
        shape: ShapeModel,
    ) -> Result<Vector3<f64>, GeometryError> {
        let point = match shape {
            ShapeModel::Point => Vector3::zeros(),
            ShapeModel::Ellipsoid => {
                let radii = self.body_radii(body)?;
                let d = direction(longitude, latitude);
                let scale = d.component_div(&radii).norm();
                d / scale
            }
        };
        let body_fixed = Frame::BodyFixed(body);
        if *frame == body_fixed {
            return Ok(point);
        }
        Ok(self.rotation(&body_fixed, frame, ephemeris_time(epoch))? * point)
    }

    fn sub_solar_point(&self, body: Body, epoch: &Epoch) -> Result<Vector3<f64>, GeometryError> {
        if body == Body::Sun {
            return Err(GeometryError::DegenerateGeometry(
                "the Sun has no sub-solar point".into(),
            ));
        }
        let et = ephemeris_time(epoch);
        let (to_sun, _) =
            self.apparent_j2000(Body::Sun, et, AberrationCorrection::LightTimeStellar, body)?;
        let to_sun = self.from_j2000(&Frame::BodyFixed(body), et)? * to_sun;
        let coords = reclat(&to_sun);
        debug!(
            "sub-solar point of {body} at {epoch}: lon {:.4} rad, lat {:.4} rad",
            coords.longitude, coords.latitude
        );
        self.surface_point(
            body,
            epoch,
            &Frame::BodyFixed(body),
            coords.longitude,
            coords.latitude,
            ShapeModel::Ellipsoid,
        )
    }

    fn frame_rotation_matrix(
        &self,
        from: &Frame,
        to: &Frame,
        epoch: &Epoch,
    ) -> Result<Matrix3<f64>, GeometryError> {
        self.rotation(from, to, ephemeris_time(epoch))
    }

    fn relative_position(
        &self,
        target: Body,
        epoch: &Epoch,
        frame: &Frame,
        correction: AberrationCorrection,
        observer: Body,
    ) -> Result<RelativePosition, GeometryError> {
        let et = ephemeris_time(epoch);
        let (position, light_time) = self.apparent_j2000(target, et, correction, observer)?;
        Ok(RelativePosition {
            position: self.from_j2000(frame, et)? * position,
            light_time,
        })
    }

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
    ) -> Result<IlluminationAngles, GeometryError> {
        if shape == ShapeModel::Point {
            return Err(GeometryError::DegenerateGeometry(format!(
                "{target} has no surface under the point shape model"
            )));
        }
        let body_fixed = Frame::BodyFixed(target);
        if *frame != body_fixed {
            return Err(GeometryError::FrameMismatch {
                expected: body_fixed.to_string(),
                found: frame.to_string(),
            });
        }

        let et = ephemeris_time(epoch);
        let (observer_pos, observer_vel) = self.state(observer, et)?;
        let point_at = |t: EphemerisTime| -> Result<Vector3<f64>, GeometryError> {
            let (center, _) = self.state(target, t)?;
            Ok(center + self.from_j2000(&body_fixed, t)?.transpose() * surface_point)
        };

        // light time from the surface point rather than from the target centre
        let mut line_of_sight = point_at(et)? - observer_pos;
        let mut light_time = 0.0;
        for _ in 0..correction.light_time_iterations() {
            let next = line_of_sight.norm() / VLIGHT;
            line_of_sight = point_at(et - next)? - observer_pos;
            let converged = (next - light_time).abs() < LIGHT_TIME_TOLERANCE;
            light_time = next;
            if converged {
                break;
            }
        }
        if line_of_sight.norm() < MIN_DIRECTION_NORM {
            return Err(GeometryError::DegenerateGeometry(format!(
                "observer {observer} sits on the surface point of {target}"
            )));
        }
        if correction.uses_stellar_aberration() {
            line_of_sight = stellar_aberration(&line_of_sight, &observer_vel);
        }

        let point_et = et - light_time;
        let to_body_fixed = self.from_j2000(&body_fixed, point_et)?;
        let (source_from_center, _) = self.apparent_j2000(source, point_et, correction, target)?;

        let observer_to_point = to_body_fixed * line_of_sight;
        let to_source = to_body_fixed * source_from_center - surface_point;
        let to_observer = -observer_to_point;

        let radii = self.body_radii(target)?;
        let normal = surface_point.component_div(&radii.component_mul(&radii));

        Ok(IlluminationAngles {
            epoch_at_point: epoch_from_ephemeris_time(point_et),
            observer_to_point,
            phase: vector_angle(&to_source, &to_observer),
            incidence: vector_angle(&normal, &to_source),
            emission: vector_angle(&normal, &to_observer),
        })
    }

    fn body_radii(&self, body: Body) -> Result<Vector3<f64>, GeometryError> {
        self.radii
            .get(&body)
            .copied()
            .ok_or_else(|| GeometryError::missing_body(body, "radii"))
    }

    fn occultation_search(
        &self,
        query: &OccultationQuery,
    ) -> Result<Vec<TimeWindow>, GeometryError> {
        query.validate()?;
        let front_radius = self.radius_for(query.front, query.front_shape)?;
        let back_radius = self.radius_for(query.back, query.back_shape)?;
        let condition = |et: EphemerisTime| -> Result<bool, GeometryError> {
            Ok(self
                .overlap_at(query, front_radius, back_radius, et)?
                .matches(query.kind))
        };

        let start = ephemeris_time(&query.confinement.start);
        let end = ephemeris_time(&query.confinement.end);

        let mut edges = Vec::new();
        let mut opened = if condition(start)? { Some(start) } else { None };
        let mut previous = opened.is_some();
        let mut t = start;
        while t < end {
            let next = (t + query.step_seconds).min(end);
            let current = condition(next)?;
            if current != previous {
                let edge = refine_edge(&condition, t, next, previous)?;
                match opened.take() {
                    Some(open) => edges.push((open, edge)),
                    None => opened = Some(edge),
                }
            }
            previous = current;
            t = next;
        }
        if let Some(open) = opened {
            edges.push((open, end));
        }

        debug!("{}: {} window(s)", query.describe(), edges.len());
        edges
            .into_iter()
            .map(|(s, e)| {
                TimeWindow::new(epoch_from_ephemeris_time(s), epoch_from_ephemeris_time(e))
            })
            .collect()
    }
}
