//! # Surface illumination
//!
//! Classify how strongly a surface point is lit, from its solar incidence angle θ:
//!
//! ```text
//! illuminated_fraction = max(0, cos θ)
//! in_shadow            = θ > π/2
//! ```
//!
//! and build full illumination samples (incidence, emission, phase, light-time corrected
//! epoch at the point) from the gateway, for one point, a whole grid, or one point over a
//! series of epochs.
//!
//! When an occluder is configured (Jupiter by default), the light reaching the point is
//! further reduced by the fraction of the source disk the occluder hides as seen from the
//! point, which turns the Jovian eclipses of the moons into a `solar_flux_fraction` of zero.
//!
//! ## See also
//! ------------
//! * [`EphemerisGateway::illumination_angles`] – Angle computation.
//! * [`crate::disk::covered_fraction`] – Eclipse depth.

use hifitime::Epoch;
use log::debug;
use nalgebra::Vector3;

use crate::bodies::Body;
use crate::config::GeometryConfig;
use crate::constants::Radian;
use crate::disk::{apparent_disks, covered_fraction};
use crate::frames::{Frame, ShapeModel};
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;
use crate::surface_grid::{SurfaceGrid, SurfacePoint};

/// Lit fraction and shadow flag derived from an incidence angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationClass {
    /// `max(0, cos θ)`, in `[0, 1]`.
    pub illuminated_fraction: f64,
    pub in_shadow: bool,
}

/// Classify a solar incidence angle (radians).
///
/// The terminator itself (θ = π/2) is lit with a zero fraction; a NaN angle is treated as
/// shadow.
pub fn classify_illumination(incidence: Radian) -> IlluminationClass {
    let in_shadow = incidence > std::f64::consts::FRAC_PI_2 || incidence.is_nan();
    let illuminated_fraction = if in_shadow {
        0.0
    } else {
        incidence.cos().clamp(0.0, 1.0)
    };
    IlluminationClass {
        illuminated_fraction,
        in_shadow,
    }
}

/// Illumination of one surface point at one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationSample {
    pub longitude: Radian,
    pub latitude: Radian,
    pub epoch: Epoch,
    /// Epoch at the point, i.e. `epoch` minus the light time to the observer.
    pub epoch_at_point: Epoch,
    pub incidence: Radian,
    pub emission: Radian,
    pub phase: Radian,
    pub illuminated_fraction: f64,
    pub in_shadow: bool,
    /// `illuminated_fraction` times the unobstructed fraction of the source disk.
    pub solar_flux_fraction: f64,
}

/// Fraction of the source disk hidden by `occluder` as seen from `position` on `body`.
fn occulted_fraction<G>(
    gateway: &G,
    body: Body,
    epoch: &Epoch,
    position: &Vector3<f64>,
    config: &GeometryConfig,
) -> Result<f64, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    let source = config.illumination_source;
    let occluder = match config.occluder {
        Some(occluder) if occluder != body && occluder != source => occluder,
        _ => return Ok(0.0),
    };
    let frame = Frame::BodyFixed(body);
    let points = [*position];
    let source_disk = apparent_disks(
        gateway, body, source, epoch, &frame, &points, config.aberration,
    )?
    .remove(0)?;
    let occluder_disk = apparent_disks(
        gateway, body, occluder, epoch, &frame, &points, config.aberration,
    )?
    .remove(0)?;
    Ok(covered_fraction(&occluder_disk, &source_disk))
}

fn sample_point<G>(
    gateway: &G,
    body: Body,
    epoch: &Epoch,
    point: &SurfacePoint,
    config: &GeometryConfig,
) -> Result<IlluminationSample, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    let angles = gateway.illumination_angles(
        ShapeModel::Ellipsoid,
        body,
        epoch,
        &Frame::BodyFixed(body),
        config.aberration,
        config.illumination_source,
        config.illumination_observer,
        &point.position,
    )?;
    let class = classify_illumination(angles.incidence);
    let solar_flux_fraction = if class.in_shadow {
        0.0
    } else {
        class.illuminated_fraction
            * (1.0 - occulted_fraction(gateway, body, epoch, &point.position, config)?)
    };

    Ok(IlluminationSample {
        longitude: point.longitude,
        latitude: point.latitude,
        epoch: *epoch,
        epoch_at_point: angles.epoch_at_point,
        incidence: angles.incidence,
        emission: angles.emission,
        phase: angles.phase,
        illuminated_fraction: class.illuminated_fraction,
        in_shadow: class.in_shadow,
        solar_flux_fraction,
    })
}

/// Illumination at planetocentric (`longitude`, `latitude`) on `body` at `epoch`.
///
/// Arguments
/// -----------------
/// * `gateway`: ephemeris provider.
/// * `body`: illuminated body.
/// * `epoch`: observation epoch.
/// * `longitude`, `latitude`: east-positive planetocentric coordinates, in radians.
/// * `config`: source, observer, occluder and aberration correction.
///
/// Return
/// ----------
/// * The sample, or the first gateway error.
pub fn illumination_at<G>(
    gateway: &G,
    body: Body,
    epoch: &Epoch,
    longitude: Radian,
    latitude: Radian,
    config: &GeometryConfig,
) -> Result<IlluminationSample, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    let position = gateway.surface_point(
        body,
        epoch,
        &Frame::BodyFixed(body),
        longitude,
        latitude,
        ShapeModel::Ellipsoid,
    )?;
    let point = SurfacePoint {
        position,
        longitude,
        latitude,
    };
    sample_point(gateway, body, epoch, &point, config)
}

/// Illumination of every point of `grid`; a failing point does not stop the others.
pub fn illuminate_grid<G>(
    gateway: &G,
    grid: &SurfaceGrid,
    config: &GeometryConfig,
) -> Vec<Result<IlluminationSample, GeometryError>>
where
    G: EphemerisGateway + ?Sized,
{
    let samples: Vec<_> = grid
        .iter()
        .map(|point| sample_point(gateway, grid.body, &grid.epoch, point, config))
        .collect();
    debug!(
        "illuminated {} points of {}, {} in shadow",
        samples.len(),
        grid.body,
        samples
            .iter()
            .filter(|s| matches!(s, Ok(sample) if sample.in_shadow))
            .count()
    );
    samples
}

/// Illumination of one point at each of `epochs`.
pub fn illumination_scan<G>(
    gateway: &G,
    body: Body,
    longitude: Radian,
    latitude: Radian,
    epochs: &[Epoch],
    config: &GeometryConfig,
) -> Vec<Result<IlluminationSample, GeometryError>>
where
    G: EphemerisGateway + ?Sized,
{
    epochs
        .iter()
        .map(|epoch| illumination_at(gateway, body, epoch, longitude, latitude, config))
        .collect()
}
