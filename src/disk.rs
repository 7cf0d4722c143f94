//! # Apparent disks
//!
//! Size and position of a body's disk on the sky of an observation point, and the overlap
//! of two such disks.
//!
//! A body of mean radius `R` at distance `d` subtends an angular radius `asin(R / d)`.
//! Overlaps are computed on the tangent plane, which is exact enough for the sub-degree
//! disks met between Jupiter, its moons and the Sun.

use std::f64::consts::PI;

use hifitime::Epoch;
use log::warn;
use nalgebra::Vector3;

use crate::bodies::Body;
use crate::celestial::{lines_of_sight, CelestialCoordinate};
use crate::constants::{Kilometer, Radian, MIN_DIRECTION_NORM};
use crate::frames::{AberrationCorrection, Frame};
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;
use crate::occultation::OccultationType;
use crate::separation::angular_separation;

/// A body's disk as seen from one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentDisk {
    pub center: CelestialCoordinate,
    /// Angular radius in radians, zero for a point-like body.
    pub angular_radius: Radian,
    /// Distance from the point to the body's centre, in km.
    pub distance: Kilometer,
}

impl ApparentDisk {
    /// Disk of a sphere of `radius` km whose centre is at `line_of_sight` from the observer.
    ///
    /// Fails with [`GeometryError::DegenerateGeometry`] when the observer lies inside the
    /// sphere or the line of sight has no direction.
    pub fn from_line_of_sight(
        line_of_sight: &Vector3<f64>,
        radius: Kilometer,
    ) -> Result<Self, GeometryError> {
        let center = CelestialCoordinate::from_direction(line_of_sight)?;
        let distance = line_of_sight.norm();
        if radius > 0.0 && distance <= radius {
            return Err(GeometryError::DegenerateGeometry(format!(
                "observer at {distance:.3} km is inside a body of radius {radius:.3} km"
            )));
        }
        Ok(ApparentDisk {
            center,
            angular_radius: (radius / distance.max(MIN_DIRECTION_NORM)).asin(),
            distance,
        })
    }

    /// Solid angle of the disk, in steradians.
    pub fn solid_angle(&self) -> f64 {
        2.0 * PI * (1.0 - self.angular_radius.cos())
    }
}

/// Mean of the three radii of a triaxial body.
pub fn mean_radius(radii: &Vector3<f64>) -> Kilometer {
    radii.sum() / 3.0
}

/// Apparent disk of `target` seen from each of `points` on `observer`.
///
/// Every point is processed; a point inside the target or at its centre only fails its own
/// entry. The target is modelled as a sphere of its mean radius.
pub fn apparent_disks<G>(
    gateway: &G,
    observer: Body,
    target: Body,
    epoch: &Epoch,
    frame: &Frame,
    points: &[Vector3<f64>],
    correction: AberrationCorrection,
) -> Result<Vec<Result<ApparentDisk, GeometryError>>, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    let radius = mean_radius(&gateway.body_radii(target)?);
    let relative = gateway.relative_position(target, epoch, frame, correction, observer)?;

    let disks: Vec<_> = lines_of_sight(&relative.position, points)
        .iter()
        .map(|los| ApparentDisk::from_line_of_sight(los, radius))
        .collect();

    if disks.iter().any(|d| d.is_err()) {
        warn!("some points have no usable disk of {target} at {epoch}");
    }
    Ok(disks)
}

/// Overlap of a nearer (front) disk over a farther (back) disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlap {
    None,
    Partial,
    /// The front disk lies entirely inside the back disk.
    Annular,
    /// The back disk is entirely hidden.
    Full,
}

impl Overlap {
    /// Classify the overlap of `front` over `back`.
    ///
    /// A front disk that is farther than the back disk hides nothing.
    pub fn classify(front: &ApparentDisk, back: &ApparentDisk) -> Overlap {
        if front.distance >= back.distance {
            return Overlap::None;
        }
        let sep = angular_separation(&front.center, &back.center);
        let (rf, rb) = (front.angular_radius, back.angular_radius);
        if sep >= rf + rb {
            Overlap::None
        } else if sep <= rf - rb {
            Overlap::Full
        } else if sep <= rb - rf {
            Overlap::Annular
        } else {
            Overlap::Partial
        }
    }

    /// Whether this overlap satisfies an occultation type.
    pub fn matches(&self, kind: OccultationType) -> bool {
        match kind {
            OccultationType::Full => *self == Overlap::Full,
            OccultationType::Annular => *self == Overlap::Annular,
            OccultationType::Partial => *self == Overlap::Partial,
            OccultationType::Any => *self != Overlap::None,
        }
    }
}

/// Fraction of the back disk's area hidden by the front disk, in `[0, 1]`.
///
/// A point-like back disk counts as fully hidden when its centre is inside the front disk.
pub fn covered_fraction(front: &ApparentDisk, back: &ApparentDisk) -> f64 {
    if front.distance >= back.distance {
        return 0.0;
    }
    let d = angular_separation(&front.center, &back.center);
    let (rf, rb) = (front.angular_radius, back.angular_radius);

    if rb <= 0.0 {
        return if d < rf { 1.0 } else { 0.0 };
    }
    if d >= rf + rb {
        return 0.0;
    }
    if d <= (rf - rb).abs() {
        return if rf >= rb { 1.0 } else { (rf / rb).powi(2) };
    }

    let alpha = ((d * d + rf * rf - rb * rb) / (2.0 * d * rf)).clamp(-1.0, 1.0).acos();
    let beta = ((d * d + rb * rb - rf * rf) / (2.0 * d * rb)).clamp(-1.0, 1.0).acos();
    let kite = (-d + rf + rb) * (d + rf - rb) * (d - rf + rb) * (d + rf + rb);
    let lens = rf * rf * alpha + rb * rb * beta - 0.5 * kite.max(0.0).sqrt();
    (lens / (PI * rb * rb)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod disk_test {
    use super::*;
    use approx::assert_relative_eq;

    fn disk(ra: f64, radius: f64, distance: f64) -> ApparentDisk {
        ApparentDisk {
            center: CelestialCoordinate { ra, dec: 0.0 },
            angular_radius: radius,
            distance,
        }
    }

    #[test]
    fn test_from_line_of_sight() {
        let d = ApparentDisk::from_line_of_sight(&Vector3::new(0.0, 2.0, 0.0), 1.0).unwrap();
        assert_relative_eq!(d.angular_radius, std::f64::consts::FRAC_PI_6, epsilon = 1e-15);
        assert_relative_eq!(d.center.ra, std::f64::consts::FRAC_PI_2);
        assert_eq!(d.distance, 2.0);

        let point = ApparentDisk::from_line_of_sight(&Vector3::new(3.0, 0.0, 0.0), 0.0).unwrap();
        assert_eq!(point.angular_radius, 0.0);

        assert!(matches!(
            ApparentDisk::from_line_of_sight(&Vector3::new(0.5, 0.0, 0.0), 1.0),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_classify() {
        let back = disk(0.0, 0.01, 100.0);
        assert_eq!(Overlap::classify(&disk(0.05, 0.01, 10.0), &back), Overlap::None);
        assert_eq!(Overlap::classify(&disk(0.015, 0.01, 10.0), &back), Overlap::Partial);
        assert_eq!(Overlap::classify(&disk(0.001, 0.05, 10.0), &back), Overlap::Full);
        assert_eq!(Overlap::classify(&disk(0.002, 0.001, 10.0), &back), Overlap::Annular);
        // behind the back body
        assert_eq!(Overlap::classify(&disk(0.0, 0.05, 200.0), &back), Overlap::None);

        assert!(Overlap::Partial.matches(OccultationType::Any));
        assert!(!Overlap::None.matches(OccultationType::Any));
        assert!(!Overlap::Full.matches(OccultationType::Partial));
    }

    #[test]
    fn test_covered_fraction() {
        let back = disk(0.0, 0.01, 100.0);
        assert_eq!(covered_fraction(&disk(0.5, 0.01, 10.0), &back), 0.0);
        assert_eq!(covered_fraction(&disk(0.0, 0.02, 10.0), &back), 1.0);
        assert_relative_eq!(
            covered_fraction(&disk(0.0, 0.005, 10.0), &back),
            0.25,
            epsilon = 1e-12
        );

        // equal disks offset by one radius: lens area = (2π/3 − √3/2) r²
        let half = covered_fraction(&disk(0.01, 0.01, 10.0), &back);
        let expected = (2.0 * PI / 3.0 - 3.0_f64.sqrt() / 2.0) / PI;
        assert_relative_eq!(half, expected, epsilon = 1e-6);

        // partial coverage grows as the front disk moves in
        let far = covered_fraction(&disk(0.015, 0.01, 10.0), &back);
        let near = covered_fraction(&disk(0.008, 0.01, 10.0), &back);
        assert!(0.0 < far && far < near && near < 1.0);
    }
}
