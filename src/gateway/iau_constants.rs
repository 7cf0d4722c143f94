//! # IAU body constants
//!
//! Radii and rotation models for the bodies known to the crate, taken from the IAU WGCCRE
//! report as distributed in the NAIF `pck00011.tpc` kernel. Only the secular terms of the
//! rotation models are kept; the periodic nutation/libration terms of Jupiter and the
//! Galilean satellites (amplitudes below 0.1°) are omitted.
//!
//! The orientation of a body-fixed frame relative to J2000 is
//!
//! ```text
//! R(J2000 → IAU_BODY) = [W]₃ · [π/2 − δ₀]₁ · [π/2 + α₀]₃
//! ```
//!
//! where `[θ]ₖ` is a frame rotation by `θ` around axis `k`, `α₀`/`δ₀` are the pole right
//! ascension/declination and `W` the prime meridian angle.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::bodies::Body;
use crate::constants::{EphemerisTime, Kilometer, DAYS_PER_CENTURY, RADEG, SECONDS_PER_DAY};
use crate::frames::rotmt;

/// Secular IAU rotation model. Angles in degrees; rates per Julian century (pole) and per day
/// (prime meridian), all counted from J2000 TDB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationModel {
    pub pole_ra: f64,
    pub pole_ra_rate: f64,
    pub pole_dec: f64,
    pub pole_dec_rate: f64,
    pub prime_meridian: f64,
    pub prime_meridian_rate: f64,
}

impl RotationModel {
    /// A model whose body-fixed frame coincides with J2000 at every epoch.
    pub fn inertially_aligned() -> Self {
        RotationModel {
            pole_ra: -90.0,
            pole_ra_rate: 0.0,
            pole_dec: 90.0,
            pole_dec_rate: 0.0,
            prime_meridian: 0.0,
            prime_meridian_rate: 0.0,
        }
    }

    /// Pole right ascension, pole declination and prime meridian angle (radians) at `et`.
    pub fn angles(&self, et: EphemerisTime) -> (f64, f64, f64) {
        let days = et / SECONDS_PER_DAY;
        let centuries = days / DAYS_PER_CENTURY;
        let ra = (self.pole_ra + self.pole_ra_rate * centuries) * RADEG;
        let dec = (self.pole_dec + self.pole_dec_rate * centuries) * RADEG;
        let w = (self.prime_meridian + self.prime_meridian_rate * days).rem_euclid(360.0) * RADEG;
        (ra, dec, w)
    }

    /// Rotation matrix from J2000 to the body-fixed frame at `et`.
    pub fn j2000_to_body_fixed(&self, et: EphemerisTime) -> Matrix3<f64> {
        let (ra, dec, w) = self.angles(et);
        let half_pi = std::f64::consts::FRAC_PI_2;
        // frame rotations are active rotations by the opposite angle
        rotmt(-w, 2) * rotmt(-(half_pi - dec), 0) * rotmt(-(half_pi + ra), 2)
    }
}

/// Triaxial radii (km) of `body` from `pck00011.tpc`.
pub fn iau_radii(body: Body) -> Vector3<Kilometer> {
    match body {
        Body::Sun => Vector3::new(696_000.0, 696_000.0, 696_000.0),
        Body::Earth => Vector3::new(6_378.1366, 6_378.1366, 6_356.7519),
        Body::Jupiter => Vector3::new(71_492.0, 71_492.0, 66_854.0),
        Body::Io => Vector3::new(1_829.4, 1_819.4, 1_815.7),
        Body::Europa => Vector3::new(1_562.6, 1_560.3, 1_559.5),
        Body::Ganymede => Vector3::new(2_631.2, 2_631.2, 2_631.2),
        Body::Callisto => Vector3::new(2_410.3, 2_410.3, 2_410.3),
    }
}

/// Secular IAU rotation model of `body` from `pck00011.tpc`.
pub fn iau_rotation(body: Body) -> RotationModel {
    let (pole_ra, pole_ra_rate, pole_dec, pole_dec_rate, prime_meridian, prime_meridian_rate) =
        match body {
            Body::Sun => (286.13, 0.0, 63.87, 0.0, 84.176, 14.184_400_0),
            Body::Earth => (0.0, -0.641, 90.0, -0.557, 190.147, 360.985_623_5),
            Body::Jupiter => (
                268.056_595,
                -0.006_499,
                64.495_303,
                0.002_413,
                284.95,
                870.536_000_0,
            ),
            Body::Io => (268.05, -0.009, 64.50, 0.003, 200.39, 203.488_955_3),
            Body::Europa => (268.08, -0.009, 64.51, 0.003, 36.022, 101.374_723_5),
            Body::Ganymede => (268.20, -0.009, 64.57, 0.003, 44.064, 50.317_608_1),
            Body::Callisto => (268.72, -0.009, 64.83, 0.003, 259.51, 21.571_071_5),
        };
    RotationModel {
        pole_ra,
        pole_ra_rate,
        pole_dec,
        pole_dec_rate,
        prime_meridian,
        prime_meridian_rate,
    }
}

#[cfg(test)]
mod iau_constants_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inertially_aligned_is_identity() {
        let m = RotationModel::inertially_aligned().j2000_to_body_fixed(1.0e8);
        assert_relative_eq!(m, Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_body_fixed_z_is_pole() {
        let model = iau_rotation(Body::Europa);
        let et = 6.7e8;
        let m = model.j2000_to_body_fixed(et);
        let (ra, dec, _) = model.angles(et);
        let pole = Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin());
        // the pole direction maps onto the body-fixed +Z axis
        assert_relative_eq!(m * pole, Vector3::z(), epsilon = 1e-12);
        // orthonormal
        assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_prime_meridian_rate() {
        let model = iau_rotation(Body::Io);
        let (_, _, w0) = model.angles(0.0);
        assert_relative_eq!(w0, 200.39 * RADEG, epsilon = 1e-12);
        // one Io day later the prime meridian is back where it started
        let period = 360.0 / model.prime_meridian_rate * SECONDS_PER_DAY;
        let (_, _, w1) = model.angles(period);
        assert_relative_eq!(w1, w0, epsilon = 1e-9);
    }

    #[test]
    fn test_radii() {
        assert_eq!(iau_radii(Body::Jupiter).z, 66_854.0);
        assert_eq!(iau_radii(Body::Ganymede).x, iau_radii(Body::Ganymede).z);
    }
}
