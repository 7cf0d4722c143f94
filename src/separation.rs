//! # Angular separation
//!
//! Great-circle separation between two celestial coordinates, using the haversine form
//!
//! ```text
//! h = sin²((δ₂ − δ₁)/2) + cos δ₁ · cos δ₂ · sin²((α₂ − α₁)/2)
//! θ = 2 · atan2(√h, √(1 − h))
//! ```
//!
//! which stays accurate for small separations. `h` is clamped to `[0, 1]` before the square
//! root so round-off can never produce NaN, and the result lies in `[0, π]`.

use crate::celestial::CelestialCoordinate;
use crate::constants::Radian;
use crate::geometry_errors::GeometryError;

/// Angular separation between `a` and `b`, in radians.
///
/// Symmetric in its arguments, zero for identical coordinates and `π` for antipodal ones.
pub fn angular_separation(a: &CelestialCoordinate, b: &CelestialCoordinate) -> Radian {
    let half_ddec = 0.5 * (b.dec - a.dec);
    let half_dra = 0.5 * (b.ra - a.ra);
    let h = half_ddec.sin().powi(2) + a.dec.cos() * b.dec.cos() * half_dra.sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Element-wise separations of two equally long coordinate lists.
pub fn pairwise_separations(
    a: &[CelestialCoordinate],
    b: &[CelestialCoordinate],
) -> Result<Vec<Radian>, GeometryError> {
    if a.len() != b.len() {
        return Err(GeometryError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| angular_separation(x, y))
        .collect())
}

/// Element-wise separations of two per-point projection results.
///
/// An entry fails when either side failed; the first of the two errors is kept.
pub fn separation_of_results(
    a: Vec<Result<CelestialCoordinate, GeometryError>>,
    b: Vec<Result<CelestialCoordinate, GeometryError>>,
) -> Result<Vec<Result<Radian, GeometryError>>, GeometryError> {
    if a.len() != b.len() {
        return Err(GeometryError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.into_iter()
        .zip(b)
        .map(|(x, y)| Ok(angular_separation(&x?, &y?)))
        .collect())
}

#[cfg(test)]
mod separation_test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn coord(ra: f64, dec: f64) -> CelestialCoordinate {
        CelestialCoordinate { ra, dec }
    }

    #[test]
    fn test_identity_and_antipode() {
        let a = coord(1.2, -0.4);
        assert_eq!(angular_separation(&a, &a), 0.0);

        let antipode = coord(1.2 - PI, 0.4);
        assert_relative_eq!(angular_separation(&a, &antipode), PI, epsilon = 1e-7);

        let north = coord(0.0, FRAC_PI_2);
        let south = coord(2.0, -FRAC_PI_2);
        assert_relative_eq!(angular_separation(&north, &south), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_near_antipode() {
        let a = coord(0.3, 0.2);
        for offset in [1e-3, 1e-4, 1e-5] {
            let b = coord(0.3 - PI + offset, -0.2);
            let sep = angular_separation(&a, &b);
            assert!(sep < PI);
            assert_relative_eq!(sep, PI - offset * 0.2f64.cos(), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_small_separation() {
        let a = coord(0.0, 0.0);
        let b = coord(1e-9, 0.0);
        assert_relative_eq!(angular_separation(&a, &b), 1e-9, epsilon = 1e-20);
    }

    #[test]
    fn test_symmetry_and_range_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let a = coord(
                rng.random_range(-PI..PI),
                rng.random_range(-FRAC_PI_2..FRAC_PI_2),
            );
            let b = coord(
                rng.random_range(-PI..PI),
                rng.random_range(-FRAC_PI_2..FRAC_PI_2),
            );
            let ab = angular_separation(&a, &b);
            let ba = angular_separation(&b, &a);
            assert_relative_eq!(ab, ba, epsilon = 1e-15);
            assert!((0.0..=PI).contains(&ab));

            // agrees with the dot-product form away from the ends of the range
            let cos = a.to_unit_vector().dot(&b.to_unit_vector()).clamp(-1.0, 1.0);
            if ab > 1e-3 && ab < PI - 1e-3 {
                assert_relative_eq!(ab, cos.acos(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_pairwise() {
        let a = [coord(0.0, 0.0), coord(1.0, 0.0)];
        let b = [coord(0.0, 0.5), coord(1.0, 0.0)];
        let seps = pairwise_separations(&a, &b).unwrap();
        assert_relative_eq!(seps[0], 0.5, epsilon = 1e-15);
        assert_eq!(seps[1], 0.0);

        assert_eq!(
            pairwise_separations(&a, &b[..1]),
            Err(GeometryError::LengthMismatch { left: 2, right: 1 })
        );
    }

    #[test]
    fn test_separation_of_results_keeps_errors() {
        let a = vec![
            Ok(coord(0.0, 0.0)),
            Err(GeometryError::DegenerateGeometry("zero".into())),
        ];
        let b = vec![Ok(coord(0.0, 0.25)), Ok(coord(0.0, 0.0))];
        let seps = separation_of_results(a, b).unwrap();
        assert_relative_eq!(*seps[0].as_ref().unwrap(), 0.25, epsilon = 1e-15);
        assert!(seps[1].is_err());
    }
}
