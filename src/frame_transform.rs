//! # Frame transforms
//!
//! Rotate batches of surface points between reference frames.
//!
//! Rotations arrive from the gateway (or from callers) as dynamically sized matrices and are
//! validated once into a fixed [`Matrix3`]. The points are then stacked as the columns of a
//! `3×N` matrix and rotated with a single matrix product, which keeps order and length.
//!
//! ## See also
//! ------------
//! * [`EphemerisGateway::frame_rotation_matrix`] – Source of the rotation matrices.
//! * [`crate::frames::rotmt`] – Elementary axis rotations.

use log::debug;
use nalgebra::{DMatrix, Matrix3, Matrix3xX, Vector3};

use crate::frames::Frame;
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;
use crate::surface_grid::SurfaceGrid;

/// Check that `rotation` is a finite 3×3 matrix and convert it to a [`Matrix3`].
pub fn validate_rotation(rotation: &DMatrix<f64>) -> Result<Matrix3<f64>, GeometryError> {
    if rotation.shape() != (3, 3) {
        return Err(GeometryError::InvalidRotation(format!(
            "expected a 3x3 matrix, got {}x{}",
            rotation.nrows(),
            rotation.ncols()
        )));
    }
    if rotation.iter().any(|x| !x.is_finite()) {
        return Err(GeometryError::InvalidRotation(
            "matrix has non-finite entries".into(),
        ));
    }
    Ok(rotation.fixed_view::<3, 3>(0, 0).into_owned())
}

/// Rotate every point by `rotation` (`v' = R · v`), in one `3×3 · 3×N` product.
pub fn rotate_points(points: &[Vector3<f64>], rotation: &Matrix3<f64>) -> Vec<Vector3<f64>> {
    if points.is_empty() {
        return Vec::new();
    }
    let stacked = Matrix3xX::from_columns(points);
    let rotated = rotation * stacked;
    rotated.column_iter().map(|c| c.into_owned()).collect()
}

/// Rotate the points of `grid` with a caller-provided rotation.
///
/// Arguments
/// -----------------
/// * `grid`: body-fixed surface grid.
/// * `rotation`: body-fixed → inertial rotation matrix; must be 3×3.
///
/// Return
/// ----------
/// * The rotated positions, in grid order, or [`GeometryError::InvalidRotation`].
pub fn to_inertial(
    grid: &SurfaceGrid,
    rotation: &DMatrix<f64>,
) -> Result<Vec<Vector3<f64>>, GeometryError> {
    let rotation = validate_rotation(rotation)?;
    Ok(rotate_points(&grid.positions(), &rotation))
}

/// Express the points of `grid` in `to_frame`, fetching the rotation from the gateway once.
pub fn grid_to_frame<G>(
    gateway: &G,
    grid: &SurfaceGrid,
    to_frame: &Frame,
) -> Result<Vec<Vector3<f64>>, GeometryError>
where
    G: EphemerisGateway + ?Sized,
{
    let rotation = gateway.frame_rotation_matrix(&grid.frame, to_frame, &grid.epoch)?;
    debug!(
        "rotating {} points of {} from {} to {to_frame}",
        grid.len(),
        grid.body,
        grid.frame
    );
    let rotation = validate_rotation(&DMatrix::from_column_slice(3, 3, rotation.as_slice()))?;
    Ok(rotate_points(&grid.positions(), &rotation))
}

#[cfg(test)]
mod frame_transform_test {
    use super::*;
    use crate::frames::rotmt;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_validate_rotation_shapes() {
        let ok = DMatrix::<f64>::identity(3, 3);
        assert_eq!(validate_rotation(&ok).unwrap(), Matrix3::identity());

        let wrong = DMatrix::<f64>::identity(2, 3);
        assert!(matches!(
            validate_rotation(&wrong),
            Err(GeometryError::InvalidRotation(_))
        ));

        let mut nan = DMatrix::<f64>::identity(3, 3);
        nan[(1, 2)] = f64::NAN;
        assert!(validate_rotation(&nan).is_err());
    }

    #[test]
    fn test_rotate_points_matches_per_point_product() {
        let r = rotmt(0.3, 0) * rotmt(-1.1, 2);
        let points = vec![
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-4.0, 0.5, 0.0),
            Vector3::new(0.0, 0.0, -7.0),
        ];
        let rotated = rotate_points(&points, &r);
        assert_eq!(rotated.len(), 3);
        for (p, q) in points.iter().zip(&rotated) {
            assert_relative_eq!(r * p, *q, epsilon = 1e-12);
        }
        assert!(rotate_points(&[], &r).is_empty());
    }

    #[test]
    fn test_dynamic_matrix_is_column_major() {
        let r = rotmt(FRAC_PI_2, 2);
        let dynamic = DMatrix::from_column_slice(3, 3, r.as_slice());
        let fixed = validate_rotation(&dynamic).unwrap();
        assert_relative_eq!(
            fixed * Vector3::x(),
            Vector3::new(0.0, 1.0, 0.0),
            epsilon = 1e-15
        );
    }
}
