use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use galilean::bodies::Body;
use galilean::config::GeometryConfig;
use galilean::galilean::GalileanGeometry;
use galilean::illumination::{
    classify_illumination, illuminate_grid, illumination_at, illumination_scan,
};
use galilean::surface_grid::{generate_grid, HemisphereMode};
use galilean::time::{ephemeris_time, epoch_from_ephemeris_time};
use galilean::GeometryError;

mod common;
use common::{init_logger, jovian_system};

#[test]
fn test_dayside_and_nightside_points() {
    init_logger();
    let gateway = jovian_system();
    let config = GeometryConfig::default();
    let epoch = epoch_from_ephemeris_time(0.0);

    // Io's −X hemisphere faces the Sun
    let noon = illumination_at(&gateway, Body::Io, &epoch, PI, 0.0, &config).unwrap();
    assert!(!noon.in_shadow);
    assert!(noon.incidence < 1e-3);
    assert_relative_eq!(noon.illuminated_fraction, 1.0, epsilon = 1e-6);
    // Jupiter is a quarter turn away from the Sun on Io's sky
    assert_relative_eq!(noon.solar_flux_fraction, noon.illuminated_fraction, epsilon = 1e-12);
    assert!(noon.emission > 0.0 && noon.emission < FRAC_PI_2);
    assert!(ephemeris_time(&noon.epoch_at_point) < -2_000.0);
    assert_eq!(noon.epoch, epoch);
    assert_eq!(noon.longitude, PI);

    let midnight = illumination_at(&gateway, Body::Io, &epoch, 0.0, 0.0, &config).unwrap();
    assert!(midnight.in_shadow);
    assert!(midnight.incidence > PI - 1e-3);
    assert_eq!(midnight.illuminated_fraction, 0.0);
    assert_eq!(midnight.solar_flux_fraction, 0.0);
}

#[test]
fn test_jupiter_eclipses_europa() {
    let gateway = jovian_system();
    let epoch = epoch_from_ephemeris_time(0.0);

    let eclipsed = illumination_at(
        &gateway,
        Body::Europa,
        &epoch,
        PI,
        0.0,
        &GeometryConfig::default(),
    )
    .unwrap();
    // geometrically facing the Sun, but behind Jupiter
    assert!(!eclipsed.in_shadow);
    assert_relative_eq!(eclipsed.illuminated_fraction, 1.0, epsilon = 1e-9);
    assert_eq!(eclipsed.solar_flux_fraction, 0.0);

    let no_occluder = GeometryConfig {
        occluder: None,
        ..Default::default()
    };
    let unshadowed =
        illumination_at(&gateway, Body::Europa, &epoch, PI, 0.0, &no_occluder).unwrap();
    assert_eq!(unshadowed.solar_flux_fraction, unshadowed.illuminated_fraction);
}

#[test]
fn test_grid_illumination_is_consistent() {
    let gateway = jovian_system();
    let epoch = epoch_from_ephemeris_time(0.0);
    let grid = generate_grid(&gateway, Body::Callisto, &epoch, 4, HemisphereMode::Full).unwrap();
    let samples = illuminate_grid(&gateway, &grid, &GeometryConfig::default());
    assert_eq!(samples.len(), 12);

    for (point, sample) in grid.iter().zip(&samples) {
        let sample = sample.as_ref().unwrap();
        assert_eq!(sample.longitude, point.longitude);
        assert_eq!(sample.latitude, point.latitude);
        let class = classify_illumination(sample.incidence);
        assert_eq!(sample.in_shadow, class.in_shadow);
        assert_eq!(sample.illuminated_fraction, class.illuminated_fraction);
        assert!((0.0..=PI).contains(&sample.phase));
        // the Sun is towards −X from Callisto
        if point.position.x < -1.0 {
            assert!(!sample.in_shadow);
        }
        if point.position.x > 1.0 {
            assert!(sample.in_shadow);
        }
    }
}

#[test]
fn test_scan_and_facade_degrees() {
    let mut gateway = jovian_system();
    let epochs = [0.0, 3_600.0, 7_200.0].map(epoch_from_ephemeris_time);
    let config = GeometryConfig::default();

    let scan = illumination_scan(&gateway, Body::Io, PI, 0.5, &epochs, &config);
    assert_eq!(scan.len(), 3);
    for (sample, epoch) in scan.iter().zip(&epochs) {
        let sample = sample.as_ref().unwrap();
        assert_eq!(sample.epoch, *epoch);
        // frozen system: the geometry does not change
        assert_relative_eq!(
            sample.incidence,
            scan[0].as_ref().unwrap().incidence,
            epsilon = 1e-12
        );
    }

    gateway.unload(Body::Earth);
    let failed = illumination_scan(&gateway, Body::Io, PI, 0.5, &epochs, &config);
    assert!(failed
        .iter()
        .all(|s| matches!(s, Err(GeometryError::GatewayUnavailable(_)))));

    let geometry = GalileanGeometry::new(jovian_system(), config.clone()).unwrap();
    let epoch = epoch_from_ephemeris_time(0.0);
    let degrees = geometry.illumination(Body::Io, &epoch, 180.0, 30.0).unwrap();
    let radians =
        illumination_at(geometry.gateway(), Body::Io, &epoch, PI, PI / 6.0, &config).unwrap();
    assert_relative_eq!(degrees.incidence, radians.incidence, epsilon = 1e-12);
    assert_relative_eq!(degrees.incidence, PI / 6.0, epsilon = 1e-2);

    let grid = geometry.generate_grid(Body::Io, &epoch).unwrap();
    assert_eq!(geometry.illuminate_grid(&grid).len(), 6);
    assert_eq!(
        geometry.illumination_scan(Body::Io, 180.0, 0.0, &epochs).len(),
        3
    );
}

#[test]
fn test_sun_as_observer() {
    let config = GeometryConfig::from_json_str(r#"{"illumination_observer": "SUN"}"#).unwrap();
    let geometry = GalileanGeometry::new(jovian_system(), config).unwrap();
    let epoch = epoch_from_ephemeris_time(0.0);

    // seen from the source, every lit point is at zero phase
    let sample = geometry.illumination(Body::Io, &epoch, 160.0, 15.0).unwrap();
    assert!(!sample.in_shadow);
    assert_relative_eq!(sample.phase, 0.0, epsilon = 1e-9);
    assert_relative_eq!(sample.emission, sample.incidence, epsilon = 1e-9);
    assert!(sample.incidence > 0.1);
}
