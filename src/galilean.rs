//! # GalileanGeometry: gateway and configuration façade
//!
//! This module defines [`GalileanGeometry`], the entry point wiring together:
//!
//! 1. **An ephemeris gateway** ([`EphemerisGateway`]) owned by the façade. Its load/unload
//!    lifecycle stays with the caller through [`gateway_mut`](GalileanGeometry::gateway_mut)
//!    and [`into_gateway`](GalileanGeometry::into_gateway).
//! 2. **A validated configuration** ([`GeometryConfig`]): grid resolution and hemisphere,
//!    inertial frame, aberration correction, illumination source, observer and occluder.
//!
//! Each method runs one stage (or one pipeline) of the surface visibility computation with
//! those settings:
//!
//! ```text
//! generate_grid ─► inertial_grid ─► sky_coordinates ─► body_separations
//!        │
//!        └──────► illuminate_grid
//! ```
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use galilean::bodies::Body;
//! use galilean::config::GeometryConfig;
//! use galilean::galilean::GalileanGeometry;
//!
//! let config = GeometryConfig::from_json_file(Utf8Path::new("geometry.json")).unwrap();
//! let geometry = GalileanGeometry::from_config(config).unwrap();
//!
//! let epoch = geometry.time_to_epoch("2021 Apr 25 16:25:12").unwrap();
//! let grid = geometry.generate_grid(Body::Europa, &epoch).unwrap();
//! let separations = geometry
//!     .body_separations(&grid, Body::Sun, Body::Jupiter)
//!     .unwrap();
//! ```
//!
//! ## See also
//! ------------
//! * [`SnapshotGateway`] – In-process gateway built by [`from_config`](GalileanGeometry::from_config).
//! * [`crate::surface_grid`], [`crate::frame_transform`], [`crate::celestial`],
//!   [`crate::separation`], [`crate::illumination`] – The stages themselves.

use hifitime::Epoch;
use log::info;
use nalgebra::Vector3;

use crate::bodies::Body;
use crate::celestial::{project, CelestialCoordinate};
use crate::config::GeometryConfig;
use crate::constants::{Degree, Radian, RADEG};
use crate::frame_transform::grid_to_frame;
use crate::gateway::snapshot::SnapshotGateway;
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;
use crate::illumination::{illuminate_grid, illumination_at, illumination_scan, IlluminationSample};
use crate::occultation::{OccultationEvent, OccultationScan, OccultationType, TimeWindow};
use crate::separation::separation_of_results;
use crate::surface_grid::{generate_grid, SurfaceGrid};

/// Per-point result list returned by the batch operations.
pub type PointResults<T> = Vec<Result<T, GeometryError>>;

#[derive(Debug, Clone)]
pub struct GalileanGeometry<G: EphemerisGateway> {
    gateway: G,
    config: GeometryConfig,
}

impl GalileanGeometry<SnapshotGateway> {
    /// Build a façade over a [`SnapshotGateway`] preloaded with IAU constants and, when
    /// `config.snapshot_path` is set, with the body states of that CSV snapshot.
    pub fn from_config(config: GeometryConfig) -> Result<Self, GeometryError> {
        let mut gateway = SnapshotGateway::with_iau_constants();
        if let Some(path) = &config.snapshot_path {
            gateway.load_states_csv(path)?;
        }
        Self::new(gateway, config)
    }
}

impl<G: EphemerisGateway> GalileanGeometry<G> {
    /// Wrap `gateway` with a configuration, validating the latter.
    pub fn new(gateway: G, config: GeometryConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        info!(
            "Galilean geometry: resolution {}, {} hemisphere, {} frame, {} aberration, lit by {} seen from {}",
            config.resolution,
            config.hemisphere,
            config.inertial_frame,
            config.aberration,
            config.illumination_source,
            config.illumination_observer
        );
        Ok(GalileanGeometry { gateway, config })
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Mutable access to the gateway, e.g. to load or unload data between requests.
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Hand the gateway (and whatever it has loaded) back to the caller.
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    pub fn time_to_epoch(&self, time: &str) -> Result<Epoch, GeometryError> {
        self.gateway.time_to_epoch(time)
    }

    /// Surface grid of `body` with the configured resolution and hemisphere mode.
    pub fn generate_grid(&self, body: Body, epoch: &Epoch) -> Result<SurfaceGrid, GeometryError> {
        generate_grid(
            &self.gateway,
            body,
            epoch,
            self.config.resolution,
            self.config.hemisphere,
        )
    }

    /// Grid positions rotated into the configured inertial frame.
    pub fn inertial_grid(&self, grid: &SurfaceGrid) -> Result<Vec<Vector3<f64>>, GeometryError> {
        grid_to_frame(&self.gateway, grid, &self.config.inertial_frame)
    }

    /// Inertial right ascension / declination of `target` seen from every grid point.
    pub fn sky_coordinates(
        &self,
        grid: &SurfaceGrid,
        target: Body,
    ) -> Result<PointResults<CelestialCoordinate>, GeometryError> {
        let points = self.inertial_grid(grid)?;
        project(
            &self.gateway,
            grid.body,
            target,
            &grid.epoch,
            &self.config.inertial_frame,
            &points,
            self.config.aberration,
        )
    }

    /// Angular separation between `first` and `second` seen from every grid point.
    pub fn body_separations(
        &self,
        grid: &SurfaceGrid,
        first: Body,
        second: Body,
    ) -> Result<PointResults<Radian>, GeometryError> {
        let a = self.sky_coordinates(grid, first)?;
        let b = self.sky_coordinates(grid, second)?;
        separation_of_results(a, b)
    }

    /// Illumination at a point given in **degrees** (east-positive planetocentric longitude).
    pub fn illumination(
        &self,
        body: Body,
        epoch: &Epoch,
        longitude: Degree,
        latitude: Degree,
    ) -> Result<IlluminationSample, GeometryError> {
        illumination_at(
            &self.gateway,
            body,
            epoch,
            longitude * RADEG,
            latitude * RADEG,
            &self.config,
        )
    }

    pub fn illuminate_grid(&self, grid: &SurfaceGrid) -> PointResults<IlluminationSample> {
        illuminate_grid(&self.gateway, grid, &self.config)
    }

    /// Illumination of one point (degrees) at each of `epochs`.
    pub fn illumination_scan(
        &self,
        body: Body,
        longitude: Degree,
        latitude: Degree,
        epochs: &[Epoch],
    ) -> PointResults<IlluminationSample> {
        illumination_scan(
            &self.gateway,
            body,
            longitude * RADEG,
            latitude * RADEG,
            epochs,
            &self.config,
        )
    }

    /// Occultations of `back` by each of `fronts`, seen from the centre of each observer,
    /// searched with the configured step and without aberration correction.
    pub fn occultations(
        &self,
        back: Body,
        fronts: &[Body],
        observers: &[Body],
        kinds: &[OccultationType],
        window: TimeWindow,
    ) -> Result<Vec<OccultationEvent>, GeometryError> {
        OccultationScan::new(back, window)
            .fronts(fronts)
            .observers(observers)
            .kinds(kinds)
            .step_seconds(self.config.occultation_step_seconds)
            .run(&self.gateway)
    }
}
