//! # Constants and type definitions for Galilean
//!
//! This module centralizes the **physical constants**, **numerical tolerances**, and **common type
//! aliases** used throughout the `galilean` crate.
//!
//! ## Overview
//!
//! - Astronomical constants (speed of light, J2000 offsets)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, centuries ↔ days)
//! - Numerical thresholds guarding degenerate geometry
//! - Core type aliases used across the crate
//!
//! These definitions are used by the grid generator, the projector, the separation engine
//! and the snapshot gateway.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

// -------------------------------------------------------------------------------------------------
// Numerical tolerances
// -------------------------------------------------------------------------------------------------

/// Below this norm (km) an observer→target vector has no usable direction.
pub const MIN_DIRECTION_NORM: Kilometer = 1e-9;

/// Convergence threshold on light time (seconds) for converged Newtonian corrections.
pub const LIGHT_TIME_TOLERANCE: f64 = 1e-12;

/// Bisection tolerance (seconds) used when refining occultation window edges.
pub const WINDOW_EDGE_TOLERANCE: f64 = 1e-3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Ephemeris time: TDB seconds past J2000
pub type EphemerisTime = f64;
