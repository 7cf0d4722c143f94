pub mod bodies;
pub mod celestial;
pub mod config;
pub mod constants;
pub mod disk;
pub mod frame_transform;
pub mod frames;
pub mod galilean;
pub mod gateway;
pub mod geometry_errors;
pub mod illumination;
pub mod occultation;
pub mod separation;
pub mod surface_grid;
pub mod time;

pub use celestial::{project, CelestialCoordinate};
pub use frame_transform::to_inertial;
pub use gateway::EphemerisGateway;
pub use geometry_errors::GeometryError;
pub use illumination::classify_illumination;
pub use separation::angular_separation;
pub use surface_grid::{generate_grid, HemisphereMode};
