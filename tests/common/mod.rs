#![allow(dead_code)]

use galilean::bodies::Body;
use galilean::gateway::iau_constants::{iau_radii, RotationModel};
use galilean::gateway::snapshot::{BodyStateRecord, SnapshotGateway};

/// Jupiter's distance from the Sun used by the fixture, in km.
pub const JUPITER_X: f64 = 7.8e8;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn state(body: Body, position: [f64; 3], velocity: [f64; 3]) -> BodyStateRecord {
    BodyStateRecord {
        body,
        et: 0.0,
        x: position[0],
        y: position[1],
        z: position[2],
        vx: velocity[0],
        vy: velocity[1],
        vz: velocity[2],
        coverage_seconds: None,
    }
}

/// Gateway with IAU radii, body-fixed frames aligned with J2000 and the given states.
pub fn aligned_gateway(states: Vec<BodyStateRecord>) -> SnapshotGateway {
    let mut gateway = SnapshotGateway::new();
    for body in Body::ALL {
        gateway.insert_radii(body, iau_radii(body));
        gateway.insert_rotation(body, RotationModel::inertially_aligned());
    }
    gateway.load_states(states);
    gateway
}

/// A frozen Jovian system in the ecliptic plane, Sun at the origin and Jupiter on +X.
///
/// * Europa sits behind Jupiter and is eclipsed.
/// * Ganymede sits between the Sun and Jupiter.
/// * Io and Callisto are off the Sun–Jupiter line, on +Y and −Y.
/// * The Earth is on +Y, far from everything.
pub fn jovian_system() -> SnapshotGateway {
    aligned_gateway(vec![
        state(Body::Sun, [0.0; 3], [0.0; 3]),
        state(Body::Earth, [0.0, 1.496e8, 0.0], [0.0; 3]),
        state(Body::Jupiter, [JUPITER_X, 0.0, 0.0], [0.0; 3]),
        state(Body::Io, [JUPITER_X, 421_800.0, 0.0], [0.0; 3]),
        state(Body::Europa, [JUPITER_X + 671_100.0, 0.0, 0.0], [0.0; 3]),
        state(Body::Ganymede, [JUPITER_X - 1_070_400.0, 0.0, 0.0], [0.0; 3]),
        state(Body::Callisto, [JUPITER_X, -1_882_700.0, 0.0], [0.0; 3]),
    ])
}

/// Jupiter crossing the solar disk seen from Io, closest approach at ET 20000 s.
pub fn jupiter_transit() -> SnapshotGateway {
    aligned_gateway(vec![
        state(Body::Io, [0.0; 3], [0.0; 3]),
        state(Body::Sun, [1.0e8, 0.0, 0.0], [0.0; 3]),
        state(Body::Jupiter, [1.0e6, -2.0e5, 0.0], [0.0, 10.0, 0.0]),
    ])
}
