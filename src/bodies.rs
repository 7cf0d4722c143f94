//! # Bodies of the Jovian system
//!
//! Identifiers for the bodies this crate reasons about: the Sun (illumination source), the
//! Earth (default remote observer), Jupiter and the four Galilean moons.
//!
//! Each [`Body`] maps to its NAIF integer code and its NAIF name, and owns a body-fixed
//! frame named `IAU_<NAME>` (see [`Frame::BodyFixed`](crate::frames::Frame::BodyFixed)).
//! Names are parsed case-insensitively, so `"europa"`, `"Europa"` and `"EUROPA"` all resolve
//! to [`Body::Europa`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry_errors::GeometryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Body {
    Sun,
    Earth,
    Jupiter,
    Io,
    Europa,
    Ganymede,
    Callisto,
}

/// The four Galilean moons, innermost first.
pub const GALILEAN_MOONS: [Body; 4] = [Body::Io, Body::Europa, Body::Ganymede, Body::Callisto];

impl Body {
    /// Every known body, Sun first.
    pub const ALL: [Body; 7] = [
        Body::Sun,
        Body::Earth,
        Body::Jupiter,
        Body::Io,
        Body::Europa,
        Body::Ganymede,
        Body::Callisto,
    ];

    pub fn from_id(id: i32) -> Result<Self, GeometryError> {
        match id {
            10 => Ok(Body::Sun),
            399 => Ok(Body::Earth),
            599 => Ok(Body::Jupiter),
            501 => Ok(Body::Io),
            502 => Ok(Body::Europa),
            503 => Ok(Body::Ganymede),
            504 => Ok(Body::Callisto),
            _ => Err(GeometryError::UnknownBody(id.to_string())),
        }
    }

    pub fn to_id(&self) -> i32 {
        match self {
            Body::Sun => 10,
            Body::Earth => 399,
            Body::Jupiter => 599,
            Body::Io => 501,
            Body::Europa => 502,
            Body::Ganymede => 503,
            Body::Callisto => 504,
        }
    }

    /// NAIF name of the body (upper case).
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "SUN",
            Body::Earth => "EARTH",
            Body::Jupiter => "JUPITER",
            Body::Io => "IO",
            Body::Europa => "EUROPA",
            Body::Ganymede => "GANYMEDE",
            Body::Callisto => "CALLISTO",
        }
    }

    /// Name of the body-fixed frame rotating with this body, e.g. `IAU_EUROPA`.
    pub fn fixed_frame_name(&self) -> String {
        format!("IAU_{}", self.name())
    }

    pub fn is_galilean_moon(&self) -> bool {
        GALILEAN_MOONS.contains(self)
    }
}

impl From<Body> for i32 {
    fn from(body: Body) -> Self {
        body.to_id()
    }
}

impl TryFrom<i32> for Body {
    type Error = GeometryError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Body::from_id(id)
    }
}

impl FromStr for Body {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUN" => Ok(Body::Sun),
            "EARTH" => Ok(Body::Earth),
            "JUPITER" => Ok(Body::Jupiter),
            "IO" => Ok(Body::Io),
            "EUROPA" => Ok(Body::Europa),
            "GANYMEDE" => Ok(Body::Ganymede),
            "CALLISTO" => Ok(Body::Callisto),
            other => Err(GeometryError::UnknownBody(other.to_string())),
        }
    }
}

impl TryFrom<String> for Body {
    type Error = GeometryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Body> for String {
    fn from(body: Body) -> Self {
        body.name().to_string()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test_bodies {
    use super::*;

    #[test]
    fn test_body_ids() {
        assert_eq!(Body::from_id(502).unwrap(), Body::Europa);
        assert_eq!(Body::from_id(10).unwrap(), Body::Sun);
        assert_eq!(i32::from(Body::Callisto), 504);
        assert_eq!(Body::try_from(599).unwrap(), Body::Jupiter);
        assert!(Body::from_id(505).is_err());
    }

    #[test]
    fn test_body_names() {
        assert_eq!("europa".parse::<Body>().unwrap(), Body::Europa);
        assert_eq!(" Ganymede ".parse::<Body>().unwrap(), Body::Ganymede);
        assert_eq!(Body::Io.to_string(), "IO");
        assert_eq!(Body::Io.fixed_frame_name(), "IAU_IO");
        assert_eq!(
            "Amalthea".parse::<Body>(),
            Err(GeometryError::UnknownBody("AMALTHEA".into()))
        );
    }

    #[test]
    fn test_galilean_moons() {
        assert!(Body::Europa.is_galilean_moon());
        assert!(!Body::Jupiter.is_galilean_moon());
        assert!(!Body::Sun.is_galilean_moon());
    }
}
