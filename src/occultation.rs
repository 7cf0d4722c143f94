//! # Occultation searches
//!
//! Types describing an occultation search and a driver scanning many observer / front-body
//! combinations against one back body.
//!
//! The interval search itself belongs to the [`EphemerisGateway`]
//! ([`occultation_search`](EphemerisGateway::occultation_search)); this module only builds the
//! queries, validates them and collects the returned windows into [`OccultationEvent`]s.
//!
//! ## Occultation types
//!
//! | Type | Condition (front disk `F` nearer than back disk `B`) |
//! |---|---|
//! | `FULL` | `B` is entirely hidden by `F` |
//! | `ANNULAR` | `F` lies entirely inside `B` |
//! | `PARTIAL` | the disks overlap without being `FULL` or `ANNULAR` |
//! | `ANY` | the disks overlap at all |
//!
//! ## Typical usage
//!
//! Find when Jupiter hides part of the Sun as seen from the centre of each Galilean moon,
//! and when each moon hides part of the Sun as seen from the others:
//!
//! ```rust,ignore
//! use galilean::bodies::{Body, GALILEAN_MOONS};
//! use galilean::occultation::{OccultationScan, OccultationType, TimeWindow};
//!
//! let window = TimeWindow::new(start, end)?;
//! let events = OccultationScan::new(Body::Sun, window)
//!     .observers(&GALILEAN_MOONS)
//!     .fronts(&[Body::Jupiter, Body::Io, Body::Europa, Body::Ganymede, Body::Callisto])
//!     .kinds(&[OccultationType::Partial])
//!     .run(&gateway)?;
//! ```

use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use itertools::iproduct;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::bodies::Body;
use crate::frames::{AberrationCorrection, Frame, ShapeModel};
use crate::gateway::EphemerisGateway;
use crate::geometry_errors::GeometryError;
use crate::time::ephemeris_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OccultationType {
    Full,
    Annular,
    Partial,
    Any,
}

/// All occultation types, in the order the drivers report them.
pub const ALL_OCCULTATION_TYPES: [OccultationType; 4] = [
    OccultationType::Full,
    OccultationType::Annular,
    OccultationType::Partial,
    OccultationType::Any,
];

impl fmt::Display for OccultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OccultationType::Full => "FULL",
            OccultationType::Annular => "ANNULAR",
            OccultationType::Partial => "PARTIAL",
            OccultationType::Any => "ANY",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OccultationType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FULL" => Ok(OccultationType::Full),
            "ANNULAR" => Ok(OccultationType::Annular),
            "PARTIAL" => Ok(OccultationType::Partial),
            "ANY" => Ok(OccultationType::Any),
            other => Err(GeometryError::InvalidSearch(format!(
                "unknown occultation type '{other}'"
            ))),
        }
    }
}

/// A closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeWindow {
    /// Build a window, rejecting intervals whose end precedes their start.
    pub fn new(start: Epoch, end: Epoch) -> Result<Self, GeometryError> {
        if end < start {
            return Err(GeometryError::InvalidSearch(format!(
                "window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(TimeWindow { start, end })
    }

    /// Length of the window in seconds.
    pub fn duration_seconds(&self) -> f64 {
        ephemeris_time(&self.end) - ephemeris_time(&self.start)
    }

    pub fn contains(&self, epoch: &Epoch) -> bool {
        self.start <= *epoch && *epoch <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} → {}]", self.start, self.end)
    }
}

/// Arguments of one gateway occultation search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccultationQuery {
    pub kind: OccultationType,
    pub front: Body,
    pub front_shape: ShapeModel,
    pub front_frame: Frame,
    pub back: Body,
    pub back_shape: ShapeModel,
    pub back_frame: Frame,
    pub correction: AberrationCorrection,
    pub observer: Body,
    /// Search step in seconds; events shorter than the step may be missed.
    pub step_seconds: f64,
    pub confinement: TimeWindow,
}

impl OccultationQuery {
    /// Ellipsoidal front and back bodies in their own body-fixed frames.
    pub fn ellipsoids(
        kind: OccultationType,
        front: Body,
        back: Body,
        observer: Body,
        correction: AberrationCorrection,
        step_seconds: f64,
        confinement: TimeWindow,
    ) -> Self {
        OccultationQuery {
            kind,
            front,
            front_shape: ShapeModel::Ellipsoid,
            front_frame: Frame::BodyFixed(front),
            back,
            back_shape: ShapeModel::Ellipsoid,
            back_frame: Frame::BodyFixed(back),
            correction,
            observer,
            step_seconds,
            confinement,
        }
    }

    /// Reject queries no gateway could answer meaningfully.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.step_seconds.is_finite() && self.step_seconds > 0.0) {
            return Err(GeometryError::InvalidSearch(format!(
                "step must be a positive number of seconds, got {}",
                self.step_seconds
            )));
        }
        if self.confinement.start >= self.confinement.end {
            return Err(GeometryError::InvalidSearch(
                "confinement window is empty".into(),
            ));
        }
        if self.front == self.back {
            return Err(GeometryError::InvalidSearch(format!(
                "{} cannot occult itself",
                self.front
            )));
        }
        if self.observer == self.front || self.observer == self.back {
            return Err(GeometryError::InvalidSearch(format!(
                "observer {} must differ from the front and back bodies",
                self.observer
            )));
        }
        if self.front_shape == ShapeModel::Point && self.back_shape == ShapeModel::Point {
            return Err(GeometryError::InvalidSearch(
                "at least one body must be an ellipsoid".into(),
            ));
        }
        Ok(())
    }

    /// "Condition: PARTIAL occultation of SUN by JUPITER as seen from center of IO"
    pub fn describe(&self) -> String {
        format!(
            "Condition: {} occultation of {} by {} as seen from center of {}",
            self.kind, self.back, self.front, self.observer
        )
    }
}

/// One window reported for a given query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccultationEvent {
    pub kind: OccultationType,
    pub front: Body,
    pub back: Body,
    pub observer: Body,
    pub window: TimeWindow,
}

/// Occultation search over every (observer, front body, type) combination.
#[derive(Debug, Clone)]
pub struct OccultationScan {
    back: Body,
    observers: Vec<Body>,
    fronts: Vec<Body>,
    kinds: Vec<OccultationType>,
    include_reversed: bool,
    correction: AberrationCorrection,
    step_seconds: f64,
    confinement: TimeWindow,
}

impl OccultationScan {
    /// Scan for occultations of `back`, with a 300 s step and no aberration correction,
    /// looking for every occultation type.
    pub fn new(back: Body, confinement: TimeWindow) -> Self {
        OccultationScan {
            back,
            observers: Vec::new(),
            fronts: Vec::new(),
            kinds: ALL_OCCULTATION_TYPES.to_vec(),
            include_reversed: false,
            correction: AberrationCorrection::None,
            step_seconds: 300.0,
            confinement,
        }
    }

    pub fn observers(mut self, observers: &[Body]) -> Self {
        self.observers = observers.to_vec();
        self
    }

    pub fn fronts(mut self, fronts: &[Body]) -> Self {
        self.fronts = fronts.to_vec();
        self
    }

    pub fn kinds(mut self, kinds: &[OccultationType]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    /// Also search with front and back swapped (transits as well as occultations).
    pub fn include_reversed(mut self, include: bool) -> Self {
        self.include_reversed = include;
        self
    }

    pub fn correction(mut self, correction: AberrationCorrection) -> Self {
        self.correction = correction;
        self
    }

    pub fn step_seconds(mut self, step: f64) -> Self {
        self.step_seconds = step;
        self
    }

    /// Every query of the scan, skipping combinations where the observer is one of the bodies
    /// or a body would occult itself.
    pub fn queries(&self) -> Vec<OccultationQuery> {
        let mut queries = Vec::new();
        for (&observer, &front, &kind) in iproduct!(&self.observers, &self.fronts, &self.kinds) {
            if observer == front || observer == self.back || front == self.back {
                continue;
            }
            queries.push(OccultationQuery::ellipsoids(
                kind,
                front,
                self.back,
                observer,
                self.correction,
                self.step_seconds,
                self.confinement,
            ));
            if self.include_reversed {
                queries.push(OccultationQuery::ellipsoids(
                    kind,
                    self.back,
                    front,
                    observer,
                    self.correction,
                    self.step_seconds,
                    self.confinement,
                ));
            }
        }
        queries
    }

    /// Run every query against `gateway` and collect the reported windows.
    ///
    /// Return
    /// ----------
    /// * All events, grouped by query in [`queries`](OccultationScan::queries) order, or the
    ///   first validation / gateway error.
    pub fn run<G>(&self, gateway: &G) -> Result<Vec<OccultationEvent>, GeometryError>
    where
        G: EphemerisGateway + ?Sized,
    {
        let mut events = Vec::new();
        for query in self.queries() {
            query.validate()?;
            let windows = gateway.occultation_search(&query)?;
            debug!("{}: {} window(s)", query.describe(), windows.len());
            events.extend(windows.into_iter().map(|window| OccultationEvent {
                kind: query.kind,
                front: query.front,
                back: query.back,
                observer: query.observer,
                window,
            }));
        }
        Ok(events)
    }
}

#[cfg(test)]
mod occultation_test {
    use super::*;
    use crate::time::epoch_from_ephemeris_time;

    fn window(start: f64, end: f64) -> TimeWindow {
        TimeWindow::new(
            epoch_from_ephemeris_time(start),
            epoch_from_ephemeris_time(end),
        )
        .unwrap()
    }

    #[test]
    fn test_occultation_type_parsing() {
        assert_eq!(
            "partial".parse::<OccultationType>().unwrap(),
            OccultationType::Partial
        );
        assert_eq!(OccultationType::Annular.to_string(), "ANNULAR");
        assert!("TOTAL".parse::<OccultationType>().is_err());
    }

    #[test]
    fn test_time_window() {
        let w = window(0.0, 600.0);
        assert!((w.duration_seconds() - 600.0).abs() < 1e-6);
        assert!(w.contains(&epoch_from_ephemeris_time(300.0)));
        assert!(!w.contains(&epoch_from_ephemeris_time(601.0)));
        assert!(TimeWindow::new(
            epoch_from_ephemeris_time(10.0),
            epoch_from_ephemeris_time(0.0)
        )
        .is_err());
    }

    #[test]
    fn test_query_validation() {
        let base = OccultationQuery::ellipsoids(
            OccultationType::Any,
            Body::Jupiter,
            Body::Sun,
            Body::Europa,
            AberrationCorrection::None,
            300.0,
            window(0.0, 86_400.0),
        );
        assert!(base.validate().is_ok());

        let bad_step = OccultationQuery {
            step_seconds: 0.0,
            ..base
        };
        assert!(matches!(
            bad_step.validate(),
            Err(GeometryError::InvalidSearch(_))
        ));

        let self_occult = OccultationQuery {
            back: Body::Jupiter,
            ..base
        };
        assert!(self_occult.validate().is_err());

        let observer_is_front = OccultationQuery {
            observer: Body::Jupiter,
            ..base
        };
        assert!(observer_is_front.validate().is_err());

        assert_eq!(
            base.describe(),
            "Condition: ANY occultation of SUN by JUPITER as seen from center of EUROPA"
        );
    }

    #[test]
    fn test_scan_queries_skip_self_pairs() {
        let moons = [Body::Io, Body::Europa, Body::Ganymede, Body::Callisto];
        let scan = OccultationScan::new(Body::Sun, window(0.0, 3600.0))
            .observers(&moons)
            .fronts(&moons)
            .kinds(&[OccultationType::Partial]);
        let queries = scan.queries();
        // 4 observers × 3 other moons
        assert_eq!(queries.len(), 12);
        assert!(queries.iter().all(|q| q.observer != q.front));
        assert!(queries.iter().all(|q| q.back == Body::Sun));

        let reversed = scan.clone().include_reversed(true).queries();
        assert_eq!(reversed.len(), 24);
        assert_eq!(reversed[1].front, Body::Sun);
        assert_eq!(reversed[1].back, reversed[0].front);
    }
}
