//! Arc Linearizer
//!
//! Converts G2/G3 arc commands to linear segments whose chord deviation from
//! the true arc stays within a tolerance.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use xcspost_core::{GeometryError, MotionKind, Point};

/// Default chord error, in target length units
pub const DEFAULT_CHORD_ERROR: f64 = 0.01;
pub const MIN_SEGMENTS: usize = 2;
pub const MAX_SEGMENTS: usize = 128;

/// Commanded rotation sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    /// G2
    Clockwise,
    /// G3
    CounterClockwise,
}

impl ArcDirection {
    pub fn from_kind(kind: MotionKind) -> Option<Self> {
        match kind {
            MotionKind::ArcCw => Some(Self::Clockwise),
            MotionKind::ArcCcw => Some(Self::CounterClockwise),
            _ => None,
        }
    }
}

/// Signed sweep from `start` to `end` around `center` in the commanded sense.
///
/// Clockwise sweeps are in `[-2PI, 0)`, counter-clockwise in `(0, 2PI]`.
/// Coincident start and end angles make a full turn.
pub fn sweep_angle(direction: ArcDirection, start: Point, end: Point, center: Point) -> f64 {
    let a1 = (start - center).angle();
    let a2 = (end - center).angle();
    let mut tarc = a2 - a1;
    match direction {
        ArcDirection::CounterClockwise => {
            if tarc <= 0.0 {
                tarc += 2.0 * PI;
            }
        }
        ArcDirection::Clockwise => {
            if tarc >= 0.0 {
                tarc -= 2.0 * PI;
            }
        }
    }
    tarc
}

/// Arc linearization configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcLinearizerConfig {
    /// Maximum distance between a segment and the arc it replaces
    pub chord_error: f64,
}

impl Default for ArcLinearizerConfig {
    fn default() -> Self {
        Self {
            chord_error: DEFAULT_CHORD_ERROR,
        }
    }
}

/// Commanded end point does not lie on the start radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusMismatch {
    pub start_radius: f64,
    pub end_radius: f64,
    /// Commanded end point
    pub commanded: Point,
    /// End point actually emitted
    pub emitted: Point,
}

/// Result of linearizing one arc
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLinearization {
    /// Waypoints after the start point; the last one is the arc end
    pub points: Vec<Point>,
    /// Signed sweep in radians
    pub sweep: f64,
    pub radius: f64,
    pub mismatch: Option<RadiusMismatch>,
}

/// Converts arc commands to line segments
#[derive(Debug, Clone, Default)]
pub struct ArcLinearizer {
    config: ArcLinearizerConfig,
}

impl ArcLinearizer {
    pub fn new(config: ArcLinearizerConfig) -> Self {
        Self { config }
    }

    pub fn chord_error(&self) -> f64 {
        self.config.chord_error
    }

    /// Largest angular step keeping the chord error within tolerance
    pub fn max_step(&self, radius: f64) -> Result<f64, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::DegenerateRadius { radius });
        }
        let eps = self.config.chord_error;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(GeometryError::NonFinite {
                reason: format!("chord error {} must be positive", eps),
            });
        }
        let cos_half = 1.0 - eps / radius;
        if !(-1.0..=1.0).contains(&cos_half) {
            return Err(GeometryError::ChordErrorOutOfDomain {
                radius,
                chord_error: eps,
            });
        }
        Ok(2.0 * cos_half.acos())
    }

    /// Point count needed for the tolerance, before clamping
    pub fn required_segments(&self, radius: f64, sweep: f64) -> Result<usize, GeometryError> {
        let step = self.max_step(radius)?;
        let ratio = sweep.abs() / step;
        if !ratio.is_finite() {
            return Err(GeometryError::NonFinite {
                reason: format!("sweep {} over step {}", sweep, step),
            });
        }
        let mut n = (ratio.round() as usize).max(MIN_SEGMENTS);
        if sweep.abs() / (n - 1) as f64 > step {
            n = ratio.ceil() as usize + 1;
        }
        Ok(n)
    }

    /// Point count clamped to `[MIN_SEGMENTS, MAX_SEGMENTS]`
    pub fn segment_count(&self, radius: f64, sweep: f64) -> Result<usize, GeometryError> {
        Ok(self
            .required_segments(radius, sweep)?
            .clamp(MIN_SEGMENTS, MAX_SEGMENTS))
    }

    /// Linearize the arc from `start` to `end` around `center`
    pub fn linearize(
        &self,
        direction: ArcDirection,
        start: Point,
        end: Point,
        center: Point,
    ) -> Result<ArcLinearization, GeometryError> {
        let radius = start.distance_to(&center);
        let sweep = sweep_angle(direction, start, end, center);
        let n = self.segment_count(radius, sweep)?;

        let a1 = (start - center).angle();
        let points: Vec<Point> = (1..n)
            .map(|i| {
                let a = a1 + sweep * i as f64 / (n - 1) as f64;
                Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
            })
            .collect();

        let end_radius = end.distance_to(&center);
        let mismatch = if (end_radius - radius).abs() > self.config.chord_error {
            Some(RadiusMismatch {
                start_radius: radius,
                end_radius,
                commanded: end,
                emitted: points.last().copied().unwrap_or(start),
            })
        } else {
            None
        };

        Ok(ArcLinearization {
            points,
            sweep,
            radius,
            mismatch,
        })
    }
}
