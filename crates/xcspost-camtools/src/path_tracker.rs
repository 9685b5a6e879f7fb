//! Path segmentation
//!
//! Splits the motion stream into continuous cutting strokes. A stroke opens
//! when a cutting move plunges (Z goes down) while idle, and closes when the
//! head retracts (Z goes up) or the feed or power changes. Strokes that never
//! drew anything are dropped.

use xcspost_core::{extend_bounds, Bounds, GeometryError, MotionKind, Point, Position};

use crate::arc_linearizer::ArcDirection;
use crate::svg_path::SvgPathEncoder;

/// One continuous cutting stroke
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPath {
    /// `M` token followed by at least one draw token
    pub tokens: Vec<String>,
    /// Feed when the path opened, target speed units
    pub feed: f64,
    /// Power when the path opened
    pub power: i64,
    /// Display coordinates
    pub bounds: Bounds,
}

impl TrackedPath {
    /// Tokens joined into one path markup string
    pub fn path_markup(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn draw_count(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }
}

/// One motion command as seen by the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStep {
    pub kind: MotionKind,
    pub previous: Position,
    pub current: Position,
    /// Arc center, machine coordinates
    pub center: Option<Point>,
    pub feed: f64,
    pub power: i64,
}

#[derive(Debug, Clone)]
struct OpenPath {
    tokens: Vec<String>,
    bounds: Option<Bounds>,
}

/// State machine over the motion stream
#[derive(Debug, Clone)]
pub struct PathTracker {
    encoder: SvgPathEncoder,
    open: Option<OpenPath>,
    feed: f64,
    power: i64,
    paths: Vec<TrackedPath>,
}

impl PathTracker {
    /// Start idle with the feed/power snapshot taken from the running state
    pub fn new(encoder: SvgPathEncoder, feed: f64, power: i64) -> Self {
        Self {
            encoder,
            open: None,
            feed,
            power,
            paths: Vec::new(),
        }
    }

    pub fn is_pathing(&self) -> bool {
        self.open.is_some()
    }

    pub fn paths(&self) -> &[TrackedPath] {
        &self.paths
    }

    pub fn step(&mut self, step: &TrackStep) -> Result<(), GeometryError> {
        let cutting = step.kind.is_cutting();
        let mut finish = false;
        let mut start = false;

        if self.is_pathing() && (step.power != self.power || step.feed != self.feed) {
            tracing::debug!(
                "feed/power change: feed={} power={}",
                step.feed,
                step.power
            );
            finish = true;
        }
        if self.is_pathing() && step.current.z > step.previous.z {
            finish = true;
        }
        if !self.is_pathing() && step.current.z < step.previous.z && cutting {
            start = true;
        }

        if finish {
            self.close();
            self.feed = step.feed;
            self.power = step.power;
        }

        if start {
            tracing::debug!("start path: feed={} power={}", step.feed, step.power);
            self.open = Some(OpenPath {
                tokens: vec![self.encoder.move_to(step.current.xy())],
                bounds: None,
            });
            self.feed = step.feed;
            self.power = step.power;
        }

        // The opening move ends at the `M` point, so it draws nothing
        let Some(open) = self.open.as_mut() else {
            return Ok(());
        };
        if !cutting || start {
            return Ok(());
        }

        let from = step.previous.xy();
        let to = step.current.xy();
        let segment = match (ArcDirection::from_kind(step.kind), step.center) {
            (Some(direction), Some(center)) => Some(self.encoder.arc_to(direction, from, to, center)?),
            _ if from != to => Some(self.encoder.line_to(from, to)),
            _ => None,
        };
        if let Some(segment) = segment {
            open.tokens.extend(segment.tokens);
            open.bounds = extend_bounds(open.bounds, segment.bounds);
        }
        Ok(())
    }

    /// Close the open path, keeping it only if it drew something
    fn close(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        match open.bounds {
            Some(bounds) if open.tokens.len() > 1 => {
                tracing::debug!(
                    "finish path: {} draw token(s), power={}",
                    open.tokens.len() - 1,
                    self.power
                );
                self.paths.push(TrackedPath {
                    tokens: open.tokens,
                    feed: self.feed,
                    power: self.power,
                    bounds,
                });
            }
            _ => tracing::debug!("discarding path without draw tokens"),
        }
    }

    /// Force-close any open path and return the kept paths
    pub fn finish(mut self) -> Vec<TrackedPath> {
        self.close();
        self.paths
    }
}
