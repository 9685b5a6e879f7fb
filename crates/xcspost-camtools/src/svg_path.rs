//! Path markup encoder
//!
//! Emits the move/line/arc tokens of an SVG style path in display
//! coordinates, where Y is mirrored relative to the machine. Every draw also
//! reports the exact bounding box of what it draws.

use std::f64::consts::{FRAC_PI_2, PI};

use xcspost_core::{format_fixed, Bounds, GeometryError, Point};

use crate::arc_linearizer::{sweep_angle, ArcDirection};

/// Tokens and extent of one drawn segment
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSegment {
    /// One token, or two for a full circle
    pub tokens: Vec<String>,
    /// Display coordinates
    pub bounds: Bounds,
}

/// Encodes machine coordinates as path markup at a fixed precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgPathEncoder {
    precision: usize,
}

impl SvgPathEncoder {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    fn num(&self, value: f64) -> String {
        format_fixed(value, self.precision)
    }

    fn xy(&self, p: Point) -> String {
        let d = p.mirrored_y();
        format!("{} {}", self.num(d.x), self.num(d.y))
    }

    /// `M x y`
    pub fn move_to(&self, p: Point) -> String {
        format!("M {}", self.xy(p))
    }

    /// `L x y` with the box of both endpoints
    pub fn line_to(&self, from: Point, to: Point) -> DrawSegment {
        let mut bounds = Bounds::from_point(from.mirrored_y());
        bounds.include_point(to.mirrored_y());
        DrawSegment {
            tokens: vec![format!("L {}", self.xy(to))],
            bounds,
        }
    }

    /// `A r r 0 large sweep x y` for a machine arc
    pub fn arc_to(
        &self,
        direction: ArcDirection,
        from: Point,
        to: Point,
        center: Point,
    ) -> Result<DrawSegment, GeometryError> {
        let radius = from.distance_to(&center);
        let ca = (center - from)
            .normalize()
            .ok_or(GeometryError::DegenerateRadius { radius })?;
        let r = self.num(radius);

        let sweep = sweep_angle(direction, from, to, center);
        let bounds = arc_bounds(from, to, center, sweep).mirrored_y();

        // Endpoints that print the same cannot carry a single arc token
        let closed = sweep.abs() > PI && self.xy(from) == self.xy(to);
        let tokens = if closed {
            let opposite = center - (from - center);
            let flag = match direction {
                ArcDirection::CounterClockwise => "0 0 0",
                ArcDirection::Clockwise => "0 0 1",
            };
            vec![
                format!("A {} {} {} {}", r, r, flag, self.xy(opposite)),
                format!("A {} {} {} {}", r, r, flag, self.xy(to)),
            ]
        } else {
            let cb = (center - to).normalize().unwrap_or(ca);
            let cp = ca.cross_z(&cb);
            // display Y is mirrored, so machine CCW sweeps in the negative display sense
            let flags = match direction {
                ArcDirection::CounterClockwise if cp > 0.0 => "0 0 0",
                ArcDirection::CounterClockwise => "0 1 0",
                ArcDirection::Clockwise if cp < 0.0 => "0 0 1",
                ArcDirection::Clockwise => "0 1 1",
            };
            vec![format!("A {} {} {} {}", r, r, flags, self.xy(to))]
        };

        Ok(DrawSegment { tokens, bounds })
    }
}

/// Exact machine-coordinate box of an arc starting at `from` with signed `sweep`
pub fn arc_bounds(from: Point, to: Point, center: Point, sweep: f64) -> Bounds {
    let radius = from.distance_to(&center);
    let a1 = (from - center).angle();
    let mut bounds = Bounds::from_point(from);
    bounds.include_point(to);

    for quadrant in 0..4 {
        let direction = quadrant as f64 * FRAC_PI_2;
        let offset = if sweep >= 0.0 {
            (direction - a1).rem_euclid(2.0 * PI)
        } else {
            (a1 - direction).rem_euclid(2.0 * PI)
        };
        if offset <= sweep.abs() {
            let extreme = match quadrant {
                0 => Point::new(center.x + radius, center.y),
                1 => Point::new(center.x, center.y + radius),
                2 => Point::new(center.x - radius, center.y),
                _ => Point::new(center.x, center.y - radius),
            };
            bounds.include_point(extreme);
        }
    }
    bounds
}

trait MirrorBounds {
    fn mirrored_y(&self) -> Bounds;
}

impl MirrorBounds for Bounds {
    fn mirrored_y(&self) -> Bounds {
        Bounds {
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: -self.max_y,
            max_y: -self.min_y,
        }
    }
}
