//! Planar geometry primitives shared by the arc and path encoders.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point or vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(&self) -> Option<Point> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Point::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product of two planar vectors
    pub fn cross_z(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Polar angle in radians, in (-PI, PI]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Mirror about the X axis (machine to display coordinates)
    pub fn mirrored_y(&self) -> Point {
        Point::new(self.x, -self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Degenerate box holding a single point
    pub fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            max_x: p.x,
            min_y: p.y,
            max_y: p.y,
        }
    }

    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Fold an optional running box with another box
pub fn extend_bounds(acc: Option<Bounds>, other: Bounds) -> Option<Bounds> {
    Some(match acc {
        Some(b) => b.union(&other),
        None => other,
    })
}
