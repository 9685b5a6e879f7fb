use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use xcspost_core::Point;

use super::{DesignerShape, Placement};

/// Circle or ellipse inscribed in its placement box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignCircle;

impl DesignCircle {
    /// Placement for the ellipse bounded by two opposite corners
    pub fn placement(p1: Point, p2: Point) -> Placement {
        Placement::from_corners(p1, p2)
    }

    /// Placement for a circle given its center and radius
    pub fn around(center: Point, radius: f64) -> Placement {
        let r = radius.abs();
        Placement::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r)
    }
}

impl DesignerShape for DesignCircle {
    fn type_name(&self) -> &'static str {
        "CIRCLE"
    }

    fn encode_fields(&self, _placement: &Placement, _out: &mut Map<String, Value>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_around_center() {
        let p = DesignCircle::around(Point::new(55.0, 25.0), 5.0);
        assert_eq!(p, DesignCircle::placement(Point::new(50.0, 20.0), Point::new(60.0, 30.0)));
    }
}
