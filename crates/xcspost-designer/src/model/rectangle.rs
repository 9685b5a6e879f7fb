use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use xcspost_core::Point;

use super::{DesignerShape, Placement};

/// Axis-aligned rectangle filling its placement box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignRectangle;

impl DesignRectangle {
    /// Placement for a rectangle spanning two opposite corners
    pub fn placement(p1: Point, p2: Point) -> Placement {
        Placement::from_corners(p1, p2)
    }
}

impl DesignerShape for DesignRectangle {
    fn type_name(&self) -> &'static str {
        "RECT"
    }

    fn encode_fields(&self, _placement: &Placement, _out: &mut Map<String, Value>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_corners() {
        let p = DesignRectangle::placement(Point::new(10.0, 12.0), Point::new(20.0, 22.0));
        assert_eq!(p, Placement::new(10.0, 12.0, 10.0, 10.0));
        let b = DesignRectangle.bounds(&p);
        assert_eq!((b.max_x, b.max_y), (20.0, 22.0));
    }
}
