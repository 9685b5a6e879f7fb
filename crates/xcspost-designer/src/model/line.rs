use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use xcspost_core::{Bounds, Point};

use super::{encode_point, DesignerShape, Placement};

/// Straight line from the placement corner to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignLine {
    pub end: Point,
}

impl DesignLine {
    pub fn new(end: Point) -> Self {
        Self { end }
    }

    /// Placement for a line from `start` to `end`
    pub fn placement(start: Point, end: Point) -> Placement {
        Placement::from_corners(start, end)
    }
}

impl DesignerShape for DesignLine {
    fn type_name(&self) -> &'static str {
        "LINE"
    }

    fn bounds(&self, placement: &Placement) -> Bounds {
        let mut b = Bounds::from_point(Point::new(placement.x, placement.y));
        b.include_point(self.end);
        b
    }

    fn encode_fields(&self, _placement: &Placement, out: &mut Map<String, Value>) {
        out.insert("endPoint".into(), encode_point(self.end));
    }
}
