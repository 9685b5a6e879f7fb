use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use xcspost_core::Point;

use super::{encode_number, encode_point, DesignerShape, Placement};

/// Freeform flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreeformKind {
    /// Open polyline through `points`
    Pen,
    /// Path markup in `d_path`
    Path,
}

/// Freeform geometry: a pen polyline or a path markup string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFreeform {
    pub kind: FreeformKind,
    pub points: Vec<Point>,
    pub d_path: String,
    pub graphic_x: f64,
    pub graphic_y: f64,
}

impl DesignFreeform {
    pub fn pen(points: Vec<Point>) -> Self {
        Self {
            kind: FreeformKind::Pen,
            points,
            d_path: String::new(),
            graphic_x: 0.0,
            graphic_y: 0.0,
        }
    }

    pub fn path(d_path: impl Into<String>) -> Self {
        Self {
            kind: FreeformKind::Path,
            points: Vec::new(),
            d_path: d_path.into(),
            graphic_x: 0.0,
            graphic_y: 0.0,
        }
    }
}

impl DesignerShape for DesignFreeform {
    fn type_name(&self) -> &'static str {
        match self.kind {
            FreeformKind::Pen => "PEN",
            FreeformKind::Path => "PATH",
        }
    }

    fn encode_fields(&self, _placement: &Placement, out: &mut Map<String, Value>) {
        let points = Value::Array(self.points.iter().map(|p| encode_point(*p)).collect());
        out.insert("points".into(), points);
        match self.kind {
            FreeformKind::Pen => {
                out.insert("controlPoints".into(), Value::Object(Map::new()));
            }
            FreeformKind::Path => {
                out.insert("dPath".into(), Value::from(self.d_path.as_str()));
                out.insert("graphicX".into(), encode_number(self.graphic_x));
                out.insert("graphicY".into(), encode_number(self.graphic_y));
            }
        }
    }
}
