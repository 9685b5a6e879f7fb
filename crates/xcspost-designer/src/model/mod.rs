//! Graphic primitives placed on a canvas
//!
//! A [`Primitive`] carries the fields every display entry shares (id,
//! placement, transform pass-throughs, colors, group tag, cut process) and a
//! [`Shape`] holding the variant specific data. Shapes implement
//! [`DesignerShape`], which resolves the final bounding box and writes the
//! variant keys of the encoded entry.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use xcspost_core::{Bounds, Point};

use crate::process::CutProcess;

mod circle;
mod line;
mod path;
mod rectangle;
mod text;

pub use circle::DesignCircle;
pub use line::DesignLine;
pub use path::{DesignFreeform, FreeformKind};
pub use rectangle::DesignRectangle;
pub use text::DesignText;

pub const DEFAULT_LINE_COLOR: u32 = 0x551100;
pub const DEFAULT_FILL_COLOR: u32 = 0x777777;
pub const DEFAULT_SIZE: f64 = 10.0;

/// Encode a number, writing integral values without a fractional part
pub fn encode_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

pub(crate) fn encode_point(p: Point) -> Value {
    json!({ "x": encode_number(p.x), "y": encode_number(p.y) })
}

/// Upper-left corner and size of a primitive's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Placement {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanned by two opposite corners
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(p1.x, p1.y, (p2.x - p1.x).abs(), (p2.y - p1.y).abs())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x,
            max_x: self.x + self.width,
            min_y: self.y,
            max_y: self.y + self.height,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

/// Capability shared by every primitive variant
pub trait DesignerShape {
    /// Type tag written to the document (`RECT`, `LINE`, ...)
    fn type_name(&self) -> &'static str;

    /// Placement written to the document for the primitive's stored placement
    fn resolve(&self, placement: &Placement) -> Placement {
        *placement
    }

    fn bounds(&self, placement: &Placement) -> Bounds {
        self.resolve(placement).bounds()
    }

    /// Append the variant specific keys
    fn encode_fields(&self, placement: &Placement, out: &mut Map<String, Value>);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(DesignRectangle),
    Line(DesignLine),
    Circle(DesignCircle),
    Freeform(DesignFreeform),
    Text(DesignText),
}

impl DesignerShape for Shape {
    fn type_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(s) => s.type_name(),
            Shape::Line(s) => s.type_name(),
            Shape::Circle(s) => s.type_name(),
            Shape::Freeform(s) => s.type_name(),
            Shape::Text(s) => s.type_name(),
        }
    }

    fn resolve(&self, placement: &Placement) -> Placement {
        match self {
            Shape::Rectangle(s) => s.resolve(placement),
            Shape::Line(s) => s.resolve(placement),
            Shape::Circle(s) => s.resolve(placement),
            Shape::Freeform(s) => s.resolve(placement),
            Shape::Text(s) => s.resolve(placement),
        }
    }

    fn bounds(&self, placement: &Placement) -> Bounds {
        match self {
            Shape::Rectangle(s) => s.bounds(placement),
            Shape::Line(s) => s.bounds(placement),
            Shape::Circle(s) => s.bounds(placement),
            Shape::Freeform(s) => s.bounds(placement),
            Shape::Text(s) => s.bounds(placement),
        }
    }

    fn encode_fields(&self, placement: &Placement, out: &mut Map<String, Value>) {
        match self {
            Shape::Rectangle(s) => s.encode_fields(placement, out),
            Shape::Line(s) => s.encode_fields(placement, out),
            Shape::Circle(s) => s.encode_fields(placement, out),
            Shape::Freeform(s) => s.encode_fields(placement, out),
            Shape::Text(s) => s.encode_fields(placement, out),
        }
    }
}

/// One display entry of a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Empty until the canvas assigns a unique id
    pub id: String,
    pub placement: Placement,
    pub angle: f64,
    pub scale: Point,
    pub skew: Point,
    pub pivot: Point,
    pub local_skew: Point,
    pub offset_x: f64,
    pub offset_y: f64,
    pub lock_ratio: bool,
    pub is_close_path: bool,
    pub z_order: i32,
    pub is_fill: bool,
    pub line_color: u32,
    pub fill_color: u32,
    pub group_tag: Option<String>,
    process: Option<CutProcess>,
    shape: Shape,
}

impl Primitive {
    pub fn new(id: impl Into<String>, placement: Placement, shape: Shape) -> Self {
        let is_close_path = !matches!(
            &shape,
            Shape::Freeform(DesignFreeform {
                kind: FreeformKind::Pen,
                ..
            })
        );
        Self {
            id: id.into(),
            placement,
            angle: 0.0,
            scale: Point::new(1.0, 1.0),
            skew: Point::default(),
            pivot: Point::default(),
            local_skew: Point::default(),
            offset_x: 0.0,
            offset_y: 0.0,
            lock_ratio: true,
            is_close_path,
            z_order: 0,
            is_fill: false,
            line_color: DEFAULT_LINE_COLOR,
            fill_color: DEFAULT_FILL_COLOR,
            group_tag: None,
            process: None,
            shape,
        }
    }

    /// Move the upper-left corner (text: the anchor point)
    pub fn place(&mut self, x: f64, y: f64) -> &mut Self {
        match &mut self.shape {
            Shape::Text(text) => text.anchor = Point::new(x, y),
            _ => {
                self.placement.x = x;
                self.placement.y = y;
            }
        }
        self
    }

    /// Set the size (text: character width and height, width 0 keeps the aspect)
    pub fn size(&mut self, width: f64, height: f64) -> &mut Self {
        if let Shape::Text(text) = &mut self.shape {
            if width != 0.0 && height != 0.0 {
                text.aspect = width / height;
            }
        } else {
            self.placement.width = width;
        }
        self.placement.height = height;
        self
    }

    /// Select the text anchor origin; ignored by other shapes
    pub fn origin(&mut self, origin: u8) -> &mut Self {
        match &mut self.shape {
            Shape::Text(text) => text.origin = origin.clamp(1, 9),
            _ => tracing::debug!("origin ignored for {} '{}'", self.type_name(), self.id),
        }
        self
    }

    /// Attach a cut process, replacing any previous one
    pub fn add_process(&mut self, process: CutProcess) -> &mut Self {
        self.process = Some(process);
        self
    }

    pub fn group(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        self.group_tag = if tag.is_empty() { None } else { Some(tag) };
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn process(&self) -> Option<&CutProcess> {
        self.process.as_ref()
    }

    pub fn bounds(&self) -> Bounds {
        self.shape.bounds(&self.placement)
    }

    /// Encode the display entry
    pub fn encode(&self) -> Value {
        let placement = self.shape.resolve(&self.placement);
        let mut out = Map::new();
        out.insert("id".into(), Value::from(self.id.as_str()));
        out.insert("type".into(), Value::from(self.type_name()));
        out.insert("x".into(), encode_number(placement.x));
        out.insert("y".into(), encode_number(placement.y));
        out.insert("angle".into(), encode_number(self.angle));
        out.insert("scale".into(), encode_point(self.scale));
        out.insert("skew".into(), encode_point(self.skew));
        out.insert("pivot".into(), encode_point(self.pivot));
        out.insert("localSkew".into(), encode_point(self.local_skew));
        out.insert("offsetX".into(), encode_number(self.offset_x));
        out.insert("offsetY".into(), encode_number(self.offset_y));
        out.insert("lockRatio".into(), Value::from(self.lock_ratio));
        out.insert("isClosePath".into(), Value::from(self.is_close_path));
        out.insert("zOrder".into(), Value::from(self.z_order));
        out.insert("width".into(), encode_number(placement.width));
        out.insert("height".into(), encode_number(placement.height));
        out.insert("isFill".into(), Value::from(self.is_fill));
        out.insert("lineColor".into(), Value::from(self.line_color));
        out.insert("fillColor".into(), Value::from(self.fill_color));
        if let Some(tag) = &self.group_tag {
            out.insert("groupTag".into(), Value::from(tag.as_str()));
        }
        self.shape.encode_fields(&self.placement, &mut out);
        Value::Object(out)
    }

    /// Encode the attached process for the device block
    pub fn encode_process(&self) -> Option<Value> {
        self.process
            .as_ref()
            .map(|p| p.encode(self.type_name(), self.is_fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_number() {
        assert_eq!(encode_number(10.0).to_string(), "10");
        assert_eq!(encode_number(-0.0).to_string(), "0");
        assert_eq!(encode_number(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_primitive_defaults() {
        let rect = Primitive::new("r", Placement::default(), Shape::Rectangle(DesignRectangle));
        let v = rect.encode();
        assert_eq!(v["type"], "RECT");
        assert_eq!(v["width"], 10);
        assert_eq!(v["scale"], json!({"x": 1, "y": 1}));
        assert_eq!(v["lockRatio"], true);
        assert_eq!(v["isClosePath"], true);
        assert_eq!(v["lineColor"], DEFAULT_LINE_COLOR);
        assert_eq!(v["fillColor"], DEFAULT_FILL_COLOR);
        assert!(v.get("groupTag").is_none());
    }

    #[test]
    fn test_key_order() {
        let mut rect = Primitive::new("r", Placement::default(), Shape::Rectangle(DesignRectangle));
        rect.group("job");
        let v = rect.encode();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "type",
                "x",
                "y",
                "angle",
                "scale",
                "skew",
                "pivot",
                "localSkew",
                "offsetX",
                "offsetY",
                "lockRatio",
                "isClosePath",
                "zOrder",
                "width",
                "height",
                "isFill",
                "lineColor",
                "fillColor",
                "groupTag",
            ]
        );
    }

    #[test]
    fn test_chained_handle() {
        let mut rect = Primitive::new("r", Placement::default(), Shape::Rectangle(DesignRectangle));
        rect.place(20.0, 20.0)
            .size(80.0, 30.0)
            .add_process(CutProcess::cutting(100.0, 6.0, 2))
            .add_process(CutProcess::engraving(50.0, 80.0, 1));
        assert_eq!(rect.placement, Placement::new(20.0, 20.0, 80.0, 30.0));
        let process = rect.encode_process().unwrap();
        assert_eq!(process["processingType"], "VECTOR_ENGRAVING");
        assert_eq!(rect.bounds().max_x, 100.0);
    }
}
