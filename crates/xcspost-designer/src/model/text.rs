use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use xcspost_core::Point;

use super::{encode_number, DesignerShape, Placement};

/// Character width to height ratio used when only a height is given
pub const DEFAULT_ASPECT: f64 = 0.6;

/// Font size that renders one character 2.1 units wide
const FONT_SCALE: f64 = 12.0 / 2.1;

/// Single-line text anchored on a 3x3 origin grid
///
/// ```text
/// 1  2  3
/// 4  5  6
/// 7  8  9
/// ```
///
/// The glyph box is `aspect * chars * height` wide and is positioned so that
/// the selected grid point sits on `anchor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignText {
    pub text: String,
    pub anchor: Point,
    pub aspect: f64,
    pub origin: u8,
    pub resolution: u32,
}

impl DesignText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: Point::default(),
            aspect: DEFAULT_ASPECT,
            origin: 1,
            resolution: 1,
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Font size fitting the glyph box width to the character count
    pub fn font_size(&self, width: f64) -> f64 {
        FONT_SCALE * width / self.char_count().max(1) as f64
    }
}

impl DesignerShape for DesignText {
    fn type_name(&self) -> &'static str {
        "TEXT"
    }

    fn resolve(&self, placement: &Placement) -> Placement {
        let height = placement.height;
        let width = self.aspect * self.char_count() as f64 * height;
        let org = u32::from(self.origin.clamp(1, 9)) - 1;
        Placement::new(
            self.anchor.x - width * f64::from(org % 3) / 2.0,
            self.anchor.y - height * f64::from(org / 3) / 2.0,
            width,
            height,
        )
    }

    fn encode_fields(&self, placement: &Placement, out: &mut Map<String, Value>) {
        let width = self.resolve(placement).width;
        out.insert("text".into(), Value::from(self.text.as_str()));
        out.insert("resolution".into(), Value::from(self.resolution));
        out.insert(
            "style".into(),
            json!({
                "fontFamily": "Lato",
                "fontSource": "build-in",
                "fontSize": encode_number(self.font_size(width)),
                "fontSubfamily": "Regular",
                "letterSpacing": 0,
                "leading": 0,
                "align": "left",
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_at(origin: u8) -> DesignText {
        let mut t = DesignText::new("Hello World!");
        t.anchor = Point::new(60.0, 35.0);
        t.origin = origin;
        t
    }

    #[test]
    fn test_glyph_box_width() {
        let t = text_at(1);
        let p = t.resolve(&Placement::new(0.0, 0.0, 10.0, 10.0));
        assert!((p.width - 72.0).abs() < 1e-9);
        assert_eq!((p.x, p.y), (60.0, 35.0));
    }

    #[test]
    fn test_center_origin() {
        let t = text_at(5);
        let p = t.resolve(&Placement::new(0.0, 0.0, 10.0, 10.0));
        assert!((p.x - 24.0).abs() < 1e-9);
        assert!((p.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_bottom_right_origin() {
        let t = text_at(9);
        let p = t.resolve(&Placement::new(0.0, 0.0, 10.0, 10.0));
        assert!((p.x - (60.0 - 72.0)).abs() < 1e-9);
        assert!((p.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_style_block() {
        let t = text_at(1);
        let mut out = Map::new();
        t.encode_fields(&Placement::new(0.0, 0.0, 10.0, 10.0), &mut out);
        let size = out["style"]["fontSize"].as_f64().unwrap();
        assert!((size - 12.0 / 2.1 * 6.0).abs() < 1e-9);
        assert_eq!(out["style"]["fontFamily"], "Lato");
        assert_eq!(out["resolution"], 1);
    }
}
