//! Canvas: an ordered list of primitives with unique ids.

use serde_json::{json, Value};
use std::collections::HashSet;

use xcspost_core::Point;

use crate::model::{
    DesignCircle, DesignFreeform, DesignLine, DesignRectangle, DesignText, Placement, Primitive,
    Shape,
};

/// One panel of the project document
#[derive(Debug, Clone)]
pub struct Canvas {
    id: String,
    title: String,
    elements: Vec<Primitive>,
    used_ids: HashSet<String>,
    next_suffix: usize,
}

impl Canvas {
    /// Create the `number`th canvas of a document (1-based)
    pub fn new(number: usize) -> Self {
        Self {
            id: format!("canvas{}", number),
            title: format!("{{panel}}{}", number),
            elements: Vec::new(),
            used_ids: HashSet::new(),
            next_suffix: 1,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn elements(&self) -> &[Primitive] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Primitive> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Primitive> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Id the next element would get for the requested one
    fn unique_id(&mut self, requested: &str, type_name: &str) -> String {
        let base = if requested.is_empty() {
            type_name
        } else {
            requested
        };
        if !self.used_ids.contains(base) {
            return base.to_string();
        }
        let mut n = self.next_suffix;
        while self.used_ids.contains(&format!("{}__{}", base, n)) {
            n += 1;
        }
        self.next_suffix = n + 1;
        format!("{}__{}", base, n)
    }

    /// Add a primitive, assigning it a unique id, and return a handle to it
    pub fn add_element(&mut self, mut element: Primitive) -> &mut Primitive {
        let id = self.unique_id(&element.id, element.type_name());
        if id != element.id {
            tracing::debug!("element id '{}' assigned as '{}'", element.id, id);
        }
        self.used_ids.insert(id.clone());
        element.id = id;
        let index = self.elements.len();
        self.elements.push(element);
        &mut self.elements[index]
    }

    pub fn add_rect(&mut self, id: &str, p1: Point, p2: Point) -> &mut Primitive {
        let placement = DesignRectangle::placement(p1, p2);
        self.add_element(Primitive::new(id, placement, Shape::Rectangle(DesignRectangle)))
    }

    pub fn add_circle(&mut self, id: &str, p1: Point, p2: Point) -> &mut Primitive {
        let placement = DesignCircle::placement(p1, p2);
        self.add_element(Primitive::new(id, placement, Shape::Circle(DesignCircle)))
    }

    pub fn add_line(&mut self, id: &str, start: Point, end: Point) -> &mut Primitive {
        let placement = DesignLine::placement(start, end);
        self.add_element(Primitive::new(id, placement, Shape::Line(DesignLine::new(end))))
    }

    /// Open polyline; placed at its first point
    pub fn add_pen(&mut self, id: &str, points: Vec<Point>) -> &mut Primitive {
        let first = points.first().copied().unwrap_or_default();
        let placement = Placement {
            x: first.x,
            y: first.y,
            ..Placement::default()
        };
        let shape = Shape::Freeform(DesignFreeform::pen(points));
        self.add_element(Primitive::new(id, placement, shape))
    }

    /// Path markup placed with its bounding box upper-left at `(x, y)`
    pub fn add_path(&mut self, id: &str, x: f64, y: f64, d_path: &str) -> &mut Primitive {
        let placement = Placement {
            x,
            y,
            ..Placement::default()
        };
        let shape = Shape::Freeform(DesignFreeform::path(d_path));
        self.add_element(Primitive::new(id, placement, shape))
    }

    pub fn add_text(&mut self, id: &str, text: &str) -> &mut Primitive {
        let shape = Shape::Text(DesignText::new(text));
        self.add_element(Primitive::new(id, Placement::default(), shape))
    }

    /// Encode as a `canvas` array entry
    pub fn encode(&self) -> Value {
        let displays: Vec<Value> = self.elements.iter().map(Primitive::encode).collect();
        json!({
            "id": self.id,
            "title": self.title,
            "displays": displays,
        })
    }

    /// Encode the device block entry mapping element ids to their processes
    pub fn encode_processes(&self) -> Value {
        let value: Vec<Value> = self
            .elements
            .iter()
            .filter_map(|e| e.encode_process().map(|p| json!([e.id, p])))
            .collect();
        json!({
            "mode": "LASER_PLANE",
            "data": {
                "material": 1,
                "thickness": 3,
                "LASER_PLANE": {
                    "material": 0,
                    "thickness": 0,
                    "diameter": 0,
                    "perimeter": 0,
                },
            },
            "displays": {
                "dataType": "Map",
                "value": value,
            },
        })
    }
}
