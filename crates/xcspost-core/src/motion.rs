//! Motion command model
//!
//! A [`MotionCommand`] is one instruction from the CAM source: a keyword
//! (`G0`, `G1`, `G2`, `G3`, a comment, or any other word) and the axis words
//! that came with it. Values carry the source units they were produced in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Point;
use crate::units::{FeedRateUnits, MeasurementSystem};

/// Axis/parameter letters, declared in output priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
    I,
    J,
    F,
    S,
    T,
    Q,
    R,
    L,
    H,
    D,
    P,
}

/// How an axis value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisClass {
    /// Distance converted between length units
    Length,
    /// Feed rate converted between speed units
    Feed,
    /// Laser power / spindle speed, truncated to an integer
    Power,
    /// Tool and offset numbers, truncated to an integer
    Integer,
    /// Unitless values (rotary axes, dwell, loop counts)
    Plain,
}

impl Axis {
    /// Fixed emission order
    pub const ORDER: [Axis; 17] = [
        Axis::X,
        Axis::Y,
        Axis::Z,
        Axis::A,
        Axis::B,
        Axis::C,
        Axis::I,
        Axis::J,
        Axis::F,
        Axis::S,
        Axis::T,
        Axis::Q,
        Axis::R,
        Axis::L,
        Axis::H,
        Axis::D,
        Axis::P,
    ];

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
            Axis::B => 'B',
            Axis::C => 'C',
            Axis::I => 'I',
            Axis::J => 'J',
            Axis::F => 'F',
            Axis::S => 'S',
            Axis::T => 'T',
            Axis::Q => 'Q',
            Axis::R => 'R',
            Axis::L => 'L',
            Axis::H => 'H',
            Axis::D => 'D',
            Axis::P => 'P',
        }
    }

    pub fn from_letter(letter: char) -> Option<Axis> {
        let upper = letter.to_ascii_uppercase();
        Self::ORDER.iter().copied().find(|a| a.letter() == upper)
    }

    pub fn class(self) -> AxisClass {
        match self {
            Axis::X | Axis::Y | Axis::Z | Axis::I | Axis::J | Axis::Q | Axis::R => {
                AxisClass::Length
            }
            Axis::F => AxisClass::Feed,
            Axis::S => AxisClass::Power,
            Axis::T | Axis::H | Axis::D => AxisClass::Integer,
            Axis::A | Axis::B | Axis::C | Axis::L | Axis::P => AxisClass::Plain,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Kind of motion a command requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
    Comment,
    /// Any non-motion word (`G90`, `M106`, ...)
    Other,
}

impl MotionKind {
    /// Classify a command keyword
    pub fn from_keyword(keyword: &str) -> MotionKind {
        let keyword = keyword.trim();
        if keyword.starts_with('(') || keyword.starts_with(';') {
            return MotionKind::Comment;
        }
        match keyword.to_ascii_uppercase().as_str() {
            "G0" | "G00" => MotionKind::Rapid,
            "G1" | "G01" => MotionKind::Linear,
            "G2" | "G02" => MotionKind::ArcCw,
            "G3" | "G03" => MotionKind::ArcCcw,
            _ => MotionKind::Other,
        }
    }

    pub fn is_arc(self) -> bool {
        matches!(self, MotionKind::ArcCw | MotionKind::ArcCcw)
    }

    /// Feed moves that burn material (linear or arc, never rapid)
    pub fn is_cutting(self) -> bool {
        matches!(
            self,
            MotionKind::Linear | MotionKind::ArcCw | MotionKind::ArcCcw
        )
    }

    pub fn is_motion(self) -> bool {
        matches!(
            self,
            MotionKind::Rapid | MotionKind::Linear | MotionKind::ArcCw | MotionKind::ArcCcw
        )
    }
}

/// Units the source produced its axis values in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceUnits {
    pub length: MeasurementSystem,
    pub feed: FeedRateUnits,
}

impl SourceUnits {
    pub fn new(length: MeasurementSystem, feed: FeedRateUnits) -> Self {
        Self { length, feed }
    }
}

/// One command from the motion source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Keyword as it should be written (`G1`, `M106`) or the comment text
    pub name: String,
    pub kind: MotionKind,
    params: BTreeMap<Axis, f64>,
    pub units: SourceUnits,
}

impl MotionCommand {
    /// Create a command from its keyword, classifying the motion kind
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: MotionKind::from_keyword(&name),
            name,
            params: BTreeMap::new(),
            units: SourceUnits::default(),
        }
    }

    pub fn rapid() -> Self {
        Self::new("G0")
    }

    pub fn linear() -> Self {
        Self::new("G1")
    }

    pub fn arc_cw() -> Self {
        Self::new("G2")
    }

    pub fn arc_ccw() -> Self {
        Self::new("G3")
    }

    /// Comment command; the text is written between parentheses
    pub fn comment(text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        let text = text
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim_start_matches(';')
            .trim();
        Self {
            name: format!("({})", text),
            kind: MotionKind::Comment,
            params: BTreeMap::new(),
            units: SourceUnits::default(),
        }
    }

    /// Builder: set an axis value
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.params.insert(axis, value);
        self
    }

    /// Builder: set X, Y and Z at once
    pub fn at(self, x: f64, y: f64, z: f64) -> Self {
        self.with(Axis::X, x).with(Axis::Y, y).with(Axis::Z, z)
    }

    /// Builder: tag the values with their source units
    pub fn in_units(mut self, units: SourceUnits) -> Self {
        self.units = units;
        self
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.params.get(&axis).copied()
    }

    pub fn has(&self, axis: Axis) -> bool {
        self.params.contains_key(&axis)
    }

    /// Axis words present on this command, in priority order
    pub fn params(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.params.iter().map(|(a, v)| (*a, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Machine position in target length units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Default for Position {
    /// Seed position used before the first move is known
    fn default() -> Self {
        Self::new(-1.0, -1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classification() {
        assert_eq!(MotionKind::from_keyword("G00"), MotionKind::Rapid);
        assert_eq!(MotionKind::from_keyword("g1"), MotionKind::Linear);
        assert_eq!(MotionKind::from_keyword("G02"), MotionKind::ArcCw);
        assert_eq!(MotionKind::from_keyword("G3"), MotionKind::ArcCcw);
        assert_eq!(MotionKind::from_keyword("M106"), MotionKind::Other);
        assert_eq!(MotionKind::from_keyword("(hello)"), MotionKind::Comment);
        assert!(MotionKind::ArcCw.is_cutting());
        assert!(!MotionKind::Rapid.is_cutting());
    }

    #[test]
    fn test_params_follow_priority_order() {
        let cmd = MotionCommand::linear()
            .with(Axis::F, 100.0)
            .with(Axis::Y, 2.0)
            .with(Axis::X, 1.0);
        let order: Vec<Axis> = cmd.params().map(|(a, _)| a).collect();
        assert_eq!(order, vec![Axis::X, Axis::Y, Axis::F]);
    }

    #[test]
    fn test_axis_letters() {
        for axis in Axis::ORDER {
            assert_eq!(Axis::from_letter(axis.letter()), Some(axis));
        }
        assert_eq!(Axis::from_letter('k'), None);
        assert_eq!(Axis::S.class(), AxisClass::Power);
        assert_eq!(Axis::A.class(), AxisClass::Plain);
    }

    #[test]
    fn test_comment_normalization() {
        let c = MotionCommand::comment("(begin pass)");
        assert_eq!(c.name, "(begin pass)");
        assert_eq!(c.kind, MotionKind::Comment);
        let c = MotionCommand::comment("; note");
        assert_eq!(c.name, "(note)");
    }
}
