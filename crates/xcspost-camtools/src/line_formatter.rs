//! G-Code line formatter
//!
//! Renders motion commands as G-Code lines in the target units, applying the
//! modal keyword and duplicate axis suppression rules, and threads the
//! [`RunningState`] that every later stage reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use xcspost_core::{
    convert_feed_rate, convert_length, format_fixed, Axis, AxisClass, FeedRateUnits,
    MeasurementSystem, MotionCommand, Point, Position,
};

/// Number formatting and target units shared by the G-Code and path encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSettings {
    /// Decimals for lengths and feed rates
    pub precision: usize,
    pub length_units: MeasurementSystem,
    pub speed_units: FeedRateUnits,
    /// Negate Y on output (xTool D1 work area)
    pub invert_y: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            precision: 3,
            length_units: MeasurementSystem::Metric,
            speed_units: FeedRateUnits::MmPerMin,
            invert_y: false,
        }
    }
}

impl FormatSettings {
    pub fn number(&self, value: f64) -> String {
        format_fixed(value, self.precision)
    }
}

/// Mutable state threaded through one transcode pass
#[derive(Debug, Clone)]
pub struct RunningState {
    pub previous: Position,
    pub current: Position,
    /// Current feed in target speed units
    pub feed: f64,
    /// Current laser power (S word)
    pub power: i64,
    axis_memory: BTreeMap<Axis, f64>,
    last_keyword: Option<String>,
    line_number: u32,
}

impl RunningState {
    pub fn new(line_number_start: u32) -> Self {
        let mut state = Self {
            previous: Position::default(),
            current: Position::default(),
            feed: 0.0,
            power: 0,
            axis_memory: BTreeMap::new(),
            last_keyword: None,
            line_number: line_number_start,
        };
        state.begin_operation();
        state
    }

    /// Reset positions and modal memory; feed, power and line numbers carry on
    pub fn begin_operation(&mut self) {
        let seed = Position::default();
        self.previous = seed;
        self.current = seed;
        self.axis_memory.clear();
        self.axis_memory.insert(Axis::X, seed.x);
        self.axis_memory.insert(Axis::Y, seed.y);
        self.axis_memory.insert(Axis::Z, seed.z);
        self.last_keyword = None;
    }

    /// Increment and return the line number
    pub fn next_line_number(&mut self) -> u32 {
        self.line_number += 10;
        self.line_number
    }

    pub fn last_keyword(&self) -> Option<&str> {
        self.last_keyword.as_deref()
    }

    /// Move the position pair forward by one motion command
    fn advance(&mut self, cmd: &MotionCommand, units: MeasurementSystem) {
        self.previous = self.current;
        let length = |v: f64| convert_length(v, cmd.units.length, units);
        if let Some(x) = cmd.get(Axis::X) {
            self.current.x = length(x);
        }
        if let Some(y) = cmd.get(Axis::Y) {
            self.current.y = length(y);
        }
        if let Some(z) = cmd.get(Axis::Z) {
            self.current.z = length(z);
        }
    }
}

/// Renders commands into G-Code lines
#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    pub settings: FormatSettings,
    /// Repeat axis values equal to the previous one
    pub output_doubles: bool,
    /// Omit the command keyword when it repeats
    pub modal: bool,
    pub line_numbers: bool,
    pub comments: bool,
}

impl LineFormatter {
    pub fn new(settings: FormatSettings) -> Self {
        Self {
            settings,
            output_doubles: true,
            modal: false,
            line_numbers: false,
            comments: true,
        }
    }

    /// Format a length already in target units
    pub fn format_length(&self, axis: Axis, value: f64) -> String {
        let value = if axis == Axis::Y && self.settings.invert_y {
            -value
        } else {
            value
        };
        self.settings.number(value)
    }

    /// Words for one command; updates feed, power, modal memory and position
    pub fn command_words(&self, cmd: &MotionCommand, state: &mut RunningState) -> Vec<String> {
        let mut words = Vec::new();
        if !(self.modal && state.last_keyword() == Some(cmd.name.as_str())) {
            words.push(cmd.name.clone());
        }

        for (axis, value) in cmd.params() {
            match axis.class() {
                AxisClass::Feed => {
                    let feed = convert_feed_rate(value, cmd.units.feed, self.settings.speed_units);
                    if feed > 0.0 {
                        words.push(format!("{}{}", axis, self.settings.number(feed)));
                    }
                    state.feed = feed;
                }
                AxisClass::Power => {
                    let power = value.trunc() as i64;
                    words.push(format!("{}{}", axis, power));
                    state.power = power;
                }
                AxisClass::Integer => {
                    words.push(format!("{}{}", axis, value.trunc() as i64));
                }
                class @ (AxisClass::Length | AxisClass::Plain) => {
                    if !self.output_doubles && state.axis_memory.get(&axis) == Some(&value) {
                        continue;
                    }
                    let text = if class == AxisClass::Length {
                        let target =
                            convert_length(value, cmd.units.length, self.settings.length_units);
                        self.format_length(axis, target)
                    } else {
                        self.settings.number(value)
                    };
                    words.push(format!("{}{}", axis, text));
                }
            }
        }

        state.last_keyword = Some(cmd.name.clone());
        for (axis, value) in cmd.params() {
            state.axis_memory.insert(axis, value);
        }
        if cmd.kind.is_motion() {
            state.advance(cmd, self.settings.length_units);
        }
        words
    }

    /// Apply an arc's feed, power and end point without formatting its words
    pub fn absorb_arc(&self, cmd: &MotionCommand, state: &mut RunningState) {
        if let Some(feed) = cmd.get(Axis::F) {
            state.feed = convert_feed_rate(feed, cmd.units.feed, self.settings.speed_units);
        }
        if let Some(power) = cmd.get(Axis::S) {
            state.power = power.trunc() as i64;
        }
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if let Some(value) = cmd.get(axis) {
                state.axis_memory.insert(axis, value);
            }
        }
        state.last_keyword = Some("G1".to_string());
        state.advance(cmd, self.settings.length_units);
    }

    /// Unconditional `G1 X.. Y..` lines for linearized arc points
    pub fn arc_lines(&self, points: &[Point]) -> Vec<String> {
        points
            .iter()
            .map(|p| {
                format!(
                    "G1 X{} Y{}",
                    self.format_length(Axis::X, p.x),
                    self.format_length(Axis::Y, p.y)
                )
            })
            .collect()
    }

    /// Comment line, or `None` when comments are disabled
    pub fn comment(&self, text: &str) -> Option<String> {
        if !self.comments {
            return None;
        }
        let text = text.trim();
        if text.starts_with('(') {
            Some(text.to_string())
        } else {
            Some(format!("({})", text))
        }
    }

    /// Append a line, numbering it when enabled; empty lines are skipped
    pub fn emit(&self, state: &mut RunningState, out: &mut String, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.line_numbers {
            let n = state.next_line_number();
            out.push_str(&format!("N{} ", n));
        }
        out.push_str(line);
        out.push('\n');
    }

    /// Join words and emit them as one line
    pub fn emit_words(&self, state: &mut RunningState, out: &mut String, words: &[String]) {
        self.emit(state, out, &words.join(" "));
    }
}
