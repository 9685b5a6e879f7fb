//! Transcoder
//!
//! Drives one pass over an operation tree. Every command goes through the
//! line formatter (or the arc linearizer) for the G-Code program and through
//! the path tracker for the vector document. Both outputs come from the same
//! traversal, so they stay in step.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use xcspost_core::{
    convert_length, extend_bounds, Axis, Bounds, FeedRateUnits, MeasurementSystem, MotionCommand,
    MotionKind, Point,
};
use xcspost_designer::{CutProcess, ProjectDocument};

use crate::arc_linearizer::{ArcDirection, ArcLinearizer, ArcLinearizerConfig, DEFAULT_CHORD_ERROR};
use crate::error::{TranscodeError, TranscodeResult};
use crate::line_formatter::{FormatSettings, LineFormatter, RunningState};
use crate::path_tracker::{PathTracker, TrackStep, TrackedPath};
use crate::svg_path::SvgPathEncoder;

/// Name written into the program header
pub const POST_PROCESSOR_NAME: &str = "xcspost";

/// xTool D1 startup sequence
pub const DEFAULT_PREAMBLE: &str = "M17 S1
M106 S0
M205 X426 Y403
M101
G92 X17 Y1
G90
G1 F1860
G0 F3000
G1 S020";

/// xTool D1 shutdown sequence
pub const DEFAULT_POSTAMBLE: &str = "G0 X17 Y1
M18";

/// Post processor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Decimals for lengths and feed rates
    pub precision: usize,
    pub length_units: MeasurementSystem,
    pub speed_units: FeedRateUnits,
    /// Repeat axis values that did not change
    pub output_doubles: bool,
    /// Suppress repeated command keywords
    pub modal: bool,
    pub line_numbers: bool,
    pub line_number_start: u32,
    pub comments: bool,
    /// Exporter/time header comments
    pub header: bool,
    /// Negate Y in the G-Code output
    pub invert_y: bool,
    /// Arc linearization tolerance, target length units
    pub chord_error: f64,
    /// Lines written before the body, one command per line
    pub preamble: String,
    /// Lines written after the body
    pub postamble: String,
    /// Group tag for the document paths; empty means the output file name
    pub job_name: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            precision: 3,
            length_units: MeasurementSystem::Metric,
            speed_units: FeedRateUnits::MmPerMin,
            output_doubles: true,
            modal: false,
            line_numbers: false,
            line_number_start: 100,
            comments: true,
            header: true,
            invert_y: false,
            chord_error: DEFAULT_CHORD_ERROR,
            preamble: DEFAULT_PREAMBLE.to_string(),
            postamble: DEFAULT_POSTAMBLE.to_string(),
            job_name: String::new(),
        }
    }
}

impl PostConfig {
    /// Inch output with the matching default precision
    pub fn imperial() -> Self {
        Self {
            precision: MeasurementSystem::Imperial.default_precision(),
            length_units: MeasurementSystem::Imperial,
            speed_units: FeedRateUnits::InPerMin,
            ..Self::default()
        }
    }

    pub fn format_settings(&self) -> FormatSettings {
        FormatSettings {
            precision: self.precision,
            length_units: self.length_units,
            speed_units: self.speed_units,
            invert_y: self.invert_y,
        }
    }

    fn formatter(&self) -> LineFormatter {
        LineFormatter {
            settings: self.format_settings(),
            output_doubles: self.output_doubles,
            modal: self.modal,
            line_numbers: self.line_numbers,
            comments: self.comments,
        }
    }
}

/// Node of the operation tree
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A command list; inactive paths are skipped
    Path {
        label: String,
        commands: Vec<MotionCommand>,
        active: bool,
    },
    /// Ordered children, visited depth first
    Group {
        label: String,
        children: Vec<Operation>,
    },
}

impl Operation {
    pub fn path(label: impl Into<String>, commands: Vec<MotionCommand>) -> Self {
        Self::Path {
            label: label.into(),
            commands,
            active: true,
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<Operation>) -> Self {
        Self::Group {
            label: label.into(),
            children,
        }
    }

    /// Builder: mark a path operation inactive
    pub fn inactive(mut self) -> Self {
        if let Self::Path { active, .. } = &mut self {
            *active = false;
        }
        self
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Path { label, .. } | Self::Group { label, .. } => label,
        }
    }
}

/// Non-fatal problems found while transcoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TranscodeWarning {
    /// Arc end point off the start radius by more than the chord error
    RadiusMismatch {
        operation: String,
        start_radius: f64,
        end_radius: f64,
    },
}

impl fmt::Display for TranscodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RadiusMismatch {
                operation,
                start_radius,
                end_radius,
            } => write!(
                f,
                "{}: arc end radius {:.4} differs from start radius {:.4}",
                operation, end_radius, start_radius
            ),
        }
    }
}

/// Result of one transcode pass
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeOutput {
    pub gcode: String,
    pub paths: Vec<TrackedPath>,
    pub warnings: Vec<TranscodeWarning>,
}

impl TranscodeOutput {
    /// Union of every tracked path's box
    pub fn global_bounds(&self) -> Option<Bounds> {
        self.paths
            .iter()
            .fold(None, |acc, path| extend_bounds(acc, path.bounds))
    }

    /// Build a one-canvas document with a PATH per tracked path, shifted so
    /// the union of all boxes starts at the origin
    pub fn build_document(&self, group_tag: &str) -> TranscodeResult<ProjectDocument> {
        let global = self
            .global_bounds()
            .ok_or(TranscodeError::NoCuttableGeometry)?;

        let mut document = ProjectDocument::new();
        let canvas = document.new_canvas();
        for path in &self.paths {
            let b = path.bounds;
            canvas
                .add_path("path", 0.0, 0.0, &path.path_markup())
                .place(b.min_x - global.min_x, b.min_y - global.min_y)
                .size(b.width(), b.height())
                .add_process(CutProcess::cutting(
                    (path.power / 10) as f64,
                    (path.feed / 60.0).trunc(),
                    1,
                ))
                .group(group_tag);
        }

        info!("Built document with {} path(s)", self.paths.len());
        Ok(document)
    }
}

/// Accumulator shared by the recursive operation walk
struct Pass {
    state: RunningState,
    gcode: String,
    paths: Vec<TrackedPath>,
    warnings: Vec<TranscodeWarning>,
}

/// Turns an operation tree into G-Code and tracked paths
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    config: PostConfig,
}

impl Transcoder {
    pub fn new(config: PostConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PostConfig {
        &self.config
    }

    pub fn transcode(&self, operations: &[Operation]) -> TranscodeResult<TranscodeOutput> {
        let formatter = self.config.formatter();
        let linearizer = ArcLinearizer::new(ArcLinearizerConfig {
            chord_error: self.config.chord_error,
        });
        let mut pass = Pass {
            state: RunningState::new(self.config.line_number_start),
            gcode: String::new(),
            paths: Vec::new(),
            warnings: Vec::new(),
        };

        self.write_header(&formatter, &mut pass);
        for line in self.config.preamble.lines() {
            formatter.emit(&mut pass.state, &mut pass.gcode, line);
        }
        formatter.emit(
            &mut pass.state,
            &mut pass.gcode,
            self.config.length_units.units_code(),
        );

        for operation in operations {
            self.visit(operation, &formatter, &linearizer, &mut pass)?;
        }

        self.write_comment(&formatter, &mut pass, "begin postamble");
        for line in self.config.postamble.lines() {
            formatter.emit(&mut pass.state, &mut pass.gcode, line);
        }

        info!(
            "Transcoded {} operation(s): {} G-Code line(s), {} path(s), {} warning(s)",
            operations.len(),
            pass.gcode.lines().count(),
            pass.paths.len(),
            pass.warnings.len()
        );
        Ok(TranscodeOutput {
            gcode: pass.gcode,
            paths: pass.paths,
            warnings: pass.warnings,
        })
    }

    fn write_comment(&self, formatter: &LineFormatter, pass: &mut Pass, text: &str) {
        if let Some(line) = formatter.comment(text) {
            formatter.emit(&mut pass.state, &mut pass.gcode, &line);
        }
    }

    fn write_header(&self, formatter: &LineFormatter, pass: &mut Pass) {
        if self.config.header {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
            self.write_comment(
                formatter,
                pass,
                &format!("Exported by {}", POST_PROCESSOR_NAME),
            );
            self.write_comment(
                formatter,
                pass,
                &format!("Post Processor: {}", POST_PROCESSOR_NAME),
            );
            self.write_comment(formatter, pass, &format!("Output Time:{}", now));
        }
        self.write_comment(formatter, pass, "begin preamble");
    }

    fn visit(
        &self,
        operation: &Operation,
        formatter: &LineFormatter,
        linearizer: &ArcLinearizer,
        pass: &mut Pass,
    ) -> TranscodeResult<()> {
        match operation {
            Operation::Group { label, children } => {
                debug!("group {}: {} child(ren)", label, children.len());
                for child in children {
                    self.visit(child, formatter, linearizer, pass)?;
                }
                Ok(())
            }
            Operation::Path { label, active, .. } if !active => {
                debug!("skipping inactive operation {}", label);
                Ok(())
            }
            Operation::Path {
                label, commands, ..
            } => {
                self.write_comment(formatter, pass, &format!("begin operation: {}", label));
                self.write_comment(
                    formatter,
                    pass,
                    &format!("machine units: {}", self.config.speed_units),
                );
                self.run_path(label, commands, formatter, linearizer, pass)?;
                self.write_comment(formatter, pass, &format!("finish operation: {}", label));
                Ok(())
            }
        }
    }

    fn run_path(
        &self,
        label: &str,
        commands: &[MotionCommand],
        formatter: &LineFormatter,
        linearizer: &ArcLinearizer,
        pass: &mut Pass,
    ) -> TranscodeResult<()> {
        pass.state.begin_operation();
        let mut tracker = PathTracker::new(
            SvgPathEncoder::new(self.config.precision),
            pass.state.feed,
            pass.state.power,
        );

        for cmd in commands {
            debug!("{} {:?}", cmd.name, cmd.params().collect::<Vec<_>>());
            if cmd.kind == MotionKind::Comment {
                self.write_comment(formatter, pass, &cmd.name);
                continue;
            }

            let center = match ArcDirection::from_kind(cmd.kind) {
                Some(direction) => {
                    Some(self.arc(label, cmd, direction, formatter, linearizer, pass)?)
                }
                None => {
                    let words = formatter.command_words(cmd, &mut pass.state);
                    formatter.emit_words(&mut pass.state, &mut pass.gcode, &words);
                    if !cmd.kind.is_motion() {
                        continue;
                    }
                    None
                }
            };

            tracker.step(&TrackStep {
                kind: cmd.kind,
                previous: pass.state.previous,
                current: pass.state.current,
                center,
                feed: pass.state.feed,
                power: pass.state.power,
            })?;
        }

        pass.paths.extend(tracker.finish());
        Ok(())
    }

    /// Emit an arc as `G1` segments and return its center
    fn arc(
        &self,
        label: &str,
        cmd: &MotionCommand,
        direction: ArcDirection,
        formatter: &LineFormatter,
        linearizer: &ArcLinearizer,
        pass: &mut Pass,
    ) -> TranscodeResult<Point> {
        let offset = |axis: Axis| {
            cmd.get(axis)
                .map(|v| convert_length(v, cmd.units.length, self.config.length_units))
                .unwrap_or(0.0)
        };
        let start = pass.state.current.xy();
        let center = Point::new(start.x + offset(Axis::I), start.y + offset(Axis::J));

        formatter.absorb_arc(cmd, &mut pass.state);
        let end = pass.state.current.xy();

        let arc = linearizer.linearize(direction, start, end, center)?;
        if let Some(mismatch) = arc.mismatch {
            warn!(
                "{}: arc end radius {:.4} differs from start radius {:.4}",
                label, mismatch.end_radius, mismatch.start_radius
            );
            pass.warnings.push(TranscodeWarning::RadiusMismatch {
                operation: label.to_string(),
                start_radius: mismatch.start_radius,
                end_radius: mismatch.end_radius,
            });
        }
        for line in formatter.arc_lines(&arc.points) {
            formatter.emit(&mut pass.state, &mut pass.gcode, &line);
        }
        Ok(center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> PostConfig {
        PostConfig {
            header: false,
            comments: false,
            preamble: String::new(),
            postamble: String::new(),
            ..PostConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = PostConfig::default();
        assert_eq!(config.precision, 3);
        assert_eq!(config.line_number_start, 100);
        assert!(config.output_doubles);
        assert_eq!(config.preamble.lines().count(), 9);
        assert_eq!(PostConfig::imperial().precision, 4);
    }

    #[test]
    fn test_minimal_program() {
        let out = Transcoder::new(quiet())
            .transcode(&[Operation::path(
                "op",
                vec![MotionCommand::rapid().at(1.0, 2.0, 3.0)],
            )])
            .unwrap();
        assert_eq!(out.gcode, "G21\nG0 X1.000 Y2.000 Z3.000\n");
        assert!(out.paths.is_empty());
    }

    #[test]
    fn test_operation_comments_and_inactive() {
        let config = PostConfig {
            header: false,
            preamble: String::new(),
            postamble: String::new(),
            ..PostConfig::default()
        };
        let ops = vec![
            Operation::path("a", vec![MotionCommand::comment("hello")]),
            Operation::path("b", vec![MotionCommand::rapid().at(0.0, 0.0, 1.0)]).inactive(),
        ];
        let out = Transcoder::new(config).transcode(&ops).unwrap();
        assert_eq!(
            out.gcode,
            "(begin preamble)\nG21\n(begin operation: a)\n(machine units: mm/min)\n\
             (hello)\n(finish operation: a)\n(begin postamble)\n"
        );
    }

    #[test]
    fn test_arc_emitted_as_lines() {
        let ops = vec![Operation::path(
            "arc",
            vec![
                MotionCommand::rapid().at(10.0, 0.0, 5.0),
                MotionCommand::linear().at(10.0, 0.0, -1.0),
                MotionCommand::arc_ccw()
                    .at(0.0, 10.0, -1.0)
                    .with(Axis::I, -10.0)
                    .with(Axis::J, 0.0),
            ],
        )];
        let out = Transcoder::new(quiet()).transcode(&ops).unwrap();
        let arc_lines: Vec<&str> = out.gcode.lines().skip(3).collect();
        assert!(arc_lines.len() >= 2);
        assert!(arc_lines.iter().all(|l| l.starts_with("G1 X")));
        assert_eq!(*arc_lines.last().unwrap(), "G1 X0.000 Y10.000");
        assert_eq!(out.paths.len(), 1);
        assert!(out.paths[0].tokens[1].starts_with("A 10.000 10.000"));
    }

    #[test]
    fn test_radius_mismatch_is_warning() {
        let ops = vec![Operation::path(
            "drift",
            vec![
                MotionCommand::rapid().at(10.0, 0.0, 0.0),
                MotionCommand::arc_ccw()
                    .at(0.0, 11.0, 0.0)
                    .with(Axis::I, -10.0),
            ],
        )];
        let out = Transcoder::new(quiet()).transcode(&ops).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].to_string().starts_with("drift:"));
    }

    #[test]
    fn test_degenerate_arc_fails() {
        let ops = vec![Operation::path(
            "bad",
            vec![
                MotionCommand::rapid().at(1.0, 1.0, 0.0),
                MotionCommand::arc_cw().at(2.0, 2.0, 0.0),
            ],
        )];
        let err = Transcoder::new(quiet()).transcode(&ops).unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidGeometry(_)));
    }

    #[test]
    fn test_empty_document_fails() {
        let out = Transcoder::new(quiet()).transcode(&[]).unwrap();
        let err = out.build_document("job").unwrap_err();
        assert_eq!(err.to_string(), "no cuttable geometry found");
    }
}
