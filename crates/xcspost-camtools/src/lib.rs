//! # xcspost CAM Tools
//!
//! Transcoding engine turning motion commands into an xTool G-Code program
//! and the matching vector project document.
//!
//! ## Stages
//!
//! - **Arc Linearizer**: G2/G3 arcs to chord-bounded line segments
//! - **SVG Path Encoder**: move/line/arc path tokens with exact extents
//! - **Line Formatter**: G-Code line rendering, modal and duplicate suppression
//! - **Path Tracker**: splits the motion stream into cutting strokes
//! - **Transcoder**: drives all of the above over an operation tree

pub mod arc_linearizer;
pub mod error;
pub mod line_formatter;
pub mod path_tracker;
pub mod svg_path;
pub mod transcoder;

// Re-export commonly used items
pub use arc_linearizer::{
    sweep_angle, ArcDirection, ArcLinearization, ArcLinearizer, ArcLinearizerConfig,
    RadiusMismatch, DEFAULT_CHORD_ERROR, MAX_SEGMENTS, MIN_SEGMENTS,
};
pub use error::{TranscodeError, TranscodeResult};
pub use line_formatter::{FormatSettings, LineFormatter, RunningState};
pub use path_tracker::{PathTracker, TrackStep, TrackedPath};
pub use svg_path::{arc_bounds, DrawSegment, SvgPathEncoder};
pub use transcoder::{
    Operation, PostConfig, TranscodeOutput, TranscodeWarning, Transcoder, DEFAULT_POSTAMBLE,
    DEFAULT_PREAMBLE, POST_PROCESSOR_NAME,
};
