//! # xcspost Core
//!
//! Core types and utilities for the xcspost laser post processor.
//! Provides the motion command model, unit conversion, planar geometry,
//! a G-Code text reader and the shared error types.

pub mod error;
pub mod geometry;
pub mod motion;
pub mod parser;
pub mod units;

pub use error::{GcodeError, GeometryError};

pub use geometry::{extend_bounds, Bounds, Point};

pub use motion::{Axis, AxisClass, MotionCommand, MotionKind, Position, SourceUnits};

pub use parser::{parse_program, GcodeReader};

pub use units::{
    convert_feed_rate, convert_length, format_fixed, get_unit_label, FeedRateUnits,
    MeasurementSystem,
};
