//! # xcspost Designer
//!
//! Scene graph and project document model for xTool Creative Space (`.xcs`)
//! files.
//!
//! ```text
//! ProjectDocument
//!   └── Canvas (canvas1, canvas2, ...)
//!         └── Primitive (RECT, LINE, CIRCLE, PEN, PATH, TEXT)
//!               └── CutProcess (power, speed, passes)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use xcspost_core::Point;
//! use xcspost_designer::{CutProcess, ProjectDocument};
//!
//! let mut doc = ProjectDocument::new();
//! doc.new_canvas()
//!     .add_rect("", Point::new(0.0, 0.0), Point::new(10.0, 10.0))
//!     .place(20.0, 20.0)
//!     .size(80.0, 30.0)
//!     .add_process(CutProcess::cutting(100.0, 6.0, 2));
//!
//! let json = doc.to_json_string().unwrap();
//! assert!(json.starts_with(r#"{"canvasId":"canvas1""#));
//! ```

pub mod canvas;
pub mod document;
pub mod error;
pub mod model;
pub mod process;

pub use canvas::Canvas;
pub use document::{xcs_path, ProjectDocument, XCS_EXTENSION, XCS_VERSION};
pub use error::{DesignerError, DesignerResult};
pub use model::{
    DesignCircle, DesignFreeform, DesignLine, DesignRectangle, DesignText, DesignerShape,
    FreeformKind, Placement, Primitive, Shape,
};
pub use process::{CutProcess, ProcessingType};
