//! Project document serialization.
//!
//! Builds the `.xcs` JSON document from an explicit set of canvases. The
//! document owns its canvases; starting a new document means creating a new
//! value.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::canvas::Canvas;
use crate::error::{DesignerError, DesignerResult};

/// Document format version understood by the control application
pub const XCS_VERSION: &str = "1.1.19";
/// Extension id of the target device family
pub const XCS_EXT_ID: &str = "D1";
/// Device model id written in the device block
pub const DEVICE_ID: &str = "MD1";
pub const DEVICE_POWER: u32 = 10;
/// File extension of saved documents
pub const XCS_EXTENSION: &str = "xcs";

/// Ordered canvases plus the active canvas selection
#[derive(Debug, Clone, Default)]
pub struct ProjectDocument {
    canvases: Vec<Canvas>,
    active: usize,
}

impl ProjectDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas and make it active
    pub fn new_canvas(&mut self) -> &mut Canvas {
        let canvas = Canvas::new(self.canvases.len() + 1);
        tracing::debug!("created {}", canvas.id());
        self.canvases.push(canvas);
        self.active = self.canvases.len() - 1;
        &mut self.canvases[self.active]
    }

    /// Make an existing canvas active
    pub fn select_canvas(&mut self, id: &str) -> DesignerResult<&mut Canvas> {
        let index = self
            .canvases
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| DesignerError::UnknownCanvas(id.to_string()))?;
        self.active = index;
        Ok(&mut self.canvases[index])
    }

    pub fn active_canvas(&self) -> Option<&Canvas> {
        self.canvases.get(self.active)
    }

    pub fn active_canvas_mut(&mut self) -> DesignerResult<&mut Canvas> {
        self.canvases
            .get_mut(self.active)
            .ok_or(DesignerError::NoCanvas)
    }

    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id() == id)
    }

    /// Flatten the document into its wire structure
    pub fn encode(&self) -> Value {
        let canvas_id = self.active_canvas().map(Canvas::id).unwrap_or_default();
        let canvases: Vec<Value> = self.canvases.iter().map(Canvas::encode).collect();
        let processes: Vec<Value> = self
            .canvases
            .iter()
            .map(|c| json!([c.id(), c.encode_processes()]))
            .collect();
        json!({
            "canvasId": canvas_id,
            "canvas": canvases,
            "version": XCS_VERSION,
            "extID": XCS_EXT_ID,
            "device": {
                "id": DEVICE_ID,
                "power": DEVICE_POWER,
                "data": {
                    "dataType": "Map",
                    "value": processes,
                },
                "materialList": [],
            },
        })
    }

    pub fn to_json_string(&self) -> DesignerResult<String> {
        Ok(serde_json::to_string(&self.encode())?)
    }

    pub fn to_json_string_pretty(&self) -> DesignerResult<String> {
        Ok(serde_json::to_string_pretty(&self.encode())?)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> DesignerResult<()> {
        serde_json::to_writer(&mut *writer, &self.encode())?;
        writer.flush()?;
        Ok(())
    }

    /// Save to `path`, adding the `.xcs` extension when missing; returns the written path
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = xcs_path(path.as_ref());
        let json = self.to_json_string().context("Failed to serialize project")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write project file {}", path.display()))?;
        tracing::info!(
            "saved {} canvas(es) to {}",
            self.canvases.len(),
            path.display()
        );
        Ok(path)
    }
}

/// `path` with an `.xcs` extension, leaving one that is already present
pub fn xcs_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(XCS_EXTENSION) => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(XCS_EXTENSION);
            PathBuf::from(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcspost_core::Point;

    #[test]
    fn test_empty_document() {
        let doc = ProjectDocument::new();
        let v = doc.encode();
        assert_eq!(v["canvasId"], "");
        assert_eq!(v["canvas"], json!([]));
        assert_eq!(v["device"]["materialList"], json!([]));
    }

    #[test]
    fn test_top_level_key_order() {
        let mut doc = ProjectDocument::new();
        doc.new_canvas();
        let v = doc.encode();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["canvasId", "canvas", "version", "extID", "device"]);
        let keys: Vec<&str> = v["device"].as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "power", "data", "materialList"]);
    }

    #[test]
    fn test_new_canvas_becomes_active() {
        let mut doc = ProjectDocument::new();
        doc.new_canvas();
        doc.new_canvas();
        assert_eq!(doc.active_canvas().unwrap().id(), "canvas2");
        doc.select_canvas("canvas1").unwrap();
        assert_eq!(doc.encode()["canvasId"], "canvas1");
        assert!(matches!(
            doc.select_canvas("canvas7"),
            Err(DesignerError::UnknownCanvas(_))
        ));
    }

    #[test]
    fn test_xcs_path() {
        assert_eq!(xcs_path(Path::new("out/job")), PathBuf::from("out/job.xcs"));
        assert_eq!(xcs_path(Path::new("job.xcs")), PathBuf::from("job.xcs"));
        assert_eq!(xcs_path(Path::new("job.v2")), PathBuf::from("job.v2.xcs"));
    }

    #[test]
    fn test_write_to_matches_string() {
        let mut doc = ProjectDocument::new();
        doc.new_canvas()
            .add_rect("", Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        let mut buf = Vec::new();
        doc.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), doc.to_json_string().unwrap());
    }
}
