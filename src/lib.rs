//! # xcspost
//!
//! A laser post processor turning tool motion into two synchronized outputs:
//! G-Code for xTool D1 class lasers and an xTool Creative Space (`.xcs`)
//! project document holding the same strokes as vector paths.
//!
//! ## Architecture
//!
//! xcspost is organized as a workspace with multiple crates:
//!
//! 1. **xcspost-core** - Motion commands, units, geometry, G-Code reader
//! 2. **xcspost-designer** - Canvas scene graph and `.xcs` document model
//! 3. **xcspost-camtools** - Arc linearizer, path tracker, transcoder
//! 4. **xcspost-settings** - Configuration load/save/validation
//! 5. **xcspost** - Main binary that integrates all crates

pub mod cli;

use anyhow::Context;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use cli::Cli;
pub use xcspost_camtools::{
    Operation, PostConfig, TranscodeError, TranscodeOutput, TranscodeWarning, Transcoder,
};
pub use xcspost_core::{get_unit_label, parse_program, MotionCommand, SourceUnits};
pub use xcspost_designer::{xcs_path, ProjectDocument};
pub use xcspost_settings::{Config, OutputSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Extensions stripped from the output name before adding our own
const GCODE_EXTENSIONS: [&str; 4] = ["gc", "gcode", "nc", "ngc"];

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// Files written by one run
#[derive(Debug, Clone, PartialEq)]
pub struct PostResult {
    pub gcode_path: PathBuf,
    pub xcs_path: PathBuf,
    /// Number of tracked paths in the document
    pub path_count: usize,
    pub warnings: Vec<TranscodeWarning>,
}

/// `path` with a trailing G-Code extension removed
pub fn output_base(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if GCODE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            path.with_extension("")
        }
        _ => path.to_path_buf(),
    }
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Read G-Code from `input`, write `<output>.gcode` and `<output>.xcs`
pub fn post_process(input: &Path, output: &Path, config: &Config) -> anyhow::Result<PostResult> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let commands = parse_program(&text, config.input)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    tracing::info!("Read {} command(s) from {}", commands.len(), input.display());

    let label = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string());
    let transcoder = Transcoder::new(config.post.clone());
    let result = transcoder.transcode(&[Operation::path(label, commands)])?;

    let base = output_base(output);
    let gcode_path = with_suffix(&base, &config.output.gcode_extension);
    std::fs::write(&gcode_path, &result.gcode)
        .with_context(|| format!("Failed to write {}", gcode_path.display()))?;

    let group_tag = if config.post.job_name.is_empty() {
        gcode_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        config.post.job_name.clone()
    };
    let document = result.build_document(&group_tag)?;
    if let Some(extent) = result.global_bounds() {
        tracing::info!(
            "Document extent {:.3} x {:.3} {}",
            extent.width(),
            extent.height(),
            get_unit_label(config.post.length_units)
        );
    }

    let project_path = if config.output.pretty_json {
        let path = xcs_path(&base);
        let json = document.to_json_string_pretty()?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        path
    } else {
        document.save_to_file(&base)?
    };

    Ok(PostResult {
        gcode_path,
        xcs_path: project_path,
        path_count: result.paths.len(),
        warnings: result.warnings,
    })
}
