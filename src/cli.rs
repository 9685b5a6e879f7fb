//! Command line interface

use clap::Parser;
use std::path::PathBuf;

use xcspost_camtools::PostConfig;
use xcspost_core::{FeedRateUnits, MeasurementSystem};

/// Convert G-Code into an xTool program and a matching `.xcs` project
#[derive(Debug, Parser)]
#[command(name = "xcspost", author, version, about, long_about = None)]
pub struct Cli {
    /// G-Code program to read
    #[arg(value_parser)]
    pub input: PathBuf,

    /// Output name; `.gcode` and `.xcs` are written next to it
    #[arg(value_parser)]
    pub output: PathBuf,

    /// Settings file (TOML or JSON); defaults to the user config directory
    #[arg(short, long, value_parser)]
    pub config: Option<PathBuf>,

    /// Suppress the exporter and time header
    #[arg(long)]
    pub no_header: bool,

    /// Suppress comment output
    #[arg(long)]
    pub no_comments: bool,

    /// Prefix every line with a line number
    #[arg(long)]
    pub line_numbers: bool,

    /// Number of decimals for lengths and feed rates
    #[arg(long)]
    pub precision: Option<usize>,

    /// Commands issued before the first operation (`\n` separates lines)
    #[arg(long)]
    pub preamble: Option<String>,

    /// Commands issued after the last operation (`\n` separates lines)
    #[arg(long)]
    pub postamble: Option<String>,

    /// Output in inches (G20)
    #[arg(long)]
    pub inches: bool,

    /// Omit repeated command keywords
    #[arg(long)]
    pub modal: bool,

    /// Omit axis values that did not change
    #[arg(long)]
    pub axis_modal: bool,

    /// Group tag for the document paths
    #[arg(long)]
    pub job_name: Option<String>,
}

impl Cli {
    /// Apply the command line switches on top of loaded settings
    pub fn apply(&self, post: &mut PostConfig) {
        if self.no_header {
            post.header = false;
        }
        if self.no_comments {
            post.comments = false;
        }
        if self.line_numbers {
            post.line_numbers = true;
        }
        if self.inches {
            post.length_units = MeasurementSystem::Imperial;
            post.speed_units = FeedRateUnits::InPerMin;
            post.precision = MeasurementSystem::Imperial.default_precision();
        }
        if let Some(precision) = self.precision {
            post.precision = precision;
        }
        if let Some(preamble) = &self.preamble {
            post.preamble = command_lines(preamble);
        }
        if let Some(postamble) = &self.postamble {
            post.postamble = command_lines(postamble);
        }
        if self.modal {
            post.modal = true;
        }
        if self.axis_modal {
            post.output_doubles = false;
        }
        if let Some(job_name) = &self.job_name {
            post.job_name = job_name.clone();
        }
    }
}

fn command_lines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("xcspost").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_only_keeps_settings() {
        let cli = parse(&["in.nc", "out"]);
        assert_eq!(cli.input, PathBuf::from("in.nc"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert!(cli.config.is_none());

        let mut post = PostConfig::default();
        cli.apply(&mut post);
        assert_eq!(post, PostConfig::default());
    }

    #[test]
    fn test_switches_override_settings() {
        let cli = parse(&[
            "in.nc",
            "out",
            "--no-header",
            "--no-comments",
            "--line-numbers",
            "--modal",
            "--axis-modal",
            "--preamble",
            "G17\\nG90",
            "--postamble",
            "M2",
            "--job-name",
            "batch",
        ]);
        let mut post = PostConfig::default();
        cli.apply(&mut post);
        assert!(!post.header);
        assert!(!post.comments);
        assert!(post.line_numbers);
        assert!(post.modal);
        assert!(!post.output_doubles);
        assert_eq!(post.preamble, "G17\nG90");
        assert_eq!(post.postamble, "M2");
        assert_eq!(post.job_name, "batch");
    }

    #[test]
    fn test_inches_and_precision() {
        let mut post = PostConfig::default();
        parse(&["in.nc", "out", "--inches"]).apply(&mut post);
        assert_eq!(post.length_units, MeasurementSystem::Imperial);
        assert_eq!(post.speed_units, FeedRateUnits::InPerMin);
        assert_eq!(post.precision, 4);

        let mut post = PostConfig::default();
        parse(&["in.nc", "out", "--inches", "--precision", "2"]).apply(&mut post);
        assert_eq!(post.precision, 2);
    }

    #[test]
    fn test_config_flag_and_missing_output() {
        let cli = parse(&["in.nc", "out", "--config", "post.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("post.toml")));
        assert!(Cli::try_parse_from(["xcspost", "in.nc"]).is_err());
    }
}
