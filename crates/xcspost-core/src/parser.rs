//! G-Code text reader
//!
//! Turns G-Code program text into [`MotionCommand`]s so the transcoder can be
//! driven from a plain file. One command per line; standalone comments become
//! comment commands, inline comments are dropped, `N` words are ignored and a
//! line carrying only axis words inherits the modal motion keyword.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::GcodeError;
use crate::motion::{Axis, MotionCommand, MotionKind, SourceUnits};

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z])\s*([-+]?(?:\d+\.?\d*|\.\d+))").expect("invalid regex pattern")
    })
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"\(([^)]*)\)|;(.*)$").expect("invalid regex pattern"))
}

/// Stateful reader keeping the modal motion keyword between lines
#[derive(Debug, Default)]
pub struct GcodeReader {
    units: SourceUnits,
    modal_motion: Option<String>,
}

impl GcodeReader {
    pub fn new(units: SourceUnits) -> Self {
        Self {
            units,
            modal_motion: None,
        }
    }

    /// Parse one line; `Ok(None)` for blank lines
    pub fn parse_line(
        &mut self,
        line: &str,
        line_number: u32,
    ) -> Result<Option<MotionCommand>, GcodeError> {
        let mut comment_text = None;
        for caps in comment_regex().captures_iter(line) {
            let text = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            if comment_text.is_none() {
                comment_text = text.map(str::to_string);
            }
        }
        let code = comment_regex().replace_all(line, " ");
        let code = code.trim();

        if code.is_empty() {
            return Ok(comment_text.map(|text| MotionCommand::comment(text).in_units(self.units)));
        }

        let mut keywords: Vec<String> = Vec::new();
        let mut motion_keyword: Option<String> = None;
        let mut axes: Vec<(Axis, f64)> = Vec::new();
        let mut last_end = 0;

        for caps in word_regex().captures_iter(code) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if !code[last_end..whole.start()].trim().is_empty() {
                return Err(GcodeError::InvalidSyntax {
                    line_number,
                    reason: format!("unexpected text '{}'", code[last_end..whole.start()].trim()),
                });
            }
            last_end = whole.end();

            let letter = caps[1].chars().next().unwrap_or(' ').to_ascii_uppercase();
            let number = &caps[2];
            match letter {
                'N' | 'K' => {}
                'G' | 'M' => {
                    let word = format!("{}{}", letter, number);
                    if letter == 'G' && MotionKind::from_keyword(&word).is_motion() {
                        motion_keyword = Some(word.clone());
                    }
                    keywords.push(word);
                }
                _ => {
                    let axis = Axis::from_letter(letter).ok_or_else(|| GcodeError::UnknownCode {
                        line_number,
                        code: format!("{}{}", letter, number),
                    })?;
                    let value: f64 =
                        number
                            .parse()
                            .map_err(|_| GcodeError::InvalidParameter {
                                line_number,
                                param: axis.to_string(),
                                reason: format!("'{}' is not a number", number),
                            })?;
                    axes.push((axis, value));
                }
            }
        }
        if !code[last_end..].trim().is_empty() {
            return Err(GcodeError::InvalidSyntax {
                line_number,
                reason: format!("unexpected text '{}'", code[last_end..].trim()),
            });
        }

        let mut command = if let Some(motion) = motion_keyword {
            self.modal_motion = Some(motion.clone());
            let mut cmd = MotionCommand::new(keywords.join(" "));
            cmd.kind = MotionKind::from_keyword(&motion);
            cmd
        } else if !keywords.is_empty() {
            MotionCommand::new(keywords.join(" "))
        } else if axes.is_empty() {
            return Ok(None);
        } else {
            let modal = self
                .modal_motion
                .clone()
                .ok_or_else(|| GcodeError::InvalidSyntax {
                    line_number,
                    reason: "axis words without an active motion mode".to_string(),
                })?;
            MotionCommand::new(modal)
        };

        for (axis, value) in axes {
            command = command.with(axis, value);
        }
        Ok(Some(command.in_units(self.units)))
    }
}

/// Parse a whole G-Code program
pub fn parse_program(text: &str, units: SourceUnits) -> Result<Vec<MotionCommand>, GcodeError> {
    let mut reader = GcodeReader::new(units);
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(cmd) = reader.parse_line(line, index as u32 + 1)? {
            commands.push(cmd);
        }
    }
    tracing::debug!("parsed {} commands", commands.len());
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_motion_lines() {
        let cmds = parse_program("G0 X1 Y2 Z5\nG1 Z-1 F600\n", SourceUnits::default()).unwrap();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].kind, MotionKind::Rapid);
        assert_eq!(cmds[0].get(Axis::Y), Some(2.0));
        assert_eq!(cmds[1].kind, MotionKind::Linear);
        assert_eq!(cmds[1].get(Axis::F), Some(600.0));
    }

    #[test]
    fn test_modal_motion_inherited() {
        let cmds = parse_program("G1 X0 Y0\nX5 Y5\n", SourceUnits::default()).unwrap();
        assert_eq!(cmds[1].name, "G1");
        assert_eq!(cmds[1].kind, MotionKind::Linear);
        assert_eq!(cmds[1].get(Axis::X), Some(5.0));
    }

    #[test]
    fn test_comments_and_line_numbers() {
        let text = "(operation one)\nN110 G2 X10 Y0 I5 J0 ; arc\n\n";
        let cmds = parse_program(text, SourceUnits::default()).unwrap();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].kind, MotionKind::Comment);
        assert_eq!(cmds[0].name, "(operation one)");
        assert_eq!(cmds[1].kind, MotionKind::ArcCw);
        assert_eq!(cmds[1].get(Axis::I), Some(5.0));
    }

    #[test]
    fn test_non_motion_words() {
        let cmds = parse_program("M106 S0\nG90 G21\n", SourceUnits::default()).unwrap();
        assert_eq!(cmds[0].kind, MotionKind::Other);
        assert_eq!(cmds[0].name, "M106");
        assert_eq!(cmds[0].get(Axis::S), Some(0.0));
        assert_eq!(cmds[1].name, "G90 G21");
    }

    #[test]
    fn test_errors() {
        let err = parse_program("G1 X1 E5", SourceUnits::default()).unwrap_err();
        assert!(matches!(err, GcodeError::UnknownCode { line_number: 1, .. }));

        let err = parse_program("X1 Y1", SourceUnits::default()).unwrap_err();
        assert!(matches!(err, GcodeError::InvalidSyntax { .. }));

        let err = parse_program("G1 X1 ##", SourceUnits::default()).unwrap_err();
        assert!(matches!(err, GcodeError::InvalidSyntax { .. }));
    }
}
