//! Textual listing parser
//!
//! Reads the subset of G-code that punchkit emits back into
//! [`MotionCommand`]s so saved programs can be timed:
//!
//! - `G0`/`G00`/`G1`/`G01` with `X`, `Y`, `Z`, `A`, `F` words
//! - `G4`/`G04` with a `P` word (seconds)
//! - `M<code>`
//!
//! Words are case-insensitive, `;` and `( )` comments are stripped and any
//! other line is skipped. Feed is modal: a move without `F` reuses the last
//! feed seen, and moves before any feed are kept with feed 0 (zero time).

use crate::error::{ListingError, ListingResult};
use punchkit_core::{AxisTargets, MotionCommand, MoveKind};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

fn strip_comments(line: &str) -> String {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COMMENT_REGEX
        .get_or_init(|| Regex::new(r";.*|\([^)]*\)").expect("invalid regex pattern"));
    regex.replace_all(line, "").to_string()
}

fn command_regex() -> &'static Regex {
    static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMAND_REGEX.get_or_init(|| Regex::new(r"^([GM])\s*(\d+)").expect("invalid regex pattern"))
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"([A-Z])\s*([-+]?\d*\.?\d+)").expect("invalid regex pattern")
    })
}

fn parse_words(rest: &str, line: usize) -> ListingResult<Vec<(char, f64)>> {
    word_regex()
        .captures_iter(rest)
        .map(|caps| {
            let letter = caps[1].chars().next().unwrap_or(' ');
            caps[2]
                .parse::<f64>()
                .map(|value| (letter, value))
                .map_err(|e| ListingError::parse(line, format!("bad {} word: {}", letter, e)))
        })
        .collect()
}

/// Parse a G-code listing into motion commands
pub fn parse_listing(text: &str) -> ListingResult<Vec<MotionCommand>> {
    let mut commands = Vec::new();
    let mut modal_feed: Option<f64> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_comments(raw).trim().to_ascii_uppercase();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = command_regex().captures(&line) else {
            trace!("Skipping line {}: {}", line_number, line);
            continue;
        };
        let letter = &caps[1];
        let number: u32 = caps[2]
            .parse()
            .map_err(|e| ListingError::parse(line_number, format!("bad command number: {}", e)))?;
        let rest = &line[caps.get(0).map_or(0, |m| m.end())..];

        match (letter, number) {
            ("G", 0) | ("G", 1) => {
                let mut target = AxisTargets::default();
                for (word, value) in parse_words(rest, line_number)? {
                    match word {
                        'X' => target.x = Some(value),
                        'Y' => target.y = Some(value),
                        'Z' => target.z = Some(value),
                        'A' => target.a = Some(value),
                        'F' => modal_feed = Some(value),
                        _ => {}
                    }
                }
                if target.is_empty() {
                    continue;
                }
                let command = MotionCommand::linear_move_of_kind(
                    target,
                    modal_feed.unwrap_or(0.0),
                    MoveKind::Travel,
                )
                .map_err(|e| ListingError::parse(line_number, e.to_string()))?;
                commands.push(command);
            }
            ("G", 4) => {
                let seconds = parse_words(rest, line_number)?
                    .into_iter()
                    .find(|(word, _)| *word == 'P')
                    .map(|(_, value)| value)
                    .ok_or_else(|| ListingError::parse(line_number, "G04 without P word"))?;
                let command = MotionCommand::timed_pause(seconds)
                    .map_err(|e| ListingError::parse(line_number, e.to_string()))?;
                commands.push(command);
            }
            ("M", code) => commands.push(MotionCommand::coded_pause(code)),
            _ => trace!("Ignoring {}{} at line {}", letter, number, line_number),
        }
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("G01 X1 ; approach"), "G01 X1 ");
        assert_eq!(strip_comments("G01 (move) X1"), "G01  X1");
        assert_eq!(strip_comments("; header only"), "");
    }

    #[test]
    fn test_parse_move_and_pauses() {
        let commands = parse_listing("G01 X1.5 Y90.0 Z99.0 F6000\nM110\nG04 P0.5\n").unwrap();
        assert_eq!(commands.len(), 3);

        let linear = commands[0].as_linear().unwrap();
        assert_eq!(linear.target().x, Some(1.5));
        assert_eq!(linear.target().a, None);
        assert_eq!(linear.feed_rate(), 6000.0);

        assert!(commands[1].is_coded_pause(110));
        assert_eq!(commands[2], MotionCommand::TimedPause { seconds: 0.5 });
    }

    #[test]
    fn test_modal_feed_is_carried() {
        let commands = parse_listing("g1 x1 f1200\ng1 x2\nG0 A90").unwrap();
        assert_eq!(commands.len(), 3);
        for command in &commands {
            assert_eq!(command.as_linear().unwrap().feed_rate(), 1200.0);
        }
    }

    #[test]
    fn test_move_before_any_feed_has_zero_feed() {
        let commands = parse_listing("G01 X10").unwrap();
        assert_eq!(commands[0].as_linear().unwrap().feed_rate(), 0.0);
    }

    #[test]
    fn test_g04_is_not_a_move() {
        let commands = parse_listing("G04 P2").unwrap();
        assert_eq!(commands, vec![MotionCommand::TimedPause { seconds: 2.0 }]);
    }

    #[test]
    fn test_g04_without_p_is_an_error() {
        let err = parse_listing("G01 X1 F100\nG04").unwrap_err();
        assert!(matches!(err, ListingError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unknown_lines_are_skipped() {
        let commands = parse_listing("%\nT1\nG21\nG90\nG01 F100\n").unwrap();
        assert!(commands.is_empty());
    }
}
