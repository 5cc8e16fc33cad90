// this_file: pathmin/src/path/parse.rs

//! Parser for the `d` attribute grammar.
//!
//! Handles implicit command repetition (`M` chunks after the first become
//! `L`), single-character arc flags, numbers that start at a second decimal
//! point (`.5.5`) and scientific notation.

use super::command::{Command, Kind};
use super::Path;
use thiserror::Error;

/// Path data parse error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },

    #[error("path data must start with a moveto command")]
    MissingMoveto,

    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("invalid arc flag at offset {offset}, expected 0 or 1")]
    InvalidFlag { offset: usize },

    #[error("incomplete arguments for {letter:?} at offset {offset}")]
    IncompleteArguments { letter: char, offset: usize },
}

pub(super) fn parse(input: &str) -> Result<Path, PathParseError> {
    Parser {
        bytes: input.as_bytes(),
        pos: 0,
        commands: Vec::new(),
    }
    .run()
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    commands: Vec<Command>,
}

impl Parser<'_> {
    fn run(mut self) -> Result<Path, PathParseError> {
        // (kind, absolute) the next implicit argument chunk belongs to
        let mut current: Option<(Kind, bool)> = None;
        loop {
            self.skip_whitespace();
            let Some(&byte) = self.bytes.get(self.pos) else {
                break;
            };
            if byte == b',' && !self.commands.is_empty() {
                // comma-wsp between argument chunks
                self.pos += 1;
                continue;
            }
            if byte.is_ascii_alphabetic() {
                let letter = byte as char;
                let Some((kind, absolute)) = Kind::from_letter(letter) else {
                    return Err(PathParseError::UnexpectedCharacter {
                        found: letter,
                        offset: self.pos,
                    });
                };
                if self.commands.is_empty() && kind != Kind::Move {
                    return Err(PathParseError::MissingMoveto);
                }
                self.pos += 1;
                if kind == Kind::Close {
                    self.commands.push(Command::close());
                    current = None;
                } else {
                    self.read_chunk(kind, absolute, letter)?;
                    current = Some(next_implicit(kind, absolute));
                }
            } else {
                // an argument chunk without a letter repeats the previous command
                let Some((kind, absolute)) = current else {
                    if self.commands.is_empty() {
                        return Err(PathParseError::MissingMoveto);
                    }
                    return Err(PathParseError::UnexpectedCharacter {
                        found: byte as char,
                        offset: self.pos,
                    });
                };
                self.read_chunk(kind, absolute, kind.letter(absolute))?;
            }
        }
        if self.commands.is_empty() {
            return Err(PathParseError::MissingMoveto);
        }
        Ok(Path(self.commands))
    }

    /// Reads one full argument tuple and pushes the command.
    fn read_chunk(
        &mut self,
        kind: Kind,
        absolute: bool,
        letter: char,
    ) -> Result<(), PathParseError> {
        let mut args = [0.0; 7];
        for (index, slot) in args.iter_mut().take(kind.arity()).enumerate() {
            self.skip_separator(index > 0);
            if self.pos >= self.bytes.len() {
                return Err(PathParseError::IncompleteArguments {
                    letter,
                    offset: self.pos,
                });
            }
            *slot = if kind == Kind::Arc && (index == 3 || index == 4) {
                self.read_flag()?
            } else {
                self.read_number()?
            };
        }
        self.commands
            .push(Command::new(kind, absolute, &args[..kind.arity()]));
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.bytes.get(self.pos), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Skips whitespace and, between two arguments, at most one comma.
    fn skip_separator(&mut self, allow_comma: bool) {
        self.skip_whitespace();
        if allow_comma && self.bytes.get(self.pos) == Some(&b',') {
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    fn read_flag(&mut self) -> Result<f64, PathParseError> {
        let value = match self.bytes.get(self.pos) {
            Some(b'0') => 0.0,
            Some(b'1') => 1.0,
            _ => return Err(PathParseError::InvalidFlag { offset: self.pos }),
        };
        self.pos += 1;
        Ok(value)
    }

    fn read_number(&mut self) -> Result<f64, PathParseError> {
        let start = self.pos;
        if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut digits = 0;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
            digits += 1;
        }
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                self.pos += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return Err(PathParseError::InvalidNumber { offset: start });
        }
        if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                    self.pos += 1;
                }
            } else {
                // not an exponent after all
                self.pos = mark;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| PathParseError::InvalidNumber { offset: start })?;
        text.parse::<f64>()
            .map_err(|_| PathParseError::InvalidNumber { offset: start })
    }
}

/// The command an unlabeled argument chunk after `kind` belongs to.
fn next_implicit(kind: Kind, absolute: bool) -> (Kind, bool) {
    match kind {
        Kind::Move => (Kind::Line, absolute),
        other => (other, absolute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(path: &Path) -> String {
        path.0.iter().map(Command::letter).collect()
    }

    #[test]
    fn test_parse_simple_path() {
        let path = Path::parse("M10 20 L30 40").unwrap();
        assert_eq!(letters(&path), "ML");
        assert_eq!(path.0[0].args(), &[10.0, 20.0]);
        assert_eq!(path.0[1].args(), &[30.0, 40.0]);
    }

    #[test]
    fn test_parse_implicit_lineto_after_moveto() {
        let path = Path::parse("M10 10 20 20 30 30").unwrap();
        assert_eq!(letters(&path), "MLL");
        let path = Path::parse("m10 10 20 20").unwrap();
        assert_eq!(letters(&path), "ml");
    }

    #[test]
    fn test_parse_repeated_chunks() {
        let path = Path::parse("M0 0c1 1 2 2 3 3 4 4 5 5 6 6").unwrap();
        assert_eq!(letters(&path), "Mcc");
        assert_eq!(path.0[2].args(), &[4.0, 4.0, 5.0, 5.0, 6.0, 6.0]);
    }

    #[test]
    fn test_parse_packed_arc_flags() {
        let path = Path::parse("M0 0a20 60 45 0130 20").unwrap();
        assert_eq!(letters(&path), "Ma");
        assert_eq!(path.0[1].args(), &[20.0, 60.0, 45.0, 0.0, 1.0, 30.0, 20.0]);
    }

    #[test]
    fn test_parse_second_decimal_point_starts_a_number() {
        let path = Path::parse("M0 0l.5.5").unwrap();
        assert_eq!(path.0[1].args(), &[0.5, 0.5]);
    }

    #[test]
    fn test_parse_negative_as_separator_and_exponent() {
        let path = Path::parse("M1e2-3E-1l-1-2").unwrap();
        assert_eq!(path.0[0].args(), &[100.0, -0.3]);
        assert_eq!(path.0[1].args(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_parse_commas() {
        let path = Path::parse("M 10,20 L 30 , 40").unwrap();
        assert_eq!(path.0[1].args(), &[30.0, 40.0]);
        let path = Path::parse("M10 10,20 20").unwrap();
        assert_eq!(letters(&path), "ML");
        assert_eq!(path.0[1].args(), &[20.0, 20.0]);
    }

    #[test]
    fn test_parse_close_both_cases() {
        let path = Path::parse("M0 0h10Z").unwrap();
        assert_eq!(path.0[2].kind, Kind::Close);
        assert_eq!(path.0[2].letter(), 'z');
    }

    #[test]
    fn test_parse_rejects_leading_lineto() {
        assert_eq!(Path::parse("L10 10"), Err(PathParseError::MissingMoveto));
        assert_eq!(Path::parse(""), Err(PathParseError::MissingMoveto));
    }

    #[test]
    fn test_parse_rejects_unknown_letter() {
        assert!(matches!(
            Path::parse("M0 0x10"),
            Err(PathParseError::UnexpectedCharacter { found: 'x', .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_flag() {
        assert!(matches!(
            Path::parse("M0 0a1 1 0 2 0 1 1"),
            Err(PathParseError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_short_chunk() {
        assert!(matches!(
            Path::parse("M0 0l5"),
            Err(PathParseError::IncompleteArguments { letter: 'l', .. })
        ));
    }
}
