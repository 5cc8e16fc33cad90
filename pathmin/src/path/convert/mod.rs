// this_file: pathmin/src/path/convert/mod.rs

//! The path optimization pipeline.
//!
//! A path is first rewritten into relative commands with position
//! annotations, then filtered in a single forward pass that rewrites each
//! command against its predecessor, then revisited to pick the shorter of
//! the absolute and relative spelling per command, and finally serialized.
//! Every stage threads the same immutable [`Options`] value; per-element
//! state lives in the stage functions, never in globals.

mod arc;
mod filter;
mod mixed;
mod relative;

pub use filter::filter;
pub use mixed::{mixed, to_absolute};
pub use relative::relative;

use super::command::{Command, Kind};
use super::format::{self, to_fixed, FormatOptions};
use super::geometry::MakeArcs;
use super::Path;
use crate::style::StyleInfo;

/// Decimal precision for path data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Round to this many decimal places.
    Enabled(i32),
    /// Keep coordinates untouched; comparisons fall back to a 1e-2
    /// tolerance.
    Disabled,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Enabled(3)
    }
}

impl Precision {
    fn digits(self) -> Option<i32> {
        match self {
            Precision::Enabled(digits) => Some(digits),
            Precision::Disabled => None,
        }
    }
}

/// Pipeline options. Every rewrite can be switched off individually.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Detect circular arcs hidden in cubic curves; `None` disables.
    pub make_arcs: Option<MakeArcs>,
    pub precision: Precision,
    pub straight_curves: bool,
    pub convert_to_q: bool,
    pub line_shorthands: bool,
    pub collapse_repeated: bool,
    pub curve_smooth_shorthands: bool,
    pub convert_to_z: bool,
    pub remove_useless: bool,
    pub smart_arc_rounding: bool,
    pub utilize_absolute: bool,
    pub force_absolute_path: bool,
    pub format: FormatOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            make_arcs: Some(MakeArcs::default()),
            precision: Precision::default(),
            straight_curves: true,
            convert_to_q: true,
            line_shorthands: true,
            collapse_repeated: true,
            curve_smooth_shorthands: true,
            convert_to_z: true,
            remove_useless: true,
            smart_arc_rounding: true,
            utilize_absolute: true,
            force_absolute_path: false,
            format: FormatOptions::default(),
        }
    }
}

impl Options {
    /// Tolerance under which two coordinates are considered equal.
    pub fn error(&self) -> f64 {
        match self.precision.digits() {
            Some(digits) => {
                let pow = f64::powi(10.0, digits);
                f64::trunc(f64::powi(0.1, digits) * pow) / pow
            }
            None => 1e-2,
        }
    }

    /// Rounds one value, preferring the one-digit-shorter form when it
    /// stays within the error tolerance.
    pub fn round(&self, value: f64) -> f64 {
        match self.precision.digits() {
            None => value,
            Some(digits) if digits > 0 && digits < 20 => {
                let fixed = to_fixed(value, digits);
                if fixed == value {
                    value
                } else {
                    let shorter = to_fixed(value, digits - 1);
                    if to_fixed((shorter - value).abs(), digits + 1) >= self.error() {
                        fixed
                    } else {
                        shorter
                    }
                }
            }
            Some(_) => value.round(),
        }
    }

    /// Rounds a whole argument slice in place.
    pub fn round_data(&self, data: &mut [f64]) {
        for value in data.iter_mut() {
            *value = self.round(*value);
        }
    }

    /// Serializes commands after rounding a copy of their arguments; used
    /// to compare the lengths of rewrite candidates.
    pub(crate) fn serialized(&self, commands: &[Command]) -> String {
        let rounded: Vec<Command> = commands
            .iter()
            .map(|command| {
                let mut command = *command;
                self.round_data(command.args_mut());
                command
            })
            .collect();
        format::stringify(&rounded, &self.format)
    }
}

/// Optimizes a parsed path and serializes the result.
pub fn run(path: Path, options: &Options, info: &StyleInfo) -> String {
    let includes_vertices = path.0.iter().any(|command| !command.is(Kind::Move));
    let items = relative(path);
    let mut items = filter(items, options, info);
    if options.utilize_absolute {
        mixed(&mut items, options);
    }
    let mut commands: Vec<Command> = items.into_iter().map(|item| item.command).collect();
    // a path that only positions markers still needs a vertex to paint them
    if info.has_marker && includes_vertices && commands.iter().all(|c| c.is(Kind::Move)) {
        commands.push(Command::close());
    }
    format::stringify(&commands, &options.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_follows_precision() {
        let mut options = Options::default();
        assert_eq!(options.error(), 1e-3);
        options.precision = Precision::Enabled(2);
        assert_eq!(options.error(), 1e-2);
        options.precision = Precision::Enabled(0);
        assert_eq!(options.error(), 1.0);
        options.precision = Precision::Disabled;
        assert_eq!(options.error(), 1e-2);
    }

    #[test]
    fn test_round_prefers_shorter_form_within_error() {
        let options = Options {
            precision: Precision::Enabled(2),
            ..Options::default()
        };
        // 1.3 is one digit shorter than 1.29 and still within 0.01
        assert_eq!(options.round(1.294), 1.3);
        // the shorter form is too far away here
        assert_eq!(options.round(2.3491), 2.35);
        assert_eq!(options.round(1.0), 1.0);
    }

    #[test]
    fn test_round_disabled_keeps_values() {
        let options = Options {
            precision: Precision::Disabled,
            ..Options::default()
        };
        assert_eq!(options.round(1.23456789), 1.23456789);
    }

    #[test]
    fn test_round_zero_precision_is_integer_rounding() {
        let options = Options {
            precision: Precision::Enabled(0),
            ..Options::default()
        };
        assert_eq!(options.round(1.5), 2.0);
        assert_eq!(options.round(-1.5), -2.0);
    }
}
