// this_file: pathmin/src/path/format.rs

//! Number formatting and minimal serialization of path data.
//!
//! Serialized arguments drop every separator the grammar lets them drop: a
//! negative sign doubles as a separator, a bare decimal point can follow a
//! fractional number, and the single-digit arc flags can run straight into
//! the next number when the host opts in.

use super::command::{Command, Kind};

/// Formatting knobs for serialized path data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Strip the leading `0` of magnitudes below one (`0.5` becomes `.5`).
    pub leading_zero: bool,
    /// Let a negative sign or a fused decimal point stand in for a space.
    pub negative_extra_space: bool,
    /// Omit the separator after the two arc flags (`a20 60 45 0130 20`).
    pub no_space_after_flags: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            leading_zero: true,
            negative_extra_space: true,
            no_space_after_flags: false,
        }
    }
}

/// Rounds `value` to `precision` decimal places, half away from zero.
pub fn to_fixed(value: f64, precision: i32) -> f64 {
    let pow = f64::powi(10.0, precision);
    (value * pow).round() / pow
}

/// Formats an already-rounded number in its shortest decimal form.
pub fn format_number(value: f64, leading_zero: bool) -> String {
    if value == 0.0 {
        // merges the -0 case
        return String::from("0");
    }
    let mut s = value.to_string();
    if leading_zero {
        if s.starts_with("0.") {
            s.remove(0);
        } else if s.starts_with("-0.") {
            s.remove(1);
        }
    }
    s
}

/// Serializes one command's arguments with minimized separators.
pub fn format_args(kind: Kind, args: &[f64], format: &FormatOptions) -> String {
    let mut out = String::new();
    let mut previous = String::new();
    for (index, &value) in args.iter().enumerate() {
        let number = format_number(value, format.leading_zero);
        if index == 0
            || (format.no_space_after_flags && kind == Kind::Arc && (index == 4 || index == 5))
        {
            // the command letter or a single-digit flag precedes
        } else if format.negative_extra_space
            && (number.starts_with('-') || (number.starts_with('.') && previous.contains('.')))
        {
            // the sign or the second decimal point ends the previous number
        } else {
            out.push(' ');
        }
        out.push_str(&number);
        previous = number;
    }
    out
}

/// Serializes a command sequence. No separator ever precedes a command
/// letter.
pub fn stringify(commands: &[Command], format: &FormatOptions) -> String {
    let mut out = String::new();
    for command in commands {
        out.push(command.letter());
        out.push_str(&format_args(command.kind, command.args(), format));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_rounds_half_away_from_zero() {
        assert_eq!(to_fixed(2.3491, 2), 2.35);
        assert_eq!(to_fixed(1.2345678, 3), 1.235);
        assert_eq!(to_fixed(0.5, 0), 1.0);
        assert_eq!(to_fixed(-0.5, 0), -1.0);
    }

    #[test]
    fn test_format_number_strips_leading_zero() {
        assert_eq!(format_number(0.5, true), ".5");
        assert_eq!(format_number(-0.5, true), "-.5");
        assert_eq!(format_number(0.5, false), "0.5");
        assert_eq!(format_number(10.25, true), "10.25");
        assert_eq!(format_number(0.0, true), "0");
        assert_eq!(format_number(-0.0, true), "0");
        assert_eq!(format_number(100.0, true), "100");
    }

    #[test]
    fn test_format_args_negative_sign_separates() {
        let format = FormatOptions::default();
        assert_eq!(
            format_args(Kind::Line, &[10.0, -5.0], &format),
            "10-5"
        );
        assert_eq!(
            format_args(Kind::Cubic, &[1.0, 2.0, -3.0, 4.0, 5.0, -6.0], &format),
            "1 2-3 4 5-6"
        );
    }

    #[test]
    fn test_format_args_decimal_point_fuses_after_fraction() {
        let format = FormatOptions::default();
        assert_eq!(format_args(Kind::Line, &[20.1, 0.1], &format), "20.1.1");
        // no fusion after an integer
        assert_eq!(format_args(Kind::Line, &[20.0, 0.1], &format), "20 .1");
    }

    #[test]
    fn test_format_args_keeps_spaces_when_disabled() {
        let format = FormatOptions {
            negative_extra_space: false,
            ..FormatOptions::default()
        };
        assert_eq!(format_args(Kind::Line, &[10.0, -5.0], &format), "10 -5");
    }

    #[test]
    fn test_format_args_arc_flag_elision() {
        let args = [20.0, 60.0, 45.0, 0.0, 1.0, 30.0, 20.0];
        let spaced = FormatOptions::default();
        assert_eq!(format_args(Kind::Arc, &args, &spaced), "20 60 45 0 1 30 20");
        let packed = FormatOptions {
            no_space_after_flags: true,
            ..FormatOptions::default()
        };
        assert_eq!(format_args(Kind::Arc, &args, &packed), "20 60 45 0130 20");
    }

    #[test]
    fn test_stringify_concatenates_letters_and_args() {
        let commands = [
            Command::new(Kind::Move, true, &[10.0, 10.0]),
            Command::new(Kind::Line, false, &[10.0, 10.0]),
            Command::close(),
        ];
        assert_eq!(
            stringify(&commands, &FormatOptions::default()),
            "M10 10l10 10z"
        );
    }
}
