// this_file: pathmin/src/path/convert/mixed.rs

//! The absolute-vs-relative chooser: serializes both spellings of every
//! command and keeps the shorter one.

use super::Options;
use crate::path::command::{Command, Kind, PathItem};
use crate::path::format;

pub fn mixed(items: &mut [PathItem], options: &Options) {
    // kind and case of the previous command after its own choice
    let mut prev: Option<(Kind, bool)> = None;
    for (index, item) in items.iter_mut().enumerate() {
        if index == 0 || item.command.is(Kind::Close) {
            prev = Some((item.command.kind, item.command.absolute));
            continue;
        }
        let first_argument = item.command.args().first().copied().unwrap_or(0.0);

        let mut absolute = to_absolute(item);
        options.round_data(absolute.args_mut());
        let mut relative = item.command;
        options.round_data(relative.args_mut());

        let absolute_args = format::format_args(absolute.kind, absolute.args(), &options.format);
        let relative_args = format::format_args(relative.kind, relative.args(), &options.format);

        // a saving of one character evaporates when the relative spelling
        // would have fused its leading minus into the preceding number
        let sign_artifact = options.format.negative_extra_space
            && prev.is_some_and(|(_, prev_absolute)| !prev_absolute)
            && absolute_args.len() == relative_args.len() - 1
            && first_argument < 0.0;

        if options.force_absolute_path
            || (absolute_args.len() < relative_args.len() && !sign_artifact)
        {
            item.command = absolute;
        } else {
            item.command = relative;
        }
        prev = Some((item.command.kind, item.command.absolute));
    }
}

/// The absolute form of a command, shifted by its base point.
pub fn to_absolute(item: &PathItem) -> Command {
    let mut command = item.command;
    if command.absolute || command.is(Kind::Close) {
        return command;
    }
    command.absolute = true;
    let base = item.base;
    let kind = command.kind;
    let args = command.args_mut();
    match kind {
        Kind::Horizontal => args[0] += base[0],
        Kind::Vertical => args[0] += base[1],
        Kind::Arc => {
            args[5] += base[0];
            args[6] += base[1];
        }
        Kind::Close => {}
        _ => {
            for (index, value) in args.iter_mut().enumerate() {
                *value += base[index % 2];
            }
        }
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::convert::{filter, relative, Options};
    use crate::path::format::FormatOptions;
    use crate::path::Path;
    use crate::style::StyleInfo;

    fn run_mixed(input: &str) -> String {
        let options = Options::default();
        let mut items = filter(
            relative(Path::parse(input).unwrap()),
            &options,
            &StyleInfo::unstyled(),
        );
        mixed(&mut items, &options);
        let commands: Vec<Command> = items.iter().map(|item| item.command).collect();
        Path(commands).stringify(&FormatOptions::default())
    }

    #[test]
    fn test_keeps_relative_on_ties() {
        // "20 20" and "10 10" have the same length; relative wins the tie
        assert_eq!(run_mixed("M10 10 L20 20"), "M10 10l10 10");
    }

    #[test]
    fn test_prefers_shorter_absolute() {
        // H0 beats h-50
        assert_eq!(
            run_mixed("M0 0 L50 0 L50 50 L0 50"),
            "M0 0h50v50H0"
        );
    }

    #[test]
    fn test_to_absolute_shifts_by_base() {
        let item = PathItem {
            command: Command::new(Kind::Cubic, false, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            base: [10.0, 20.0],
            coords: [15.0, 26.0],
            sdata: None,
        };
        let absolute = to_absolute(&item);
        assert!(absolute.absolute);
        assert_eq!(absolute.args(), &[11.0, 22.0, 13.0, 24.0, 15.0, 26.0]);
    }

    #[test]
    fn test_negative_first_argument_suppresses_one_char_saving() {
        // absolute "H9" saves one character over relative "h-1", but the
        // minus sign would have fused into the previous relative command
        let options = Options::default();
        let mut items = filter(
            relative(Path::parse("M0 0 l10 5 l-1 0").unwrap()),
            &options,
            &StyleInfo::unstyled(),
        );
        mixed(&mut items, &options);
        assert!(!items[2].command.absolute);
    }

    #[test]
    fn test_force_absolute_path() {
        let options = Options {
            force_absolute_path: true,
            ..Options::default()
        };
        let mut items = filter(
            relative(Path::parse("M10 10 l10 10").unwrap()),
            &options,
            &StyleInfo::unstyled(),
        );
        mixed(&mut items, &options);
        let commands: Vec<Command> = items.iter().map(|item| item.command).collect();
        assert_eq!(
            Path(commands).stringify(&FormatOptions::default()),
            "M10 10L20 20"
        );
    }
}
