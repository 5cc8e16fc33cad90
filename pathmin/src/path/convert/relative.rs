// this_file: pathmin/src/path/convert/relative.rs

//! Relative-ization: a single forward pass that converts every absolute
//! command but the leading moveto to its relative form and annotates each
//! command with the absolute cursor positions around it.

use crate::path::command::{Command, Kind, PathItem};
use crate::path::Path;

pub fn relative(path: Path) -> Vec<PathItem> {
    let mut cursor = [0.0; 2];
    let mut start = [0.0; 2];
    path.0
        .into_iter()
        .enumerate()
        .map(|(index, command)| annotate(command, &mut cursor, &mut start, index == 0))
        .collect()
}

fn annotate(
    mut command: Command,
    cursor: &mut [f64; 2],
    start: &mut [f64; 2],
    first: bool,
) -> PathItem {
    let base = *cursor;
    let leading_move = first && command.is(Kind::Move);
    if command.absolute && !leading_move {
        demote(&mut command, cursor);
    }
    if leading_move {
        // the leading moveto is absolute by definition; its arguments are
        // already absolute because the cursor starts at the origin
        command.absolute = true;
    }
    match command.kind {
        Kind::Close => *cursor = *start,
        Kind::Horizontal => cursor[0] += command.args()[0],
        Kind::Vertical => cursor[1] += command.args()[0],
        Kind::Arc => {
            cursor[0] += command.args()[5];
            cursor[1] += command.args()[6];
        }
        _ => {
            let args = command.args();
            cursor[0] += args[args.len() - 2];
            cursor[1] += args[args.len() - 1];
        }
    }
    if command.is(Kind::Move) {
        *start = *cursor;
    }
    PathItem {
        command,
        base,
        coords: *cursor,
        sdata: None,
    }
}

/// Turns an absolute command into the equivalent relative one.
fn demote(command: &mut Command, cursor: &[f64; 2]) {
    command.absolute = false;
    let kind = command.kind;
    let args = command.args_mut();
    match kind {
        Kind::Close => {}
        Kind::Horizontal => args[0] -= cursor[0],
        Kind::Vertical => args[0] -= cursor[1],
        Kind::Arc => {
            args[5] -= cursor[0];
            args[6] -= cursor[1];
        }
        _ => {
            for (index, value) in args.iter_mut().enumerate() {
                *value -= cursor[index % 2];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::format::FormatOptions;
    use crate::path::Path;

    fn rewrite(input: &str) -> String {
        let items = relative(Path::parse(input).unwrap());
        let commands: Vec<Command> = items.iter().map(|item| item.command).collect();
        Path(commands).stringify(&FormatOptions::default())
    }

    #[test]
    fn test_absolute_commands_become_relative() {
        assert_eq!(
            rewrite("M 10,50 C 20,30 40,50 60,70 C 10,20 30,40 50,60"),
            "M10 50c10-20 30 0 50 20c-50-50-30-30-10-10"
        );
    }

    #[test]
    fn test_leading_lowercase_moveto_is_absolute() {
        assert_eq!(rewrite("m5 5l5 0"), "M5 5l5 0");
    }

    #[test]
    fn test_horizontal_vertical_and_arc() {
        assert_eq!(rewrite("M10 10H30V20A5 5 0 0 1 40 30"), "M10 10h20v10a5 5 0 0 1 10 10");
    }

    #[test]
    fn test_annotations_track_cursor() {
        let items = relative(Path::parse("M10 10 L20 20 H5 Z").unwrap());
        assert_eq!(items[0].base, [0.0, 0.0]);
        assert_eq!(items[0].coords, [10.0, 10.0]);
        assert_eq!(items[1].base, [10.0, 10.0]);
        assert_eq!(items[1].coords, [20.0, 20.0]);
        assert_eq!(items[2].coords, [5.0, 20.0]);
        // closepath returns to the subpath start
        assert_eq!(items[3].base, [5.0, 20.0]);
        assert_eq!(items[3].coords, [10.0, 10.0]);
    }

    #[test]
    fn test_new_subpath_updates_start() {
        let items = relative(Path::parse("M0 0 h10 Z m5 5 h1 Z").unwrap());
        assert_eq!(items[3].base, [0.0, 0.0]);
        assert_eq!(items[3].coords, [5.0, 5.0]);
        assert_eq!(items[5].coords, [5.0, 5.0]);
    }
}
