// this_file: pathmin/src/path/convert/filter.rs

//! The filter pass: one forward sweep over the annotated command list,
//! rewriting each command against its predecessor.
//!
//! Dropped commands leave a `None` slot behind instead of shifting the
//! list, so bounded lookahead (the arc extension) can keep stable indices;
//! the slots are compacted once at the end.

use super::{arc, Options, Precision};
use crate::path::command::{Command, Kind, PathItem};
use crate::path::format;
use crate::path::geometry::{self, sagitta};
use crate::style::StyleInfo;

/// Mutable pipeline state carried across commands.
pub(super) struct State {
    /// Running rounded relative cursor. Diverges from the exact `coords`
    /// by the accumulated rounding error.
    pub rel_subpoint: [f64; 2],
    /// Rounded start of the current subpath.
    pub path_base: [f64; 2],
    /// Implicit quadratic control point carried across `q`/`t` chains,
    /// in absolute coordinates.
    pub prev_q_control: Option<[f64; 2]>,
    pub error: f64,
}

pub fn filter(items: Vec<PathItem>, options: &Options, info: &StyleInfo) -> Vec<PathItem> {
    let mut state = State {
        rel_subpoint: [0.0; 2],
        path_base: [0.0; 2],
        prev_q_control: None,
        error: options.error(),
    };
    let mut slots: Vec<Option<PathItem>> = items.into_iter().map(Some).collect();

    for index in 0..slots.len() {
        let Some((mut prev, item_slot, next_slots)) = split_slots(&mut slots, index) else {
            continue;
        };

        // closepath: resets the rounded cursor; redundant ones go away
        if item_slot
            .as_ref()
            .is_some_and(|item| item.command.is(Kind::Close))
        {
            state.rel_subpoint = state.path_base;
            state.prev_q_control = None;
            let item = item_slot.as_ref().expect("checked above");
            let after_close = prev
                .as_deref()
                .is_some_and(|prev| prev.command.is(Kind::Close));
            let closes_nothing = info.is_safe_to_use_z
                && (item.base[0] - item.coords[0]).abs() < state.error / 10.0
                && (item.base[1] - item.coords[1]).abs() < state.error / 10.0;
            if after_close || closes_nothing {
                *item_slot = None;
            }
            continue;
        }

        // a) arcs hidden in cubic curves
        let item = item_slot.as_mut().expect("slot was checked by split_slots");
        let smooth_data = smooth_cubic_args(prev.as_deref(), item);
        if let (Some(make_arcs), Some(curve)) = (options.make_arcs.as_ref(), smooth_data) {
            arc::convert(
                prev.as_deref_mut(),
                item_slot,
                next_slots,
                make_arcs,
                options,
                &mut state,
                &curve,
            );
            if item_slot.is_none() {
                continue;
            }
        }
        let item = item_slot.as_mut().expect("arc conversion kept the slot");

        // b) rounding with error compensation
        round_with_compensation(item, options, &mut state);

        // c) smart arc radius rounding
        let arc_sagitta = if item.command.is(Kind::Arc) {
            sagitta(item.command.args())
        } else {
            None
        };
        if options.smart_arc_rounding {
            round_arc_radius(item, arc_sagitta, options, &state);
        }

        // d) curves that are straight lines
        if options.straight_curves {
            straight_curve_to_line(prev.as_deref(), item, next_slots, &smooth_data, arc_sagitta, &state);
        }

        // e) cubic curves that degenerate to quadratic ones
        if options.convert_to_q {
            cubic_to_quadratic(item, next_slots, options, &state);
        }

        // f) axis-aligned lines
        if options.line_shorthands && item.command.is(Kind::Line) {
            let args = item.command.args();
            if args[1] == 0.0 {
                let dx = args[0];
                item.command.morph(Kind::Horizontal, &[dx]);
            } else if args[0] == 0.0 {
                let dy = args[1];
                item.command.morph(Kind::Vertical, &[dy]);
            }
        }

        // g) repeated commands fold into their predecessor
        if options.collapse_repeated
            && !info.has_marker_mid
            && collapse_repeated(prev.as_deref_mut(), item)
        {
            *item_slot = None;
            state.prev_q_control = None;
            continue;
        }

        // h) smooth shorthands
        if options.curve_smooth_shorthands {
            if let Some(prev) = prev.as_deref() {
                smooth_shorthands(prev, item, &state);
            }
        }

        // i) segments that draw nothing
        if options.remove_useless && !info.maybe_has_stroke_and_linecap() {
            let args = item.command.args();
            let useless = match item.command.kind {
                Kind::Line
                | Kind::Horizontal
                | Kind::Vertical
                | Kind::Quadratic
                | Kind::SmoothQuadratic
                | Kind::Cubic
                | Kind::Smooth => args.iter().all(|&value| value == 0.0),
                Kind::Arc => args[5] == 0.0 && args[6] == 0.0,
                _ => false,
            };
            if useless {
                *item_slot = None;
                continue;
            }
        }

        // j) a trailing line back home becomes a closepath
        if options.convert_to_z
            && matches!(
                item.command.kind,
                Kind::Line | Kind::Horizontal | Kind::Vertical
            )
        {
            let next_closes = next_slots
                .first()
                .and_then(|slot| slot.as_ref())
                .is_some_and(|next| next.command.is(Kind::Close));
            if (info.is_safe_to_use_z || next_closes)
                && (state.path_base[0] - item.coords[0]).abs() < state.error
                && (state.path_base[1] - item.coords[1]).abs() < state.error
            {
                item.command = Command::close();
            }
        }

        // k) carry the implicit quadratic control point forward
        state.prev_q_control = match item.command.kind {
            Kind::Quadratic => {
                let args = item.command.args();
                Some([args[0] + item.base[0], args[1] + item.base[1]])
            }
            Kind::SmoothQuadratic => Some(match state.prev_q_control {
                Some(control) => geometry::reflect(control, item.base),
                None => item.coords,
            }),
            _ => None,
        };
    }

    slots.into_iter().flatten().collect()
}

/// Splits the slot list at `index` into the last kept predecessor, the
/// current slot and the tail. `None` when the current slot is empty.
fn split_slots(
    slots: &mut [Option<PathItem>],
    index: usize,
) -> Option<(
    Option<&mut PathItem>,
    &mut Option<PathItem>,
    &mut [Option<PathItem>],
)> {
    let (before, after) = slots.split_at_mut(index);
    let (item_slot, next_slots) = after.split_first_mut()?;
    item_slot.as_ref()?;
    let prev = before.iter_mut().rev().find_map(|slot| slot.as_mut());
    Some((prev, item_slot, next_slots))
}

/// The cubic-form coordinates of a `c` or `s` command; for a shorthand the
/// first control point mirrors the predecessor's last one.
fn smooth_cubic_args(prev: Option<&PathItem>, item: &PathItem) -> Option<[f64; 6]> {
    match item.command.kind {
        Kind::Cubic => {
            let args = item.command.args();
            Some([args[0], args[1], args[2], args[3], args[4], args[5]])
        }
        Kind::Smooth => {
            let args = item.command.args();
            let mut curve = [0.0, 0.0, args[0], args[1], args[2], args[3]];
            if let Some(prev) = prev {
                if matches!(prev.command.kind, Kind::Cubic | Kind::Smooth) {
                    let prev_args = prev.command.args();
                    let n = prev_args.len();
                    curve[0] = prev_args[n - 2] - prev_args[n - 4];
                    curve[1] = prev_args[n - 1] - prev_args[n - 3];
                }
            }
            Some(curve)
        }
        _ => None,
    }
}

/// Biases relative arguments by the drift between the exact base point and
/// the rounded running cursor, so that rounded deltas keep summing to the
/// rounded absolute position.
fn round_with_compensation(item: &mut PathItem, options: &Options, state: &mut State) {
    let rounding = !matches!(options.precision, Precision::Disabled);
    let kind = item.command.kind;
    if rounding {
        if !item.command.absolute {
            let bias = [
                item.base[0] - state.rel_subpoint[0],
                item.base[1] - state.rel_subpoint[1],
            ];
            let args = item.command.args_mut();
            match kind {
                Kind::Horizontal => args[0] += bias[0],
                Kind::Vertical => args[0] += bias[1],
                Kind::Arc => {
                    args[5] += bias[0];
                    args[6] += bias[1];
                }
                Kind::Close => {}
                _ => {
                    for (index, value) in args.iter_mut().enumerate() {
                        *value += bias[index % 2];
                    }
                }
            }
        }
        options.round_data(item.command.args_mut());
    }
    let args = item.command.args();
    match kind {
        Kind::Horizontal => state.rel_subpoint[0] += args[0],
        Kind::Vertical => state.rel_subpoint[1] += args[0],
        Kind::Close => {}
        _ => {
            state.rel_subpoint[0] += args[args.len() - 2];
            state.rel_subpoint[1] += args[args.len() - 1];
        }
    }
    if rounding {
        options.round_data(&mut state.rel_subpoint);
    }
    if kind == Kind::Move {
        state.path_base = state.rel_subpoint;
    }
}

/// Drops radius digits while the sagitta stays within the error tolerance.
fn round_arc_radius(
    item: &mut PathItem,
    arc_sagitta: Option<f64>,
    options: &Options,
    state: &State,
) {
    let (Some(reference), Precision::Enabled(digits)) = (arc_sagitta, options.precision) else {
        return;
    };
    if digits <= 0 {
        return;
    }
    let mut digits = digits;
    while digits >= 0 {
        let radius = format::to_fixed(item.command.args()[0], digits);
        let mut candidate: [f64; 7] = [0.0; 7];
        candidate.copy_from_slice(item.command.args());
        candidate[0] = radius;
        candidate[1] = radius;
        match sagitta(&candidate) {
            Some(coarse) if (reference - coarse).abs() < state.error => {
                let args = item.command.args_mut();
                args[0] = radius;
                args[1] = radius;
            }
            _ => break,
        }
        digits -= 1;
    }
}

/// Replaces curves that draw a straight line with line commands.
fn straight_curve_to_line(
    prev: Option<&PathItem>,
    item: &mut PathItem,
    next_slots: &mut [Option<PathItem>],
    smooth_data: &Option<[f64; 6]>,
    arc_sagitta: Option<f64>,
    state: &State,
) {
    let error = state.error;
    match item.command.kind {
        Kind::Cubic if geometry::is_curve_straight(item.command.args(), error) => {
            let args = item.command.args();
            let end = [args[4], args[5]];
            let control_data: Vec<f64> = args.to_vec();
            expand_next_shorthand(next_slots, Kind::Smooth, &control_data);
            item.command.morph(Kind::Line, &end);
        }
        Kind::Smooth
            if smooth_data
                .as_ref()
                .is_some_and(|curve| geometry::is_curve_straight(curve, error)) =>
        {
            let args = item.command.args();
            let end = [args[2], args[3]];
            let control_data: Vec<f64> = args.to_vec();
            expand_next_shorthand(next_slots, Kind::Smooth, &control_data);
            item.command.morph(Kind::Line, &end);
        }
        Kind::Quadratic if geometry::is_curve_straight(item.command.args(), error) => {
            let args = item.command.args();
            let end = [args[2], args[3]];
            let control_data: Vec<f64> = args.to_vec();
            expand_next_shorthand(next_slots, Kind::SmoothQuadratic, &control_data);
            item.command.morph(Kind::Line, &end);
        }
        Kind::SmoothQuadratic => {
            let follows_quadratic = prev.is_some_and(|prev| {
                matches!(
                    prev.command.kind,
                    Kind::Quadratic | Kind::SmoothQuadratic
                )
            });
            if !follows_quadratic {
                let args = item.command.args();
                let end = [args[0], args[1]];
                item.command.morph(Kind::Line, &end);
            }
        }
        Kind::Arc => {
            let args = item.command.args();
            if args[0] == 0.0
                || args[1] == 0.0
                || arc_sagitta.is_some_and(|value| value < error)
            {
                let end = [args[5], args[6]];
                item.command.morph(Kind::Line, &end);
            }
        }
        _ => {}
    }
}

/// Expands a following `s`/`t` shorthand of the given kind to its longhand
/// before the command it reflects against changes shape.
fn expand_next_shorthand(next_slots: &mut [Option<PathItem>], kind: Kind, data: &[f64]) {
    let Some(next) = next_slots.first_mut().and_then(|slot| slot.as_mut()) else {
        return;
    };
    if next.command.kind == kind {
        next.command.into_longhand(data);
    }
}

/// Lowers a cubic to the quadratic it degenerates to, when both inferred
/// control points agree and the result serializes shorter.
fn cubic_to_quadratic(
    item: &mut PathItem,
    next_slots: &mut [Option<PathItem>],
    options: &Options,
    state: &State,
) {
    if !item.command.is(Kind::Cubic) {
        return;
    }
    let base = item.base;
    let args: Vec<f64> = item.command.args().to_vec();
    let x1 = 0.75 * (base[0] + args[0]) - 0.25 * base[0];
    let x2 = 0.75 * (base[0] + args[2]) - 0.25 * (base[0] + args[4]);
    if (x1 - x2).abs() >= state.error * 2.0 {
        return;
    }
    let y1 = 0.75 * (base[1] + args[1]) - 0.25 * base[1];
    let y2 = 0.75 * (base[1] + args[3]) - 0.25 * (base[1] + args[5]);
    if (y1 - y2).abs() >= state.error * 2.0 {
        return;
    }
    let mut quadratic = [x1 + x2 - base[0], y1 + y2 - base[1], args[4], args[5]];
    options.round_data(&mut quadratic);
    let shorter = format::format_args(Kind::Quadratic, &quadratic, &options.format).len()
        < format::format_args(Kind::Cubic, &args, &options.format).len();
    if shorter {
        expand_next_shorthand(next_slots, Kind::Smooth, &args);
        item.command.morph(Kind::Quadratic, &quadratic);
    }
}

/// Merges a repeated `m`/`h`/`v` into its predecessor. For `h`/`v` the
/// deltas must point the same way.
fn collapse_repeated(prev: Option<&mut PathItem>, item: &PathItem) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if !matches!(
        item.command.kind,
        Kind::Move | Kind::Horizontal | Kind::Vertical
    ) {
        return false;
    }
    if prev.command.kind != item.command.kind {
        return false;
    }
    let data = item.command.args();
    if matches!(item.command.kind, Kind::Horizontal | Kind::Vertical)
        && (prev.command.args()[0] >= 0.0) != (data[0] >= 0.0)
    {
        return false;
    }
    let delta_y = if item.command.is(Kind::Move) {
        Some(data[1])
    } else {
        None
    };
    let delta_x = data[0];
    let prev_args = prev.command.args_mut();
    prev_args[0] += delta_x;
    if let Some(delta_y) = delta_y {
        prev_args[1] += delta_y;
    }
    prev.coords = item.coords;
    true
}

/// Replaces an explicit control point with the smooth shorthand when it
/// mirrors the predecessor's.
fn smooth_shorthands(prev: &PathItem, item: &mut PathItem, state: &State) {
    let error = state.error;
    match item.command.kind {
        Kind::Cubic => {
            let data: Vec<f64> = item.command.args().to_vec();
            let mirrors = match prev.command.kind {
                Kind::Cubic => {
                    let p = prev.command.args();
                    (data[0] + p[2] - p[4]).abs() < error && (data[1] + p[3] - p[5]).abs() < error
                }
                Kind::Smooth => {
                    let p = prev.command.args();
                    (data[0] + p[0] - p[2]).abs() < error && (data[1] + p[1] - p[3]).abs() < error
                }
                _ => data[0].abs() < error && data[1].abs() < error,
            };
            if mirrors {
                item.command
                    .morph(Kind::Smooth, &[data[2], data[3], data[4], data[5]]);
            }
        }
        Kind::Quadratic => {
            let data: Vec<f64> = item.command.args().to_vec();
            match prev.command.kind {
                Kind::Quadratic => {
                    let p = prev.command.args();
                    if (data[0] - (p[2] - p[0])).abs() < error
                        && (data[1] - (p[3] - p[1])).abs() < error
                    {
                        item.command
                            .morph(Kind::SmoothQuadratic, &[data[2], data[3]]);
                    }
                }
                Kind::SmoothQuadratic => {
                    let Some(control) = state.prev_q_control else {
                        return;
                    };
                    let predicted = geometry::reflect(control, item.base);
                    let real = [data[0] + item.base[0], data[1] + item.base[1]];
                    if (predicted[0] - real[0]).abs() < error
                        && (predicted[1] - real[1]).abs() < error
                    {
                        item.command
                            .morph(Kind::SmoothQuadratic, &[data[2], data[3]]);
                    }
                }
                _ => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::convert::{relative, Options};
    use crate::path::format::FormatOptions;
    use crate::path::Path;
    use crate::style::StyleInfo;

    fn run_filter(input: &str, options: &Options, info: &StyleInfo) -> String {
        let items = filter(relative(Path::parse(input).unwrap()), options, info);
        let commands: Vec<Command> = items.iter().map(|item| item.command).collect();
        Path(commands).stringify(&FormatOptions::default())
    }

    fn unstyled(input: &str) -> String {
        run_filter(input, &Options::default(), &StyleInfo::unstyled())
    }

    #[test]
    fn test_rounding_compensates_accumulated_error() {
        let options = Options {
            precision: Precision::Enabled(1),
            ..Options::default()
        };
        // without compensation every delta would round to .3 and the end
        // point would drift to (1.2, 10)
        assert_eq!(
            run_filter(
                "M0 0l.25 3 .25 2 .25 3 .25 2",
                &options,
                &StyleInfo::unstyled()
            ),
            "M0 0l.3 3l.2 2l.3 3l.2 2"
        );
    }

    #[test]
    fn test_line_shorthands() {
        assert_eq!(unstyled("M0 0 L10 0 L10 10"), "M0 0h10v10");
    }

    #[test]
    fn test_collapse_repeated_horizontal() {
        assert_eq!(unstyled("M0 0 h5 h10"), "M0 0h15");
        // opposite directions draw back over the stroke, keep them apart
        assert_eq!(unstyled("M0 0 h5 h-10"), "M0 0h5h-10");
    }

    #[test]
    fn test_collapse_repeated_moveto() {
        assert_eq!(unstyled("M10 10 m5 5 m5 5 l1 1"), "M20 20l1 1");
    }

    #[test]
    fn test_zero_segments_removed() {
        assert_eq!(unstyled("M0 0 L0.0001 0.0001 L10 10"), "M0 0l10 10");
        assert_eq!(unstyled("M0 0 h5 v0 l0 0 h3"), "M0 0h8");
    }

    #[test]
    fn test_zero_segments_kept_with_stroke_linecap() {
        let info = StyleInfo {
            maybe_has_stroke: true,
            maybe_has_linecap: true,
            ..StyleInfo::unstyled()
        };
        assert_eq!(
            run_filter("M0 0 l5 5 l0 0", &Options::default(), &info),
            "M0 0l5 5h0"
        );
        assert_eq!(unstyled("M0 0 l5 5 l0 0"), "M0 0l5 5");
    }

    #[test]
    fn test_straight_cubic_becomes_line() {
        assert_eq!(unstyled("M0 0 C1 1 2 2 10 10"), "M0 0l10 10");
        assert_eq!(unstyled("M0 0 Q5 5 10 10"), "M0 0l10 10");
    }

    #[test]
    fn test_lone_smooth_quadratic_becomes_line() {
        assert_eq!(unstyled("M0 0 T10 10"), "M0 0l10 10");
    }

    #[test]
    fn test_degenerate_arc_becomes_line() {
        assert_eq!(unstyled("M0 0 A0 5 0 0 1 10 10"), "M0 0l10 10");
    }

    #[test]
    fn test_cubic_to_quadratic() {
        assert_eq!(unstyled("M0 0 C4 0 8 4 12 12"), "M0 0q6 0 12 12");
    }

    #[test]
    fn test_smooth_cubic_shorthand() {
        assert_eq!(
            unstyled("M0 0 C5 0 10 5 10 10 C10 15 5 20 0 20"),
            "M0 0c5 0 10 5 10 10s-5 10-10 10"
        );
    }

    #[test]
    fn test_smooth_quadratic_shorthand() {
        assert_eq!(
            unstyled("M0 0 Q5 10 10 10 Q15 10 20 20"),
            "M0 0q5 10 10 10t10 10"
        );
    }

    #[test]
    fn test_convert_to_z() {
        assert_eq!(
            unstyled("M0 0 L50 0 L50 50 L0 50 L0 0"),
            "M0 0h50v50h-50z"
        );
    }

    #[test]
    fn test_convert_to_z_requires_safety() {
        let info = StyleInfo {
            maybe_has_stroke: true,
            is_safe_to_use_z: false,
            ..StyleInfo::unstyled()
        };
        assert_eq!(
            run_filter("M0 0 h50 v50 h-50 v-50", &Options::default(), &info),
            "M0 0h50v50h-50v-50"
        );
    }

    #[test]
    fn test_duplicate_closepath_removed() {
        assert_eq!(unstyled("M0 0 h10 v10 z z"), "M0 0h10v10z");
    }

    #[test]
    fn test_single_cubic_becomes_arc() {
        assert_eq!(
            unstyled("M0 0 C0 2.762 2.239 5 5 5"),
            "M0 0a5 5 0 0 0 5 5"
        );
    }

    #[test]
    fn test_two_cubics_become_one_arc() {
        assert_eq!(
            unstyled("M0 0C0 1.326.527 2.598 1.464 3.536C2.402 4.473 3.674 5 5 5"),
            "M0 0a5 5 0 0 0 5 5"
        );
    }

    #[test]
    fn test_arc_rejects_a_loose_curve() {
        // control points nowhere near a circle through the end point
        assert_eq!(unstyled("M0 0 C0 2 2 10 10 10"), "M0 0c0 2 2 10 10 10");
    }

    #[test]
    fn test_make_arcs_disabled() {
        let options = Options {
            make_arcs: None,
            ..Options::default()
        };
        assert_eq!(
            run_filter("M0 0 C0 2.762 2.239 5 5 5", &options, &StyleInfo::unstyled()),
            "M0 0c0 2.762 2.239 5 5 5"
        );
    }

    #[test]
    fn test_smart_arc_rounding() {
        let options = Options {
            precision: Precision::Enabled(3),
            ..Options::default()
        };
        // 5.0002 rounds through 5 without moving the sagitta past the error
        assert_eq!(
            run_filter(
                "M0 0 a5.0002 5.0002 0 0 1 4 0",
                &options,
                &StyleInfo::unstyled()
            ),
            "M0 0a5 5 0 0 1 4 0"
        );
    }
}
