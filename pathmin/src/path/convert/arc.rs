// this_file: pathmin/src/path/convert/arc.rs

//! Detection of circular arcs hidden in runs of cubic curves.
//!
//! A convex cubic that fits a circle becomes an `a` command. The candidate
//! arc then tries to absorb the previous segment and as many following
//! `c`/`s` segments as keep fitting the same circle, accumulating the
//! subtended angle to decide the large-arc flag and to split full circles
//! into two half-arcs. The rewrite is kept only when the serialized arcs
//! are shorter than the serialized curves they replace.

use super::filter::State;
use super::Options;
use crate::path::command::{Command, Kind, PathItem};
use crate::path::geometry::{self, Circle, MakeArcs};
use std::f64::consts::PI;

#[allow(clippy::too_many_arguments)]
pub(super) fn convert(
    mut prev: Option<&mut PathItem>,
    item_slot: &mut Option<PathItem>,
    next_slots: &mut [Option<PathItem>],
    make_arcs: &MakeArcs,
    options: &Options,
    state: &mut State,
    curve: &[f64; 6],
) {
    let item = item_slot
        .as_mut()
        .expect("caller hands over a filled slot");
    if !geometry::is_convex(curve) {
        return;
    }
    let Some(circle) = geometry::find_circle(curve, make_arcs, state.error) else {
        return;
    };
    let radius = options.round(circle.radius);
    let sweep = f64::from(curve[5] * curve[0] - curve[4] * curve[1] > 0.0);
    let mut angle = geometry::arc_angle(curve, &circle);

    let mut output = vec![PathItem {
        command: Command::new(
            Kind::Arc,
            false,
            &[radius, radius, 0.0, 0.0, sweep, curve[4], curve[5]],
        ),
        base: item.base,
        coords: item.coords,
        sdata: None,
    }];
    let mut arc_curves: Vec<Command> = vec![item.command];
    let mut rel_center = [circle.center[0] - curve[4], circle.center[1] - curve[5]];
    let mut has_prev = false;
    let mut suffix_len = 0usize;

    // try to extend backwards over the previous segment
    let prev_curve: Option<[f64; 6]> = prev.as_deref().and_then(|prev| match prev.command.kind {
        Kind::Cubic => Some(six(prev.command.args())),
        Kind::Arc => prev.sdata,
        _ => None,
    });
    if let Some(prev_data) = prev_curve {
        let prev_item = prev.as_deref().expect("prev_curve implies a previous item");
        if geometry::is_convex(&prev_data)
            && geometry::is_arc_prev(&prev_data, &circle, make_arcs, state.error)
        {
            arc_curves.insert(0, prev_item.command);
            let arc = &mut output[0];
            arc.base = prev_item.base;
            let delta = [arc.coords[0] - arc.base[0], arc.coords[1] - arc.base[1]];
            arc.command.args_mut()[5] = delta[0];
            arc.command.args_mut()[6] = delta[1];
            let prev_circle = Circle {
                center: [
                    prev_data[4] + circle.center[0],
                    prev_data[5] + circle.center[1],
                ],
                radius: circle.radius,
            };
            angle += geometry::arc_angle(&prev_data, &prev_circle);
            if angle > PI {
                arc.command.args_mut()[3] = 1.0;
            }
            has_prev = true;
        }
    }

    // walk following curves while they stay on the circle
    let mut consumed = 0usize;
    let mut last_args: Vec<f64> = item.command.args().to_vec();
    while let Some(next) = next_slots.get(consumed).and_then(|slot| slot.as_ref()) {
        let next_data: [f64; 6] = match next.command.kind {
            Kind::Cubic => six(next.command.args()),
            Kind::Smooth => {
                let args = next.command.args();
                let n = last_args.len();
                let data = [
                    last_args[n - 2] - last_args[n - 4],
                    last_args[n - 1] - last_args[n - 3],
                    args[0],
                    args[1],
                    args[2],
                    args[3],
                ];
                // an s that outlives the consumed run grows two arguments
                suffix_len = options
                    .serialized(&[Command::new(Kind::Line, false, &data[..2])])
                    .len();
                data
            }
            _ => break,
        };
        let rel_circle = Circle {
            center: rel_center,
            radius: circle.radius,
        };
        if !geometry::is_convex(&next_data)
            || !geometry::is_arc(&next_data, &rel_circle, make_arcs, state.error)
        {
            break;
        }
        angle += geometry::arc_angle(&next_data, &rel_circle);
        if angle - 2.0 * PI > 1e-3 {
            break;
        }
        if angle > PI {
            let arc = output.last_mut().expect("output always holds an arc");
            arc.command.args_mut()[3] = 1.0;
        }
        arc_curves.push(next.command);
        last_args = next.command.args().to_vec();
        if 2.0 * PI - angle > 1e-3 {
            let arc = output.last_mut().expect("output always holds an arc");
            arc.coords = next.coords;
            let delta = [arc.coords[0] - arc.base[0], arc.coords[1] - arc.base[1]];
            arc.command.args_mut()[5] = delta[0];
            arc.command.args_mut()[6] = delta[1];
            rel_center[0] -= next_data[4];
            rel_center[1] -= next_data[5];
        } else {
            // a full circle cannot be a single arc; emit two half-arcs
            let (half_end, run_end) = {
                let arc = output.last_mut().expect("output always holds an arc");
                let dx = 2.0 * (rel_center[0] - next_data[4]);
                let dy = 2.0 * (rel_center[1] - next_data[5]);
                arc.command.args_mut()[5] = dx;
                arc.command.args_mut()[6] = dy;
                arc.coords = [arc.base[0] + dx, arc.base[1] + dy];
                (arc.coords, next.coords)
            };
            output.push(PathItem {
                command: Command::new(
                    Kind::Arc,
                    false,
                    &[
                        radius,
                        radius,
                        0.0,
                        0.0,
                        sweep,
                        run_end[0] - half_end[0],
                        run_end[1] - half_end[1],
                    ],
                ),
                base: half_end,
                coords: run_end,
                sdata: None,
            });
            consumed += 1;
            break;
        }
        consumed += 1;
    }

    // keep the arcs only when they serialize shorter than the curves
    let output_commands: Vec<Command> = output.iter().map(|p| p.command).collect();
    if options.serialized(&output_commands).len() + suffix_len
        >= options.serialized(&arc_curves).len()
    {
        return;
    }

    // the first survivor may be an s that reflected off a consumed curve
    if let Some(follow) = next_slots.get_mut(consumed).and_then(|slot| slot.as_mut()) {
        if follow.command.is(Kind::Smooth) {
            follow.command.into_longhand(&last_args);
        }
    }

    if has_prev {
        let prev = prev.as_deref_mut().expect("has_prev implies a previous item");
        let mut prev_arc = output.remove(0);
        options.round_data(prev_arc.command.args_mut());
        let old_args = prev.command.args();
        let n = old_args.len();
        // the previous segment was already committed under the rounded
        // cursor; shift the cursor by the replacement's end point drift
        state.rel_subpoint[0] += prev_arc.command.args()[5] - old_args[n - 2];
        state.rel_subpoint[1] += prev_arc.command.args()[6] - old_args[n - 1];
        prev.command = prev_arc.command;
        prev.coords = prev_arc.coords;
        prev.sdata = None;
        item.base = prev_arc.coords;
    }

    let replacement = if output.is_empty() {
        None
    } else {
        Some(output.remove(0))
    };
    if arc_curves.len() == 1 {
        item.sdata = Some(*curve);
    } else {
        let removable = arc_curves.len() - 1 - usize::from(has_prev);
        for index in 0..removable {
            next_slots[index] = output.get(index).copied();
        }
    }
    match replacement {
        Some(arc) => {
            item.command = arc.command;
            item.coords = arc.coords;
        }
        None => *item_slot = None,
    }
}

fn six(args: &[f64]) -> [f64; 6] {
    [args[0], args[1], args[2], args[3], args[4], args[5]]
}
