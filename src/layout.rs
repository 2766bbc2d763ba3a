///
/// @package filet-rs
///
/// @file Layout functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use itertools::Itertools;
use log::debug;
use stdext::function_name;
use crate::display_action::DisplayAction;
use crate::rect::Rect;
use crate::registry::ClientId;
use crate::size_hints;
use crate::state::WindowManagerState;

/// Split a region into equally high rows, the last row takes the remainder
fn split_rows(x: i32, y: i32, width: i32, height: i32, count: usize, rects: &mut Vec<Rect>) {
    let mut used = 0;

    for row in 0..count {
        let share = (height - used) / (count - row) as i32;

        rects.push(Rect { x, y: y + used, width, height: share });

        used += share;
    }
}

/// Compute outer rects for tiled clients on a single monitor
///
/// # Arguments
///
/// * `area` - Usable area of the monitor
/// * `count` - Number of tiled clients
/// * `main_count` - Number of clients in the main area
/// * `main_factor` - Fraction of the width the main area takes when the secondary area is used
///
/// # Returns
///
/// Outer rects in client order, main area first
pub(crate) fn tile(area: Rect, count: usize, main_count: usize, main_factor: f32) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(count);

    if 0 == count {
        return rects;
    }

    let main_count = main_count.max(1);

    let main_width = if count > main_count {
        (area.width as f32 * main_factor) as i32
    } else {
        area.width
    };

    let in_main = count.min(main_count);

    split_rows(area.x, area.y, main_width, area.height, in_main, &mut rects);
    split_rows(area.x + main_width, area.y, area.width - main_width, area.height,
               count - in_main, &mut rects);

    rects
}

/// Apply the constraint step to a client and configure it when something changed
///
/// # Arguments
///
/// * `state` - Global state object
/// * `id` - Client to resize
/// * `candidate` - Requested geometry without border
///
/// # Returns
///
/// Whether the geometry changed
pub(crate) fn resize(state: &mut WindowManagerState, id: ClientId, candidate: Rect) -> bool {
    let Some(client) = state.clients.get(id) else {
        return false;
    };

    let constrained = size_hints::constrain(&client.constraint(), candidate, &state.bounds());

    let Some(client) = state.clients.get_mut(id) else {
        return false;
    };

    if let Some(float_geom) = constrained.floating {
        client.float_geom = float_geom;
    }

    if constrained.geom == client.geom {
        return false;
    }

    client.geom = constrained.geom;

    let action = DisplayAction::Configure {
        win: client.win,
        geom: client.geom,
        border_width: client.border_width,
    };

    state.push(action);

    true
}

/// Hide invisible clients and tile all visible, non-floating ones
///
/// # Arguments
///
/// * `state` - Global state object
pub(crate) fn arrange(state: &mut WindowManagerState) {
    let tagset = state.tagset;

    // Hide and show clients of the current workspace
    let moves: Vec<DisplayAction> = state.clients.iter()
        .map(|(_, client)| DisplayAction::MoveWindow {
            win: client.win,
            x: if client.is_visible(tagset) { client.geom.x } else { client.outer_width() * -2 },
            y: client.geom.y,
        })
        .collect();

    state.actions.extend(moves);

    // Group tiled clients by monitor and keep registry order
    let tiled = state.clients.iter()
        .filter(|(_, client)| client.is_visible(tagset) && !client.is_floating() && !client.is_fullscreen())
        .map(|(id, client)| {
            let outer = client.outer_geom();
            let mon_idx = state.monitors.iter()
                .rposition(|mon| mon.contains_center(&outer))
                .unwrap_or(0);

            (mon_idx, id)
        })
        .into_group_map();

    for (mon_idx, ids) in tiled.into_iter().sorted_by_key(|(mon_idx, _)| *mon_idx) {
        let Some(mon) = state.monitors.get(mon_idx) else {
            continue;
        };

        let area = Rect {
            x: mon.geom.x,
            y: state.work_y(mon),
            width: mon.geom.width,
            height: state.work_height(mon),
        };

        let rects = tile(area, ids.len(), mon.main_count, mon.main_factor);

        for (id, rect) in ids.into_iter().zip(rects) {
            let bw = state.clients.get(id).map_or(0, |client| client.border_width);

            resize(state, id, Rect {
                x: rect.x,
                y: rect.y,
                width: rect.width - 2 * bw,
                height: rect.height - 2 * bw,
            });
        }
    }

    debug!("{}: tagset={:#x}", function_name!(), tagset.bits());
}
