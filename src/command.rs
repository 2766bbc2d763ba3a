///
/// @package filet-rs
///
/// @file Command functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::sync::atomic::Ordering;
use log::debug;
use stdext::function_name;
use strum_macros::Display;
use crate::client::ClientFlags;
use crate::display_action::DisplayAction;
use crate::drag::{self, DragMode};
use crate::layout;
use crate::rect::Rect;
use crate::registry::ClientId;
use crate::stacking::{self, StackAction};
use crate::state::{self, WindowManagerState};
use crate::tagging::Tagging;
use crate::focus;

/// Bindable actions, each carries its single argument
#[derive(Debug, Clone, PartialEq, Display)]
pub(crate) enum Command {
    FocusStack(i32),
    GrabResize(DragMode),
    GrabStack(i32),
    KillClient,
    Pin,
    Quit,
    Spawn(String),
    Tag(Tagging),
    ToggleFloating,
    ToggleFullscreen,
    ToggleTag(Tagging),
    View(Tagging),
    ViewShift(i32),
    ViewTagShift(i32),
    Zoom,
}

/// Run a command against the current state
///
/// # Arguments
///
/// * `state` - Global state object
/// * `command` - Command to run
pub(crate) fn execute(state: &mut WindowManagerState, command: &Command) {
    debug!("{}: command={:?}", function_name!(), command);

    match command {
        Command::FocusStack(delta) => focus_stack(state, *delta),
        Command::GrabResize(mode) => {
            drag::grab_resize(state, *mode);
        }
        Command::GrabStack(delta) => drag::grab_stack(state, *delta),
        Command::KillClient => kill_client(state),
        Command::Pin => stacking::restack(state, state.sel, StackAction::Pin),
        Command::Quit => state.quit.store(true, Ordering::SeqCst),
        Command::Spawn(cmd) => state.push(DisplayAction::Spawn(cmd.clone())),
        Command::Tag(tags) => tag(state, *tags),
        Command::ToggleFloating => toggle_floating(state),
        Command::ToggleFullscreen => toggle_fullscreen(state),
        Command::ToggleTag(tags) => toggle_tag(state, *tags),
        Command::View(tags) => view(state, *tags),
        Command::ViewShift(delta) => view_shift(state, *delta),
        Command::ViewTagShift(delta) => view_tag_shift(state, *delta),
        Command::Zoom => zoom(state),
    }
}

fn focus_stack(state: &mut WindowManagerState, delta: i32) {
    if let Some(next) = focus::neighbour(state, delta) {
        focus::select(state, Some(next));
        stacking::restack(state, Some(next), StackAction::Raise);
    }
}

fn kill_client(state: &mut WindowManagerState) {
    if let Some(win) = state.selected().map(|client| client.win) {
        state.push(DisplayAction::KillWindow(win));
    }
}

fn tag(state: &mut WindowManagerState, tags: Tagging) {
    let tags = tags & state.tag_mask();

    if tags.is_empty() {
        return;
    }

    let Some(client) = state.sel.and_then(|id| state.clients.get_mut(id)) else {
        return;
    };

    client.tags = tags;

    state::commit(state);
}

fn toggle_tag(state: &mut WindowManagerState, tags: Tagging) {
    let mask = state.tag_mask();

    let Some(client) = state.sel.and_then(|id| state.clients.get_mut(id)) else {
        return;
    };

    let toggled = client.tags ^ (tags & mask);

    // Keep the client on at least one workspace
    if toggled.is_empty() {
        return;
    }

    client.tags = toggled;

    state::commit(state);
}

fn toggle_floating(state: &mut WindowManagerState) {
    let Some(id) = state.sel else {
        return;
    };

    if state.client(id).is_some_and(|client| client.is_fullscreen()) {
        set_fullscreen(state, id, false);
    }

    let Some(client) = state.clients.get_mut(id) else {
        return;
    };

    client.flags.toggle(ClientFlags::MODE_FLOAT);

    if client.is_floating() {
        let float_geom = client.float_geom;

        layout::resize(state, id, float_geom);
    }

    state::commit(state);
}

fn toggle_fullscreen(state: &mut WindowManagerState) {
    if let Some((id, fullscreen)) = state.sel
        .and_then(|id| state.client(id).map(|client| (id, client.is_fullscreen())))
    {
        set_fullscreen(state, id, !fullscreen);
    }
}

fn view(state: &mut WindowManagerState, tags: Tagging) {
    let tags = tags & state.tag_mask();

    // An empty view would hide everything
    if tags.is_empty() {
        return;
    }

    state.tagset = tags;

    state::commit(state);
}

fn view_shift(state: &mut WindowManagerState, delta: i32) {
    state.tagset = state.tagset.rotate(delta, state.settings.workspaces.len());

    state::commit(state);
}

fn view_tag_shift(state: &mut WindowManagerState, delta: i32) {
    let len = state.settings.workspaces.len();

    if let Some(client) = state.sel.and_then(|id| state.clients.get_mut(id)) {
        let rotated = client.tags.rotate(delta, len);

        if !rotated.is_empty() {
            client.tags = rotated;
        }
    }

    view_shift(state, delta);
}

fn zoom(state: &mut WindowManagerState) {
    stacking::restack(state, state.sel, StackAction::Zoom);

    // Zooming tiled windows can rearrange tiling
    state::commit(state);
}

/// Find the area a fullscreen client spans
///
/// The area starts at the monitor containing the top left corner and extends to the
/// monitor containing the bottom right corner, if that one lies further right and down.
///
/// # Arguments
///
/// * `state` - Global state object
/// * `outer` - Outer geometry of the client
///
/// # Returns
///
/// Spanned area, the whole screen when there are no monitors
pub(crate) fn fullscreen_area(state: &WindowManagerState, outer: Rect) -> Rect {
    let monitors = &state.monitors;

    let Some(last) = monitors.len().checked_sub(1) else {
        return Rect { x: 0, y: 0, width: state.screen_width, height: state.screen_height };
    };

    let m1 = (1..=last).rev()
        .find(|idx| monitors[*idx].geom.contains_point(outer.x, outer.y))
        .unwrap_or(0);

    let first = &monitors[m1].geom;

    let second = monitors.iter()
        .map(|mon| &mon.geom)
        .find(|geom| geom.contains_point(outer.right(), outer.bottom()))
        .filter(|geom| geom.right() > first.x && geom.bottom() > first.y)
        .unwrap_or(first);

    Rect {
        x: first.x,
        y: first.y,
        width: second.x - first.x + second.width,
        height: second.y - first.y + second.height,
    }
}

/// Resize and make sure a changed border width reaches the window
fn apply_geometry(state: &mut WindowManagerState, id: ClientId, candidate: Rect) {
    if layout::resize(state, id, candidate) {
        return;
    }

    if let Some(client) = state.client(id) {
        let action = DisplayAction::Configure {
            win: client.win,
            geom: client.geom,
            border_width: client.border_width,
        };

        state.push(action);
    }
}

/// Enter or leave fullscreen mode
///
/// # Arguments
///
/// * `state` - Global state object
/// * `id` - Client to change
/// * `fullscreen` - Whether the client should be fullscreen
pub(crate) fn set_fullscreen(state: &mut WindowManagerState, id: ClientId, fullscreen: bool) {
    let Some(client) = state.clients.get(id) else {
        return;
    };

    if client.is_fullscreen() == fullscreen {
        return;
    }

    let win = client.win;
    let outer = client.outer_geom();

    // Dragging stops being possible
    drag::cancel_for(state, id);

    if fullscreen {
        let area = fullscreen_area(state, outer);

        let Some(client) = state.clients.get_mut(id) else {
            return;
        };

        let was_floating = client.is_floating();

        client.flags.set(ClientFlags::FULL_FLOAT, was_floating);
        client.flags.insert(ClientFlags::MODE_FULL | ClientFlags::MODE_FLOAT);
        client.full_border_width = client.border_width;
        client.border_width = 0;

        apply_geometry(state, id, area);
        stacking::restack(state, Some(id), StackAction::Zoom);
    } else {
        let Some(client) = state.clients.get_mut(id) else {
            return;
        };

        let was_floating = client.flags.contains(ClientFlags::FULL_FLOAT);

        client.flags.remove(ClientFlags::MODE_FULL | ClientFlags::FULL_FLOAT);
        client.flags.set(ClientFlags::MODE_FLOAT, was_floating);
        client.border_width = client.full_border_width;

        let float_geom = client.float_geom;

        apply_geometry(state, id, float_geom);
    }

    state.push(DisplayAction::SetFullscreenState { win, fullscreen });

    debug!("{}: id={}, fullscreen={}", function_name!(), id, fullscreen);

    state::commit(state);
}
