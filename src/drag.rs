///
/// @package filet-rs
///
/// @file Drag functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use easy_min_max::max;
use log::debug;
use stdext::function_name;
use strum_macros::Display;
use crate::display_action::DisplayAction;
use crate::{focus, layout};
use crate::monitor::{MAX_MAIN_FACTOR, MIN_MAIN_FACTOR};
use crate::rect::Rect;
use crate::registry::ClientId;
use crate::stacking::{self, StackAction};
use crate::state::{self, WindowManagerState};

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Display)]
pub(crate) enum DragMode {
    #[default]
    Idle,
    /// Move a floating client
    Move,
    /// Resize a floating client
    Resize,
    /// Resize a tiled client to change the layout parameters of its monitor
    TileAdjust,
    /// Pointer rests on a border, a click starts moving or resizing
    EdgeProbe,
    /// Alt-Tab style cycling through the visible clients
    StackCycle,
}

impl DragMode {
    /// Whether pointer motion changes the geometry of the dragged client
    pub(crate) fn is_dragging(self) -> bool {
        matches!(self, DragMode::Move | DragMode::Resize | DragMode::TileAdjust)
    }
}

/// Ephemeral state between grab and release
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct DragSession {
    pub(crate) mode: DragMode,
    pub(crate) client: Option<ClientId>,
    /// Pointer position when the session started
    pub(crate) origin: (i32, i32),
    /// Geometry of the client when the session started
    pub(crate) start: Rect,
}

/// Start moving, resizing or probing the selected client
///
/// # Arguments
///
/// * `state` - Global state object
/// * `mode` - Requested mode, resizing a tiled client turns into [`DragMode::TileAdjust`]
///
/// # Returns
///
/// Whether a new session was started
pub(crate) fn grab_resize(state: &mut WindowManagerState, mode: DragMode) -> bool {
    if state.drag.mode == mode || matches!(mode, DragMode::Idle | DragMode::StackCycle | DragMode::TileAdjust) {
        return false;
    }

    let Some(id) = state.sel else {
        return false;
    };

    let Some(client) = state.client(id) else {
        return false;
    };

    // No support for moving fullscreen or tiled windows
    if client.is_fullscreen() || (DragMode::Move == mode && !client.is_floating()) {
        return false;
    }

    let (mode, start) = if DragMode::Resize == mode && !client.is_floating() {
        (DragMode::TileAdjust, client.geom)
    } else {
        (mode, client.float_geom)
    };

    state.drag = DragSession {
        mode,
        client: Some(id),
        origin: state.pointer,
        start,
    };

    state.push(DisplayAction::GrabPointer);

    if DragMode::EdgeProbe != mode {
        state.push(DisplayAction::GrabKeyboard);

        // Bring the window to the top
        stacking::restack(state, Some(id), StackAction::Raise);
    }

    debug!("{}: mode={}, id={}", function_name!(), mode, id);

    true
}

/// Apply the latest pointer position to the dragged client
///
/// # Arguments
///
/// * `state` - Global state object
pub(crate) fn motion(state: &mut WindowManagerState) {
    let session = state.drag;

    if !session.mode.is_dragging() {
        return;
    }

    let Some(id) = session.client.filter(|id| state.clients.contains(*id)) else {
        cancel(state);

        return;
    };

    let dx = state.pointer.0 - session.origin.0;
    let dy = state.pointer.1 - session.origin.1;
    let start = session.start;

    let candidate = match session.mode {
        DragMode::Move => Rect {
            x: start.x + dx,
            y: start.y + dy,
            ..start
        },
        _ => Rect {
            width: max!(start.width + dx, 1),
            height: max!(start.height + dy, 1),
            ..start
        },
    };

    layout::resize(state, id, candidate);
}

/// Release the session once all keys are up
///
/// Ending a [`DragMode::TileAdjust`] session derives the main factor and count of the
/// monitor from the size of the dragged client.
///
/// # Arguments
///
/// * `state` - Global state object
/// * `keys_held` - Whether any key is still pressed
pub(crate) fn release(state: &mut WindowManagerState, keys_held: bool) {
    let session = state.drag;

    match session.mode {
        DragMode::Idle | DragMode::StackCycle => return,
        // Key repeat would interfere
        DragMode::Move | DragMode::Resize | DragMode::TileAdjust if keys_held => return,
        _ => {}
    }

    state.drag = DragSession::default();

    state.push(DisplayAction::UngrabPointer);
    state.push(DisplayAction::UngrabKeyboard);

    if DragMode::TileAdjust == session.mode {
        if let Some(outer) = session.client.and_then(|id| state.client(id)).map(|client| client.outer_geom()) {
            let mon_idx = state.monitors.iter()
                .position(|mon| mon.geom.contains_point(outer.x, outer.y))
                .unwrap_or(state.monitors.len().saturating_sub(1));

            if let Some(mon) = state.monitors.get_mut(mon_idx) {
                mon.main_factor = (outer.width as f32 / mon.geom.width as f32)
                    .clamp(MIN_MAIN_FACTOR, MAX_MAIN_FACTOR);
                mon.main_count = max!(1, mon.geom.height / max!(1, outer.height)) as usize;

                debug!("{}: monitor={}, main_factor={}, main_count={}",
                    function_name!(), mon_idx, mon.main_factor, mon.main_count);
            }

            state::commit(state);
        }
    }

    debug!("{}: mode={}", function_name!(), session.mode);
}

/// Drop the session immediately and keep whatever was applied so far
///
/// # Arguments
///
/// * `state` - Global state object
pub(crate) fn cancel(state: &mut WindowManagerState) {
    let mode = state.drag.mode;

    match mode {
        DragMode::Idle => return,
        DragMode::StackCycle => state.push(DisplayAction::UngrabKeyboard),
        _ => {
            state.push(DisplayAction::UngrabPointer);
            state.push(DisplayAction::UngrabKeyboard);
        }
    }

    state.drag = DragSession::default();

    debug!("{}: mode={}", function_name!(), mode);
}

/// Cancel the session when it manipulates the given client
pub(crate) fn cancel_for(state: &mut WindowManagerState, id: ClientId) {
    if DragMode::StackCycle != state.drag.mode && state.drag.client == Some(id) {
        cancel(state);
    }
}

/// Start or continue cycling through the visible clients
///
/// # Arguments
///
/// * `state` - Global state object
/// * `delta` - Direction to cycle in
pub(crate) fn grab_stack(state: &mut WindowManagerState, delta: i32) {
    match state.drag.mode {
        DragMode::Idle => {
            state.push(DisplayAction::GrabKeyboard);

            state.drag = DragSession {
                mode: DragMode::StackCycle,
                origin: state.pointer,
                ..DragSession::default()
            };
        }
        DragMode::StackCycle => {}
        _ => return,
    }

    if let Some(next) = focus::neighbour(state, delta) {
        focus::select(state, Some(next));
        stacking::restack(state, Some(next), StackAction::Raise);
    }

    debug!("{}: delta={}, sel={:?}", function_name!(), delta, state.sel);
}

/// Commit the cycled client to the top of the stack and the registry
///
/// # Arguments
///
/// * `state` - Global state object
///
/// # Returns
///
/// Whether a cycle was committed
pub(crate) fn commit_stack(state: &mut WindowManagerState) -> bool {
    if DragMode::StackCycle != state.drag.mode {
        return false;
    }

    state.drag = DragSession::default();

    stacking::restack(state, state.sel, StackAction::Zoom);

    // Zooming tiled windows can rearrange tiling
    state::commit(state);

    state.push(DisplayAction::UngrabKeyboard);

    debug!("{}: sel={:?}", function_name!(), state.sel);

    true
}
