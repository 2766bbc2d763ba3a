///
/// @package filet-rs
///
/// @file Focus functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use log::debug;
use stdext::function_name;
use crate::client::ClientFlags;
use crate::display_action::DisplayAction;
use crate::registry::ClientId;
use crate::stacking::{self, StackAction};
use crate::state::WindowManagerState;

/// Pick the client that should have the focus
///
/// # Arguments
///
/// * `state` - Global state object
/// * `candidate` - Preferred client
///
/// # Returns
///
/// The candidate when visible, else the current selection when visible,
/// else the first visible client in registry order
pub(crate) fn choose(state: &WindowManagerState, candidate: Option<ClientId>) -> Option<ClientId> {
    candidate.filter(|id| state.is_visible(*id))
        .or_else(|| state.sel.filter(|id| state.is_visible(*id)))
        .or_else(|| state.clients.iter()
            .find(|(_, client)| client.is_visible(state.tagset))
            .map(|(id, _)| id))
}

/// Move the focus without touching the stacking order
///
/// # Arguments
///
/// * `state` - Global state object
/// * `candidate` - Preferred client
pub(crate) fn select(state: &mut WindowManagerState, candidate: Option<ClientId>) {
    let chosen = choose(state, candidate);

    // Unfocus and catch the click-to-raise that could be coming
    if let Some(prev) = state.sel.filter(|prev| Some(*prev) != chosen) {
        if let Some(win) = state.client(prev).map(|client| client.win) {
            state.push(DisplayAction::GrabClickToRaise(win));
            state.push(DisplayAction::SetBorder { win, focused: false });
        }
    }

    match chosen.and_then(|id| state.client(id)).map(|client| client.win) {
        Some(win) => {
            state.push(DisplayAction::SetBorder { win, focused: true });

            // Input stays with the bar while it is focused
            if !state.stacking.bar_focused {
                state.push(DisplayAction::SetInputFocus(Some(win)));
                state.push(DisplayAction::SetActiveWindow(Some(win)));
                state.push(DisplayAction::TakeFocus(win));
            }
        }
        None => {
            state.push(DisplayAction::SetInputFocus(None));
            state.push(DisplayAction::SetActiveWindow(None));
        }
    }

    state.sel = chosen;

    // Clear urgency if set
    set_urgency(state, chosen);

    debug!("{}: sel={:?}", function_name!(), chosen);
}

/// Focus a client and refresh the stacking order
///
/// # Arguments
///
/// * `state` - Global state object
/// * `candidate` - Preferred client
pub(crate) fn focus(state: &mut WindowManagerState, candidate: Option<ClientId>) {
    select(state, candidate);

    stacking::restack(state, None, StackAction::Refresh);
}

/// Sync the urgency of a client with the selection
///
/// The client becomes urgent when it is not selected, selecting it clears the urgency.
///
/// # Arguments
///
/// * `state` - Global state object
/// * `id` - Client to update
pub(crate) fn set_urgency(state: &mut WindowManagerState, id: Option<ClientId>) {
    let Some(id) = id else {
        return;
    };

    let urgent = state.sel != Some(id);

    let Some(client) = state.clients.get_mut(id) else {
        return;
    };

    if client.is_urgent() == urgent {
        return;
    }

    client.flags.set(ClientFlags::MODE_URGENT, urgent);

    let win = client.win;

    state.push(DisplayAction::SetUrgency { win, urgent });
}

/// Find the next or previous visible client in registry order
///
/// # Arguments
///
/// * `state` - Global state object
/// * `delta` - Positive for the next, otherwise the previous client
///
/// # Returns
///
/// Neighbour of the selected client, wrapping around
pub(crate) fn neighbour(state: &WindowManagerState, delta: i32) -> Option<ClientId> {
    let sel = state.sel?;
    let ids = state.clients.ids();
    let pos = ids.iter().position(|id| *id == sel)?;

    let visible = |id: &&ClientId| state.is_visible(**id);

    if 0 < delta {
        ids[pos + 1..].iter().find(visible)
            .or_else(|| ids[..=pos].iter().find(visible))
            .copied()
    } else {
        ids[..pos].iter().rev().find(visible)
            .or_else(|| ids[pos..].iter().rev().find(visible))
            .copied()
    }
}
