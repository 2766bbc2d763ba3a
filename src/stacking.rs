///
/// @package filet-rs
///
/// @file Stacking functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use log::debug;
use stdext::function_name;
use strum_macros::Display;
use x11rb::protocol::xproto::Window;
use crate::client::{Client, Layer};
use crate::display_action::DisplayAction;
use crate::registry::ClientId;
use crate::state::WindowManagerState;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub(crate) enum StackAction {
    /// Toggle the pinned client
    Pin,
    /// Lift client above its layer until something else is raised
    Raise,
    /// Move client to the registry head and raise it
    Zoom,
    /// Detach client and forget all references to it
    Remove,
    /// Give the bar the topmost slot
    BarShow,
    /// Return the topmost slot to the clients
    BarHide,
    /// Just recompute the order
    Refresh,
}

/// Weak references that override the normal layer order
#[derive(Default, Debug)]
pub(crate) struct Stacking {
    pub(crate) pinned: Option<ClientId>,
    pub(crate) raised: Option<ClientId>,
    pub(crate) bar_focused: bool,
}

impl Stacking {
    /// Clear every reference to the given client
    pub(crate) fn invalidate(&mut self, id: ClientId) {
        if self.pinned == Some(id) {
            self.pinned = None;
        }

        if self.raised == Some(id) {
            self.raised = None;
        }
    }
}

/// Compute the front-to-back order of all windows, topmost first
///
/// # Arguments
///
/// * `state` - Global state object
///
/// # Returns
///
/// Tuple of all windows including the bar and of the clients only
pub(crate) fn order(state: &WindowManagerState) -> (Vec<Window>, Vec<Window>) {
    let pinned = state.stacking.pinned.filter(|id| state.clients.contains(*id));
    let raised = state.stacking.raised
        .filter(|id| state.clients.contains(*id))
        .filter(|id| Some(*id) != pinned);

    let mut windows = Vec::with_capacity(state.clients.len() + 1);
    let mut clients = Vec::with_capacity(state.clients.len());

    let win_of = |id: ClientId| state.clients.get(id).map(|client| client.win);

    if state.stacking.bar_focused {
        windows.extend(state.bar);
    }

    for win in [pinned, raised].into_iter().flatten().filter_map(win_of) {
        windows.push(win);
        clients.push(win);
    }

    if !state.stacking.bar_focused {
        windows.extend(state.bar);
    }

    // Order layers: floating, tiled and fullscreen unless raised
    let rest: Vec<(ClientId, &Client)> = state.clients.iter()
        .filter(|(id, _)| Some(*id) != pinned && Some(*id) != raised)
        .collect();

    for layer in [Layer::Floating, Layer::Tiled, Layer::Fullscreen] {
        for (_, client) in rest.iter().filter(|(_, client)| client.layer() == layer) {
            windows.push(client.win);
            clients.push(client.win);
        }
    }

    (windows, clients)
}

/// Apply a stacking action and push the resulting order to the display
///
/// # Arguments
///
/// * `state` - Global state object
/// * `id` - Client the action applies to
/// * `action` - What to do
pub(crate) fn restack(state: &mut WindowManagerState, id: Option<ClientId>, action: StackAction) {
    match action {
        StackAction::Pin => {
            state.stacking.pinned = if state.stacking.pinned != id { id } else { None };
        }
        StackAction::Remove => {
            if let Some(id) = id {
                state.clients.detach(id);
                state.stacking.invalidate(id);
            }
        }
        StackAction::Zoom => {
            if let Some(id) = id {
                state.clients.move_to_head(id);
            }

            state.stacking.raised = id;
        }
        StackAction::Raise => state.stacking.raised = id,
        StackAction::Refresh => {}
        StackAction::BarShow | StackAction::BarHide => {
            let focused = StackAction::BarShow == action;

            if state.stacking.bar_focused == focused {
                return;
            }

            state.stacking.bar_focused = focused;
        }
    }

    // Always lift up anything pinned
    if let Some(pinned) = state.stacking.pinned {
        if state.clients.get(pinned).is_some_and(Client::is_floating) {
            state.clients.move_to_head(pinned);
        }
    }

    let (windows, clients) = order(state);

    debug!("{}: action={}, id={:?}, windows={:?}", function_name!(), action, id, windows);

    if !windows.is_empty() {
        state.push(DisplayAction::Restack(windows));
    }

    state.push(DisplayAction::SetClientListStacking(clients));
}
