///
/// @package filet-rs
///
/// @file Test functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

mod command_test;
mod drag_test;
mod event_test;
mod grab_test;
mod rect_test;
mod size_hints_test;

use x11rb::protocol::xproto::Window;
use crate::display_action::DisplayAction;
use crate::event::{self, WindowInfo, WmEvent};
use crate::monitor::MonitorInfo;
use crate::rect::Rect;
use crate::registry::ClientId;
use crate::state::{Settings, WindowManagerState};

pub(crate) const SCREEN_WIDTH: i32 = 1920;
pub(crate) const SCREEN_HEIGHT: i32 = 1080;

/// Single 1920x1080 monitor without borders or bar
pub(crate) fn new_state() -> WindowManagerState {
    new_state_with(Settings {
        border_width: 0,
        bar_height: 0,
        ..Settings::default()
    })
}

pub(crate) fn new_state_with(settings: Settings) -> WindowManagerState {
    let screen = Rect::from((0, 0, SCREEN_WIDTH, SCREEN_HEIGHT));

    WindowManagerState::new(settings, screen, &[MonitorInfo { geom: screen, primary: true }])
}

/// Map a window like the display would and return the new client
pub(crate) fn map_window(state: &mut WindowManagerState, win: Window, geom: Rect) -> ClientId {
    event::handle(state, WmEvent::MapRequest(WindowInfo {
        win,
        geom,
        ..WindowInfo::default()
    }));

    state.clients.find_by_handle(win).expect("Window not managed")
}

/// Map windows so that the registry ends up in the given order
pub(crate) fn map_in_order(state: &mut WindowManagerState, wins: &[Window]) -> Vec<ClientId> {
    for win in wins.iter().rev() {
        map_window(state, *win, Rect::from((0, 0, 100, 100)));
    }

    wins.iter()
        .map(|win| state.clients.find_by_handle(*win).expect("Window not managed"))
        .collect()
}

/// Last stacking order handed to the display
pub(crate) fn last_restack(state: &WindowManagerState) -> Option<Vec<Window>> {
    state.actions.iter().rev().find_map(|action| match action {
        DisplayAction::Restack(windows) => Some(windows.clone()),
        _ => None,
    })
}
