///
/// @package filet-rs
///
/// @file Display actions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use strum_macros::Display;
use x11rb::protocol::xproto::Window;
use crate::rect::Rect;

/// Requests from the window manager core, the display layer acts on these in order
#[derive(Debug, Clone, PartialEq, Display)]
pub(crate) enum DisplayAction {
    /// Start managing a window: border width, event selection and `WM_STATE`
    Manage { win: Window, border_width: i32 },

    /// Stop managing a window, restore the border unless it is already gone
    Unmanage { win: Window, border_width: i32, destroyed: bool },

    MapWindow(Window),

    /// Move and resize a window and tell it about it
    Configure { win: Window, geom: Rect, border_width: i32 },

    /// Just tell a window about its current geometry
    SendConfigure { win: Window, geom: Rect, border_width: i32 },

    /// Move without resizing, used to hide and show windows
    MoveWindow { win: Window, x: i32, y: i32 },

    /// Sets the z-order of the windows, first in the list is top most
    Restack(Vec<Window>),

    /// Publish `_NET_CLIENT_LIST`
    SetClientList(Vec<Window>),

    /// Publish `_NET_CLIENT_LIST_STACKING`, first in the list is top most
    SetClientListStacking(Vec<Window>),

    /// Publish `_NET_ACTIVE_WINDOW` or remove it
    SetActiveWindow(Option<Window>),

    SetBorder { win: Window, focused: bool },

    /// Route keyboard input to the window or the root window
    SetInputFocus(Option<Window>),

    /// Send `WM_TAKE_FOCUS` if the window supports it
    TakeFocus(Window),

    /// Catch the next click on an unfocused window
    GrabClickToRaise(Window),

    /// Pass a caught click on to the window and drop the click grab
    ReplayClick(Window),

    SetFullscreenState { win: Window, fullscreen: bool },

    SetUrgency { win: Window, urgent: bool },

    DeleteWmState(Window),

    /// Exclusive pointer grab, the display answers with `GrabFailed` on error
    GrabPointer,
    UngrabPointer,
    GrabKeyboard,
    UngrabKeyboard,

    /// Ask nicely via `WM_DELETE_WINDOW`, otherwise kill the client
    KillWindow(Window),

    /// Run a shell command
    Spawn(String),
}
