///
/// @package filet-rs
///
/// @file Event functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use anyhow::Result;
use easy_min_max::max;
use log::{debug, warn};
use stdext::function_name;
use strum_macros::Display;
use x11rb::protocol::xproto::{Keycode, Window};
use crate::client::{Client, ClientFlags};
use crate::command::{self, Command};
use crate::display::Display;
use crate::display_action::DisplayAction;
use crate::drag::{self, DragMode};
use crate::monitor::MonitorInfo;
use crate::rect::Rect;
use crate::registry::ClientId;
use crate::size_hints::SizeHints;
use crate::stacking::{self, StackAction};
use crate::state::{self, WindowManagerState};
use crate::{focus, layout};

/// Everything the core needs to know about a window asking to be mapped
#[derive(Default, Debug, Clone, PartialEq)]
pub(crate) struct WindowInfo {
    pub(crate) win: Window,
    pub(crate) geom: Rect,
    pub(crate) border_width: i32,
    pub(crate) name: String,
    pub(crate) transient_for: Option<Window>,
    pub(crate) dialog: bool,
    pub(crate) fullscreen: bool,
    pub(crate) hints: SizeHints,
}

/// How a `_NET_WM_STATE` request wants to change the fullscreen state
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub(crate) enum StateChange {
    Remove,
    Add,
    Toggle,
}

/// Events from the display translated into what the core cares about
#[derive(Debug, Clone, PartialEq, Display)]
pub(crate) enum WmEvent {
    MapRequest(WindowInfo),
    ConfigureRequest {
        win: Window,
        x: Option<i32>,
        y: Option<i32>,
        width: Option<i32>,
        height: Option<i32>,
        border_width: Option<i32>,
    },
    Destroy(Window),
    Unmap { win: Window, synthetic: bool },
    ButtonPress { win: Window, root_x: i32, root_y: i32 },
    ButtonRelease { keys_held: bool },
    Motion { root_x: i32, root_y: i32, child: Option<Window>, buttons_held: bool },
    KeyPress { keycode: Keycode, modifiers: u16, keys_held: bool },
    KeyRelease { keycode: Keycode, keys_held: bool },
    FullscreenRequest { win: Window, change: StateChange },
    ActivateRequest(Window),
    TransientFor { win: Window, parent: Option<Window> },
    NormalHints { win: Window, hints: SizeHints },
    Hints { win: Window, urgent: bool },
    Name { win: Window, name: String },
    WindowType { win: Window, fullscreen: bool },
    MonitorsChanged(Vec<MonitorInfo>),
    /// The display could not grab the pointer or keyboard
    GrabFailed,
}

/// Publish the managed windows in mapping order
pub(crate) fn publish_client_list(state: &mut WindowManagerState) {
    let windows: Vec<Window> = state.clients.iter().rev()
        .map(|(_, client)| client.win)
        .collect();

    state.push(DisplayAction::SetClientList(windows));
}

fn handle_map_request(state: &mut WindowManagerState, info: WindowInfo) {
    if state.clients.find_by_handle(info.win).is_some() {
        return;
    }

    let bw = state.settings.border_width;
    let mut client = Client::new(info.win, info.geom);

    client.name = info.name;
    client.hints = info.hints;
    client.orig_border_width = info.border_width;
    client.border_width = bw;
    client.tags = state.tagset;

    // Show window on same workspaces as its parent
    let parent = info.transient_for
        .and_then(|parent| state.clients.find_by_handle(parent))
        .and_then(|parent| state.client(parent));

    if let Some(parent) = parent {
        client.tags = parent.tags;
    }

    client.flags.set(ClientFlags::TYPE_DIALOG, info.dialog);

    if client.is_dialog() || parent.is_some() || state.settings.float_new_windows {
        client.flags.insert(ClientFlags::MODE_FLOAT);
    }

    // Adjust to current monitor
    let mon_idx = state.monitor_at(state.pointer.0, state.pointer.1);

    if let Some(mon) = state.monitors.get(mon_idx) {
        let mut geom = client.geom;

        if geom.x + client.outer_width() > mon.geom.right() {
            geom.x = mon.geom.right() - client.outer_width();
        }

        if geom.y + client.outer_height() > mon.geom.bottom() {
            geom.y = mon.geom.bottom() - client.outer_height();
        }

        geom.x = max!(geom.x, mon.geom.x);

        // Only keep clients off the bar when their center might cover it
        let min_y = state.monitors.first()
            .filter(|primary| {
                let center = geom.x + geom.width / 2;

                state.settings.top_bar && center >= primary.geom.x && center < primary.geom.right()
            })
            .map_or(mon.geom.y, |primary| state.work_y(primary));

        geom.y = max!(geom.y, min_y);

        client.geom = geom;
        client.float_geom = geom;
    }

    let win = client.win;
    let geom = client.geom;

    let Some(id) = state.clients.attach(client) else {
        return;
    };

    state.push(DisplayAction::Manage { win, border_width: bw });
    state.push(DisplayAction::Configure { win, geom, border_width: bw });

    publish_client_list(state);

    if info.fullscreen {
        command::set_fullscreen(state, id, true);
    } else {
        layout::resize(state, id, geom);
    }

    stacking::restack(state, Some(id), StackAction::Raise);

    state.push(DisplayAction::MapWindow(win));

    state::commit_focus(state, Some(id));

    debug!("{}: win={}, id={}", function_name!(), win, id);
}

/// Forget a client, the window may already be gone
///
/// # Arguments
///
/// * `state` - Global state object
/// * `id` - Client to remove
/// * `destroyed` - Whether the window does not exist anymore
pub(crate) fn unmanage(state: &mut WindowManagerState, id: ClientId, destroyed: bool) {
    let Some(client) = state.client(id) else {
        return;
    };

    let win = client.win;
    let border_width = client.orig_border_width;

    drag::cancel_for(state, id);

    stacking::restack(state, Some(id), StackAction::Remove);

    state.push(DisplayAction::Unmanage { win, border_width, destroyed });

    if state.sel == Some(id) {
        state.sel = None;
    }

    if state.hovered == Some(id) {
        state.hovered = None;
        state.hovered_win = None;
    }

    publish_client_list(state);

    state::commit(state);

    debug!("{}: win={}, destroyed={}", function_name!(), win, destroyed);
}

fn handle_configure_request(state: &mut WindowManagerState, win: Window, x: Option<i32>, y: Option<i32>,
                            width: Option<i32>, height: Option<i32>, border_width: Option<i32>)
{
    let Some(id) = state.clients.find_by_handle(win) else {
        return;
    };

    let tagset = state.tagset;

    let Some(client) = state.clients.get_mut(id) else {
        return;
    };

    if let Some(bw) = border_width {
        client.border_width = bw;
    }

    if client.is_floating() && !client.is_fullscreen() {
        let geom = Rect {
            x: x.unwrap_or(client.geom.x),
            y: y.unwrap_or(client.geom.y),
            width: max!(1, width.unwrap_or(client.geom.width)),
            height: max!(1, height.unwrap_or(client.geom.height)),
        };

        client.geom = geom;
        client.float_geom = geom;

        let border_width = client.border_width;
        let visible = client.is_visible(tagset);

        // Just moving needs a synthetic notify
        if (x.is_some() || y.is_some()) && width.is_none() && height.is_none() {
            state.push(DisplayAction::SendConfigure { win, geom, border_width });
        }

        if visible {
            state.push(DisplayAction::Configure { win, geom, border_width });
        }
    } else {
        let action = DisplayAction::SendConfigure {
            win,
            geom: client.geom,
            border_width: client.border_width,
        };

        state.push(action);
    }
}

fn handle_button_press(state: &mut WindowManagerState, win: Window, root_x: i32, root_y: i32) {
    state.pointer = (root_x, root_y);

    if state.bar == Some(win) {
        return;
    }

    if DragMode::EdgeProbe == state.drag.mode {
        if let Some(in_move_zone) = state.selected().map(|client| client.in_move_zone(root_x, root_y)) {
            drag::grab_resize(state, if in_move_zone { DragMode::Move } else { DragMode::Resize });
        }

        return;
    }

    // Click-to-raise
    if let Some(id) = state.clients.find_by_handle(win) {
        let floating = state.client(id).is_some_and(Client::is_floating);

        state.push(DisplayAction::ReplayClick(win));

        focus::select(state, Some(id));
        stacking::restack(state, Some(id), if floating { StackAction::Zoom } else { StackAction::Raise });
    }
}

fn handle_motion(state: &mut WindowManagerState, root_x: i32, root_y: i32,
                 child: Option<Window>, buttons_held: bool)
{
    state.pointer = (root_x, root_y);

    drag::motion(state);

    if DragMode::EdgeProbe == state.drag.mode {
        let in_zone = state.selected().is_some_and(|client|
            client.in_move_zone(root_x, root_y) || client.in_resize_zone(root_x, root_y));

        if !in_zone || state.in_bar_zone(root_x, root_y) {
            drag::release(state, false);
        }
    }

    if DragMode::Idle != state.drag.mode {
        return;
    }

    // Bar raise when the pointer hits the screen edge
    let in_bar_zone = state.in_bar_zone(root_x, root_y);

    if in_bar_zone && !state.stacking.bar_focused {
        stacking::restack(state, None, StackAction::BarShow);

        state.push(DisplayAction::SetInputFocus(None));
        state.push(DisplayAction::SetActiveWindow(None));
    } else if !in_bar_zone && state.stacking.bar_focused {
        stacking::restack(state, None, StackAction::BarHide);

        if state.sel.is_some() {
            focus::focus(state, state.sel);
        }
    }

    // Cache the client under the pointer
    let changed = child != state.hovered_win;

    if changed {
        state.hovered = child.and_then(|win| state.clients.find_by_handle(win));
        state.hovered_win = child;
    }

    let Some(hovered) = state.hovered.filter(|id| state.clients.contains(*id)) else {
        return;
    };

    // Focus follows mouse
    if changed && state.sel != Some(hovered) {
        focus::focus(state, Some(hovered));
    }

    // Watch for border edge locations for resizing
    let on_edge = state.client(hovered).is_some_and(|client|
        client.in_move_zone(root_x, root_y) || client.in_resize_zone(root_x, root_y));

    if !buttons_held && on_edge {
        drag::grab_resize(state, DragMode::EdgeProbe);
    }
}

fn handle_key_press(state: &mut WindowManagerState, keycode: Keycode, modifiers: u16, keys_held: bool) {
    drag::release(state, keys_held);

    let commands: Vec<Command> = state.grabs.iter()
        .filter(|grab| grab.matches(keycode, modifiers))
        .map(|grab| grab.command.clone())
        .collect();

    for command in commands.iter() {
        command::execute(state, command);
    }
}

fn handle_key_release(state: &mut WindowManagerState, keycode: Keycode, keys_held: bool) {
    drag::release(state, keys_held);

    // Zoom after cycling windows when the modifier is released
    if state.stack_release == Some(keycode) {
        drag::commit_stack(state);
    }
}

fn handle_transient_for(state: &mut WindowManagerState, id: ClientId, parent: Option<Window>) {
    let parent_managed = parent.and_then(|win| state.clients.find_by_handle(win)).is_some();

    let Some(client) = state.clients.get_mut(id) else {
        return;
    };

    if !client.is_floating() && parent_managed {
        client.flags.insert(ClientFlags::MODE_FLOAT);

        state::commit(state);
    }
}

fn handle_hints(state: &mut WindowManagerState, id: ClientId, urgent: bool) {
    if let Some(client) = state.clients.get_mut(id) {
        client.flags.set(ClientFlags::MODE_URGENT, urgent);
    }

    // Clear urgency if client is focused
    if urgent && state.sel == Some(id) {
        focus::set_urgency(state, Some(id));
    }
}

/// Hand every window back in a visible state
///
/// # Arguments
///
/// * `state` - Global state object
pub(crate) fn shutdown(state: &mut WindowManagerState) {
    state.tagset = state.tag_mask();

    let ids: Vec<ClientId> = state.clients.ids().to_vec();

    for id in ids {
        unmanage(state, id, false);
    }

    debug!("{}", function_name!());
}

/// Handle a single event
///
/// # Arguments
///
/// * `state` - Global state object
/// * `event` - Event to handle
pub(crate) fn handle(state: &mut WindowManagerState, event: WmEvent) {
    debug!("{}: event={}", function_name!(), event);

    match event {
        WmEvent::MapRequest(info) => handle_map_request(state, info),
        WmEvent::ConfigureRequest { win, x, y, width, height, border_width } =>
            handle_configure_request(state, win, x, y, width, height, border_width),
        WmEvent::Destroy(win) => {
            if let Some(id) = state.clients.find_by_handle(win) {
                unmanage(state, id, true);
            }
        }
        WmEvent::Unmap { win, synthetic } => {
            if let Some(id) = state.clients.find_by_handle(win) {
                if synthetic {
                    state.push(DisplayAction::DeleteWmState(win));
                } else {
                    unmanage(state, id, false);
                }
            }
        }
        WmEvent::ButtonPress { win, root_x, root_y } => handle_button_press(state, win, root_x, root_y),
        WmEvent::ButtonRelease { keys_held } => drag::release(state, keys_held),
        WmEvent::Motion { root_x, root_y, child, buttons_held } =>
            handle_motion(state, root_x, root_y, child, buttons_held),
        WmEvent::KeyPress { keycode, modifiers, keys_held } =>
            handle_key_press(state, keycode, modifiers, keys_held),
        WmEvent::KeyRelease { keycode, keys_held } => handle_key_release(state, keycode, keys_held),
        WmEvent::FullscreenRequest { win, change } => {
            if let Some(id) = state.clients.find_by_handle(win) {
                let fullscreen = match change {
                    StateChange::Add => true,
                    StateChange::Remove => false,
                    StateChange::Toggle => !state.client(id).is_some_and(Client::is_fullscreen),
                };

                command::set_fullscreen(state, id, fullscreen);
            }
        }
        WmEvent::ActivateRequest(win) => {
            let id = state.clients.find_by_handle(win);

            focus::set_urgency(state, id);
        }
        WmEvent::TransientFor { win, parent } => {
            if let Some(id) = state.clients.find_by_handle(win) {
                handle_transient_for(state, id, parent);
            }
        }
        WmEvent::NormalHints { win, hints } => {
            if let Some(client) = state.clients.find_by_handle(win)
                .and_then(|id| state.clients.get_mut(id))
            {
                client.hints = hints;
            }
        }
        WmEvent::Hints { win, urgent } => {
            if let Some(id) = state.clients.find_by_handle(win) {
                handle_hints(state, id, urgent);
            }
        }
        WmEvent::Name { win, name } => {
            if let Some(client) = state.clients.find_by_handle(win)
                .and_then(|id| state.clients.get_mut(id))
            {
                client.name = name;
            }
        }
        WmEvent::WindowType { win, fullscreen } => {
            if let Some(id) = state.clients.find_by_handle(win).filter(|_| fullscreen) {
                command::set_fullscreen(state, id, true);
            }
        }
        WmEvent::MonitorsChanged(infos) => state.update_monitors(&infos),
        WmEvent::GrabFailed => {
            warn!("Grab failed, dropping drag");

            drag::cancel(state);
        }
    }
}

/// Hand queued actions to the display, feedback is handled before anything else
fn flush_actions(state: &mut WindowManagerState, display: &mut Display) -> Result<()> {
    while let Some(action) = state.actions.pop_front() {
        // Windows may vanish at any time, so errors of single requests are not fatal
        match display.execute(&action) {
            Ok(Some(feedback)) => handle(state, feedback),
            Ok(None) => {}
            Err(err) => debug!("{}: action={}, err={}", function_name!(), action, err),
        }
    }

    Ok(())
}

/// Run the event loop until asked to stop
///
/// # Arguments
///
/// * `state` - Global state object
/// * `display` - Connection to the display server
///
/// # Returns
///
/// A [`Result`] with either [`unit`] on success or otherwise [`anyhow::Error`]
pub(crate) fn handle_requests(state: &mut WindowManagerState, display: &mut Display) -> Result<()> {
    flush_actions(state, display)?;

    while state.is_running() {
        display.flush()?;

        for event in display.next_events()? {
            match display.translate(state, event) {
                Ok(Some(wm_event)) => handle(state, wm_event),
                Ok(None) => {}
                Err(err) => debug!("{}: err={}", function_name!(), err),
            }

            flush_actions(state, display)?;

            if !state.is_running() {
                break;
            }
        }
    }

    debug!("{}", function_name!());

    Ok(())
}
