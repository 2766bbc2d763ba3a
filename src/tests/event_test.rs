///
/// @package filet-rs
///
/// @file Event tests
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use x11rb::protocol::xproto::ModMask;
use crate::command::Command;
use crate::display_action::DisplayAction;
use crate::drag::DragMode;
use crate::event::{self, StateChange, WindowInfo, WmEvent};
use crate::grab::Grab;
use crate::rect::Rect;
use crate::state::Settings;
use crate::tagging::Tagging;
use crate::tests::{map_in_order, map_window, new_state, new_state_with};

fn configure(win: u32, x: Option<i32>, y: Option<i32>, width: Option<i32>, height: Option<i32>) -> WmEvent {
    WmEvent::ConfigureRequest { win, x, y, width, height, border_width: None }
}

#[test]
fn should_manage_mapped_windows() {
    let mut state = new_state();

    let id = map_window(&mut state, 1, Rect::from((10, 10, 100, 100)));

    assert_eq!(state.sel, Some(id));
    assert!(state.actions.contains(&DisplayAction::Manage { win: 1, border_width: 0 }));
    assert!(state.actions.contains(&DisplayAction::MapWindow(1)));
    assert!(state.actions.contains(&DisplayAction::SetClientList(vec![1])));

    // Mapping again changes nothing
    map_window(&mut state, 1, Rect::from((10, 10, 100, 100)));

    assert_eq!(state.clients.len(), 1);
}

#[test]
fn should_publish_clients_in_mapping_order() {
    let mut state = new_state();

    map_window(&mut state, 1, Rect::from((10, 10, 100, 100)));
    map_window(&mut state, 2, Rect::from((10, 10, 100, 100)));

    assert!(state.actions.contains(&DisplayAction::SetClientList(vec![1, 2])));
}

#[test]
fn should_float_dialogs_and_transients() {
    let mut state = new_state();

    let parent = map_window(&mut state, 1, Rect::from((10, 10, 100, 100)));

    if let Some(client) = state.clients.get_mut(parent) {
        client.tags = Tagging::workspace(0) | Tagging::workspace(3);
    }

    event::handle(&mut state, WmEvent::MapRequest(WindowInfo {
        win: 2,
        geom: Rect::from((50, 50, 200, 100)),
        transient_for: Some(1),
        ..WindowInfo::default()
    }));

    event::handle(&mut state, WmEvent::MapRequest(WindowInfo {
        win: 3,
        geom: Rect::from((50, 50, 200, 100)),
        dialog: true,
        ..WindowInfo::default()
    }));

    let transient = state.clients.find_by_handle(2).and_then(|id| state.client(id)).expect("Client missing");

    assert!(transient.is_floating());
    assert_eq!(transient.tags, Tagging::workspace(0) | Tagging::workspace(3));

    let dialog = state.clients.find_by_handle(3).and_then(|id| state.client(id)).expect("Client missing");

    assert!(dialog.is_floating());
    assert!(dialog.is_dialog());
    assert_eq!(dialog.geom, Rect::from((50, 50, 200, 100)));
}

#[test]
fn should_map_fullscreen_windows() {
    let mut state = new_state();

    event::handle(&mut state, WmEvent::MapRequest(WindowInfo {
        win: 1,
        geom: Rect::from((50, 50, 200, 100)),
        fullscreen: true,
        ..WindowInfo::default()
    }));

    let client = state.clients.find_by_handle(1).and_then(|id| state.client(id)).expect("Client missing");

    assert!(client.is_fullscreen());
    assert_eq!(client.geom, Rect::from((0, 0, 1920, 1080)));
}

#[test]
fn should_unmanage_unmapped_windows() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    event::handle(&mut state, WmEvent::Unmap { win: 1, synthetic: true });

    assert_eq!(state.clients.len(), 2);
    assert!(state.actions.contains(&DisplayAction::DeleteWmState(1)));

    event::handle(&mut state, WmEvent::Unmap { win: 1, synthetic: false });

    assert_eq!(state.clients.len(), 1);
    assert_eq!(state.sel, Some(ids[1]));
    assert!(state.actions.contains(&DisplayAction::Unmanage { win: 1, border_width: 0, destroyed: false }));
    assert_eq!(state.client(ids[1]).map(|client| client.geom), Some(Rect::from((0, 0, 1920, 1080))));

    event::handle(&mut state, WmEvent::Destroy(2));

    assert!(state.clients.is_empty());
    assert_eq!(state.sel, None);
    assert!(state.actions.contains(&DisplayAction::SetClientList(Vec::new())));
}

#[test]
fn should_honor_configure_requests_of_floating_clients() {
    let mut state = new_state_with(Settings {
        border_width: 0,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    let id = map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    event::handle(&mut state, configure(1, Some(200), None, None, Some(350)));

    let client = state.client(id).expect("Client missing");

    assert_eq!(client.geom, Rect::from((200, 100, 400, 350)));
    assert_eq!(client.float_geom, client.geom);
    assert_eq!(state.actions.back(), Some(&DisplayAction::Configure {
        win: 1,
        geom: Rect::from((200, 100, 400, 350)),
        border_width: 0,
    }));
}

#[test]
fn should_refuse_configure_requests_of_tiled_clients() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1]);

    event::handle(&mut state, configure(1, Some(5), Some(5), Some(50), Some(50)));

    assert_eq!(state.client(ids[0]).map(|client| client.geom), Some(Rect::from((0, 0, 1920, 1080))));
    assert_eq!(state.actions.back(), Some(&DisplayAction::SendConfigure {
        win: 1,
        geom: Rect::from((0, 0, 1920, 1080)),
        border_width: 0,
    }));
}

#[test]
fn should_run_grabs() {
    let mut state = new_state();

    state.grabs = vec![Grab {
        keycode: 10,
        modifiers: ModMask::M4,
        command: Command::View(Tagging::workspace(1)),
    }];

    event::handle(&mut state, WmEvent::KeyPress {
        keycode: 10,
        modifiers: u16::from(ModMask::M4 | ModMask::LOCK),
        keys_held: true,
    });

    assert_eq!(state.tagset, Tagging::workspace(1));

    event::handle(&mut state, WmEvent::KeyPress { keycode: 10, modifiers: 0, keys_held: true });
    event::handle(&mut state, WmEvent::KeyPress { keycode: 11, modifiers: u16::from(ModMask::M4), keys_held: true });

    assert_eq!(state.tagset, Tagging::workspace(1));
}

#[test]
fn should_toggle_fullscreen_on_request() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1]);

    event::handle(&mut state, WmEvent::FullscreenRequest { win: 1, change: StateChange::Toggle });

    assert!(state.client(ids[0]).is_some_and(|client| client.is_fullscreen()));

    event::handle(&mut state, WmEvent::FullscreenRequest { win: 1, change: StateChange::Add });

    assert!(state.client(ids[0]).is_some_and(|client| client.is_fullscreen()));

    event::handle(&mut state, WmEvent::FullscreenRequest { win: 1, change: StateChange::Remove });

    assert!(state.client(ids[0]).is_some_and(|client| !client.is_fullscreen()));
}

#[test]
fn should_start_edge_probe_on_border() {
    let mut state = new_state_with(Settings {
        border_width: 2,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    event::handle(&mut state, WmEvent::Motion { root_x: 300, root_y: 101, child: Some(1), buttons_held: false });

    assert_eq!(state.drag.mode, DragMode::EdgeProbe);

    event::handle(&mut state, WmEvent::ButtonPress { win: 1, root_x: 300, root_y: 101 });

    assert_eq!(state.drag.mode, DragMode::Move);

    event::handle(&mut state, WmEvent::ButtonRelease { keys_held: false });

    assert_eq!(state.drag.mode, DragMode::Idle);
}

#[test]
fn should_leave_edge_probe_off_border() {
    let mut state = new_state_with(Settings {
        border_width: 2,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    event::handle(&mut state, WmEvent::Motion { root_x: 300, root_y: 101, child: Some(1), buttons_held: false });
    event::handle(&mut state, WmEvent::Motion { root_x: 300, root_y: 250, child: Some(1), buttons_held: false });

    assert_eq!(state.drag.mode, DragMode::Idle);
    assert!(state.actions.contains(&DisplayAction::UngrabPointer));
}

#[test]
fn should_release_everything_on_shutdown() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    if let Some(client) = state.clients.get_mut(ids[1]) {
        client.tags = Tagging::workspace(5);
    }

    event::shutdown(&mut state);

    assert!(state.clients.is_empty());
    assert!(state.actions.contains(&DisplayAction::Unmanage { win: 2, border_width: 0, destroyed: false }));
}

#[test]
fn should_focus_bar_on_screen_edge() {
    let mut state = new_state_with(Settings {
        border_width: 0,
        ..Settings::default()
    });

    let ids = map_in_order(&mut state, &[1]);

    assert_eq!(state.client(ids[0]).map(|client| client.geom), Some(Rect::from((0, 18, 1920, 1062))));

    state.bar = Some(99);

    event::handle(&mut state, WmEvent::Motion { root_x: 500, root_y: 0, child: None, buttons_held: false });

    assert!(state.stacking.bar_focused);
    assert!(state.actions.contains(&DisplayAction::SetInputFocus(None)));

    state.actions.clear();

    event::handle(&mut state, WmEvent::Motion { root_x: 500, root_y: 500, child: Some(1), buttons_held: false });

    assert!(!state.stacking.bar_focused);
    assert!(state.actions.contains(&DisplayAction::SetInputFocus(Some(1))));
}
