///
/// @package filet-rs
///
/// @file Drag tests
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use crate::command::{self, Command};
use crate::display_action::DisplayAction;
use crate::drag::{self, DragMode};
use crate::event::{self, WmEvent};
use crate::rect::Rect;
use crate::state::Settings;
use crate::tests::{map_in_order, map_window, new_state, new_state_with};

fn motion(x: i32, y: i32) -> WmEvent {
    WmEvent::Motion { root_x: x, root_y: y, child: None, buttons_held: true }
}

#[test]
fn should_adjust_tiling() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    state.pointer = (1152, 500);

    assert!(drag::grab_resize(&mut state, DragMode::Resize));
    assert_eq!(state.drag.mode, DragMode::TileAdjust);

    event::handle(&mut state, motion(1600, 500));

    assert_eq!(state.client(ids[0]).map(|client| client.geom.width), Some(1600));

    event::handle(&mut state, WmEvent::ButtonRelease { keys_held: false });

    let mon = &state.monitors[0];

    assert_eq!(state.drag.mode, DragMode::Idle);
    assert!((mon.main_factor - 1600.0 / 1920.0).abs() < 1e-4);
    assert_eq!(mon.main_count, 1);
    assert!(state.actions.contains(&DisplayAction::UngrabPointer));
}

#[test]
fn should_move_floating_client() {
    let mut state = new_state_with(Settings {
        border_width: 0,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    let id = map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    state.pointer = (200, 200);

    assert!(drag::grab_resize(&mut state, DragMode::Move));
    assert!(state.actions.contains(&DisplayAction::GrabPointer));

    event::handle(&mut state, motion(250, 260));

    assert_eq!(state.client(id).map(|client| client.geom), Some(Rect::from((150, 160, 400, 300))));

    event::handle(&mut state, motion(250, 260));
    event::handle(&mut state, WmEvent::ButtonRelease { keys_held: false });

    assert_eq!(state.drag.mode, DragMode::Idle);
    assert_eq!(state.client(id).map(|client| client.float_geom), Some(Rect::from((150, 160, 400, 300))));
}

#[test]
fn should_keep_session_while_keys_held() {
    let mut state = new_state_with(Settings {
        border_width: 0,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    drag::grab_resize(&mut state, DragMode::Resize);

    event::handle(&mut state, WmEvent::ButtonRelease { keys_held: true });

    assert_eq!(state.drag.mode, DragMode::Resize);

    event::handle(&mut state, WmEvent::ButtonRelease { keys_held: false });

    assert_eq!(state.drag.mode, DragMode::Idle);
}

#[test]
fn should_reject_invalid_sessions() {
    let mut state = new_state();

    assert!(!drag::grab_resize(&mut state, DragMode::Move));

    map_in_order(&mut state, &[1]);

    // Tiled clients cannot be moved
    assert!(!drag::grab_resize(&mut state, DragMode::Move));
    assert!(!drag::grab_resize(&mut state, DragMode::Idle));
    assert!(!drag::grab_resize(&mut state, DragMode::TileAdjust));

    command::execute(&mut state, &Command::ToggleFullscreen);

    assert!(!drag::grab_resize(&mut state, DragMode::Resize));
    assert_eq!(state.drag.mode, DragMode::Idle);
}

#[test]
fn should_cancel_when_grab_failed() {
    let mut state = new_state_with(Settings {
        border_width: 0,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    drag::grab_resize(&mut state, DragMode::Move);

    event::handle(&mut state, WmEvent::GrabFailed);

    assert_eq!(state.drag.mode, DragMode::Idle);
}

#[test]
fn should_cancel_stack_cycle_when_keyboard_grab_failed() {
    let mut state = new_state();

    map_in_order(&mut state, &[1, 2]);

    drag::grab_stack(&mut state, 1);

    assert_eq!(state.drag.mode, DragMode::StackCycle);
    assert!(state.actions.contains(&DisplayAction::GrabKeyboard));

    event::handle(&mut state, WmEvent::GrabFailed);

    assert_eq!(state.drag.mode, DragMode::Idle);
    assert_eq!(state.actions.back(), Some(&DisplayAction::UngrabKeyboard));
}

#[test]
fn should_cancel_when_client_goes_away() {
    let mut state = new_state_with(Settings {
        border_width: 0,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    drag::grab_resize(&mut state, DragMode::Move);

    event::handle(&mut state, WmEvent::Destroy(1));

    assert_eq!(state.drag.mode, DragMode::Idle);
    assert!(state.clients.is_empty());
}

#[test]
fn should_cycle_and_commit_stack() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2, 3]);

    assert_eq!(state.sel, Some(ids[0]));
    assert!(!drag::commit_stack(&mut state));

    drag::grab_stack(&mut state, 1);

    assert_eq!(state.drag.mode, DragMode::StackCycle);
    assert_eq!(state.sel, Some(ids[1]));

    drag::grab_stack(&mut state, 1);

    assert_eq!(state.sel, Some(ids[2]));
    assert!(drag::commit_stack(&mut state));
    assert_eq!(state.drag.mode, DragMode::Idle);
    assert_eq!(state.clients.ids()[0], ids[2]);
    assert_eq!(state.sel, Some(ids[2]));
}

#[test]
fn should_commit_stack_on_release_key() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    state.stack_release = Some(64);

    drag::grab_stack(&mut state, -1);

    // Wraps around to the end of the registry
    assert_eq!(state.sel, Some(ids[1]));

    event::handle(&mut state, WmEvent::KeyRelease { keycode: 64, keys_held: false });

    assert_eq!(state.drag.mode, DragMode::Idle);
    assert_eq!(state.clients.ids()[0], ids[1]);
}
