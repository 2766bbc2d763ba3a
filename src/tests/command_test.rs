///
/// @package filet-rs
///
/// @file Command tests
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use proptest::prelude::*;
use crate::client::Layer;
use crate::command::{self, Command};
use crate::display_action::DisplayAction;
use crate::monitor::MonitorInfo;
use crate::rect::Rect;
use crate::state::{Settings, WindowManagerState};
use crate::tagging::Tagging;
use crate::tests::{map_in_order, map_window, new_state, new_state_with};

#[test]
fn should_restore_floating_client_after_fullscreen() {
    let mut state = new_state_with(Settings {
        border_width: 2,
        bar_height: 0,
        float_new_windows: true,
        ..Settings::default()
    });

    let id = map_window(&mut state, 1, Rect::from((100, 100, 400, 300)));

    let before = state.client(id).cloned().expect("Client missing");

    command::execute(&mut state, &Command::ToggleFullscreen);

    let full = state.client(id).expect("Client missing");

    assert_eq!(full.layer(), Layer::Fullscreen);
    assert_eq!(full.border_width, 0);
    assert_eq!(full.geom, Rect::from((0, 0, 1920, 1080)));
    assert!(state.actions.contains(&DisplayAction::SetFullscreenState { win: 1, fullscreen: true }));

    command::execute(&mut state, &Command::ToggleFullscreen);

    let after = state.client(id).expect("Client missing");

    assert_eq!(after.geom, before.geom);
    assert_eq!(after.border_width, 2);
    assert_eq!(after.flags, before.flags);
}

#[test]
fn should_restore_tiled_client_after_fullscreen() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    let before = state.client(ids[0]).cloned().expect("Client missing");

    command::execute(&mut state, &Command::ToggleFullscreen);

    // Remaining client takes the whole monitor
    assert_eq!(state.client(ids[1]).map(|client| client.geom), Some(Rect::from((0, 0, 1920, 1080))));

    command::execute(&mut state, &Command::ToggleFullscreen);

    let after = state.client(ids[0]).expect("Client missing");

    assert!(!after.is_floating());
    assert_eq!(after.geom, before.geom);
}

#[test]
fn should_leave_fullscreen_when_floating_toggled() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1]);

    command::execute(&mut state, &Command::ToggleFullscreen);
    command::execute(&mut state, &Command::ToggleFloating);

    let client = state.client(ids[0]).expect("Client missing");

    assert!(!client.is_fullscreen());
    assert!(client.is_floating());
}

#[test]
fn should_span_monitors_in_fullscreen() {
    let screen = Rect::from((0, 0, 3840, 1080));
    let mut state = WindowManagerState::new(Settings::default(), screen, &[
        MonitorInfo { geom: Rect::from((0, 0, 1920, 1080)), primary: true },
        MonitorInfo { geom: Rect::from((1920, 0, 1920, 1080)), primary: false },
    ]);

    assert_eq!(command::fullscreen_area(&state, Rect::from((1000, 100, 1500, 500))), screen);
    assert_eq!(command::fullscreen_area(&state, Rect::from((2000, 100, 500, 500))),
               Rect::from((1920, 0, 1920, 1080)));
    assert_eq!(command::fullscreen_area(&state, Rect::from((100, 100, 500, 500))),
               Rect::from((0, 0, 1920, 1080)));

    state.monitors.clear();

    assert_eq!(command::fullscreen_area(&state, Rect::from((100, 100, 500, 500))), screen);
}

#[test]
fn should_zoom_selection() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    command::execute(&mut state, &Command::FocusStack(1));
    command::execute(&mut state, &Command::Zoom);

    assert_eq!(state.clients.ids(), &[ids[1], ids[0]]);
    assert_eq!(state.client(ids[1]).map(|client| client.geom), Some(Rect::from((0, 0, 1152, 1080))));
}

#[test]
fn should_tag_selection() {
    let mut state = new_state();

    let ids = map_in_order(&mut state, &[1, 2]);

    command::execute(&mut state, &Command::Tag(Tagging::workspace(4)));

    assert_eq!(state.sel, Some(ids[1]));
    assert!(!state.is_visible(ids[0]));
}

#[test]
fn should_queue_side_effects() {
    let mut state = new_state();

    map_in_order(&mut state, &[1]);

    command::execute(&mut state, &Command::KillClient);
    command::execute(&mut state, &Command::Spawn("xterm".to_string()));

    assert!(state.actions.contains(&DisplayAction::KillWindow(1)));
    assert_eq!(state.actions.back(), Some(&DisplayAction::Spawn("xterm".to_string())));
    assert!(state.is_running());

    command::execute(&mut state, &Command::Quit);

    assert!(!state.is_running());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]
    #[test]
    fn should_round_trip_fullscreen(x in 0i32..1800, y in 0i32..1000, width in 1i32..1900,
                                    height in 1i32..1000, border_width in 0i32..5, floating in any::<bool>())
    {
        let mut state = new_state_with(Settings {
            border_width,
            bar_height: 0,
            float_new_windows: floating,
            ..Settings::default()
        });

        let id = map_window(&mut state, 1, Rect::from((x, y, width, height)));

        let before = state.client(id).cloned().expect("Client missing");

        command::set_fullscreen(&mut state, id, true);

        assert!(state.client(id).is_some_and(|client| client.is_fullscreen()));

        command::set_fullscreen(&mut state, id, false);

        let after = state.client(id).expect("Client missing");

        assert_eq!(after.geom, before.geom);
        assert_eq!(after.float_geom, before.float_geom);
        assert_eq!(after.flags, before.flags);
        assert_eq!(after.border_width, before.border_width);
    }
}
