///
/// @package filet-rs
///
/// @file Grab tests
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::collections::HashMap;
use x11rb::protocol::xproto::{Keycode, Keysym, ModMask};
use crate::command::Command;
use crate::drag::DragMode;
use crate::grab::{self, Grab};
use crate::tagging::Tagging;

const TAB: Keycode = 23;
const ONE: Keycode = 10;

fn keymap() -> HashMap<Keysym, Keycode> {
    let mut map = HashMap::new();

    for (name, keycode) in [("Tab", TAB), ("1", ONE), ("Return", 36)] {
        let record = x11_keysymdef::lookup_by_name(name).expect("Unknown keysym");

        map.insert(record.keysym, keycode);
    }

    map
}

#[test]
fn should_parse_keybinding() {
    let (keycode, modifiers) = grab::parse_keys("W-S-Tab", &keymap()).expect("Parse failed");

    assert_eq!(keycode, TAB);
    assert_eq!(modifiers, ModMask::M4 | ModMask::SHIFT);
}

#[test]
fn should_reject_invalid_keybinding() {
    assert!(grab::parse_keys("W-S", &keymap()).is_err());
    assert!(grab::parse_keys("W-NoSuchKey", &keymap()).is_err());
    assert!(grab::parse_keys("W-F4", &keymap()).is_err());
}

#[test]
fn should_parse_names() {
    assert_eq!(grab::parse_name("window_move").ok(), Some(Command::GrabResize(DragMode::Move)));
    assert_eq!(grab::parse_name("window_cycle_prev").ok(), Some(Command::GrabStack(-1)));
    assert_eq!(grab::parse_name("view_jump3").ok(), Some(Command::View(Tagging::workspace(2))));
    assert_eq!(grab::parse_name("window_tag12").ok(), Some(Command::Tag(Tagging::workspace(11))));
    assert_eq!(grab::parse_name("window_toggle_tag1").ok(), Some(Command::ToggleTag(Tagging::workspace(0))));
    assert_eq!(grab::parse_name("xterm -e top").ok(), Some(Command::Spawn("xterm -e top".to_string())));
}

#[test]
fn should_reject_invalid_indices() {
    assert!(grab::parse_name("view_jump0").is_err());
    assert!(grab::parse_name("view_jump33").is_err());
    assert!(grab::parse_name("window_tagx").is_err());
}

#[test]
fn should_match_ignoring_locks() {
    let grab = Grab::new("window_zoom", "W-A-Return", &keymap()).expect("Grab failed");

    let state = u16::from(ModMask::M4 | ModMask::M1);

    assert!(grab.matches(36, state));
    assert!(grab.matches(36, state | u16::from(ModMask::LOCK) | u16::from(ModMask::M2)));
    assert!(!grab.matches(36, u16::from(ModMask::M4)));
    assert!(!grab.matches(TAB, state));
}

#[test]
fn should_fall_back_to_defaults() {
    let grabs = grab::init(&HashMap::new(), &keymap()).expect("Init failed");

    // Only chords with known keys survive
    assert!(grabs.iter().any(|grab| Command::GrabStack(1) == grab.command));
    assert!(grabs.iter().any(|grab| Command::View(Tagging::workspace(0)) == grab.command));
    assert!(grabs.iter().all(|grab| [TAB, ONE, 36].contains(&grab.keycode)));
}

#[test]
fn should_fail_without_valid_grabs() {
    let config = HashMap::from([("window_zoom".to_string(), "W-F12".to_string())]);

    assert!(grab::init(&config, &keymap()).is_err());
}
