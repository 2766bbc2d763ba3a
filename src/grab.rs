///
/// @package filet-rs
///
/// @file Grab functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::fmt;
use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use stdext::function_name;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, GrabMode, Keycode, Keysym, ModMask, Window};
use crate::command::Command;
use crate::drag::DragMode;
use crate::tagging::{Tagging, MAX_WORKSPACES};

/// Modifiers that take part in matching, lock and numlock are ignored
pub(crate) const KEY_MASK: u16 = 1 | 4 | 8 | 32 | 64 | 128; // Shift, Control, Mod1, Mod3, Mod4, Mod5

/// Key chords bound when the config has no grabs
pub(crate) const DEFAULT_GRABS: &[(&str, &str)] = &[
    ("dmenu_run", "W-Tab"),
    ("st", "W-S-Tab"),
    ("window_move", "W-space"),
    ("window_resize", "W-A-space"),
    ("window_float", "W-C-space"),
    ("window_full", "A-Return"),
    ("window_pin", "W-Return"),
    ("window_zoom", "W-A-Return"),
    ("window_cycle_next", "A-Tab"),
    ("window_cycle_prev", "A-S-Tab"),
    ("window_prev", "W-Up"),
    ("window_next", "W-Down"),
    ("view_prev", "W-Left"),
    ("view_next", "W-Right"),
    ("window_shift_prev", "W-S-Left"),
    ("window_shift_next", "W-S-Right"),
    ("window_tag_all", "A-0"),
    ("window_kill", "A-F4"),
    ("filet_quit", "A-C-S-F4"),
    ("view_jump1", "W-1"), ("window_tag1", "W-S-1"), ("window_toggle_tag1", "A-1"),
    ("view_jump2", "W-2"), ("window_tag2", "W-S-2"), ("window_toggle_tag2", "A-2"),
    ("view_jump3", "W-3"), ("window_tag3", "W-S-3"), ("window_toggle_tag3", "A-3"),
    ("view_jump4", "W-4"), ("window_tag4", "W-S-4"), ("window_toggle_tag4", "A-4"),
    ("view_jump5", "W-5"), ("window_tag5", "W-S-5"), ("window_toggle_tag5", "A-5"),
    ("view_jump6", "W-6"), ("window_tag6", "W-S-6"), ("window_toggle_tag6", "A-6"),
    ("view_jump7", "W-7"), ("window_tag7", "W-S-7"), ("window_toggle_tag7", "A-7"),
    ("view_jump8", "W-8"), ("window_tag8", "W-S-8"), ("window_toggle_tag8", "A-8"),
    ("view_jump9", "W-9"), ("window_tag9", "W-S-9"), ("window_toggle_tag9", "A-9"),
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Grab {
    /// Keycode of the grab
    pub(crate) keycode: Keycode,
    /// Modifier mask
    pub(crate) modifiers: ModMask,
    /// Command of this grab
    pub(crate) command: Command,
}

/// Look up the keycode of a named key
///
/// # Arguments
///
/// * `name` - Keysym name like `Tab` or `F4`
/// * `keysyms_to_keycode` - Mapping table for keysyms to keycode
///
/// # Returns
///
/// A [`Result`] with either [`Keycode`] on success or otherwise [`anyhow::Error`]
pub(crate) fn lookup_key(name: &str, keysyms_to_keycode: &HashMap<Keysym, Keycode>) -> Result<Keycode> {
    let record = x11_keysymdef::lookup_by_name(name)
        .context(format!("Key name not found: {}", name))?;

    keysyms_to_keycode.get(&record.keysym).copied().context("Keysym not found")
}

/// Parse keys of grabs
///
/// # Arguments
///
/// * `keys` - Keys to parse
/// * `keysyms_to_keycode` - Mapping table for keysyms to keycode
///
/// # Returns
///
/// A [`Result`] with either ([`Keycode`], [`ModMask`]) on success or otherwise [`anyhow::Error`]
pub(crate) fn parse_keys(keys: &str, keysyms_to_keycode: &HashMap<Keysym, Keycode>) -> Result<(Keycode, ModMask)> {
    let mut keycode: Option<Keycode> = None;
    let mut modifiers = ModMask::default();

    for key in keys.split("-") {
        match key {
            // Handle modifier keys
            "S" => modifiers |= ModMask::SHIFT,
            "C" => modifiers |= ModMask::CONTROL,
            "A" => modifiers |= ModMask::M1,
            "M" => modifiers |= ModMask::M3,
            "W" => modifiers |= ModMask::M4,
            "G" => modifiers |= ModMask::M5,
            _ => keycode = Some(lookup_key(key, keysyms_to_keycode)?),
        }
    }

    let keycode = keycode.ok_or_else(|| anyhow!("No key in chord: {}", keys))?;

    Ok((keycode, modifiers))
}

fn parse_index(name: &str, prefix: &str) -> Result<Option<Tagging>> {
    let Some(suffix) = name.strip_prefix(prefix) else {
        return Ok(None);
    };

    let idx: usize = suffix.parse().context(format!("Invalid workspace in grab: {}", name))?;

    if 0 == idx || MAX_WORKSPACES < idx {
        return Err(anyhow!("Workspace out of range in grab: {}", name));
    }

    Ok(Some(Tagging::workspace(idx - 1)))
}

/// Parse names of grabs
///
/// # Arguments
///
/// * `name` - Name to parse
///
/// # Returns
///
/// A [`Result`] with either [`Command`] on success or otherwise [`anyhow::Error`]
pub(crate) fn parse_name(name: &str) -> Result<Command> {
    Ok(match name {
        "filet_quit" => Command::Quit,

        // Window dragging
        "window_move" => Command::GrabResize(DragMode::Move),
        "window_resize" => Command::GrabResize(DragMode::Resize),

        // Window modes
        "window_float" => Command::ToggleFloating,
        "window_full" => Command::ToggleFullscreen,
        "window_pin" => Command::Pin,
        "window_zoom" => Command::Zoom,
        "window_kill" => Command::KillClient,

        // Window select
        "window_next" => Command::FocusStack(1),
        "window_prev" => Command::FocusStack(-1),
        "window_cycle_next" => Command::GrabStack(1),
        "window_cycle_prev" => Command::GrabStack(-1),

        // Workspaces
        "view_next" => Command::ViewShift(1),
        "view_prev" => Command::ViewShift(-1),
        "view_all" => Command::View(Tagging::all()),
        "window_shift_next" => Command::ViewTagShift(1),
        "window_shift_prev" => Command::ViewTagShift(-1),
        "window_tag_all" => Command::Tag(Tagging::all()),

        _ => {
            // Handle grabs with index
            if let Some(tags) = parse_index(name, "view_jump")? {
                Command::View(tags)
            } else if let Some(tags) = parse_index(name, "window_toggle_tag")? {
                Command::ToggleTag(tags)
            } else if let Some(tags) = parse_index(name, "window_tag")? {
                Command::Tag(tags)
            } else {
                Command::Spawn(name.to_string())
            }
        }
    })
}

impl Grab {
    /// Create a new instance
    ///
    /// # Arguments
    ///
    /// * `name` - Name of this Grab
    /// * `keys` - Keys as String (A-F5)
    /// * `keysyms_to_keycode` - Lookup table to map keysyms to keycodes
    ///
    /// # Returns
    ///
    /// A [`Result`] with either [`Grab`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn new(name: &str, keys: &str, keysyms_to_keycode: &HashMap<Keysym, Keycode>) -> Result<Self> {

        // Parse name and keys
        let command = parse_name(name)?;
        let (keycode, modifiers) = parse_keys(keys, keysyms_to_keycode)?;

        let grab = Grab {
            keycode,
            modifiers,
            command,
        };

        debug!("{}: name={}, grab={}", function_name!(), name, grab);

        Ok(grab)
    }

    /// Check whether a key event triggers this grab
    pub(crate) fn matches(&self, keycode: Keycode, state: u16) -> bool {
        self.keycode == keycode && u16::from(self.modifiers) & KEY_MASK == state & KEY_MASK
    }
}

impl fmt::Display for Grab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(code={}, state={:?}, command={:?})",
               self.keycode, self.modifiers, self.command)
    }
}

/// Build the reverse map of keysyms to keycodes
///
/// # Arguments
///
/// * `conn` - Connection to the display
///
/// # Returns
///
/// A [`Result`] with either the map on success or otherwise [`anyhow::Error`]
pub(crate) fn keyboard_mapping(conn: &impl Connection) -> Result<HashMap<Keysym, Keycode>> {
    let min_keycode = conn.setup().min_keycode;

    let mapping = conn.get_keyboard_mapping(min_keycode,
        conn.setup().max_keycode - min_keycode + 1)?.reply()?;

    let mut keysyms_to_keycode = HashMap::new();

    for (idx, chunk) in mapping.keysyms
        .chunks(max_chunk(mapping.keysyms_per_keycode))
        .enumerate()
    {
        let keycode = min_keycode + idx as u8;

        // Just copy the first sym without modifiers
        if let Some(&keysym) = chunk.first() && 0 != keycode {
            keysyms_to_keycode.entry(keysym).or_insert(keycode);
        }
    }

    Ok(keysyms_to_keycode)
}

fn max_chunk(keysyms_per_keycode: u8) -> usize {
    usize::from(keysyms_per_keycode).max(1)
}

/// Parse the configured grabs, falling back to the built-in table
///
/// # Arguments
///
/// * `grabs` - Grab names mapped to key chords
/// * `keysyms_to_keycode` - Lookup table to map keysyms to keycodes
///
/// # Returns
///
/// A [`Result`] with either a list of [`Grab`] on success or otherwise [`anyhow::Error`]
pub(crate) fn init(grabs: &HashMap<String, String>,
                   keysyms_to_keycode: &HashMap<Keysym, Keycode>) -> Result<Vec<Grab>>
{
    let chords: Vec<(&str, &str)> = if grabs.is_empty() {
        DEFAULT_GRABS.to_vec()
    } else {
        grabs.iter().map(|(name, keys)| (name.as_str(), keys.as_str())).collect()
    };

    let mut parsed = Vec::with_capacity(chords.len());

    for (name, keys) in chords {
        match Grab::new(name, keys, keysyms_to_keycode) {
            Ok(grab) => parsed.push(grab),
            Err(err) => warn!("Ignoring grab `{}': {}", name, err),
        }
    }

    if parsed.is_empty() {
        return Err(anyhow!("No grabs found"));
    }

    debug!("{}: grabs={}", function_name!(), parsed.len());

    Ok(parsed)
}

/// Set key grabs on given window
///
/// # Arguments
///
/// * `conn` - Connection to the display
/// * `win` - Window to use
/// * `grabs` - Grabs to bind
///
/// # Returns
///
/// A [`Result`] with either [`unit`] on success or otherwise [`anyhow::Error`]
pub(crate) fn set(conn: &impl Connection, win: Window, grabs: &[Grab]) -> Result<()> {
    let mod_states: [ModMask; 4] = [ModMask::from(0u16),
        ModMask::LOCK, // Scrolllock
        ModMask::M2, // Numlock
        ModMask::M2 | ModMask::LOCK];

    conn.ungrab_key(Keycode::from(0u8), win, ModMask::ANY)?;

    for grab in grabs.iter() {
        for mod_state in mod_states.iter() {
            conn.grab_key(true, win, grab.modifiers | *mod_state, grab.keycode,
                          GrabMode::ASYNC, GrabMode::ASYNC)?;
        }
    }

    debug!("{}: win={}, grabs={}", function_name!(), win, grabs.len());

    Ok(())
}

/// Unset key grabs on given window
///
/// # Arguments
///
/// * `conn` - Connection to the display
/// * `win` - Window to use
///
/// # Returns
///
/// A [`Result`] with either [`unit`] on success or otherwise [`anyhow::Error`]
pub(crate) fn unset(conn: &impl Connection, win: Window) -> Result<()> {
    // pub const XCB_GRAB_ANY: xcb_grab_t = 0;
    conn.ungrab_key(Keycode::from(0u8), win, ModMask::ANY)?;

    debug!("{}", function_name!());

    Ok(())
}
