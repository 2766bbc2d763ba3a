///
/// @package filet-rs
///
/// @file Ewmh functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use anyhow::Result;
use log::debug;
use stdext::function_name;
use x11rb::connection::Connection;

x11rb::atom_manager! {
    pub(crate) Atoms: AtomsCookie {
        // ICCCM
        WM_STATE, WM_PROTOCOLS, WM_TAKE_FOCUS, WM_DELETE_WINDOW,

        // EWMH
        _NET_SUPPORTED, _NET_CLIENT_LIST, _NET_CLIENT_LIST_STACKING,
        _NET_ACTIVE_WINDOW, _NET_SUPPORTING_WM_CHECK,

        // Client
        _NET_WM_NAME,

        // Types
        _NET_WM_WINDOW_TYPE, _NET_WM_WINDOW_TYPE_DIALOG,

        // States
        _NET_WM_STATE, _NET_WM_STATE_FULLSCREEN,

        // Misc
        UTF8_STRING,
    }
}

impl Atoms {
    /// Atoms we announce in `_NET_SUPPORTED`
    pub(crate) fn supported(&self) -> [u32; 10] {
        [
            self._NET_SUPPORTED, self._NET_WM_NAME, self._NET_WM_STATE,
            self._NET_SUPPORTING_WM_CHECK, self._NET_WM_STATE_FULLSCREEN,
            self._NET_ACTIVE_WINDOW, self._NET_WM_WINDOW_TYPE,
            self._NET_WM_WINDOW_TYPE_DIALOG, self._NET_CLIENT_LIST,
            self._NET_CLIENT_LIST_STACKING,
        ]
    }
}

/// Intern all atoms
///
/// # Arguments
///
/// * `conn` - Connection to the X server
///
/// # Returns
///
/// A [`Result`] with either [`Atoms`] on success or otherwise [`anyhow::Error`]
pub(crate) fn init(conn: &impl Connection) -> Result<Atoms> {
    let atoms = Atoms::new(conn)?.reply()?;

    debug!("{}", function_name!());

    Ok(atoms)
}
