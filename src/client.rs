///
/// @package filet-rs
///
/// @file Client functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::fmt;
use bitflags::bitflags;
use easy_min_max::max;
use x11rb::protocol::xproto::Window;
use crate::rect::Rect;
use crate::size_hints::{Constraint, SizeHints};
use crate::tagging::Tagging;

const MIN_WIDTH: i32 = 1;
const MIN_HEIGHT: i32 = 1;

bitflags! {
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub(crate) struct ClientFlags: u32 {
        const MODE_FLOAT = 1 << 0; // Float mode
        const MODE_FULL = 1 << 1; // Fullscreen mode
        const MODE_URGENT = 1 << 2; // Urgent mode
        const FULL_FLOAT = 1 << 3; // Float mode before fullscreen
        const TYPE_DIALOG = 1 << 4; // Dialog type
    }
}

/// Which sub-layer of the stacking order a client belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Layer {
    Floating = 0,
    Tiled = 1,
    Fullscreen = 2,
}

#[derive(Default, Debug, Clone)]
pub(crate) struct Client {
    pub(crate) flags: ClientFlags,
    pub(crate) tags: Tagging,

    pub(crate) win: Window,
    pub(crate) name: String,

    /// Current geometry without border
    pub(crate) geom: Rect,
    /// Geometry to restore when leaving tiled or fullscreen mode
    pub(crate) float_geom: Rect,

    pub(crate) border_width: i32,
    /// Border width before fullscreen
    pub(crate) full_border_width: i32,
    /// Border width the window had before we managed it
    pub(crate) orig_border_width: i32,

    pub(crate) hints: SizeHints,
}

impl Client {
    pub(crate) fn new(win: Window, geom: Rect) -> Self {
        let geom = Rect {
            width: max!(MIN_WIDTH, geom.width),
            height: max!(MIN_HEIGHT, geom.height),
            ..geom
        };

        Self {
            win,
            geom,
            float_geom: geom,
            ..Self::default()
        }
    }

    pub(crate) fn is_visible(&self, tagset: Tagging) -> bool {
        self.tags.intersects(tagset)
    }

    pub(crate) fn is_floating(&self) -> bool {
        self.flags.contains(ClientFlags::MODE_FLOAT)
    }

    pub(crate) fn is_fullscreen(&self) -> bool {
        self.flags.contains(ClientFlags::MODE_FULL)
    }

    pub(crate) fn is_urgent(&self) -> bool {
        self.flags.contains(ClientFlags::MODE_URGENT)
    }

    pub(crate) fn is_dialog(&self) -> bool {
        self.flags.contains(ClientFlags::TYPE_DIALOG)
    }

    pub(crate) fn layer(&self) -> Layer {
        if self.is_fullscreen() {
            Layer::Fullscreen
        } else if self.is_floating() {
            Layer::Floating
        } else {
            Layer::Tiled
        }
    }

    /// Width including both borders
    pub(crate) fn outer_width(&self) -> i32 {
        self.geom.width + 2 * self.border_width
    }

    /// Height including both borders
    pub(crate) fn outer_height(&self) -> i32 {
        self.geom.height + 2 * self.border_width
    }

    pub(crate) fn outer_geom(&self) -> Rect {
        Rect {
            width: self.outer_width(),
            height: self.outer_height(),
            ..self.geom
        }
    }

    pub(crate) fn constraint(&self) -> Constraint {
        Constraint {
            hints: self.hints,
            border_width: self.border_width,
            floating: self.is_floating(),
            fullscreen: self.is_fullscreen(),
        }
    }

    /// Check whether the pointer is on the window or its border
    pub(crate) fn in_zone(&self, x: i32, y: i32) -> bool {
        let bw = self.border_width;

        x >= self.geom.x - bw
            && y >= self.geom.y - bw
            && x <= self.geom.x + self.outer_width() + bw
            && y <= self.geom.y + self.outer_height() + bw
    }

    /// Check whether the pointer is on the top or left border
    pub(crate) fn in_move_zone(&self, x: i32, y: i32) -> bool {
        let bw = self.border_width;

        self.in_zone(x, y)
            && ((self.geom.x - x).abs() <= bw || (self.geom.y - y).abs() <= bw)
    }

    /// Check whether the pointer is on the bottom or right border
    pub(crate) fn in_resize_zone(&self, x: i32, y: i32) -> bool {
        let bw = self.border_width;

        self.in_zone(x, y)
            && ((self.geom.x + self.outer_width() - x).abs() <= bw
                || (self.geom.y + self.outer_height() - y).abs() <= bw)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name={}, win={}, tags={:#x}, flags={:?}, geom={}",
               self.name, self.win, self.tags.bits(), self.flags, self.geom)
    }
}
