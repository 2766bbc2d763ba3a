///
/// @package filet-rs
///
/// @file Size hints functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::fmt;
use easy_min_max::{max, min};
use crate::monitor::Monitor;
use crate::rect::Rect;

// WM_NORMAL_HINTS flags (ICCCM 4.1.2.3)
pub(crate) const P_MIN_SIZE: u32 = 1 << 4;
pub(crate) const P_MAX_SIZE: u32 = 1 << 5;
pub(crate) const P_RESIZE_INC: u32 = 1 << 6;
pub(crate) const P_ASPECT: u32 = 1 << 7;
pub(crate) const P_BASE_SIZE: u32 = 1 << 8;

/// Size constraints declared by the window itself
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct SizeHints {
    pub(crate) base_width: i32,
    pub(crate) base_height: i32,
    pub(crate) inc_width: i32,
    pub(crate) inc_height: i32,
    pub(crate) min_width: i32,
    pub(crate) min_height: i32,
    pub(crate) max_width: i32,
    pub(crate) max_height: i32,
    /// Lower bound of height/width
    pub(crate) min_aspect: f32,
    /// Upper bound of width/height
    pub(crate) max_aspect: f32,
}

impl SizeHints {
    /// Parse the raw 32-bit values of a `WM_NORMAL_HINTS` property
    ///
    /// # Arguments
    ///
    /// * `values` - Property values in wire order
    ///
    /// # Returns
    ///
    /// Parsed [`SizeHints`], missing fields stay zero
    pub(crate) fn from_wm_normal_hints(values: &[u32]) -> Self {
        let mut hints = Self::default();

        let Some(flags) = values.first().copied() else {
            return hints;
        };

        let field = |idx: usize| values.get(idx).copied().unwrap_or(0) as i32;

        if 0 != flags & P_BASE_SIZE {
            hints.base_width = field(15);
            hints.base_height = field(16);
            hints.min_width = hints.base_width;
            hints.min_height = hints.base_height;
        }

        if 0 != flags & P_MAX_SIZE {
            hints.max_width = field(7);
            hints.max_height = field(8);
        }

        if 0 != flags & P_MIN_SIZE {
            hints.min_width = field(5);
            hints.min_height = field(6);
        }

        if 0 != flags & P_RESIZE_INC {
            hints.inc_width = max!(0, field(9));
            hints.inc_height = max!(0, field(10));
        }

        if 0 != flags & P_ASPECT {
            let (min_x, min_y) = (field(11), field(12));
            let (max_x, max_y) = (field(13), field(14));

            if 0 < min_x && 0 < max_y {
                hints.min_aspect = min_y as f32 / min_x as f32;
                hints.max_aspect = max_x as f32 / max_y as f32;
            }
        }

        hints
    }

    pub(crate) fn has_aspect(&self) -> bool {
        0.0 < self.min_aspect && 0.0 < self.max_aspect
    }
}

impl fmt::Display for SizeHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(base={}x{}, inc={}x{}, min={}x{}, max={}x{}, aspect={}..{})",
               self.base_width, self.base_height, self.inc_width, self.inc_height,
               self.min_width, self.min_height, self.max_width, self.max_height,
               self.min_aspect, self.max_aspect)
    }
}

/// Everything outside of a client the constraint step depends on
pub(crate) struct Bounds<'a> {
    pub(crate) screen_width: i32,
    pub(crate) screen_height: i32,
    pub(crate) monitors: &'a [Monitor],
    pub(crate) snap: i32,
    pub(crate) top_bar: bool,
    pub(crate) bar_height: i32,
}

impl Bounds<'_> {
    /// First monitor containing the point or the last one as fallback
    fn first_monitor_at(&self, x: i32, y: i32) -> Option<&Monitor> {
        self.monitors.iter()
            .find(|mon| mon.geom.contains_point(x, y))
            .or(self.monitors.last())
    }

    fn work_y(&self, mon: &Monitor) -> i32 {
        if mon.is_primary && self.top_bar { mon.geom.y + self.bar_height } else { mon.geom.y }
    }

    fn work_height(&self, mon: &Monitor) -> i32 {
        if mon.is_primary { mon.geom.height - self.bar_height } else { mon.geom.height }
    }
}

/// Client state the constraint step depends on
#[derive(Debug, Copy, Clone)]
pub(crate) struct Constraint {
    pub(crate) hints: SizeHints,
    pub(crate) border_width: i32,
    pub(crate) floating: bool,
    pub(crate) fullscreen: bool,
}

/// Result of the constraint step
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Constrained {
    /// Geometry the window should get
    pub(crate) geom: Rect,
    /// Position and size to remember as floating geometry, before snapping
    pub(crate) floating: Option<Rect>,
}

/// Apply size, position, snapping and hint constraints to a candidate
///
/// # Arguments
///
/// * `constraint` - Client hints and mode
/// * `candidate` - Requested geometry without border
/// * `bounds` - Screen, monitors and snapping config
///
/// # Returns
///
/// [`Constrained`] geometry
pub(crate) fn constrain(constraint: &Constraint, candidate: Rect, bounds: &Bounds) -> Constrained {
    let hints = &constraint.hints;
    let bw = constraint.border_width;

    let mut w = max!(1, candidate.width);
    let mut h = max!(1, candidate.height);

    // Keep at least one pixel reachable
    let (top, bottom) = if bounds.top_bar {
        (bounds.bar_height, 0)
    } else {
        (0, bounds.bar_height)
    };

    let mut x = max!(1 - w - 2 * bw, min!(bounds.screen_width - 1, candidate.x));
    let mut y = max!(1 + top - h - 2 * bw, min!(bounds.screen_height - 1 - bottom, candidate.y));

    let mut floating = None;

    if constraint.floating && !constraint.fullscreen {
        floating = Some(Rect { x, y, width: w, height: h });

        let snap = bounds.snap;

        // Near and far corner may select different monitors
        if let (Some(near), Some(far)) = (
            bounds.first_monitor_at(x + snap, y + snap),
            bounds.first_monitor_at(x + w - snap, y + h - snap),
        ) {
            if (near.geom.x - x).abs() < snap {
                x = near.geom.x;
            }

            let near_y = bounds.work_y(near);

            if (near_y - y).abs() < snap {
                y = near_y;
            }

            if (far.geom.right() - (x + w + 2 * bw)).abs() < snap {
                w = far.geom.right() - x - 2 * bw;
            }

            let far_bottom = bounds.work_y(far) + bounds.work_height(far);

            if (far_bottom - (y + h + 2 * bw)).abs() < snap {
                h = far_bottom - y - 2 * bw;
            }
        }
    }

    // Aspect limits apply to the size without base (ICCCM 4.1.2.3)
    w -= hints.base_width;
    h -= hints.base_height;

    if hints.has_aspect() && !constraint.fullscreen && 0 < w && 0 < h {
        if hints.max_aspect < w as f32 / h as f32 {
            w = (h as f32 * hints.max_aspect + 0.5) as i32;
        } else if hints.min_aspect < h as f32 / w as f32 {
            h = (w as f32 * hints.min_aspect + 0.5) as i32;
        }
    }

    if constraint.floating && !constraint.fullscreen {
        if 0 < hints.inc_width {
            w -= w % hints.inc_width;
        }

        if 0 < hints.inc_height {
            h -= h % hints.inc_height;
        }
    }

    w += hints.base_width;
    h += hints.base_height;

    if !constraint.fullscreen {
        w = max!(w, hints.min_width);
        h = max!(h, hints.min_height);

        if 0 < hints.max_width {
            w = min!(w, hints.max_width);
        }

        if 0 < hints.max_height {
            h = min!(h, hints.max_height);
        }
    }

    Constrained {
        geom: Rect { x, y, width: max!(1, w), height: max!(1, h) },
        floating,
    }
}
