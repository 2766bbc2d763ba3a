///
/// @package filet-rs
///
/// @file Monitor functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::fmt;
use anyhow::Result;
use log::{debug, warn};
use stdext::function_name;
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as randr_ext;
use x11rb::protocol::xinerama::ConnectionExt as xinerama_ext;
use x11rb::protocol::xproto::Window;
use crate::rect::Rect;

pub(crate) const MIN_MAIN_FACTOR: f32 = 0.05;
pub(crate) const MAX_MAIN_FACTOR: f32 = 0.95;

/// Rectangle reported by the detection backends
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct MonitorInfo {
    pub(crate) geom: Rect,
    pub(crate) primary: bool,
}

#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct Monitor {
    pub(crate) geom: Rect,
    pub(crate) is_primary: bool,

    /// Fraction of the width used by the main area
    pub(crate) main_factor: f32,
    /// Number of clients in the main area
    pub(crate) main_count: usize,
}

impl Monitor {
    pub(crate) fn new(geom: Rect, main_factor: f32, main_count: usize) -> Self {
        let monitor = Self {
            geom,
            is_primary: false,
            main_factor: main_factor.clamp(MIN_MAIN_FACTOR, MAX_MAIN_FACTOR),
            main_count: main_count.max(1),
        };

        debug!("{}: {}", function_name!(), monitor);

        monitor
    }

    /// Check whether the center of the given outer rect lies on this monitor
    pub(crate) fn contains_center(&self, outer: &Rect) -> bool {
        self.geom.contains_point(outer.x + outer.width / 2, outer.y + outer.height / 2)
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geom={}, primary={}, main_factor={}, main_count={}",
               self.geom, self.is_primary, self.main_factor, self.main_count)
    }
}

/// Build the monitor set from detected rects
///
/// # Arguments
///
/// * `infos` - Detected monitor rects
/// * `previous` - Current monitor set to carry layout parameters over from
/// * `factors` - Configured main factors, last value repeats
/// * `counts` - Configured main counts, last value repeats
///
/// # Returns
///
/// New monitor set with the primary monitor first or [`None`] when nothing was detected
pub(crate) fn rebuild(infos: &[MonitorInfo], previous: &[Monitor],
                      factors: &[f32], counts: &[usize]) -> Option<Vec<Monitor>>
{
    if infos.is_empty() {
        warn!("{}: No monitors detected, keeping previous", function_name!());

        return None;
    }

    let mut monitors: Vec<Monitor> = infos.iter()
        .enumerate()
        .map(|(idx, info)| {
            let (factor, count) = match previous.get(idx) {
                Some(prev) => (prev.main_factor, prev.main_count),
                None => (configured(factors, idx, 0.6), configured(counts, idx, 1)),
            };

            Monitor::new(info.geom, factor, count)
        })
        .collect();

    // Push the primary monitor to the front
    if let Some(primary_idx) = infos.iter().position(|info| info.primary) {
        let geom = monitors[primary_idx].geom;

        monitors[primary_idx].geom = monitors[0].geom;
        monitors[0].geom = geom;
    }

    for (idx, monitor) in monitors.iter_mut().enumerate() {
        monitor.is_primary = 0 == idx;
    }

    debug!("{}: monitors={}", function_name!(), monitors.len());

    Some(monitors)
}

fn configured<T: Copy>(values: &[T], idx: usize, default_value: T) -> T {
    values.get(idx).or(values.last()).copied().unwrap_or(default_value)
}

/// Ask the X server for the current monitor layout
///
/// # Arguments
///
/// * `conn` - Connection to the X server
/// * `root` - Root window
/// * `screen` - Size of the whole screen as fallback
///
/// # Returns
///
/// A [`Result`] with either [`Vec<MonitorInfo>`] on success or otherwise [`anyhow::Error`]
pub(crate) fn detect(conn: &impl Connection, root: Window, screen: Rect) -> Result<Vec<MonitorInfo>> {
    let mut infos = Vec::new();

    // Prefer xrandr over xinerama
    if conn.randr_query_version(1, 5).is_ok_and(|cookie| cookie.reply().is_ok()) {
        for monitor in conn.randr_get_monitors(root, true)?.reply()?.monitors {
            infos.push(MonitorInfo {
                geom: Rect::from((i32::from(monitor.x), i32::from(monitor.y),
                                  i32::from(monitor.width), i32::from(monitor.height))),
                primary: monitor.primary,
            });
        }
    }

    if infos.is_empty()
        && conn.xinerama_is_active().is_ok_and(|cookie| cookie.reply().is_ok_and(|reply| 0 != reply.state))
    {
        for screen_info in conn.xinerama_query_screens()?.reply()?.screen_info {
            infos.push(MonitorInfo {
                geom: Rect::from((i32::from(screen_info.x_org), i32::from(screen_info.y_org),
                                  i32::from(screen_info.width), i32::from(screen_info.height))),
                primary: infos.is_empty(),
            });
        }
    }

    // Create default monitor
    if infos.is_empty() {
        infos.push(MonitorInfo { geom: screen, primary: true });
    }

    debug!("{}: found={}", function_name!(), infos.len());

    Ok(infos)
}
