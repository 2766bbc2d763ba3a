///
/// @package filet-rs
///
/// @file State functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use derive_builder::Builder;
use log::debug;
use stdext::function_name;
use x11rb::protocol::xproto::{Keycode, Window};
use crate::client::Client;
use crate::display_action::DisplayAction;
use crate::drag::DragSession;
use crate::grab::Grab;
use crate::monitor::{Monitor, MonitorInfo};
use crate::rect::Rect;
use crate::registry::{ClientId, Registry};
use crate::size_hints::Bounds;
use crate::stacking::Stacking;
use crate::tagging::Tagging;
use crate::{focus, layout, monitor, stacking};

pub(crate) const DEFAULT_BAR_HEIGHT: i32 = 18;

/// Validated configuration values the core works with
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(default)]
pub(crate) struct Settings {
    pub(crate) border_width: i32,
    /// Edge snapping distance in pixel
    pub(crate) snap: i32,
    pub(crate) top_bar: bool,
    pub(crate) bar_height: i32,
    pub(crate) float_new_windows: bool,
    pub(crate) workspaces: Vec<String>,
    /// Fixed monitor layout, empty means autodetect
    pub(crate) monitors: Vec<Rect>,
    pub(crate) main_factors: Vec<f32>,
    pub(crate) main_counts: Vec<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            border_width: 1,
            snap: 8,
            top_bar: true,
            bar_height: DEFAULT_BAR_HEIGHT,
            float_new_windows: false,
            workspaces: (1..=9).map(|idx| idx.to_string()).collect(),
            monitors: Vec::new(),
            main_factors: vec![0.6],
            main_counts: vec![1],
        }
    }
}

pub(crate) struct WindowManagerState {
    pub(crate) settings: Settings,
    /// Set by the quit command or a termination signal
    pub(crate) quit: Arc<AtomicBool>,

    pub(crate) screen_width: i32,
    pub(crate) screen_height: i32,
    pub(crate) monitors: Vec<Monitor>,

    /// Workspaces currently displayed
    pub(crate) tagset: Tagging,

    pub(crate) clients: Registry,
    pub(crate) stacking: Stacking,
    pub(crate) drag: DragSession,
    pub(crate) sel: Option<ClientId>,

    pub(crate) bar: Option<Window>,

    pub(crate) grabs: Vec<Grab>,
    pub(crate) stack_release: Option<Keycode>,

    /// Last pointer position seen
    pub(crate) pointer: (i32, i32),
    /// Window under the pointer at the last motion sample
    pub(crate) hovered_win: Option<Window>,
    pub(crate) hovered: Option<ClientId>,

    pub(crate) actions: VecDeque<DisplayAction>,
}

impl WindowManagerState {
    /// Create a new instance
    ///
    /// # Arguments
    ///
    /// * `settings` - Validated config values
    /// * `screen` - Size of the whole X screen
    /// * `detected` - Monitors reported by the display, used when none are configured
    ///
    /// # Returns
    ///
    /// A new [`WindowManagerState`]
    pub(crate) fn new(settings: Settings, screen: Rect, detected: &[MonitorInfo]) -> Self {
        let configured: Vec<MonitorInfo> = settings.monitors.iter()
            .enumerate()
            .map(|(idx, geom)| MonitorInfo { geom: *geom, primary: 0 == idx })
            .collect();

        let infos = if configured.is_empty() { detected } else { &configured };

        let monitors = monitor::rebuild(infos, &[], &settings.main_factors, &settings.main_counts)
            .unwrap_or_else(|| vec![Monitor {
                is_primary: true,
                ..Monitor::new(screen, 0.6, 1)
            }]);

        debug!("{}: screen={}, monitors={}", function_name!(), screen, monitors.len());

        Self {
            settings,
            quit: Arc::new(AtomicBool::new(false)),
            screen_width: screen.width,
            screen_height: screen.height,
            monitors,
            tagset: Tagging::workspace(0),
            clients: Registry::default(),
            stacking: Stacking::default(),
            drag: DragSession::default(),
            sel: None,
            bar: None,
            grabs: Vec::new(),
            stack_release: None,
            pointer: (0, 0),
            hovered_win: None,
            hovered: None,
            actions: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, action: DisplayAction) {
        self.actions.push_back(action);
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.quit.load(Ordering::SeqCst)
    }

    pub(crate) fn tag_mask(&self) -> Tagging {
        Tagging::mask(self.settings.workspaces.len())
    }

    pub(crate) fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id)
    }

    pub(crate) fn selected(&self) -> Option<&Client> {
        self.sel.and_then(|id| self.clients.get(id))
    }

    pub(crate) fn is_visible(&self, id: ClientId) -> bool {
        self.clients.get(id).is_some_and(|client| client.is_visible(self.tagset))
    }

    pub(crate) fn bar_height(&self) -> i32 {
        self.settings.bar_height
    }

    pub(crate) fn bounds(&self) -> Bounds<'_> {
        Bounds {
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            monitors: &self.monitors,
            snap: self.settings.snap,
            top_bar: self.settings.top_bar,
            bar_height: self.bar_height(),
        }
    }

    /// Y position of the area windows may use on the given monitor
    pub(crate) fn work_y(&self, mon: &Monitor) -> i32 {
        if mon.is_primary && self.settings.top_bar { mon.geom.y + self.bar_height() } else { mon.geom.y }
    }

    /// Height of the area windows may use on the given monitor
    pub(crate) fn work_height(&self, mon: &Monitor) -> i32 {
        if mon.is_primary { mon.geom.height - self.bar_height() } else { mon.geom.height }
    }

    /// Check whether the pointer touches the bar edge of the primary monitor
    pub(crate) fn in_bar_zone(&self, x: i32, y: i32) -> bool {
        let Some(primary) = self.monitors.first() else {
            return false;
        };

        if self.bar.is_none() {
            return false;
        }

        let geom = &primary.geom;
        let in_width = x >= geom.x && x <= geom.right();

        if self.settings.top_bar {
            y <= geom.y && in_width
        } else {
            y >= geom.bottom() - 1 && in_width
        }
    }

    /// Index of the monitor a point belongs to, scanning from the last monitor
    pub(crate) fn monitor_at(&self, x: i32, y: i32) -> usize {
        self.monitors.iter()
            .rposition(|mon| mon.geom.contains_point(x, y))
            .unwrap_or(0)
    }

    /// Replace the monitor set, a failed detection keeps the current one
    pub(crate) fn update_monitors(&mut self, infos: &[MonitorInfo]) {
        if let Some(monitors) = monitor::rebuild(infos, &self.monitors,
            &self.settings.main_factors, &self.settings.main_counts)
        {
            self.monitors = monitors;

            commit(self);
        }
    }
}

/// Bring layout, focus and stacking in line after a mutation
///
/// # Arguments
///
/// * `state` - Global state object
pub(crate) fn commit(state: &mut WindowManagerState) {
    commit_focus(state, None);
}

/// Bring layout, focus and stacking in line and prefer the given client for focus
///
/// # Arguments
///
/// * `state` - Global state object
/// * `candidate` - Client to focus when visible
pub(crate) fn commit_focus(state: &mut WindowManagerState, candidate: Option<ClientId>) {
    layout::arrange(state);
    focus::select(state, candidate);
    stacking::restack(state, state.sel, stacking::StackAction::Raise);

    debug!("{}: sel={:?}", function_name!(), state.sel);
}
