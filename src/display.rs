///
/// @package filet-rs
///
/// @file Display functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::collections::HashMap;
use std::process::{Child, Command};
use anyhow::{anyhow, Context, Result};
use hex_color::HexColor;
use log::{debug, info, warn};
use stdext::function_name;
use x11rb::connection::Connection;
use x11rb::{COPY_DEPTH_FROM_PARENT, CURRENT_TIME, NONE};
use x11rb::protocol::Event;
use x11rb::protocol::randr::{ConnectionExt as RandrExt, NotifyMask};
use x11rb::protocol::xinput::{self, ConnectionExt as XinputExt};
use x11rb::protocol::xproto::{Allow, AtomEnum, ButtonIndex, ChangeWindowAttributesAux, ClientMessageEvent,
                              CloseDown, ConfigWindow, ConfigureNotifyEvent, ConfigureRequestEvent,
                              ConfigureWindowAux, ConnectionExt, CreateWindowAux, EventMask, GrabMode,
                              GrabStatus, InputFocus, MapState, Mapping, ModMask, PropMode,
                              Property, StackMode, Window, WindowClass, CONFIGURE_NOTIFY_EVENT};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;
use crate::config::{self, Config};
use crate::display_action::DisplayAction;
use crate::event::{StateChange, WindowInfo, WmEvent};
use crate::ewmh::{self, Atoms};
use crate::grab;
use crate::monitor::{self, MonitorInfo};
use crate::rect::Rect;
use crate::size_hints::SizeHints;
use crate::state::WindowManagerState;

/// ICCCM `WM_STATE` values
const NORMAL_STATE: u32 = 1;
/// ICCCM `WM_HINTS` urgency flag
const URGENCY_HINT: u32 = 1 << 8;
/// Any pointer button in a [`x11rb::protocol::xproto::KeyButMask`]
const BUTTON_MASK: u16 = 0x1f00;

macro_rules! scale_value {
    ($val:expr, $div:expr, $mul:expr) => {
        if 0 < $val {
            (($val as f32 / $div as f32) * $mul as f32) as u16
        } else {
            0
        }
    };
}

#[derive(Default, Debug, Copy, Clone)]
struct Colors {
    border: u32,
    focus: u32,
    bar: u32,
}

pub(crate) struct Display {
    conn: RustConnection,
    screen_num: usize,
    root: Window,
    /// Supporting window for `_NET_SUPPORTING_WM_CHECK`
    support: Window,
    bar: Option<Window>,
    atoms: Atoms,
    colors: Colors,

    /// Grab config kept for keyboard remapping
    grab_config: HashMap<String, String>,
    stack_release: String,

    /// Last pointer sample handed to the core
    last_motion: Option<(i32, i32, Option<Window>)>,
    children: Vec<Child>,
}

fn alloc_color(conn: &RustConnection, color_str: &str, cmap: u32) -> Result<u32> {
    let hex_color = HexColor::parse(color_str)?;

    Ok(conn.alloc_color(cmap,
                        scale_value!(hex_color.r, 255, 65535),
                        scale_value!(hex_color.g, 255, 65535),
                        scale_value!(hex_color.b, 255, 65535))?.reply()?.pixel)
}

impl Display {
    /// Connect to the display and claim the window manager role
    ///
    /// # Arguments
    ///
    /// * `config` - Config values read either from args or config file
    ///
    /// # Returns
    ///
    /// A [`Result`] with either [`Display`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn connect(config: &Config) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(Some(&*config.display))
            .context(format!("Cannot open display `{}'", config.display))?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let cmap = screen.default_colormap;

        // Only one client may select substructure redirection on the root window
        let aux = ChangeWindowAttributesAux::default()
            .event_mask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY
                | EventMask::BUTTON_PRESS | EventMask::STRUCTURE_NOTIFY | EventMask::PROPERTY_CHANGE);

        conn.change_window_attributes(root, &aux)?.check()
            .map_err(|_| anyhow!("Another window manager may already be running"))?;

        let atoms = ewmh::init(&conn)?;

        let colors = Colors {
            border: alloc_color(&conn, &config::string_value(&config.settings,
                "border_color", config::DEFAULT_BORDER_COLOR), cmap)?,
            focus: alloc_color(&conn, &config::string_value(&config.settings,
                "focus_color", config::DEFAULT_FOCUS_COLOR), cmap)?,
            bar: alloc_color(&conn, &config::string_value(&config.settings,
                "bar_color", config::DEFAULT_BAR_COLOR), cmap)?,
        };

        // Create support window
        let support = conn.generate_id()?;

        let aux = CreateWindowAux::default()
            .event_mask(EventMask::PROPERTY_CHANGE)
            .override_redirect(1);

        conn.create_window(COPY_DEPTH_FROM_PARENT, support, root,
                           -100, -100, 1, 1, 0,
                           WindowClass::INPUT_OUTPUT, screen.root_visual, &aux)?;

        info!("Display ({}) is {}x{}", config.display, screen.width_in_pixels, screen.height_in_pixels);

        Ok(Self {
            conn,
            screen_num,
            root,
            support,
            bar: None,
            atoms,
            colors,
            grab_config: config.grabs.clone(),
            stack_release: config::string_value(&config.settings, "stack_release",
                config::DEFAULT_STACK_RELEASE),
            last_motion: None,
            children: Vec::new(),
        })
    }

    /// Size of the whole screen
    pub(crate) fn screen_rect(&self) -> Rect {
        let screen = &self.conn.setup().roots[self.screen_num];

        Rect::from((0, 0, i32::from(screen.width_in_pixels), i32::from(screen.height_in_pixels)))
    }

    /// Detect the monitor layout
    ///
    /// # Returns
    ///
    /// A [`Result`] with either [`Vec<MonitorInfo>`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn detect_monitors(&self) -> Result<Vec<MonitorInfo>> {
        monitor::detect(&self.conn, self.root, self.screen_rect())
    }

    fn load_grabs(&self, state: &mut WindowManagerState) -> Result<()> {
        let keysyms_to_keycode = grab::keyboard_mapping(&self.conn)?;

        state.grabs = grab::init(&self.grab_config, &keysyms_to_keycode)?;
        state.stack_release = grab::lookup_key(&self.stack_release, &keysyms_to_keycode)
            .inspect_err(|err| warn!("Ignoring stack release key: {}", err))
            .ok();

        grab::set(&self.conn, self.root, &state.grabs)
    }

    /// Publish EWMH support, create the bar and select all events
    ///
    /// # Arguments
    ///
    /// * `state` - Global state object
    ///
    /// # Returns
    ///
    /// A [`Result`] with either [`unit`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn configure(&mut self, state: &mut WindowManagerState) -> Result<()> {
        let name = env!("CARGO_PKG_NAME");

        self.conn.change_property8(PropMode::REPLACE, self.support, self.atoms._NET_WM_NAME,
                                   self.atoms.UTF8_STRING, name.as_bytes())?;

        for win in [self.root, self.support] {
            self.conn.change_property32(PropMode::REPLACE, win, self.atoms._NET_SUPPORTING_WM_CHECK,
                                        AtomEnum::WINDOW, &[self.support])?;
        }

        self.conn.change_property32(PropMode::REPLACE, self.root, self.atoms._NET_SUPPORTED,
                                    AtomEnum::ATOM, &self.atoms.supported())?;
        self.conn.delete_property(self.root, self.atoms._NET_CLIENT_LIST)?;

        // Create the bar on the primary monitor
        if 0 < state.settings.bar_height && let Some(primary) = state.monitors.first() {
            let bar = self.conn.generate_id()?;
            let screen = &self.conn.setup().roots[self.screen_num];

            let y = if state.settings.top_bar {
                primary.geom.y
            } else {
                primary.geom.bottom() - state.settings.bar_height
            };

            let aux = CreateWindowAux::default()
                .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE)
                .background_pixel(self.colors.bar)
                .override_redirect(1);

            self.conn.create_window(COPY_DEPTH_FROM_PARENT, bar, self.root,
                                    primary.geom.x as i16, y as i16,
                                    primary.geom.width as u16, state.settings.bar_height as u16, 0,
                                    WindowClass::INPUT_OUTPUT, screen.root_visual, &aux)?;
            self.conn.map_window(bar)?;

            self.bar = Some(bar);
            state.bar = Some(bar);
        }

        self.load_grabs(state)?;

        // Monitor changes and raw motion
        self.conn.randr_select_input(self.root, NotifyMask::OUTPUT_CHANGE | NotifyMask::SCREEN_CHANGE)?;

        self.conn.xinput_xi_query_version(2, 0)?.reply()
            .context("XInput 2 is required")?;
        self.conn.xinput_xi_select_events(self.root, &[xinput::EventMask {
            deviceid: xinput::Device::ALL_MASTER.into(),
            mask: vec![xinput::XIEventMask::RAW_MOTION.into()],
        }])?;

        self.conn.flush()?;

        debug!("{}", function_name!());

        Ok(())
    }

    /// Collect already viewable windows
    ///
    /// # Returns
    ///
    /// A [`Result`] with either map requests for every window on success or otherwise [`anyhow::Error`]
    pub(crate) fn scan(&self) -> Result<Vec<WmEvent>> {
        let mut events = Vec::new();

        for win in self.conn.query_tree(self.root)?.reply()?.children {
            let Ok(attr) = self.conn.get_window_attributes(win)?.reply() else {
                continue;
            };

            if !attr.override_redirect && MapState::VIEWABLE == attr.map_state
                && Some(win) != self.bar && self.support != win
                && let Some(info) = self.window_info(win)?
            {
                events.push(WmEvent::MapRequest(info));
            }
        }

        debug!("{}: found={}", function_name!(), events.len());

        Ok(events)
    }

    pub(crate) fn flush(&self) -> Result<()> {
        self.conn.flush()?;

        Ok(())
    }

    /// Wait for events and collapse queued pointer motion to the latest sample
    ///
    /// # Returns
    ///
    /// A [`Result`] with either a list of events on success or otherwise [`anyhow::Error`]
    pub(crate) fn next_events(&self) -> Result<Vec<Event>> {
        let mut events = vec![self.conn.wait_for_event()?];

        while let Some(event) = self.conn.poll_for_event()? {
            events.push(event);
        }

        Ok(coalesce_motion(events, |event| matches!(event,
            Event::XinputRawMotion(_) | Event::MotionNotify(_))))
    }

    fn get_property32(&self, win: Window, prop: u32, type_: impl Into<u32>) -> Result<Vec<u32>> {
        let reply = self.conn.get_property(false, win, prop, type_.into(), 0, u32::MAX)?.reply()?;

        Ok(reply.value32().map(|values| values.collect()).unwrap_or_default())
    }

    fn has_atom(&self, win: Window, prop: u32, atom: u32) -> Result<bool> {
        Ok(self.get_property32(win, prop, AtomEnum::ATOM)?.contains(&atom))
    }

    fn window_name(&self, win: Window) -> Result<String> {
        // Prefer the EWMH name over the legacy one
        for (prop, type_) in [(self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING),
                              (AtomEnum::WM_NAME.into(), AtomEnum::ANY.into())]
        {
            let reply = self.conn.get_property(false, win, prop, type_, 0, u32::MAX)?.reply()?;

            if !reply.value.is_empty() {
                return Ok(String::from_utf8_lossy(&reply.value).into_owned());
            }
        }

        Ok(String::new())
    }

    fn transient_for(&self, win: Window) -> Result<Option<Window>> {
        Ok(self.get_property32(win, AtomEnum::WM_TRANSIENT_FOR.into(), AtomEnum::WINDOW)?
            .first()
            .copied()
            .filter(|parent| NONE != *parent))
    }

    fn size_hints(&self, win: Window) -> Result<SizeHints> {
        let values = self.get_property32(win, AtomEnum::WM_NORMAL_HINTS.into(), AtomEnum::WM_SIZE_HINTS)?;

        Ok(SizeHints::from_wm_normal_hints(&values))
    }

    fn window_info(&self, win: Window) -> Result<Option<WindowInfo>> {
        let Ok(geom) = self.conn.get_geometry(win)?.reply() else {
            return Ok(None);
        };

        Ok(Some(WindowInfo {
            win,
            geom: Rect::from((i32::from(geom.x), i32::from(geom.y),
                              i32::from(geom.width), i32::from(geom.height))),
            border_width: i32::from(geom.border_width),
            name: self.window_name(win)?,
            transient_for: self.transient_for(win)?,
            dialog: self.has_atom(win, self.atoms._NET_WM_WINDOW_TYPE,
                                  self.atoms._NET_WM_WINDOW_TYPE_DIALOG)?,
            fullscreen: self.has_atom(win, self.atoms._NET_WM_STATE,
                                      self.atoms._NET_WM_STATE_FULLSCREEN)?,
            hints: self.size_hints(win)?,
        }))
    }

    fn keys_held(&self) -> Result<bool> {
        Ok(self.conn.query_keymap()?.reply()?.keys.iter().any(|keys| 0 != *keys))
    }

    fn configure_request(&self, state: &WindowManagerState, ev: &ConfigureRequestEvent) -> Result<Option<WmEvent>> {
        // Unmanaged windows get what they ask for
        if state.clients.find_by_handle(ev.window).is_none() {
            self.conn.configure_window(ev.window, &ConfigureWindowAux::from_configure_request(ev))?;

            return Ok(None);
        }

        let has = |flag: ConfigWindow| ev.value_mask.contains(flag);

        Ok(Some(WmEvent::ConfigureRequest {
            win: ev.window,
            x: has(ConfigWindow::X).then_some(i32::from(ev.x)),
            y: has(ConfigWindow::Y).then_some(i32::from(ev.y)),
            width: has(ConfigWindow::WIDTH).then_some(i32::from(ev.width)),
            height: has(ConfigWindow::HEIGHT).then_some(i32::from(ev.height)),
            border_width: has(ConfigWindow::BORDER_WIDTH).then_some(i32::from(ev.border_width)),
        }))
    }

    fn property_notify(&self, state: &WindowManagerState, win: Window, atom: u32) -> Result<Option<WmEvent>> {
        if state.clients.find_by_handle(win).is_none() {
            return Ok(None);
        }

        let event = if u32::from(AtomEnum::WM_TRANSIENT_FOR) == atom {
            WmEvent::TransientFor { win, parent: self.transient_for(win)? }
        } else if u32::from(AtomEnum::WM_NORMAL_HINTS) == atom {
            WmEvent::NormalHints { win, hints: self.size_hints(win)? }
        } else if u32::from(AtomEnum::WM_HINTS) == atom {
            let hints = self.get_property32(win, AtomEnum::WM_HINTS.into(), AtomEnum::WM_HINTS)?;

            WmEvent::Hints { win, urgent: hints.first().is_some_and(|flags| 0 != flags & URGENCY_HINT) }
        } else if u32::from(AtomEnum::WM_NAME) == atom || self.atoms._NET_WM_NAME == atom {
            WmEvent::Name { win, name: self.window_name(win)? }
        } else if self.atoms._NET_WM_WINDOW_TYPE == atom {
            WmEvent::WindowType {
                win,
                fullscreen: self.has_atom(win, self.atoms._NET_WM_STATE, self.atoms._NET_WM_STATE_FULLSCREEN)?,
            }
        } else {
            return Ok(None);
        };

        Ok(Some(event))
    }

    fn client_message(&self, ev: &ClientMessageEvent) -> Option<WmEvent> {
        let data = ev.data.as_data32();

        if self.atoms._NET_WM_STATE == ev.type_ {
            if self.atoms._NET_WM_STATE_FULLSCREEN != data[1] && self.atoms._NET_WM_STATE_FULLSCREEN != data[2] {
                return None;
            }

            let change = match data[0] {
                0 => StateChange::Remove,
                1 => StateChange::Add,
                _ => StateChange::Toggle,
            };

            Some(WmEvent::FullscreenRequest { win: ev.window, change })
        } else if self.atoms._NET_ACTIVE_WINDOW == ev.type_ {
            Some(WmEvent::ActivateRequest(ev.window))
        } else {
            None
        }
    }

    fn motion(&mut self) -> Result<Option<WmEvent>> {
        let pointer = self.conn.query_pointer(self.root)?.reply()?;

        let sample = (i32::from(pointer.root_x), i32::from(pointer.root_y),
                      Some(pointer.child).filter(|child| NONE != *child));

        // Drop samples that did not move
        if self.last_motion == Some(sample) {
            return Ok(None);
        }

        self.last_motion = Some(sample);

        Ok(Some(WmEvent::Motion {
            root_x: sample.0,
            root_y: sample.1,
            child: sample.2,
            buttons_held: 0 != u16::from(pointer.mask) & BUTTON_MASK,
        }))
    }

    /// Translate an X event into what the core understands
    ///
    /// # Arguments
    ///
    /// * `state` - Global state object
    /// * `event` - Event from the X server
    ///
    /// # Returns
    ///
    /// A [`Result`] with either an optional [`WmEvent`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn translate(&mut self, state: &mut WindowManagerState, event: Event) -> Result<Option<WmEvent>> {
        Ok(match event {
            Event::MapRequest(ev) => {
                let Ok(attr) = self.conn.get_window_attributes(ev.window)?.reply() else {
                    return Ok(None);
                };

                if attr.override_redirect {
                    return Ok(None);
                }

                self.window_info(ev.window)?.map(WmEvent::MapRequest)
            }
            Event::ConfigureRequest(ev) => self.configure_request(state, &ev)?,
            Event::DestroyNotify(ev) => Some(WmEvent::Destroy(ev.window)),
            Event::UnmapNotify(ev) => Some(WmEvent::Unmap {
                win: ev.window,
                synthetic: 0 != ev.response_type & 0x80,
            }),
            Event::ButtonPress(ev) => Some(WmEvent::ButtonPress {
                win: ev.event,
                root_x: i32::from(ev.root_x),
                root_y: i32::from(ev.root_y),
            }),
            Event::ButtonRelease(_) => Some(WmEvent::ButtonRelease { keys_held: self.keys_held()? }),
            Event::XinputRawMotion(_) | Event::MotionNotify(_) => self.motion()?,
            Event::KeyPress(ev) => Some(WmEvent::KeyPress {
                keycode: ev.detail,
                modifiers: u16::from(ev.state),
                keys_held: self.keys_held()?,
            }),
            Event::KeyRelease(ev) => Some(WmEvent::KeyRelease {
                keycode: ev.detail,
                keys_held: self.keys_held()?,
            }),
            Event::ClientMessage(ev) => {
                if state.clients.find_by_handle(ev.window).is_none() {
                    return Ok(None);
                }

                self.client_message(&ev)
            }
            Event::PropertyNotify(ev) => {
                if Property::DELETE == ev.state {
                    return Ok(None);
                }

                self.property_notify(state, ev.window, ev.atom)?
            }
            Event::MappingNotify(ev) => {
                if Mapping::KEYBOARD == ev.request {
                    self.load_grabs(state)?;
                }

                None
            }
            Event::RandrScreenChangeNotify(_) | Event::RandrNotify(_) => {
                Some(WmEvent::MonitorsChanged(self.detect_monitors()?))
            }
            Event::Error(err) => {
                // Most likely a window that is already gone
                debug!("{}: error={:?}", function_name!(), err);

                None
            }
            _ => None,
        })
    }

    fn send_protocol(&self, win: Window, proto: u32) -> Result<bool> {
        let protocols = self.get_property32(win, self.atoms.WM_PROTOCOLS, AtomEnum::ATOM)?;

        if !protocols.contains(&proto) {
            return Ok(false);
        }

        let event = ClientMessageEvent::new(32, win, self.atoms.WM_PROTOCOLS,
                                            [proto, CURRENT_TIME, 0, 0, 0]);

        self.conn.send_event(false, win, EventMask::NO_EVENT, event)?;

        Ok(true)
    }

    fn send_configure(&self, win: Window, geom: Rect, border_width: i32) -> Result<()> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: win,
            window: win,
            above_sibling: NONE,
            x: geom.x as i16,
            y: geom.y as i16,
            width: geom.width as u16,
            height: geom.height as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };

        self.conn.send_event(false, win, EventMask::STRUCTURE_NOTIFY, event)?;

        Ok(())
    }

    fn set_urgency(&self, win: Window, urgent: bool) -> Result<()> {
        let mut hints = self.get_property32(win, AtomEnum::WM_HINTS.into(), AtomEnum::WM_HINTS)?;

        let Some(flags) = hints.first_mut() else {
            return Ok(());
        };

        if urgent {
            *flags |= URGENCY_HINT;
        } else {
            *flags &= !URGENCY_HINT;
        }

        self.conn.change_property32(PropMode::REPLACE, win, AtomEnum::WM_HINTS,
                                    AtomEnum::WM_HINTS, &hints)?;

        Ok(())
    }

    fn spawn(&mut self, cmd: &str) {
        // Reap finished children
        self.children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));

        match Command::new("sh").arg("-c").arg(cmd).spawn() {
            Ok(child) => self.children.push(child),
            Err(err) => warn!("Cannot spawn `{}': {}", cmd, err),
        }
    }

    /// Carry out an action of the core
    ///
    /// # Arguments
    ///
    /// * `action` - What to do
    ///
    /// # Returns
    ///
    /// A [`Result`] with either an optional feedback [`WmEvent`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn execute(&mut self, action: &DisplayAction) -> Result<Option<WmEvent>> {
        match action {
            DisplayAction::Manage { win, border_width } => {
                self.conn.configure_window(*win, &ConfigureWindowAux::new()
                    .border_width(*border_width as u32))?;
                self.conn.change_window_attributes(*win, &ChangeWindowAttributesAux::new()
                    .border_pixel(self.colors.border)
                    .event_mask(EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY))?;
                self.conn.change_property32(PropMode::REPLACE, *win, self.atoms.WM_STATE,
                                            self.atoms.WM_STATE, &[NORMAL_STATE, NONE])?;
            }
            DisplayAction::Unmanage { win, border_width, destroyed } => {
                if !destroyed {
                    self.conn.grab_server()?;
                    self.conn.configure_window(*win, &ConfigureWindowAux::new()
                        .border_width(*border_width as u32))?;
                    self.conn.ungrab_button(ButtonIndex::ANY, *win, ModMask::ANY)?;
                    self.conn.delete_property(*win, self.atoms.WM_STATE)?;
                    self.conn.ungrab_server()?;
                }
            }
            DisplayAction::MapWindow(win) => {
                self.conn.map_window(*win)?;
            }
            DisplayAction::Configure { win, geom, border_width } => {
                self.conn.configure_window(*win, &ConfigureWindowAux::new()
                    .x(geom.x)
                    .y(geom.y)
                    .width(geom.width as u32)
                    .height(geom.height as u32)
                    .border_width(*border_width as u32))?;

                self.send_configure(*win, *geom, *border_width)?;
            }
            DisplayAction::SendConfigure { win, geom, border_width } => {
                self.send_configure(*win, *geom, *border_width)?;
            }
            DisplayAction::MoveWindow { win, x, y } => {
                self.conn.configure_window(*win, &ConfigureWindowAux::new().x(*x).y(*y))?;
            }
            DisplayAction::Restack(windows) => {
                if let Some(first) = windows.first() {
                    self.conn.configure_window(*first, &ConfigureWindowAux::new()
                        .stack_mode(StackMode::ABOVE))?;
                }

                for pair in windows.windows(2) {
                    self.conn.configure_window(pair[1], &ConfigureWindowAux::new()
                        .sibling(pair[0])
                        .stack_mode(StackMode::BELOW))?;
                }
            }
            DisplayAction::SetClientList(windows) => {
                self.conn.change_property32(PropMode::REPLACE, self.root, self.atoms._NET_CLIENT_LIST,
                                            AtomEnum::WINDOW, windows)?;
            }
            DisplayAction::SetClientListStacking(windows) => {
                self.conn.change_property32(PropMode::REPLACE, self.root, self.atoms._NET_CLIENT_LIST_STACKING,
                                            AtomEnum::WINDOW, windows)?;
            }
            DisplayAction::SetActiveWindow(Some(win)) => {
                self.conn.change_property32(PropMode::REPLACE, self.root, self.atoms._NET_ACTIVE_WINDOW,
                                            AtomEnum::WINDOW, &[*win])?;
            }
            DisplayAction::SetActiveWindow(None) => {
                self.conn.delete_property(self.root, self.atoms._NET_ACTIVE_WINDOW)?;
            }
            DisplayAction::SetBorder { win, focused } => {
                let pixel = if *focused { self.colors.focus } else { self.colors.border };

                self.conn.change_window_attributes(*win, &ChangeWindowAttributesAux::new()
                    .border_pixel(pixel))?;
            }
            DisplayAction::SetInputFocus(win) => {
                self.conn.set_input_focus(InputFocus::POINTER_ROOT, win.unwrap_or(self.root), CURRENT_TIME)?;
            }
            DisplayAction::TakeFocus(win) => {
                self.send_protocol(*win, self.atoms.WM_TAKE_FOCUS)?;
            }
            DisplayAction::GrabClickToRaise(win) => {
                self.conn.grab_button(false, *win, EventMask::BUTTON_PRESS,
                                      GrabMode::SYNC, GrabMode::SYNC, NONE, NONE,
                                      ButtonIndex::ANY, ModMask::ANY)?;
            }
            DisplayAction::ReplayClick(win) => {
                self.conn.allow_events(Allow::REPLAY_POINTER, CURRENT_TIME)?;
                self.conn.ungrab_button(ButtonIndex::ANY, *win, ModMask::ANY)?;
            }
            DisplayAction::SetFullscreenState { win, fullscreen } => {
                let atoms: &[u32] = if *fullscreen { &[self.atoms._NET_WM_STATE_FULLSCREEN] } else { &[] };

                self.conn.change_property32(PropMode::REPLACE, *win, self.atoms._NET_WM_STATE,
                                            AtomEnum::ATOM, atoms)?;
            }
            DisplayAction::SetUrgency { win, urgent } => self.set_urgency(*win, *urgent)?,
            DisplayAction::DeleteWmState(win) => {
                self.conn.delete_property(*win, self.atoms.WM_STATE)?;
            }
            DisplayAction::GrabPointer => {
                let reply = self.conn.grab_pointer(true, self.root,
                    EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                    GrabMode::ASYNC, GrabMode::ASYNC, NONE, NONE, CURRENT_TIME)?.reply()?;

                if GrabStatus::SUCCESS != reply.status {
                    return Ok(Some(WmEvent::GrabFailed));
                }
            }
            DisplayAction::UngrabPointer => {
                self.conn.ungrab_pointer(CURRENT_TIME)?;
            }
            DisplayAction::GrabKeyboard => {
                let reply = self.conn.grab_keyboard(true, self.root, CURRENT_TIME,
                    GrabMode::ASYNC, GrabMode::ASYNC)?.reply()?;

                if GrabStatus::SUCCESS != reply.status {
                    return Ok(Some(WmEvent::GrabFailed));
                }
            }
            DisplayAction::UngrabKeyboard => {
                self.conn.ungrab_keyboard(CURRENT_TIME)?;
            }
            DisplayAction::KillWindow(win) => {
                if !self.send_protocol(*win, self.atoms.WM_DELETE_WINDOW)? {
                    self.conn.grab_server()?;
                    self.conn.set_close_down_mode(CloseDown::DESTROY_ALL)?;
                    self.conn.kill_client(*win)?;
                    self.conn.ungrab_server()?;
                }
            }
            DisplayAction::Spawn(cmd) => self.spawn(cmd),
        }

        Ok(None)
    }

    /// Release everything we hold on the display
    ///
    /// # Returns
    ///
    /// A [`Result`] with either [`unit`] on success or otherwise [`anyhow::Error`]
    pub(crate) fn finish(&mut self) -> Result<()> {
        grab::unset(&self.conn, self.root)?;

        if let Some(bar) = self.bar.take() {
            self.conn.destroy_window(bar)?;
        }

        self.conn.destroy_window(self.support)?;
        self.conn.set_input_focus(InputFocus::POINTER_ROOT, self.root, CURRENT_TIME)?;
        self.conn.delete_property(self.root, self.atoms._NET_ACTIVE_WINDOW)?;
        self.conn.flush()?;

        debug!("{}", function_name!());

        Ok(())
    }
}

/// Collapse runs of consecutive motion events to the last sample of each run
///
/// # Arguments
///
/// * `events` - Queued events in arrival order
/// * `is_motion` - Predicate to tell motion events apart
///
/// # Returns
///
/// Events with every motion run reduced to its most recent sample
pub(crate) fn coalesce_motion<T>(events: Vec<T>, is_motion: impl Fn(&T) -> bool) -> Vec<T> {
    let mut coalesced: Vec<T> = Vec::with_capacity(events.len());

    for event in events {
        if is_motion(&event) && coalesced.last().is_some_and(|last| is_motion(last)) {
            coalesced.pop();
        }

        coalesced.push(event);
    }

    coalesced
}

impl Drop for Display {
    fn drop(&mut self) {
        for child in &mut self.children {
            if let Err(err) = child.try_wait() {
                debug!("{}: pid={}, err={}", function_name!(), child.id(), err);
            }
        }
    }
}

