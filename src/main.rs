///
/// @package filet-rs
///
/// @file Main functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

mod client;
mod command;
mod config;
mod display;
mod display_action;
mod drag;
mod event;
mod ewmh;
mod focus;
mod grab;
mod layout;
mod logger;
mod monitor;
mod rect;
mod registry;
mod size_hints;
mod stacking;
mod state;
mod tagging;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use log::{debug, error, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use crate::config::Config;
use crate::display::Display;
use crate::state::{Settings, WindowManagerState};

fn install_signal_handler(state: &WindowManagerState) -> Result<()> {
    for signal in [SIGTERM, SIGINT] {
        signal_hook::flag::register(signal, state.quit.clone())
            .with_context(|| format!("Failed to set handler for signal {}", signal))?;
    }

    Ok(())
}

fn print_version() {
    info!("{} {} - Copyright (c) 2025-present {}",
        env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));
    info!("Released under the GNU Public License");
    info!("Compiled for X11");
}

fn main() -> Result<()> {
    // Load config
    let (config, path, _format) = Config::parse_info();

    logger::init(&config)?;

    info!("Reading file `{:?}'", path.unwrap_or_default());

    print_version();

    let mut display = Display::connect(&config)?;

    let settings = Settings::from_config(&config.settings);
    let monitors = display.detect_monitors()?;
    let mut state = WindowManagerState::new(settings, display.screen_rect(), &monitors);

    drop(config);

    install_signal_handler(&state)?;

    display.configure(&mut state)?;

    // Adopt windows that already exist
    for event in display.scan()? {
        event::handle(&mut state, event);
    }

    // Run event handler
    if let Err(e) = event::handle_requests(&mut state, &mut display) {
        error!("Error: {}", e);
    }

    event::shutdown(&mut state);

    while let Some(action) = state.actions.pop_front() {
        if let Err(err) = display.execute(&action) {
            debug!("Ignoring failed action on exit: {}", err);
        }
    }

    display.finish()?;

    info!("Exit");

    Ok(())
}
