///
/// @package filet-rs
///
/// @file Config functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use clap_config_file::ClapConfigFile;
use std::collections::HashMap;
use easy_min_max::{max, min};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use stdext::function_name;
use crate::monitor::{MAX_MAIN_FACTOR, MIN_MAIN_FACTOR};
use crate::rect::Rect;
use crate::state::{Settings, SettingsBuilder};
use crate::tagging::MAX_WORKSPACES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum MixedConfigVal {
    B(bool),
    I(i32),
    F(f32),
    S(String),
    VI(Vec<i32>),
    VF(Vec<f32>),
    VS(Vec<String>),
    VVI(Vec<Vec<i32>>),
}

#[derive(ClapConfigFile)]
#[config_file_name = "filet"]
#[config_file_formats = "yaml,toml,json"]
pub(crate) struct Config {
    /// Connect to DISPLAY
    #[config_arg(short = 'd', default_value = ":0", accept_from = "cli_only")]
    pub(crate) display: String,

    /// Set logging level LEVEL
    #[config_arg(short = 'l', name = "level", default_value = "", accept_from = "cli_only")]
    pub(crate) loglevel: String,

    /// Print debugging messages
    #[config_arg(short = 'D', default_value = false, accept_from = "cli_only")]
    pub(crate) debug: bool,

    #[config_arg(multi_value_behavior = "extend", accept_from = "config_only")]
    pub(crate) settings: HashMap<String, MixedConfigVal>,

    #[config_arg(multi_value_behavior = "extend", accept_from = "config_only")]
    pub(crate) grabs: HashMap<String, String>,
}

/// Default colors of window borders and the bar
pub(crate) const DEFAULT_BORDER_COLOR: &str = "#555555";
pub(crate) const DEFAULT_FOCUS_COLOR: &str = "#dd4422";
pub(crate) const DEFAULT_BAR_COLOR: &str = "#111111";

/// Default key to commit window cycling
pub(crate) const DEFAULT_STACK_RELEASE: &str = "Alt_L";

macro_rules! warn_invalid {
    ($key:expr, $value:expr) => {
        warn!("Ignoring invalid value for `{}': {:?}", $key, $value)
    };
}

/// Look up a string value from the settings
///
/// # Arguments
///
/// * `values` - Untyped settings map
/// * `key` - Name of the setting
/// * `default` - Value to use when the setting is missing or not a string
///
/// # Returns
///
/// The configured string or the default
pub(crate) fn string_value(values: &HashMap<String, MixedConfigVal>, key: &str, default: &str) -> String {
    match values.get(key) {
        Some(MixedConfigVal::S(value)) => value.clone(),
        Some(other) => {
            warn_invalid!(key, other);

            default.to_string()
        }
        None => default.to_string(),
    }
}

fn parse_monitors(value: &MixedConfigVal) -> Option<Vec<Rect>> {
    let MixedConfigVal::VVI(items) = value else {
        return None;
    };

    items.iter()
        .map(|item| match item.as_slice() {
            [x, y, width, height] if 0 < *width && 0 < *height => Some(Rect::from((*x, *y, *width, *height))),
            _ => None,
        })
        .collect()
}

fn parse_factors(value: &MixedConfigVal) -> Option<Vec<f32>> {
    let factors = match value {
        MixedConfigVal::F(factor) => vec![*factor],
        MixedConfigVal::VF(factors) if !factors.is_empty() => factors.clone(),
        _ => return None,
    };

    Some(factors.into_iter()
        .map(|factor| min!(MAX_MAIN_FACTOR, max!(MIN_MAIN_FACTOR, factor)))
        .collect())
}

fn parse_counts(value: &MixedConfigVal) -> Option<Vec<usize>> {
    let counts = match value {
        MixedConfigVal::I(count) => vec![*count],
        MixedConfigVal::VI(counts) if !counts.is_empty() => counts.clone(),
        _ => return None,
    };

    Some(counts.into_iter().map(|count| max!(1, count) as usize).collect())
}

impl Settings {
    /// Validate the untyped settings map
    ///
    /// Invalid values are reported and replaced by their defaults.
    ///
    /// # Arguments
    ///
    /// * `values` - Untyped settings map
    ///
    /// # Returns
    ///
    /// A new [`Settings`]
    pub(crate) fn from_config(values: &HashMap<String, MixedConfigVal>) -> Self {
        let mut builder = SettingsBuilder::default();

        for (key, value) in values.iter() {
            match (key.as_str(), value) {
                ("border_width", MixedConfigVal::I(width)) if 0 <= *width => {
                    builder.border_width(*width);
                }
                ("snap", MixedConfigVal::I(snap)) if 0 <= *snap => {
                    builder.snap(*snap);
                }
                ("top_bar", MixedConfigVal::B(top_bar)) => {
                    builder.top_bar(*top_bar);
                }
                ("bar_height", MixedConfigVal::I(height)) if 0 <= *height => {
                    builder.bar_height(*height);
                }
                ("float_new_windows", MixedConfigVal::B(float)) => {
                    builder.float_new_windows(*float);
                }
                ("workspaces", MixedConfigVal::VS(names))
                    if !names.is_empty() && MAX_WORKSPACES >= names.len() =>
                {
                    builder.workspaces(names.clone());
                }
                ("monitors", value) => match parse_monitors(value) {
                    Some(monitors) => {
                        builder.monitors(monitors);
                    }
                    None => warn_invalid!(key, value),
                },
                ("main_factors", value) => match parse_factors(value) {
                    Some(factors) => {
                        builder.main_factors(factors);
                    }
                    None => warn_invalid!(key, value),
                },
                ("main_counts", value) => match parse_counts(value) {
                    Some(counts) => {
                        builder.main_counts(counts);
                    }
                    None => warn_invalid!(key, value),
                },
                // Handled by the display
                ("stack_release" | "border_color" | "focus_color" | "bar_color", _) => {}
                _ => warn_invalid!(key, value),
            }
        }

        let settings = builder.build().unwrap_or_default();

        debug!("{}: settings={:?}", function_name!(), settings);

        settings
    }
}
