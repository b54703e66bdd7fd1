// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration directory resolution.

use std::path::PathBuf;

const APP_DIR: &str = "docukit";
const CONFIG_FILE: &str = "config.json";

/// Return the configuration directory. Nothing is created here; saving the
/// config creates it on demand.
pub fn config_dir() -> PathBuf {
    config_dir_from(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn config_dir_from(xdg_config_home: Option<String>, home: Option<String>) -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Some(xdg) = xdg_config_home.filter(|value| !value.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = home.filter(|value| !value.is_empty()) {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }
    // Last resort: next to the working directory
    PathBuf::from(".").join(APP_DIR)
}
