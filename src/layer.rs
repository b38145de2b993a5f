//! Pebble service layer for the Transmission workload
//!
//! [`build_layer`] is the configuration validator and layer builder: it
//! turns (configuration, stored state) into either a complete layer or a
//! [`ValidationError`]. Checks run in a fixed priority order — username,
//! then timezone, then ui-theme — and the first failure wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::CharmConfig;
use crate::state::StoredState;

/// Name of the managed Pebble service (and of the layer label).
pub const SERVICE_NAME: &str = "transmission";

/// Fixed workload entrypoint inside the container image.
const SERVICE_COMMAND: &str = "/init";

/// uid/gid the workload runs as.
const PUID: &str = "1000";
const PGID: &str = "1000";

/// The four supported web UI theme paths.
const UI_THEMES: [&str; 4] = [
    "/combustion-release/",
    "/transmission-web-control/",
    "/kettu/",
    "/flood-for-transmission/",
];

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap());

/// Validation failures surfaced to the operator as a blocked unit status.
/// Display strings are the exact user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid username defined.")]
    InvalidUsername,
    #[error("Invalid timezone defined.")]
    InvalidTimezone,
    #[error("Invalid ui theme defined.")]
    InvalidUiTheme,
}

/// A named, mergeable fragment of the container's service specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub summary: String,
    pub description: String,
    pub services: BTreeMap<String, ServiceSpec>,
}

/// One service entry within a layer, in Pebble's wire shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    #[serde(rename = "override")]
    pub override_: ServiceOverride,
    pub summary: String,
    pub command: String,
    pub startup: ServiceStartup,
    pub environment: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceOverride {
    Replace,
    Merge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStartup {
    Enabled,
    Disabled,
}

/// Build the Transmission layer from configuration and stored state.
///
/// A config-supplied password is written into `state` after the username
/// check but before the timezone and ui-theme checks; a later validation
/// failure does not roll that write back.
pub fn build_layer(
    config: &CharmConfig,
    state: &mut StoredState,
) -> Result<Layer, ValidationError> {
    if !USERNAME_REGEX.is_match(state.resolved_username(config)) {
        return Err(ValidationError::InvalidUsername);
    }

    if let Some(password) = &config.password {
        state.password = password.clone();
    }

    if let Some(timezone) = &config.timezone {
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ValidationError::InvalidTimezone);
        }
    }

    let mut environment = BTreeMap::from([
        ("PUID".to_string(), PUID.to_string()),
        ("PGID".to_string(), PGID.to_string()),
        ("TZ".to_string(), state.resolved_timezone(config).to_string()),
        (
            "USER".to_string(),
            state.resolved_username(config).to_string(),
        ),
        (
            "PASS".to_string(),
            state.resolved_password(config).to_string(),
        ),
    ]);

    if let Some(theme) = &config.ui_theme {
        if !UI_THEMES.contains(&theme.as_str()) {
            return Err(ValidationError::InvalidUiTheme);
        }
        environment.insert("TRANSMISSION_WEB_HOME".to_string(), theme.clone());
    }

    // No validation for the whitelists; both are verbatim pass-through.
    if let Some(whitelist) = &config.whitelist {
        environment.insert("WHITELIST".to_string(), whitelist.clone());
    }
    if let Some(host_whitelist) = &config.host_whitelist {
        environment.insert("HOST_WHITELIST".to_string(), host_whitelist.clone());
    }

    let service = ServiceSpec {
        override_: ServiceOverride::Replace,
        summary: SERVICE_NAME.to_string(),
        command: SERVICE_COMMAND.to_string(),
        startup: ServiceStartup::Enabled,
        environment,
    };

    Ok(Layer {
        summary: "transmission layer".to_string(),
        description: "pebble config layer for transmission".to_string(),
        services: BTreeMap::from([(SERVICE_NAME.to_string(), service)]),
    })
}
