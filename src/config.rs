//! Charm configuration schema
//!
//! Administrator-supplied options arrive as an optional-by-key bag; every
//! option is a string. `Option<String>` distinguishes an absent option from
//! one explicitly set, while the resolution helpers on
//! [`crate::state::StoredState`] additionally treat empty strings as unset.

use serde::{Deserialize, Serialize};

/// The full configuration surface of the charm.
///
/// Field names serialize with their external kebab-case keys, so a config
/// file for the CLI looks exactly like the operator-facing schema:
///
/// ```yaml
/// username: johndoe
/// timezone: Europe/Lisbon
/// external-url: transmission.juju
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CharmConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// IANA timezone identifier, e.g. `Europe/Lisbon`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Hostname under which the workload is exposed through ingress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_secret_name: Option<String>,

    /// One of the four supported web UI theme paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_theme: Option<String>,

    /// RPC whitelist, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<String>,

    /// Host whitelist, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_whitelist: Option<String>,
}

impl CharmConfig {
    /// Apply a partial update over this configuration, the way the host
    /// runtime accumulates per-key changes across config-changed events.
    /// Only options present in `update` are overwritten.
    pub fn merge(&mut self, update: CharmConfig) {
        macro_rules! take {
            ($field:ident) => {
                if update.$field.is_some() {
                    self.$field = update.$field;
                }
            };
        }
        take!(username);
        take!(password);
        take!(timezone);
        take!(external_url);
        take!(tls_secret_name);
        take!(ui_theme);
        take!(whitelist);
        take!(host_whitelist);
    }
}

/// Treat an absent or empty option as unset when resolving against stored
/// defaults.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_kebab_case_keys() {
        let config: CharmConfig = serde_yaml::from_str(
            "username: johndoe\nexternal-url: transmission.juju\ntls-secret-name: secret\nui-theme: /kettu/\nhost-whitelist: localhost\n",
        )
        .unwrap();

        assert_eq!(config.username.as_deref(), Some("johndoe"));
        assert_eq!(config.external_url.as_deref(), Some("transmission.juju"));
        assert_eq!(config.tls_secret_name.as_deref(), Some("secret"));
        assert_eq!(config.ui_theme.as_deref(), Some("/kettu/"));
        assert_eq!(config.host_whitelist.as_deref(), Some("localhost"));
        assert_eq!(config.password, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<CharmConfig, _> = serde_yaml::from_str("user-name: johndoe\n");
        assert!(result.is_err());
    }

    #[test]
    fn merge_overwrites_only_present_options() {
        let mut config = CharmConfig {
            username: Some("john".to_string()),
            timezone: Some("Europe/Lisbon".to_string()),
            ..Default::default()
        };

        config.merge(CharmConfig {
            username: Some("jane".to_string()),
            whitelist: Some("127.0.0.1".to_string()),
            ..Default::default()
        });

        assert_eq!(config.username.as_deref(), Some("jane"));
        assert_eq!(config.timezone.as_deref(), Some("Europe/Lisbon"));
        assert_eq!(config.whitelist.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn non_empty_filters_empty_strings() {
        assert_eq!(non_empty(Some("x")), Some("x"));
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }
}
