//! Ingress configuration provider
//!
//! Computes the routing record handed to the collaborating ingress
//! integrator and defines the seam it is pushed through.

use serde::{Deserialize, Serialize};

use crate::config::{non_empty, CharmConfig};
use crate::error::Result;

/// HTTP port of the Transmission web UI / RPC endpoint.
pub const SERVICE_PORT: u16 = 9091;

/// Routing record consumed by the ingress integrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IngressConfig {
    pub service_hostname: String,
    pub service_name: String,
    pub service_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_secret_name: Option<String>,
}

impl IngressConfig {
    /// Derive the current ingress configuration. The hostname falls back
    /// to the application's own name when no `external-url` is configured;
    /// the TLS secret is only carried when set and non-empty.
    pub fn derive(app_name: &str, config: &CharmConfig) -> Self {
        Self {
            service_hostname: non_empty(config.external_url.as_deref())
                .unwrap_or(app_name)
                .to_string(),
            service_name: app_name.to_string(),
            service_port: SERVICE_PORT,
            tls_secret_name: non_empty(config.tls_secret_name.as_deref()).map(String::from),
        }
    }
}

/// Collaborating ingress-integrator charm, as seen from this one.
pub trait IngressRequirer {
    fn update_config(&mut self, config: IngressConfig) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_defaults_to_app_name() {
        let ingress = IngressConfig::derive("transmission", &CharmConfig::default());

        assert_eq!(ingress.service_hostname, "transmission");
        assert_eq!(ingress.service_name, "transmission");
        assert_eq!(ingress.service_port, 9091);
        assert_eq!(ingress.tls_secret_name, None);
    }

    #[test]
    fn external_url_and_tls_override() {
        let config = CharmConfig {
            external_url: Some("transmission.juju".to_string()),
            tls_secret_name: Some("secret".to_string()),
            ..Default::default()
        };

        let ingress = IngressConfig::derive("transmission", &config);
        assert_eq!(ingress.service_hostname, "transmission.juju");
        assert_eq!(ingress.tls_secret_name.as_deref(), Some("secret"));
    }

    #[test]
    fn empty_tls_secret_is_omitted() {
        let config = CharmConfig {
            tls_secret_name: Some(String::new()),
            ..Default::default()
        };

        let ingress = IngressConfig::derive("transmission", &config);
        assert_eq!(ingress.tls_secret_name, None);

        let json = serde_json::to_value(&ingress).unwrap();
        assert!(json.get("tls-secret-name").is_none());
        assert_eq!(json["service-hostname"], "transmission");
        assert_eq!(json["service-port"], 9091);
    }
}
