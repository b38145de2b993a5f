//! The Transmission charm
//!
//! One reconciliation pass per config-changed notification, plus the
//! get-password action. The host runtime dispatches notifications strictly
//! sequentially, so handlers run to completion with exclusive access to
//! state and collaborators.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::CharmConfig;
use crate::error::Result;
use crate::ingress::{IngressConfig, IngressRequirer};
use crate::layer::{self, SERVICE_NAME};
use crate::pebble::ContainerApi;
use crate::state::StoredState;
use crate::status::UnitStatus;

/// Result payload of the `get-password` action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GetPasswordResult {
    pub password: String,
}

pub struct TransmissionCharm<C: ContainerApi, I: IngressRequirer> {
    app_name: String,
    state: StoredState,
    container: C,
    ingress: I,
    status: Option<UnitStatus>,
}

impl<C: ContainerApi, I: IngressRequirer> TransmissionCharm<C, I> {
    /// Wire up the charm and push the initial ingress configuration to the
    /// integrator, as happens at charm construction in the host runtime.
    pub fn new(
        app_name: impl Into<String>,
        config: &CharmConfig,
        state: StoredState,
        container: C,
        mut ingress: I,
    ) -> Result<Self> {
        let app_name = app_name.into();
        ingress.update_config(IngressConfig::derive(&app_name, config))?;
        Ok(Self {
            app_name,
            state,
            container,
            ingress,
            status: None,
        })
    }

    /// One reconciliation pass.
    ///
    /// Validation failures block the unit and end the pass with no further
    /// side effects. Container API failures propagate; the host runtime
    /// owns retry for the notification.
    pub fn on_config_changed(&mut self, config: &CharmConfig) -> Result<()> {
        let built = layer::build_layer(config, &mut self.state);

        let layer = match built {
            Ok(layer) => layer,
            Err(err) => {
                warn!("{err}");
                self.status = Some(UnitStatus::blocked(err.to_string()));
                return Ok(());
            }
        };

        if let Some(external_url) = &config.external_url {
            if *external_url != self.state.external_url {
                self.state.external_url = external_url.clone();
                self.ingress
                    .update_config(IngressConfig::derive(&self.app_name, config))?;
            }
        }

        if let Some(tls_secret_name) = &config.tls_secret_name {
            if *tls_secret_name != self.state.tls_secret_name {
                self.state.tls_secret_name = tls_secret_name.clone();
                self.ingress
                    .update_config(IngressConfig::derive(&self.app_name, config))?;
            }
        }

        let plan = self.container.get_plan()?;

        if plan.services != layer.services {
            self.container.add_layer(SERVICE_NAME, layer)?;
            info!("Added updated layer {SERVICE_NAME:?} to Pebble plan");

            if self.container.is_running(SERVICE_NAME)? {
                self.container.stop(SERVICE_NAME)?;
            }
            self.container.start(SERVICE_NAME)?;
            info!("Restarted {SERVICE_NAME} service");
        }

        self.status = Some(UnitStatus::Active);
        Ok(())
    }

    /// Handle the `get-password` action. Read-only.
    pub fn on_get_password_action(&self, config: &CharmConfig) -> GetPasswordResult {
        GetPasswordResult {
            password: self.state.resolved_password(config).to_string(),
        }
    }

    pub fn status(&self) -> Option<&UnitStatus> {
        self.status.as_ref()
    }

    pub fn state(&self) -> &StoredState {
        &self.state
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn ingress(&self) -> &I {
        &self.ingress
    }

    /// Release the collaborators and state, e.g. for the driver to persist
    /// them at the end of a handling pass.
    pub fn into_parts(self) -> (StoredState, C, I) {
        (self.state, self.container, self.ingress)
    }
}
