//! Host-runtime simulator
//!
//! Drives the charm the way the orchestrator would: configuration updates
//! accumulate key by key across config-changed notifications, and every
//! handler runs to completion before the next is dispatched. Used by the
//! integration tests and available to demos.

use rand::rngs::OsRng;

use crate::charm::{GetPasswordResult, TransmissionCharm};
use crate::config::CharmConfig;
use crate::error::Result;
use crate::ingress::{IngressConfig, IngressRequirer};
use crate::pebble::{ContainerApi, LocalContainer, Plan};
use crate::state::StoredState;
use crate::status::UnitStatus;

/// Ingress double that records every configuration push.
#[derive(Clone, Debug, Default)]
pub struct RecordingIngress {
    pub pushes: Vec<IngressConfig>,
}

impl IngressRequirer for RecordingIngress {
    fn update_config(&mut self, config: IngressConfig) -> Result<()> {
        self.pushes.push(config);
        Ok(())
    }
}

pub struct Harness {
    charm: TransmissionCharm<LocalContainer, RecordingIngress>,
    config: CharmConfig,
}

impl Harness {
    pub fn new(app_name: &str) -> Self {
        let state = StoredState::initialize(app_name, &mut OsRng);
        Self::with_state(app_name, state)
    }

    pub fn with_state(app_name: &str, state: StoredState) -> Self {
        let config = CharmConfig::default();
        let charm = TransmissionCharm::new(
            app_name,
            &config,
            state,
            LocalContainer::new(),
            RecordingIngress::default(),
        )
        .expect("recording ingress cannot fail");
        Self { charm, config }
    }

    /// Merge a partial configuration update and dispatch config-changed.
    pub fn update_config(&mut self, update: CharmConfig) -> Result<()> {
        self.config.merge(update);
        self.charm.on_config_changed(&self.config)
    }

    pub fn run_get_password_action(&self) -> GetPasswordResult {
        self.charm.on_get_password_action(&self.config)
    }

    pub fn pebble_plan(&self) -> Plan {
        self.charm
            .container()
            .get_plan()
            .expect("local container cannot fail")
    }

    pub fn unit_status(&self) -> Option<&UnitStatus> {
        self.charm.status()
    }

    pub fn stored_state(&self) -> &StoredState {
        self.charm.state()
    }

    pub fn container(&self) -> &LocalContainer {
        self.charm.container()
    }

    /// All ingress configuration pushes so far, including the one made at
    /// charm construction.
    pub fn ingress_pushes(&self) -> &[IngressConfig] {
        &self.charm.ingress().pushes
    }
}
