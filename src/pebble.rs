//! Workload container plan seam
//!
//! The charm talks to the workload's process manager through
//! [`ContainerApi`]: fetch the merged plan, merge in a layer, and control
//! the service. Calls are synchronous; failures are fatal for the current
//! notification and left to the host runtime's retry policy.
//!
//! [`LocalContainer`] is an in-process implementation with Pebble's
//! additive layer-merge semantics. It backs the test harness and, being
//! serializable, the CLI's simulated state directory.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::{Layer, ServiceSpec};

/// The active, merged service specification for a container.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub services: BTreeMap<String, ServiceSpec>,
}

/// Synchronous client surface of the container's process manager.
pub trait ContainerApi {
    fn get_plan(&self) -> Result<Plan>;

    /// Merge `layer` into the plan under `label`. A layer with the same
    /// label is replaced; other layers are preserved.
    fn add_layer(&mut self, label: &str, layer: Layer) -> Result<()>;

    fn is_running(&self, service: &str) -> Result<bool>;

    fn start(&mut self, service: &str) -> Result<()>;

    fn stop(&mut self, service: &str) -> Result<()>;
}

/// In-process container simulation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocalContainer {
    layers: Vec<(String, Layer)>,
    running: BTreeSet<String>,
    #[serde(default)]
    pub layers_added: u64,
    #[serde(default)]
    pub starts: u64,
    #[serde(default)]
    pub stops: u64,
}

impl LocalContainer {
    pub fn new() -> Self {
        Self::default()
    }

    fn service_known(&self, service: &str) -> bool {
        self.layers
            .iter()
            .any(|(_, layer)| layer.services.contains_key(service))
    }
}

impl ContainerApi for LocalContainer {
    fn get_plan(&self) -> Result<Plan> {
        let mut plan = Plan::default();
        // Later layers win per service name.
        for (_, layer) in &self.layers {
            for (name, spec) in &layer.services {
                plan.services.insert(name.clone(), spec.clone());
            }
        }
        Ok(plan)
    }

    fn add_layer(&mut self, label: &str, layer: Layer) -> Result<()> {
        self.layers_added += 1;
        if let Some(existing) = self.layers.iter_mut().find(|(l, _)| l == label) {
            existing.1 = layer;
        } else {
            self.layers.push((label.to_string(), layer));
        }
        Ok(())
    }

    fn is_running(&self, service: &str) -> Result<bool> {
        if !self.service_known(service) {
            return Err(Error::Container(format!("unknown service {service:?}")));
        }
        Ok(self.running.contains(service))
    }

    fn start(&mut self, service: &str) -> Result<()> {
        if !self.service_known(service) {
            return Err(Error::Container(format!("unknown service {service:?}")));
        }
        self.starts += 1;
        self.running.insert(service.to_string());
        Ok(())
    }

    fn stop(&mut self, service: &str) -> Result<()> {
        if !self.service_known(service) {
            return Err(Error::Container(format!("unknown service {service:?}")));
        }
        self.stops += 1;
        self.running.remove(service);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{ServiceOverride, ServiceStartup};

    fn layer_with_service(name: &str, command: &str) -> Layer {
        Layer {
            summary: format!("{name} layer"),
            description: String::new(),
            services: BTreeMap::from([(
                name.to_string(),
                ServiceSpec {
                    override_: ServiceOverride::Replace,
                    summary: name.to_string(),
                    command: command.to_string(),
                    startup: ServiceStartup::Enabled,
                    environment: BTreeMap::new(),
                },
            )]),
        }
    }

    #[test]
    fn empty_container_has_empty_plan() {
        let container = LocalContainer::new();
        assert_eq!(container.get_plan().unwrap(), Plan::default());
    }

    #[test]
    fn add_layer_preserves_unrelated_layers() {
        let mut container = LocalContainer::new();
        container
            .add_layer("sidecar", layer_with_service("sidecar", "/bin/sidecar"))
            .unwrap();
        container
            .add_layer("transmission", layer_with_service("transmission", "/init"))
            .unwrap();

        let plan = container.get_plan().unwrap();
        assert_eq!(plan.services.len(), 2);
        assert!(plan.services.contains_key("sidecar"));
        assert!(plan.services.contains_key("transmission"));
    }

    #[test]
    fn add_layer_replaces_same_label() {
        let mut container = LocalContainer::new();
        container
            .add_layer("transmission", layer_with_service("transmission", "/init"))
            .unwrap();
        container
            .add_layer(
                "transmission",
                layer_with_service("transmission", "/init-v2"),
            )
            .unwrap();

        let plan = container.get_plan().unwrap();
        assert_eq!(plan.services["transmission"].command, "/init-v2");
    }

    #[test]
    fn service_lifecycle_requires_known_service() {
        let mut container = LocalContainer::new();
        assert!(container.start("transmission").is_err());
        assert!(container.is_running("transmission").is_err());

        container
            .add_layer("transmission", layer_with_service("transmission", "/init"))
            .unwrap();

        assert!(!container.is_running("transmission").unwrap());
        container.start("transmission").unwrap();
        assert!(container.is_running("transmission").unwrap());
        container.stop("transmission").unwrap();
        assert!(!container.is_running("transmission").unwrap());
    }
}
