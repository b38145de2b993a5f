//! transmission-operator: charm-style operator glue for the Transmission
//! workload.
//!
//! This crate translates administrator configuration into a Pebble service
//! layer, reconciles it against the workload container's active plan, keeps
//! a small piece of durable unit state (including a generated credential),
//! and publishes ingress routing configuration to a collaborating ingress
//! integrator. The host orchestration runtime is simulated by the
//! [`harness`] module; production collaborators plug in through the
//! [`pebble::ContainerApi`], [`ingress::IngressRequirer`], and
//! [`state::StateStore`] seams.

pub mod charm;
pub mod config;
pub mod error;
pub mod harness;
pub mod ingress;
pub mod layer;
pub mod pebble;
pub mod state;
pub mod status;


pub use crate::error::{Error, Result};
