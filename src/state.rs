//! Durable unit state
//!
//! A small record created once at first activation and mutated field by
//! field as configuration changes. The store seam keeps persistence
//! explicit: handlers mutate an owned [`StoredState`] and the driver writes
//! it back at the end of each handling pass.

use std::fs;
use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::config::{non_empty, CharmConfig};
use crate::error::Result;

/// Length of the auto-generated admin password.
const GENERATED_PASSWORD_LEN: usize = 10;

/// Unit-scoped state that survives restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    pub external_url: String,
    pub tls_secret_name: String,
    pub username: String,
    pub timezone: String,
    pub password: String,
}

impl StoredState {
    /// First-activation defaults. The password is drawn once from the
    /// injected CSPRNG and is stable thereafter unless configuration
    /// overrides it.
    pub fn initialize<R: Rng + CryptoRng>(app_name: &str, rng: &mut R) -> Self {
        Self {
            external_url: app_name.to_string(),
            tls_secret_name: String::new(),
            username: "admin".to_string(),
            timezone: "Europe/London".to_string(),
            password: generate_password(rng),
        }
    }

    /// Resolve the effective username: configuration wins when set and
    /// non-empty, otherwise the stored value.
    pub fn resolved_username<'a>(&'a self, config: &'a CharmConfig) -> &'a str {
        non_empty(config.username.as_deref()).unwrap_or(&self.username)
    }

    pub fn resolved_password<'a>(&'a self, config: &'a CharmConfig) -> &'a str {
        non_empty(config.password.as_deref()).unwrap_or(&self.password)
    }

    pub fn resolved_timezone<'a>(&'a self, config: &'a CharmConfig) -> &'a str {
        non_empty(config.timezone.as_deref()).unwrap_or(&self.timezone)
    }
}

/// Generate a random alphanumeric password from a caller-supplied CSPRNG.
pub fn generate_password<R: Rng + CryptoRng>(rng: &mut R) -> String {
    rng.sample_iter(Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Durable key/value collaborator scoped to the unit.
pub trait StateStore {
    /// Load previously persisted state, or `None` on first activation.
    fn load(&self) -> Result<Option<StoredState>>;

    fn save(&self, state: &StoredState) -> Result<()>;
}

/// JSON-file-backed store under a state directory.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join("stored-state.json"),
        }
    }

    /// Load the state or initialize defaults, persisting them immediately
    /// so the generated password survives the first pass.
    pub fn load_or_init(&self, app_name: &str) -> Result<StoredState> {
        match self.load()? {
            Some(state) => Ok(state),
            None => {
                let state = StoredState::initialize(app_name, &mut OsRng);
                self.save(&state)?;
                Ok(state)
            }
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<StoredState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, state: &StoredState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}
