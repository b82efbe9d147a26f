use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use spamguard_core::error::{Result, SpamError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub policy: PolicyConfig,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SpamError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.policy.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SpamError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8090".into()
}

/// Policy module configuration handed to [`crate::policy::SpamPolicy`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Path of the YAML rules file; re-read on every reload.
    pub rules_file: PathBuf,

    /// Periodic reload interval. 0 disables it (SIGHUP / admin endpoint only).
    #[serde(default)]
    pub reload_interval_ms: u64,
}

impl PolicyConfig {
    pub fn new(rules_file: impl Into<PathBuf>) -> Self {
        Self {
            rules_file: rules_file.into(),
            reload_interval_ms: 0,
        }
    }

    /// `None` when periodic reload is disabled.
    pub fn reload_interval(&self) -> Option<Duration> {
        (self.reload_interval_ms > 0).then(|| Duration::from_millis(self.reload_interval_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.rules_file.as_os_str().is_empty() {
            return Err(SpamError::BadRequest("policy.rules_file must not be empty".into()));
        }
        if self.reload_interval_ms != 0 && self.reload_interval_ms < 1000 {
            return Err(SpamError::BadRequest(
                "policy.reload_interval_ms must be 0 (disabled) or at least 1000".into(),
            ));
        }
        Ok(())
    }
}
