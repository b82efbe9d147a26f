//! Config loaders: strict gateway config and lenient rules files.

pub mod schema;

use std::fs;
use std::path::Path;

use spamguard_core::error::{Result, SpamError};
use spamguard_core::rules::{RuleSet, RulesDocument};

pub use schema::{GatewayConfig, GatewaySection, PolicyConfig};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let s = read(path.as_ref())?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| SpamError::ConfigMalformed(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read and compile a rules file into a fresh [`RuleSet`].
pub fn load_rules_file(path: impl AsRef<Path>) -> Result<RuleSet> {
    let s = read(path.as_ref())?;
    load_rules_str(&s)
}

/// Compile rules from YAML text. An empty document is an empty rule set.
pub fn load_rules_str(s: &str) -> Result<RuleSet> {
    let doc = if s.trim().is_empty() {
        RulesDocument::default()
    } else {
        serde_yaml::from_str::<Option<RulesDocument>>(s)
            .map_err(|e| SpamError::ConfigMalformed(format!("invalid rules yaml: {e}")))?
            .unwrap_or_default()
    };
    RuleSet::compile(&doc)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SpamError::ConfigUnreadable {
        path: path.display().to_string(),
        source,
    })
}
