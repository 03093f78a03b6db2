//! Environment-based facade configuration
//!
//! Environment variables:
//! - RINGMEND_TOPOLOGY_MODE: "all" (default), "local", "each" or "sidecar"
//! - RINGMEND_ACCESSIBLE_DCS: comma-separated datacenters this instance
//!   reaches directly (ignored in "all" mode)
//! - RINGMEND_METADATA_TTL_SECS: metadata cache staleness window

use crate::access::{AccessibilityPolicy, TopologyMode};
use crate::metadata::DEFAULT_TTL;
use crate::{Error, Result};
use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Datacenter accessibility mode
    pub topology_mode: TopologyMode,
    /// Datacenters this orchestrator instance reaches directly
    pub accessible_datacenters: HashSet<String>,
    /// Staleness window for the metadata cache
    pub metadata_ttl: Duration,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            topology_mode: TopologyMode::All,
            accessible_datacenters: HashSet::new(),
            metadata_ttl: DEFAULT_TTL,
        }
    }
}

impl FacadeConfig {
    /// Build the accessibility policy this configuration describes.
    pub fn accessibility_policy(&self) -> AccessibilityPolicy {
        AccessibilityPolicy::new(self.topology_mode, self.accessible_datacenters.clone())
    }

    /// Read configuration from the environment, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let topology_mode = match std::env::var("RINGMEND_TOPOLOGY_MODE") {
            Ok(raw) => raw
                .parse::<TopologyMode>()
                .map_err(Error::Config)?,
            Err(_) => TopologyMode::All,
        };

        let accessible_datacenters: HashSet<String> = std::env::var("RINGMEND_ACCESSIBLE_DCS")
            .map(|raw| {
                raw.split(',')
                    .map(|dc| dc.trim().to_string())
                    .filter(|dc| !dc.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let metadata_ttl = match std::env::var("RINGMEND_METADATA_TTL_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    Error::Config(format!(
                        "RINGMEND_METADATA_TTL_SECS must be a number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TTL,
        };

        info!(
            mode = topology_mode.as_str(),
            datacenters = ?accessible_datacenters,
            ttl_secs = metadata_ttl.as_secs(),
            "facade configuration loaded"
        );

        Ok(Self {
            topology_mode,
            accessible_datacenters,
            metadata_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_all_mode() {
        let config = FacadeConfig::default();
        assert_eq!(config.topology_mode, TopologyMode::All);
        assert!(config.accessibility_policy().is_accessible("any-dc"));
    }

    #[test]
    fn test_policy_reflects_reachable_set() {
        let config = FacadeConfig {
            topology_mode: TopologyMode::Local,
            accessible_datacenters: ["dc1".to_string()].into_iter().collect(),
            metadata_ttl: DEFAULT_TTL,
        };
        let policy = config.accessibility_policy();
        assert!(policy.is_accessible("dc1"));
        assert!(!policy.is_accessible("dc2"));
    }
}
