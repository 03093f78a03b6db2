//! Datacenter accessibility policy
//!
//! Single policy gate consulted before any direct per-node contact.
//! Whether a node may be reached depends on the configured topology
//! mode and the set of datacenters this orchestrator instance can
//! reach directly.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Topology mode governing direct management-protocol access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyMode {
    /// The orchestrator has network access to every node in every datacenter
    All,
    /// Only nodes in the orchestrator's own datacenter are reachable
    Local,
    /// One orchestrator replica per datacenter, each reaching its granted set
    Each,
    /// The orchestrator runs next to a single node and reaches only it
    Sidecar,
}

impl TopologyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyMode::All => "all",
            TopologyMode::Local => "local",
            TopologyMode::Each => "each",
            TopologyMode::Sidecar => "sidecar",
        }
    }
}

impl std::str::FromStr for TopologyMode {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "local" => Ok(Self::Local),
            "each" => Ok(Self::Each),
            "sidecar" => Ok(Self::Sidecar),
            other => Err(format!(
                "unknown topology mode '{}'; expected one of all, local, each, sidecar",
                other
            )),
        }
    }
}

/// Pure accessibility decision: may a node in a given datacenter be
/// contacted directly under the current topology mode?
#[derive(Debug, Clone)]
pub struct AccessibilityPolicy {
    mode: TopologyMode,
    reachable_datacenters: HashSet<String>,
}

impl AccessibilityPolicy {
    pub fn new(mode: TopologyMode, reachable_datacenters: HashSet<String>) -> Self {
        Self {
            mode,
            reachable_datacenters,
        }
    }

    pub fn mode(&self) -> TopologyMode {
        self.mode
    }

    pub fn reachable_datacenters(&self) -> &HashSet<String> {
        &self.reachable_datacenters
    }

    /// True when a node in `datacenter` may be contacted directly.
    ///
    /// In `All` mode every datacenter is accessible; in every other
    /// mode the datacenter must be in the reachable set this instance
    /// was configured with.
    pub fn is_accessible(&self, datacenter: &str) -> bool {
        self.mode == TopologyMode::All || self.reachable_datacenters.contains(datacenter)
    }
}
