//! Managed-cluster entities and remote introspection records
//!
//! The facade never owns clusters or nodes; it receives them as
//! parameters and returns derived facts. The record types here mirror
//! what a live management session reports back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A named collection of nodes sharing a ring, with the seed hosts
/// used for initial contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster name, unique per orchestrator
    pub name: String,
    /// Hosts tried first when any live node will do
    pub seed_hosts: Vec<String>,
    /// Known datacenters, possibly empty before first discovery
    pub datacenters: BTreeSet<String>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, seed_hosts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            seed_hosts,
            datacenters: BTreeSet::new(),
        }
    }

    pub fn with_datacenters(mut self, datacenters: BTreeSet<String>) -> Self {
        self.datacenters = datacenters;
        self
    }
}

/// One process instance of the managed database engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Name of the cluster this node belongs to
    pub cluster: String,
    /// Hostname or address the management protocol listens on
    pub hostname: String,
}

impl Node {
    pub fn new(cluster: &Cluster, hostname: impl Into<String>) -> Self {
        Self {
            cluster: cluster.name.clone(),
            hostname: hostname.into(),
        }
    }

    /// Node addressed by cluster name only, for callers that do not
    /// hold the full `Cluster` entity.
    pub fn named(cluster: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            hostname: hostname.into(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.hostname)
    }
}

/// A table within a keyspace, as reported by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// Compaction strategy class, when the engine reports one
    pub compaction_strategy: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compaction_strategy: None,
        }
    }

    pub fn with_compaction_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.compaction_strategy = Some(strategy.into());
        self
    }
}

/// Point-in-time on-disk marker of a keyspace's data state on one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub host: String,
    pub keyspace: String,
    pub table: String,
    /// Live bytes the snapshot still pins
    pub true_size: u64,
    /// Bytes the snapshot occupies on disk
    pub size_on_disk: u64,
}

/// One in-flight compaction task on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compaction {
    pub id: String,
    pub keyspace: String,
    pub table: String,
    /// Work done so far, in `unit`
    pub completed: u64,
    /// Total work, in `unit`
    pub total: u64,
    pub unit: String,
    /// Task kind as reported by the engine (compaction, cleanup, ...)
    pub kind: String,
}

impl Compaction {
    /// Completion ratio in [0, 1], zero while total is still unknown.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// One in-flight streaming session between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSession {
    /// Stream plan this session belongs to
    pub plan_id: String,
    /// Remote peer endpoint
    pub peer: String,
    pub bytes_to_receive: u64,
    pub bytes_received: u64,
    pub bytes_to_send: u64,
    pub bytes_sent: u64,
}

/// Cluster membership state as seen by one node's failure detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodesStatus {
    /// Node whose view this is
    pub source_node: String,
    /// Raw gossip/failure-detector dump for every endpoint
    pub endpoint_states: String,
    /// Endpoint -> UP/DOWN summary
    pub simple_states: HashMap<String, String>,
    /// When the view was collected
    pub collected_at: DateTime<Utc>,
}
