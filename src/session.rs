//! Management-session capability traits
//!
//! A live session to one node is split into narrow capability traits,
//! one per remote feature, so the facade depends only on the surface
//! each operation needs and tests can substitute a single mock.
//! `NodeSession` is the blanket composition of all capabilities;
//! `SessionFactory` is the external connection-factory collaborator
//! (pooling and retry, if any, live behind it).

use crate::cluster::{Compaction, Node, Snapshot, StreamSession, Table};
use crate::metrics::MetricSample;
use crate::ring::{RingRange, Token};
use crate::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Core topology and schema introspection on a live session.
#[async_trait]
pub trait ClusterInfo: Send + Sync {
    /// Endpoint this session is connected to
    fn host(&self) -> &str;

    async fn cluster_name(&self) -> Result<String>;

    async fn partitioner(&self) -> Result<String>;

    async fn live_nodes(&self) -> Result<Vec<String>>;

    async fn tokens(&self) -> Result<Vec<Token>>;

    /// Full ring map: token range -> replica endpoints, for a keyspace
    async fn range_to_endpoint_map(&self, keyspace: &str)
        -> Result<Vec<(RingRange, Vec<String>)>>;

    async fn keyspaces(&self) -> Result<Vec<String>>;

    async fn tables_for_keyspace(&self, keyspace: &str) -> Result<BTreeSet<Table>>;

    async fn tables_by_keyspace(&self) -> Result<HashMap<String, Vec<String>>>;

    async fn endpoint_to_host_id(&self) -> Result<HashMap<String, String>>;

    async fn engine_version(&self) -> Result<String>;

    /// The endpoint name the node itself advertises in the ring
    async fn local_endpoint(&self) -> Result<String>;
}

/// Endpoint-snitch datacenter lookup.
#[async_trait]
pub trait SnitchInfo: Send + Sync {
    /// Datacenter of an arbitrary endpoint in the cluster
    async fn datacenter_of(&self, endpoint: &str) -> Result<String>;

    /// Datacenter of the node this session is connected to
    async fn local_datacenter(&self) -> Result<String>;
}

/// Failure-detector membership view.
#[async_trait]
pub trait FailureDetectorInfo: Send + Sync {
    /// Raw per-endpoint state dump
    async fn endpoint_states(&self) -> Result<String>;

    /// Endpoint -> UP/DOWN summary
    async fn simple_states(&self) -> Result<HashMap<String, String>>;
}

/// Storage-service token ownership.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn tokens_by_node(&self) -> Result<HashMap<String, Vec<Token>>>;
}

/// Compaction introspection.
#[async_trait]
pub trait CompactionApi: Send + Sync {
    async fn active_compactions(&self) -> Result<Vec<Compaction>>;
}

/// Generic metrics collection.
#[async_trait]
pub trait MetricsApi: Send + Sync {
    /// Collect the named metric groups, keyed by group name
    async fn collect_metrics(
        &self,
        metric_names: &[String],
    ) -> Result<HashMap<String, Vec<MetricSample>>>;

    /// Client-request latency samples
    async fn latency_metrics(&self) -> Result<Vec<MetricSample>>;

    /// Thread-pool stage samples
    async fn thread_pool_metrics(&self) -> Result<Vec<MetricSample>>;

    /// Dropped-message counter samples
    async fn dropped_message_metrics(&self) -> Result<Vec<MetricSample>>;
}

/// Snapshot lifecycle on one node.
#[async_trait]
pub trait SnapshotApi: Send + Sync {
    /// Returns the snapshot name the engine recorded
    async fn take_snapshot(&self, name: &str, keyspaces: &[String]) -> Result<String>;

    /// May fail with `Error::Unsupported` on engines that cannot list
    async fn list_snapshots(&self) -> Result<Vec<Snapshot>>;

    /// May fail with `Error::SnapshotGone` when already removed
    async fn clear_snapshot(&self, name: &str) -> Result<()>;
}

/// Streaming introspection on one node.
#[async_trait]
pub trait StreamApi: Send + Sync {
    async fn list_streams(&self) -> Result<Vec<StreamSession>>;
}

/// Everything a live management session can do. Blanket-implemented
/// for any type carrying all capabilities, so a single implementation
/// (or test mock) provides the lot.
pub trait NodeSession:
    ClusterInfo
    + SnitchInfo
    + FailureDetectorInfo
    + StorageService
    + CompactionApi
    + MetricsApi
    + SnapshotApi
    + StreamApi
{
}

impl<T> NodeSession for T where
    T: ClusterInfo
        + SnitchInfo
        + FailureDetectorInfo
        + StorageService
        + CompactionApi
        + MetricsApi
        + SnapshotApi
        + StreamApi
{
}

impl std::fmt::Debug for dyn NodeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeSession").finish_non_exhaustive()
    }
}

/// Connection-factory collaborator: opens a management session to one
/// node. Sessions close when the last `Arc` is dropped; this crate
/// never pools them.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn connect(&self, node: &Node) -> Result<Arc<dyn NodeSession>>;
}
