//! Orchestration-facing cluster facade
//!
//! Every operation funnels through the node connector, gated where
//! relevant by the accessibility policy and backed by the metadata
//! cache for the two expensive lookups. Two failure disciplines
//! coexist: topology/introspection operations always surface errors
//! (there is no safe default for "what is the topology"), while
//! per-node observability operations degrade to an empty result when
//! the node's datacenter is not directly reachable.

use crate::access::AccessibilityPolicy;
use crate::cluster::{Cluster, Compaction, Node, NodesStatus, Snapshot, StreamSession, Table};
use crate::config::FacadeConfig;
use crate::connector::NodeConnector;
use crate::error::Error;
use crate::metadata::MetadataCache;
use crate::metrics::{DroppedMessages, MetricSample, MetricsHistogram, ThreadPoolStat};
use crate::ring::{RingRange, Segment, Token};
use crate::session::{NodeSession, SessionFactory};
use crate::Result;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct ClusterFacade {
    connector: Arc<NodeConnector>,
    metadata: Arc<MetadataCache>,
    policy: AccessibilityPolicy,
}

impl ClusterFacade {
    pub fn new(factory: Arc<dyn SessionFactory>, config: &FacadeConfig) -> Self {
        let connector = Arc::new(NodeConnector::new(factory));
        let metadata = Arc::new(MetadataCache::with_ttl(
            connector.clone(),
            config.metadata_ttl,
        ));
        Self {
            connector,
            metadata,
            policy: config.accessibility_policy(),
        }
    }

    /// Assemble from pre-built parts, so tests can substitute a
    /// short-TTL cache or a custom policy.
    pub fn from_parts(
        connector: Arc<NodeConnector>,
        metadata: Arc<MetadataCache>,
        policy: AccessibilityPolicy,
    ) -> Self {
        Self {
            connector,
            metadata,
            policy,
        }
    }

    pub fn policy(&self) -> &AccessibilityPolicy {
        &self.policy
    }

    pub fn connector(&self) -> &Arc<NodeConnector> {
        &self.connector
    }

    /// Whether a node in the given datacenter may be contacted
    /// directly under the configured topology mode.
    pub fn node_is_accessible(&self, datacenter: &str) -> bool {
        self.policy.is_accessible(datacenter)
    }

    // ---- connection plumbing ------------------------------------------

    /// Open a session to any reachable endpoint among the candidates.
    pub async fn connect_any(
        &self,
        cluster: &Cluster,
        endpoints: &[String],
    ) -> Result<Arc<dyn NodeSession>> {
        self.connector.connect_any(cluster, endpoints).await
    }

    /// Pre-heat sessions towards the given endpoints so the first real
    /// operation does not pay the connect cost.
    pub async fn pre_heat_connections(
        &self,
        cluster: &Cluster,
        endpoints: &[String],
    ) -> Result<Arc<dyn NodeSession>> {
        self.connector.connect_any(cluster, endpoints).await
    }

    // ---- topology / introspection -------------------------------------

    pub async fn cluster_name(&self, cluster: &Cluster, endpoints: &[String]) -> Result<String> {
        let session = self.connector.connect_any(cluster, endpoints).await?;
        session.cluster_name().await
    }

    /// Cluster name as reported by one specific node.
    pub async fn cluster_name_of(&self, node: &Node) -> Result<String> {
        let session = self.connector.connect_node(node).await?;
        session.cluster_name().await
    }

    pub async fn partitioner(&self, cluster: &Cluster, endpoints: &[String]) -> Result<String> {
        let session = self.connector.connect_any(cluster, endpoints).await?;
        session.partitioner().await
    }

    pub async fn live_nodes(&self, cluster: &Cluster) -> Result<Vec<String>> {
        self.live_nodes_from(cluster, &cluster.seed_hosts).await
    }

    pub async fn live_nodes_from(
        &self,
        cluster: &Cluster,
        endpoints: &[String],
    ) -> Result<Vec<String>> {
        let session = self.connector.connect_any(cluster, endpoints).await?;
        session.live_nodes().await
    }

    /// Cluster membership as seen by one reachable node's failure
    /// detector.
    pub async fn nodes_status(
        &self,
        cluster: &Cluster,
        endpoints: &[String],
    ) -> Result<NodesStatus> {
        let session = self.connector.connect_any(cluster, endpoints).await?;
        let endpoint_states = session.endpoint_states().await?;
        let simple_states = session.simple_states().await?;
        Ok(NodesStatus {
            source_node: session.host().to_string(),
            endpoint_states,
            simple_states,
            collected_at: Utc::now(),
        })
    }

    /// Engine version of the cluster, served from the metadata cache
    /// when a fresh entry exists for any seed host.
    pub async fn engine_version(&self, cluster: &Cluster) -> Result<String> {
        self.metadata.version(cluster, &cluster.seed_hosts).await
    }

    pub async fn engine_version_from(
        &self,
        cluster: &Cluster,
        endpoints: &[String],
    ) -> Result<String> {
        self.metadata.version(cluster, endpoints).await
    }

    pub async fn tokens(&self, cluster: &Cluster) -> Result<Vec<Token>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.tokens().await
    }

    pub async fn range_to_endpoint_map(
        &self,
        cluster: &Cluster,
        keyspace: &str,
    ) -> Result<Vec<(RingRange, Vec<String>)>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.range_to_endpoint_map(keyspace).await
    }

    pub async fn keyspaces(&self, cluster: &Cluster) -> Result<Vec<String>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.keyspaces().await
    }

    /// Table set of a keyspace, cached with bounded staleness and
    /// single-flight population.
    pub async fn tables_for_keyspace(
        &self,
        cluster: &Cluster,
        keyspace: &str,
    ) -> Result<Arc<BTreeSet<Table>>> {
        self.metadata.tables(cluster, keyspace).await
    }

    pub async fn list_tables_by_keyspace(
        &self,
        cluster: &Cluster,
    ) -> Result<HashMap<String, Vec<String>>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.tables_by_keyspace().await
    }

    pub async fn endpoint_to_host_id(&self, cluster: &Cluster) -> Result<HashMap<String, String>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.endpoint_to_host_id().await
    }

    pub async fn tokens_by_node(&self, cluster: &Cluster) -> Result<HashMap<String, Vec<Token>>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.tokens_by_node().await
    }

    pub async fn datacenter(&self, cluster: &Cluster, endpoint: &str) -> Result<String> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        session.datacenter_of(endpoint).await
    }

    pub async fn datacenter_of(&self, node: &Node) -> Result<String> {
        let session = self.connector.connect_node(node).await?;
        session.local_datacenter().await
    }

    /// Endpoint name/ip identifying the node in the ring.
    pub async fn local_endpoint(&self, node: &Node) -> Result<String> {
        let session = self.connector.connect_node(node).await?;
        session.local_endpoint().await
    }

    /// Replicas for a repair segment: the replica list of the first
    /// mapped range that encloses the segment's primary range.
    ///
    /// Degrades to an empty list on any lookup failure or when no
    /// mapped range encloses the target; callers treat empty as "no
    /// replicas resolvable right now", not as a topology fact.
    pub async fn token_range_to_endpoint(
        &self,
        cluster: &Cluster,
        keyspace: &str,
        segment: &Segment,
    ) -> Vec<String> {
        let entries = match self.range_to_endpoint_map(cluster, keyspace).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(segment = %segment, error = %e, "no replicas found for token range");
                return Vec::new();
            }
        };

        let Some(target) = segment.primary_range() else {
            error!(segment = %segment, "segment carries no token range");
            return Vec::new();
        };

        for (range, replicas) in &entries {
            if range.encloses(target) {
                return replicas.clone();
            }
        }
        error!(segment = %segment, "no replicas found for token range");
        debug!(checked = ?entries.iter().map(|(r, _)| r).collect::<Vec<_>>(), "checked token ranges");
        Vec::new()
    }

    // ---- accessibility-gated observability -----------------------------

    /// Running compactions on one node; empty when the node's
    /// datacenter is not directly reachable.
    pub async fn list_active_compactions(&self, node: &Node) -> Result<Vec<Compaction>> {
        let node_dc = self.datacenter_of(node).await?;
        if !self.node_is_accessible(&node_dc) {
            debug!(node = %node, datacenter = %node_dc, "datacenter not accessible, skipping compaction listing");
            return Ok(Vec::new());
        }
        self.list_active_compactions_direct(node).await
    }

    /// Running compactions via a direct session, bypassing the gate.
    pub async fn list_active_compactions_direct(&self, node: &Node) -> Result<Vec<Compaction>> {
        let cluster = Cluster::new(node.cluster.as_str(), vec![node.hostname.clone()]);
        let session = self
            .connector
            .connect_any(&cluster, &cluster.seed_hosts)
            .await?;
        session.active_compactions().await
    }

    /// Collect the named metric groups from one node.
    pub async fn collect_metrics(
        &self,
        node: &Node,
        metric_names: &[String],
    ) -> Result<HashMap<String, Vec<MetricSample>>> {
        let session = self.connector.connect_node(node).await?;
        match session.collect_metrics(metric_names).await {
            Ok(metrics) => Ok(metrics),
            Err(e) => {
                error!(node = %node, error = %e, "failed collecting metrics");
                Err(e)
            }
        }
    }

    /// Client-request latency histograms; empty when the node's
    /// datacenter is not directly reachable.
    pub async fn client_request_latencies(&self, node: &Node) -> Result<Vec<MetricsHistogram>> {
        let node_dc = self.datacenter_of(node).await?;
        if !self.node_is_accessible(&node_dc) {
            debug!(node = %node, datacenter = %node_dc, "datacenter not accessible, skipping latency collection");
            return Ok(Vec::new());
        }
        let session = self.connector.connect_node(node).await?;
        let samples = session.latency_metrics().await?;
        Ok(MetricsHistogram::from_samples(&samples))
    }

    /// Dropped-message counters; empty when the node's datacenter is
    /// not directly reachable.
    pub async fn dropped_messages(&self, node: &Node) -> Result<Vec<DroppedMessages>> {
        let node_dc = self.datacenter_of(node).await?;
        if !self.node_is_accessible(&node_dc) {
            debug!(node = %node, datacenter = %node_dc, "datacenter not accessible, skipping dropped-message collection");
            return Ok(Vec::new());
        }
        let session = self.connector.connect_node(node).await?;
        let samples = session.dropped_message_metrics().await?;
        Ok(DroppedMessages::from_samples(&samples))
    }

    /// Thread-pool stage stats; empty when the node's datacenter is
    /// not directly reachable.
    pub async fn tp_stats(&self, node: &Node) -> Result<Vec<ThreadPoolStat>> {
        let node_dc = self.datacenter_of(node).await?;
        if !self.node_is_accessible(&node_dc) {
            debug!(node = %node, datacenter = %node_dc, "datacenter not accessible, skipping tpstats collection");
            return Ok(Vec::new());
        }
        let session = self.connector.connect_node(node).await?;
        let samples = session.thread_pool_metrics().await?;
        Ok(ThreadPoolStat::from_samples(&samples))
    }

    // ---- snapshots & streams -------------------------------------------

    /// Take a snapshot on one node; returns the node paired with the
    /// snapshot name the engine recorded.
    pub async fn take_snapshot(
        &self,
        snapshot_name: &str,
        node: &Node,
        keyspaces: &[String],
    ) -> Result<(Node, String)> {
        let session = self.connector.connect_node(node).await?;
        info!(node = %node, keyspaces = ?keyspaces, snapshot = %snapshot_name, "taking snapshot");
        let recorded = session.take_snapshot(snapshot_name, keyspaces).await?;
        Ok((node.clone(), recorded))
    }

    /// List snapshots on one node. An `Unsupported` failure from old
    /// engine versions is propagated verbatim so callers can tell "no
    /// snapshots" from "listing unsupported".
    pub async fn list_snapshots(&self, node: &Node) -> Result<Vec<Snapshot>> {
        let session = self.connector.connect_node(node).await?;
        match session.list_snapshots().await {
            Err(e @ Error::Unsupported { .. }) => {
                debug!(node = %node, "snapshot listing unsupported on this engine version");
                Err(e)
            }
            other => other,
        }
    }

    /// Clear a snapshot on one node. A snapshot that is already gone
    /// counts as success, so clearing is idempotent for the caller.
    pub async fn clear_snapshot(&self, snapshot_name: &str, node: &Node) -> Result<()> {
        let session = self.connector.connect_node(node).await?;
        match session.clear_snapshot(snapshot_name).await {
            Err(Error::SnapshotGone { .. }) => {
                info!(node = %node, snapshot = %snapshot_name, "snapshot already cleared");
                Ok(())
            }
            other => other,
        }
    }

    /// In-flight streaming sessions as reported by one node.
    pub async fn list_streams(&self, node: &Node) -> Result<Vec<StreamSession>> {
        let session = self.connector.connect_node(node).await?;
        session.list_streams().await
    }
}
