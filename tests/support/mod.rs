//! In-memory session factory for facade and cache tests
//!
//! Mirrors what a live management session would report, with counters
//! on the expensive paths so tests can assert how often the remote end
//! was actually hit.

#![allow(dead_code)]

use async_trait::async_trait;
use ringmend::cluster::{Cluster, Compaction, Node, Snapshot, StreamSession, Table};
use ringmend::metrics::MetricSample;
use ringmend::ring::{RingRange, Token};
use ringmend::session::{
    ClusterInfo, CompactionApi, FailureDetectorInfo, MetricsApi, NodeSession, SessionFactory,
    SnapshotApi, SnitchInfo, StorageService, StreamApi,
};
use ringmend::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted node: every capability answers from these fields.
pub struct MockSession {
    pub host: String,
    pub datacenter: String,
    pub cluster_name: String,
    pub version: String,
    pub partitioner: String,
    pub live: Vec<String>,
    pub tokens: Vec<Token>,
    pub range_map: Vec<(RingRange, Vec<String>)>,
    pub keyspaces: Vec<String>,
    pub tables: BTreeSet<Table>,
    pub compactions: Vec<Compaction>,
    pub tp_samples: Vec<MetricSample>,
    pub latency_samples: Vec<MetricSample>,
    pub dropped_samples: Vec<MetricSample>,
    pub streams: Vec<StreamSession>,
    pub snapshots: Mutex<Vec<Snapshot>>,
    pub snapshot_listing_unsupported: bool,
    /// Slow down table fetches to widen concurrent-miss windows
    pub table_fetch_delay: Option<Duration>,
    /// Force this many table fetches to fail before succeeding
    pub table_fetch_failures: AtomicUsize,
    pub table_fetches: AtomicUsize,
    pub version_fetches: AtomicUsize,
}

impl MockSession {
    pub fn new(host: &str, datacenter: &str) -> Self {
        Self {
            host: host.to_string(),
            datacenter: datacenter.to_string(),
            cluster_name: "test-cluster".to_string(),
            version: "4.1.3".to_string(),
            partitioner: "Murmur3Partitioner".to_string(),
            live: Vec::new(),
            tokens: Vec::new(),
            range_map: Vec::new(),
            keyspaces: Vec::new(),
            tables: BTreeSet::new(),
            compactions: Vec::new(),
            tp_samples: Vec::new(),
            latency_samples: Vec::new(),
            dropped_samples: Vec::new(),
            streams: Vec::new(),
            snapshots: Mutex::new(Vec::new()),
            snapshot_listing_unsupported: false,
            table_fetch_delay: None,
            table_fetch_failures: AtomicUsize::new(0),
            table_fetches: AtomicUsize::new(0),
            version_fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ClusterInfo for MockSession {
    fn host(&self) -> &str {
        &self.host
    }

    async fn cluster_name(&self) -> Result<String> {
        Ok(self.cluster_name.clone())
    }

    async fn partitioner(&self) -> Result<String> {
        Ok(self.partitioner.clone())
    }

    async fn live_nodes(&self) -> Result<Vec<String>> {
        Ok(self.live.clone())
    }

    async fn tokens(&self) -> Result<Vec<Token>> {
        Ok(self.tokens.clone())
    }

    async fn range_to_endpoint_map(
        &self,
        _keyspace: &str,
    ) -> Result<Vec<(RingRange, Vec<String>)>> {
        Ok(self.range_map.clone())
    }

    async fn keyspaces(&self) -> Result<Vec<String>> {
        Ok(self.keyspaces.clone())
    }

    async fn tables_for_keyspace(&self, _keyspace: &str) -> Result<BTreeSet<Table>> {
        if let Some(delay) = self.table_fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.table_fetches.fetch_add(1, Ordering::SeqCst);
        let remaining = self.table_fetch_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.table_fetch_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::remote(self.host.as_str(), "schema read timed out"));
        }
        Ok(self.tables.clone())
    }

    async fn tables_by_keyspace(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut map = HashMap::new();
        for keyspace in &self.keyspaces {
            map.insert(
                keyspace.clone(),
                self.tables.iter().map(|t| t.name.clone()).collect(),
            );
        }
        Ok(map)
    }

    async fn endpoint_to_host_id(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .live
            .iter()
            .enumerate()
            .map(|(i, host)| (host.clone(), format!("host-id-{}", i)))
            .collect())
    }

    async fn engine_version(&self) -> Result<String> {
        self.version_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.version.clone())
    }

    async fn local_endpoint(&self) -> Result<String> {
        Ok(self.host.clone())
    }
}

#[async_trait]
impl SnitchInfo for MockSession {
    async fn datacenter_of(&self, _endpoint: &str) -> Result<String> {
        Ok(self.datacenter.clone())
    }

    async fn local_datacenter(&self) -> Result<String> {
        Ok(self.datacenter.clone())
    }
}

#[async_trait]
impl FailureDetectorInfo for MockSession {
    async fn endpoint_states(&self) -> Result<String> {
        Ok(format!("{} UP", self.host))
    }

    async fn simple_states(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .live
            .iter()
            .map(|host| (host.clone(), "UP".to_string()))
            .collect())
    }
}

#[async_trait]
impl StorageService for MockSession {
    async fn tokens_by_node(&self) -> Result<HashMap<String, Vec<Token>>> {
        Ok(self
            .live
            .iter()
            .map(|host| (host.clone(), self.tokens.clone()))
            .collect())
    }
}

#[async_trait]
impl CompactionApi for MockSession {
    async fn active_compactions(&self) -> Result<Vec<Compaction>> {
        Ok(self.compactions.clone())
    }
}

#[async_trait]
impl MetricsApi for MockSession {
    async fn collect_metrics(
        &self,
        metric_names: &[String],
    ) -> Result<HashMap<String, Vec<MetricSample>>> {
        Ok(metric_names
            .iter()
            .map(|name| (name.clone(), self.tp_samples.clone()))
            .collect())
    }

    async fn latency_metrics(&self) -> Result<Vec<MetricSample>> {
        Ok(self.latency_samples.clone())
    }

    async fn thread_pool_metrics(&self) -> Result<Vec<MetricSample>> {
        Ok(self.tp_samples.clone())
    }

    async fn dropped_message_metrics(&self) -> Result<Vec<MetricSample>> {
        Ok(self.dropped_samples.clone())
    }
}

#[async_trait]
impl SnapshotApi for MockSession {
    async fn take_snapshot(&self, name: &str, keyspaces: &[String]) -> Result<String> {
        let mut snapshots = self.snapshots.lock().unwrap();
        for keyspace in keyspaces {
            snapshots.push(Snapshot {
                name: name.to_string(),
                host: self.host.clone(),
                keyspace: keyspace.clone(),
                table: "all".to_string(),
                true_size: 0,
                size_on_disk: 0,
            });
        }
        Ok(name.to_string())
    }

    async fn list_snapshots(&self) -> Result<Vec<Snapshot>> {
        if self.snapshot_listing_unsupported {
            return Err(Error::Unsupported {
                operation: "list_snapshots".to_string(),
                version: Some("2.0".to_string()),
            });
        }
        Ok(self.snapshots.lock().unwrap().clone())
    }

    async fn clear_snapshot(&self, name: &str) -> Result<()> {
        let mut snapshots = self.snapshots.lock().unwrap();
        let before = snapshots.len();
        snapshots.retain(|s| s.name != name);
        if snapshots.len() == before {
            return Err(Error::SnapshotGone {
                snapshot: name.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StreamApi for MockSession {
    async fn list_streams(&self) -> Result<Vec<StreamSession>> {
        Ok(self.streams.clone())
    }
}

/// Session factory backed by scripted sessions, recording every
/// connect attempt in order.
pub struct MockFactory {
    sessions: Mutex<HashMap<String, Arc<MockSession>>>,
    attempts: Mutex<Vec<String>>,
    pub connect_delay: Option<Duration>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            attempts: Mutex::new(Vec::new()),
            connect_delay: None,
        }
    }

    pub fn register(&self, session: MockSession) -> Arc<MockSession> {
        let session = Arc::new(session);
        self.sessions
            .lock()
            .unwrap()
            .insert(session.host.clone(), session.clone());
        session
    }

    /// Hostnames tried so far, in order.
    pub fn attempt_log(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn connect(&self, node: &Node) -> Result<Arc<dyn NodeSession>> {
        self.attempts.lock().unwrap().push(node.hostname.clone());
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        let session = self.sessions.lock().unwrap().get(&node.hostname).cloned();
        match session {
            Some(session) => Ok(session as Arc<dyn NodeSession>),
            None => Err(Error::remote(node.hostname.as_str(), "connection refused")),
        }
    }
}

pub fn cluster(name: &str, seeds: &[&str]) -> Cluster {
    Cluster::new(name, seeds.iter().map(|s| s.to_string()).collect())
}
