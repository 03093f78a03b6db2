//! Time-bounded cache of expensive cluster metadata
//!
//! Two facts are cached per cluster: engine version per endpoint and
//! table set per keyspace. Both change rarely but cost a remote
//! round-trip to read, so entries live for a fixed window from last
//! write regardless of access pattern. A failed population is never
//! retained; the next call retries the fetch.

use crate::cluster::{Cluster, Table};
use crate::connector::NodeConnector;
use crate::Result;
use moka::future::Cache;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Staleness window: a trade-off between remote-call cost and the
/// latency of observing topology/schema changes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

type Key = (String, String);

pub struct MetadataCache {
    connector: Arc<NodeConnector>,
    /// (cluster, endpoint) -> engine version
    versions: Cache<Key, String>,
    /// (cluster, keyspace) -> table set
    tables: Cache<Key, Arc<BTreeSet<Table>>>,
}

impl MetadataCache {
    pub fn new(connector: Arc<NodeConnector>) -> Self {
        Self::with_ttl(connector, DEFAULT_TTL)
    }

    /// TTL is taken from last write, not last read. Tests substitute a
    /// short window here.
    pub fn with_ttl(connector: Arc<NodeConnector>, ttl: Duration) -> Self {
        Self {
            connector,
            versions: Cache::builder().time_to_live(ttl).build(),
            tables: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Engine version of the cluster, resolved through any of the
    /// candidate endpoints.
    ///
    /// The version is endpoint-keyed but semantically cluster-wide, so
    /// every candidate's key is checked for a live entry before
    /// falling back to a connect. On a full miss the fetched value is
    /// written back keyed by the endpoint the session actually landed
    /// on.
    pub async fn version(&self, cluster: &Cluster, endpoints: &[String]) -> Result<String> {
        for endpoint in endpoints {
            let key = (cluster.name.clone(), endpoint.clone());
            if let Some(version) = self.versions.get(&key).await {
                return Ok(version);
            }
        }

        let session = self.connector.connect_any(cluster, endpoints).await?;
        let version = session.engine_version().await?;
        debug!(cluster = %cluster.name, host = session.host(), version = %version, "engine version refreshed");
        self.versions
            .insert((cluster.name.clone(), session.host().to_string()), version.clone())
            .await;
        Ok(version)
    }

    /// Table set of a keyspace. Concurrent misses for the same key
    /// collapse into a single fetch; every waiter observes the same
    /// value or the same failure, and a failure is not cached.
    pub async fn tables(&self, cluster: &Cluster, keyspace: &str) -> Result<Arc<BTreeSet<Table>>> {
        let key = (cluster.name.clone(), keyspace.to_string());
        self.tables
            .try_get_with(key, self.fetch_tables(cluster, keyspace))
            .await
            .map_err(Into::into)
    }

    async fn fetch_tables(&self, cluster: &Cluster, keyspace: &str) -> Result<Arc<BTreeSet<Table>>> {
        let session = self
            .connector
            .connect_any(cluster, &cluster.seed_hosts)
            .await?;
        let tables = session.tables_for_keyspace(keyspace).await?;
        debug!(cluster = %cluster.name, keyspace = %keyspace, tables = tables.len(), "table set refreshed");
        Ok(Arc::new(tables))
    }

    /// Drop every cached entry, for tests and forced refreshes.
    pub fn invalidate_all(&self) {
        self.versions.invalidate_all();
        self.tables.invalidate_all();
    }
}
