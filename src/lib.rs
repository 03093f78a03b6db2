//! # ringmend
//!
//! Control-plane core for a distributed-database repair orchestrator.
//! It decides how to safely reach the nodes of managed clusters to
//! observe and drive anti-entropy repair, and carries the versioned
//! state of recurring repair schedules.
//!
//! ## Key pieces
//!
//! - **ClusterFacade**: orchestration-facing API for topology queries,
//!   metrics collection, snapshot lifecycle, and compaction/stream
//!   introspection, degrading to empty results where a datacenter is
//!   not directly reachable
//! - **AccessibilityPolicy**: the single gate deciding whether a
//!   node's datacenter may be contacted directly under the configured
//!   topology mode
//! - **MetadataCache**: bounded-staleness cache of engine versions and
//!   keyspace table sets, with single-flight population
//! - **RepairSchedule**: immutable descriptor of one recurring repair
//!   job, updated copy-on-write through its builder
//!
//! The repair protocol itself, schedule persistence, the REST surface,
//! and leader election are collaborator interfaces, not part of this
//! crate.

pub mod access;
pub mod cluster;
pub mod config;
pub mod connector;
pub mod facade;
pub mod metadata;
pub mod metrics;
pub mod ring;
pub mod schedule;
pub mod session;
pub mod telemetry;

mod error;

pub use error::{EndpointFailure, Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::access::{AccessibilityPolicy, TopologyMode};
    pub use crate::cluster::{Cluster, Node};
    pub use crate::config::FacadeConfig;
    pub use crate::connector::NodeConnector;
    pub use crate::facade::ClusterFacade;
    pub use crate::metadata::MetadataCache;
    pub use crate::ring::{RingRange, Segment};
    pub use crate::schedule::{
        RepairParallelism, RepairSchedule, RepairScheduleBuilder, ScheduleState,
    };
    pub use crate::session::{NodeSession, SessionFactory};
    pub use crate::{Error, Result};
}
