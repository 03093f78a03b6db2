//! Repair schedule value object
//!
//! An immutable, versioned descriptor of one recurring repair job:
//! its cadence, run/pause state, throttling knobs, and the rule for
//! deriving the activation after the next one. All changes go through
//! a builder seeded from the current value; the scheduling-loop
//! collaborator atomically replaces the stored schedule with the newly
//! built one and is the sole writer of new versions. Cross-field
//! invariants (cadence > 0, intensity in (0, 1], unique run ids) are
//! the scheduling loop's responsibility to check before committing,
//! not enforced by this plain data holder.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for a schedule that has not seen any state-changing event.
pub const NO_EVENTS: &str = "no events";

/// Run/pause state of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleState {
    Running,
    Paused,
}

/// How many segments of one run may execute concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairParallelism {
    /// One segment at a time
    Sequential,
    /// Segments run concurrently across the cluster
    Parallel,
    /// Segments run concurrently, at most one per datacenter
    DatacenterAware,
}

/// One recurring repair job's configuration and run state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairSchedule {
    id: u64,
    repair_unit_id: u64,
    state: ScheduleState,
    days_between: u32,
    next_activation: DateTime<Utc>,
    run_history: Vec<u64>,
    segment_count: u32,
    repair_parallelism: RepairParallelism,
    intensity: f64,
    creation_time: DateTime<Utc>,
    owner: String,
    pause_time: Option<DateTime<Utc>>,
    last_event: String,
}

impl RepairSchedule {
    /// Identity, assigned once at creation and never reused.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Reference to the external definition of what to repair.
    pub fn repair_unit_id(&self) -> u64 {
        self.repair_unit_id
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn days_between(&self) -> u32 {
        self.days_between
    }

    /// Next time this schedule becomes eligible to fire.
    pub fn next_activation(&self) -> DateTime<Utc> {
        self.next_activation
    }

    /// If this run fires now, when the one after that fires. Pure
    /// derivation, not stored state.
    pub fn following_activation(&self) -> DateTime<Utc> {
        self.next_activation + Duration::days(i64::from(self.days_between))
    }

    /// Append-only log of past run ids, in execution order.
    pub fn run_history(&self) -> &[u64] {
        &self.run_history
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }

    pub fn repair_parallelism(&self) -> RepairParallelism {
        self.repair_parallelism
    }

    /// Throttle fraction in (0, 1]: how aggressively a run executes
    /// relative to idle time.
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Time of the last transition into `Paused`. Stays set across a
    /// later resume, recording the last pause rather than the current
    /// state.
    pub fn pause_time(&self) -> Option<DateTime<Utc>> {
        self.pause_time
    }

    pub fn last_event(&self) -> &str {
        &self.last_event
    }

    /// Builder pre-seeded with every current field, for copy-on-write
    /// updates.
    pub fn with(&self) -> RepairScheduleBuilder {
        RepairScheduleBuilder {
            repair_unit_id: self.repair_unit_id,
            state: self.state,
            days_between: self.days_between,
            next_activation: self.next_activation,
            run_history: self.run_history.clone(),
            segment_count: self.segment_count,
            repair_parallelism: self.repair_parallelism,
            intensity: self.intensity,
            creation_time: self.creation_time,
            owner: self.owner.clone(),
            pause_time: self.pause_time,
            last_event: self.last_event.clone(),
        }
    }
}

/// Builder for `RepairSchedule`. Setters are independent and do not
/// validate cross-field invariants; see the module docs.
#[derive(Debug, Clone)]
pub struct RepairScheduleBuilder {
    repair_unit_id: u64,
    state: ScheduleState,
    days_between: u32,
    next_activation: DateTime<Utc>,
    run_history: Vec<u64>,
    segment_count: u32,
    repair_parallelism: RepairParallelism,
    intensity: f64,
    creation_time: DateTime<Utc>,
    owner: String,
    pause_time: Option<DateTime<Utc>>,
    last_event: String,
}

impl RepairScheduleBuilder {
    /// Required fields for a brand-new schedule; the id is assigned by
    /// the caller at `build`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repair_unit_id: u64,
        state: ScheduleState,
        days_between: u32,
        next_activation: DateTime<Utc>,
        run_history: Vec<u64>,
        segment_count: u32,
        repair_parallelism: RepairParallelism,
        intensity: f64,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            repair_unit_id,
            state,
            days_between,
            next_activation,
            run_history,
            segment_count,
            repair_parallelism,
            intensity,
            creation_time,
            owner: String::new(),
            pause_time: None,
            last_event: NO_EVENTS.to_string(),
        }
    }

    pub fn state(mut self, state: ScheduleState) -> Self {
        self.state = state;
        self
    }

    pub fn days_between(mut self, days_between: u32) -> Self {
        self.days_between = days_between;
        self
    }

    pub fn next_activation(mut self, next_activation: DateTime<Utc>) -> Self {
        self.next_activation = next_activation;
        self
    }

    pub fn run_history(mut self, run_history: Vec<u64>) -> Self {
        self.run_history = run_history;
        self
    }

    /// Append one run id to the history, preserving insertion order.
    pub fn add_run(mut self, run_id: u64) -> Self {
        self.run_history.push(run_id);
        self
    }

    pub fn segment_count(mut self, segment_count: u32) -> Self {
        self.segment_count = segment_count;
        self
    }

    pub fn repair_parallelism(mut self, repair_parallelism: RepairParallelism) -> Self {
        self.repair_parallelism = repair_parallelism;
        self
    }

    pub fn intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn creation_time(mut self, creation_time: DateTime<Utc>) -> Self {
        self.creation_time = creation_time;
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn pause_time(mut self, pause_time: DateTime<Utc>) -> Self {
        self.pause_time = Some(pause_time);
        self
    }

    pub fn last_event(mut self, last_event: impl Into<String>) -> Self {
        self.last_event = last_event.into();
        self
    }

    /// Materialize an immutable schedule under the supplied id: the
    /// same id for an update, a fresh one for first creation.
    pub fn build(self, id: u64) -> RepairSchedule {
        RepairSchedule {
            id,
            repair_unit_id: self.repair_unit_id,
            state: self.state,
            days_between: self.days_between,
            next_activation: self.next_activation,
            run_history: self.run_history,
            segment_count: self.segment_count,
            repair_parallelism: self.repair_parallelism,
            intensity: self.intensity,
            creation_time: self.creation_time,
            owner: self.owner,
            pause_time: self.pause_time,
            last_event: self.last_event,
        }
    }
}
