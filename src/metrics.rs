//! Metric samples and their typed, per-scope aggregate records
//!
//! Sessions report flat `(scope, name, attribute, value)` samples; the
//! conversions here reshape them into one typed record per observed
//! scope (per scope and metric name for histograms). Groups absent
//! from the input produce no output records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flat metric sample as collected from a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Node the sample was collected on
    pub host: String,
    /// Metric scope, e.g. a thread pool or message type name
    pub scope: String,
    /// Metric name, e.g. "Latency"
    pub name: String,
    /// Attribute within the metric, e.g. "ActiveTasks" or "99thPercentile"
    pub attribute: String,
    pub value: f64,
    pub collected_at: DateTime<Utc>,
}

impl MetricSample {
    pub fn new(
        host: impl Into<String>,
        scope: impl Into<String>,
        name: impl Into<String>,
        attribute: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            host: host.into(),
            scope: scope.into(),
            name: name.into(),
            attribute: attribute.into(),
            value,
            collected_at: Utc::now(),
        }
    }
}

/// Aggregate state of one thread pool on a node.
///
/// Fields stay `None` when the input carried no sample for the
/// corresponding attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadPoolStat {
    pub name: String,
    pub active_tasks: Option<u64>,
    pub pending_tasks: Option<u64>,
    pub completed_tasks: Option<u64>,
    pub currently_blocked_tasks: Option<u64>,
    pub total_blocked_tasks: Option<u64>,
    pub max_pool_size: Option<u64>,
}

impl ThreadPoolStat {
    fn apply(&mut self, sample: &MetricSample) {
        let value = sample.value as u64;
        match sample.attribute.as_str() {
            "ActiveTasks" => self.active_tasks = Some(value),
            "PendingTasks" => self.pending_tasks = Some(value),
            "CompletedTasks" => self.completed_tasks = Some(value),
            "CurrentlyBlockedTasks" => self.currently_blocked_tasks = Some(value),
            "TotalBlockedTasks" => self.total_blocked_tasks = Some(value),
            "MaxPoolSize" => self.max_pool_size = Some(value),
            _ => {}
        }
    }

    /// Reshape flat samples into one record per thread-pool scope.
    pub fn from_samples(samples: &[MetricSample]) -> Vec<ThreadPoolStat> {
        let mut by_scope: BTreeMap<&str, ThreadPoolStat> = BTreeMap::new();
        for sample in samples {
            by_scope
                .entry(sample.scope.as_str())
                .or_insert_with(|| ThreadPoolStat {
                    name: sample.scope.clone(),
                    ..Default::default()
                })
                .apply(sample);
        }
        by_scope.into_values().collect()
    }
}

/// Dropped-message counters for one message type on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DroppedMessages {
    pub name: String,
    pub count: Option<u64>,
    pub one_minute_rate: Option<f64>,
    pub five_minute_rate: Option<f64>,
    pub fifteen_minute_rate: Option<f64>,
    pub mean_rate: Option<f64>,
}

impl DroppedMessages {
    fn apply(&mut self, sample: &MetricSample) {
        match sample.attribute.as_str() {
            "Count" => self.count = Some(sample.value as u64),
            "OneMinuteRate" => self.one_minute_rate = Some(sample.value),
            "FiveMinuteRate" => self.five_minute_rate = Some(sample.value),
            "FifteenMinuteRate" => self.fifteen_minute_rate = Some(sample.value),
            "MeanRate" => self.mean_rate = Some(sample.value),
            _ => {}
        }
    }

    /// Reshape flat samples into one record per message-type scope.
    pub fn from_samples(samples: &[MetricSample]) -> Vec<DroppedMessages> {
        let mut by_scope: BTreeMap<&str, DroppedMessages> = BTreeMap::new();
        for sample in samples {
            by_scope
                .entry(sample.scope.as_str())
                .or_insert_with(|| DroppedMessages {
                    name: sample.scope.clone(),
                    ..Default::default()
                })
                .apply(sample);
        }
        by_scope.into_values().collect()
    }
}

/// Latency histogram for one (scope, metric type) pair on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsHistogram {
    /// Metric scope the histogram belongs to
    pub name: String,
    /// Metric name within the scope, e.g. "Latency"
    pub kind: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub stddev: Option<f64>,
    pub p75: Option<f64>,
    pub p95: Option<f64>,
    pub p98: Option<f64>,
    pub p99: Option<f64>,
    pub p999: Option<f64>,
    pub count: Option<u64>,
    pub one_minute_rate: Option<f64>,
    pub mean_rate: Option<f64>,
}

impl MetricsHistogram {
    fn apply(&mut self, sample: &MetricSample) {
        match sample.attribute.as_str() {
            "Min" => self.min = Some(sample.value),
            "Max" => self.max = Some(sample.value),
            "Mean" => self.mean = Some(sample.value),
            "50thPercentile" => self.median = Some(sample.value),
            "StdDev" => self.stddev = Some(sample.value),
            "75thPercentile" => self.p75 = Some(sample.value),
            "95thPercentile" => self.p95 = Some(sample.value),
            "98thPercentile" => self.p98 = Some(sample.value),
            "99thPercentile" => self.p99 = Some(sample.value),
            "999thPercentile" => self.p999 = Some(sample.value),
            "Count" => self.count = Some(sample.value as u64),
            "OneMinuteRate" => self.one_minute_rate = Some(sample.value),
            "MeanRate" => self.mean_rate = Some(sample.value),
            _ => {}
        }
    }

    /// Reshape flat samples into one histogram per (scope, metric name)
    /// pair observed in the input.
    pub fn from_samples(samples: &[MetricSample]) -> Vec<MetricsHistogram> {
        let mut by_group: BTreeMap<(&str, &str), MetricsHistogram> = BTreeMap::new();
        for sample in samples {
            by_group
                .entry((sample.scope.as_str(), sample.name.as_str()))
                .or_insert_with(|| MetricsHistogram {
                    name: sample.scope.clone(),
                    kind: sample.name.clone(),
                    ..Default::default()
                })
                .apply(sample);
        }
        by_group.into_values().collect()
    }
}
