//! # Timestamp Reconciliation
//! Merges the three per-attribute sample sequences of one poll cycle into a
//! single timestamp axis and averages duplicate-timestamp samples per
//! attribute. Duplicates arise because the historian window can return
//! several raw points at the same `recvTime` (late retransmissions included).
//!
//! Absence of a sample for an attribute at a timestamp is a valid outcome,
//! represented as `None`, never `0.0` — the renderer gaps the line instead of
//! drawing a false zero. This step has no failure path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::poll::types::{AttributeKind, Sample};

/// One poll cycle's merged output: a timestamp axis plus three index-aligned
/// value columns. All four vectors have equal length at all times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub timestamps: Vec<String>,
    pub luminosity_values: Vec<Option<f64>>,
    pub temperature_values: Vec<Option<f64>>,
    pub humidity_values: Vec<Option<f64>>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn values(&self, kind: AttributeKind) -> &[Option<f64>] {
        match kind {
            AttributeKind::Luminosity => &self.luminosity_values,
            AttributeKind::Temperature => &self.temperature_values,
            AttributeKind::Humidity => &self.humidity_values,
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    luminosity: Vec<f64>,
    temperature: Vec<f64>,
    humidity: Vec<f64>,
}

impl Bucket {
    fn list_mut(&mut self, kind: AttributeKind) -> &mut Vec<f64> {
        match kind {
            AttributeKind::Luminosity => &mut self.luminosity,
            AttributeKind::Temperature => &mut self.temperature,
            AttributeKind::Humidity => &mut self.humidity,
        }
    }
}

/// Timestamp -> bucket map that iterates in first-seen key order. HashMap
/// iteration order is arbitrary, so key order lives in a parallel Vec.
#[derive(Debug, Default)]
struct BucketMap {
    order: Vec<String>,
    index: HashMap<String, usize>,
    buckets: Vec<Bucket>,
}

impl BucketMap {
    fn bucket_mut(&mut self, recv_time: &str) -> &mut Bucket {
        let i = match self.index.get(recv_time) {
            Some(&i) => i,
            None => {
                let i = self.buckets.len();
                self.order.push(recv_time.to_string());
                self.index.insert(recv_time.to_string(), i);
                self.buckets.push(Bucket::default());
                i
            }
        };
        &mut self.buckets[i]
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Reconcile one cycle's raw fetches. Timestamps are compared as raw strings;
/// two stamps differing only in sub-second precision stay distinct buckets.
pub fn aggregate(
    luminosity: &[Sample],
    temperature: &[Sample],
    humidity: &[Sample],
) -> AggregatedSeries {
    let mut map = BucketMap::default();
    let inputs = [
        (AttributeKind::Luminosity, luminosity),
        (AttributeKind::Temperature, temperature),
        (AttributeKind::Humidity, humidity),
    ];
    for (kind, samples) in inputs {
        for s in samples {
            map.bucket_mut(&s.recv_time).list_mut(kind).push(s.value);
        }
    }

    let mut out = AggregatedSeries::default();
    for (i, ts) in map.order.iter().enumerate() {
        let bucket = &map.buckets[i];
        out.timestamps.push(ts.clone());
        out.luminosity_values.push(mean(&bucket.luminosity));
        out.temperature_values.push(mean(&bucket.temperature));
        out.humidity_values.push(mean(&bucket.humidity));
    }
    out
}
