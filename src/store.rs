//! store.rs — process-wide snapshot of the most recently aggregated series.
//!
//! Each successful poll cycle overwrites the snapshot wholesale; the store
//! reflects the most recent `lastN` lookback window, not unbounded history.
//! Replace and read are guarded by one lock so a reader never observes a
//! torn snapshot with diverging column lengths.

use std::sync::RwLock;

use crate::aggregate::AggregatedSeries;

#[derive(Debug, Default)]
pub struct SeriesStore {
    inner: RwLock<AggregatedSeries>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with a freshly aggregated series. An empty series
    /// is a no-op so a transient all-attribute outage does not blank the
    /// displayed chart. Returns whether the replacement was applied.
    pub fn replace(&self, series: AggregatedSeries) -> bool {
        if series.is_empty() {
            return false;
        }
        let mut guard = self.inner.write().expect("series store lock poisoned");
        *guard = series;
        true
    }

    /// Read-only copy for the render boundary.
    pub fn snapshot(&self) -> AggregatedSeries {
        self.inner.read().expect("series store lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("series store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(stamps: &[&str]) -> AggregatedSeries {
        let n = stamps.len();
        AggregatedSeries {
            timestamps: stamps.iter().map(|s| s.to_string()).collect(),
            luminosity_values: vec![Some(1.0); n],
            temperature_values: vec![None; n],
            humidity_values: vec![Some(2.0); n],
        }
    }

    #[test]
    fn replace_overwrites_wholesale() {
        let store = SeriesStore::new();
        assert!(store.replace(series(&["t1", "t2"])));
        assert!(store.replace(series(&["t3"])));
        let snap = store.snapshot();
        assert_eq!(snap.timestamps, vec!["t3"]);
    }

    #[test]
    fn empty_replace_retains_previous_snapshot() {
        let store = SeriesStore::new();
        assert!(store.replace(series(&["t1"])));
        assert!(!store.replace(AggregatedSeries::default()));
        assert_eq!(store.snapshot().timestamps, vec!["t1"]);
    }

    #[test]
    fn columns_stay_length_consistent_after_every_replace() {
        let store = SeriesStore::new();
        for stamps in [&["a"][..], &["b", "c"][..], &[][..], &["d"][..]] {
            store.replace(series(stamps));
            let snap = store.snapshot();
            assert_eq!(snap.timestamps.len(), snap.luminosity_values.len());
            assert_eq!(snap.timestamps.len(), snap.temperature_values.len());
            assert_eq!(snap.timestamps.len(), snap.humidity_values.len());
        }
    }
}
