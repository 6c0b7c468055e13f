// tests/store_retention.rs
// The store reflects the latest non-empty cycle: a transient full outage must
// not blank the displayed series, and the next good cycle overwrites it
// wholesale (sliding lookback window, not appended history).

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use sth_telemetry_dashboard::poll;
use sth_telemetry_dashboard::{AttributeKind, FetchError, Sample, SampleSource, SeriesStore};

/// Replays one canned cycle per call, all attributes alike.
struct ScriptedSource {
    cycles: Vec<Result<Vec<Sample>, FetchError>>,
    cursor: AtomicUsize,
}

impl ScriptedSource {
    fn new(cycles: Vec<Result<Vec<Sample>, FetchError>>) -> Self {
        Self {
            cycles,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Advance to the next scripted cycle (one cycle = three fetches).
    fn next_cycle(&self) {
        self.cursor.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SampleSource for ScriptedSource {
    async fn fetch(
        &self,
        _attribute: AttributeKind,
        _last_n: u32,
    ) -> Result<Vec<Sample>, FetchError> {
        self.cycles[self.cursor.load(Ordering::SeqCst)].clone()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn points(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| Sample {
            recv_time: format!("2024-01-01T00:00:{i:02}.000Z"),
            value: i as f64,
        })
        .collect()
}

#[tokio::test]
async fn transient_outage_retains_previous_snapshot() {
    let source = ScriptedSource::new(vec![
        Ok(points(5)),
        Err(FetchError::Transport { status: 500 }),
    ]);
    let store = SeriesStore::new();

    let first = poll::run_once(&source, &store, 30).await;
    assert!(first.applied);
    let after_first = store.snapshot();
    assert_eq!(after_first.len(), 5);

    source.next_cycle();
    let second = poll::run_once(&source, &store, 30).await;
    assert!(!second.applied);
    assert_eq!(second.failures.len(), 3);

    // Store after cycle 2 equals store after cycle 1.
    assert_eq!(store.snapshot(), after_first);
}

#[tokio::test]
async fn next_good_cycle_replaces_rather_than_appends() {
    let source = ScriptedSource::new(vec![Ok(points(5)), Ok(points(2))]);
    let store = SeriesStore::new();

    poll::run_once(&source, &store, 30).await;
    assert_eq!(store.len(), 5);

    source.next_cycle();
    poll::run_once(&source, &store, 30).await;
    assert_eq!(store.len(), 2);
}
