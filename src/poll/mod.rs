// src/poll/mod.rs
pub mod historian;
pub mod scheduler;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::aggregate;
use crate::store::SeriesStore;
use types::{AttributeKind, FetchError, Sample, SampleSource};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "poll_samples_total",
            "Raw samples parsed from the historian, per attribute."
        );
        describe_counter!(
            "poll_fetch_errors_total",
            "Fetches downgraded to empty, per error kind."
        );
        describe_counter!("poll_cycles_total", "Completed poll cycles.");
        describe_histogram!("poll_fetch_ms", "Historian fetch+parse time in milliseconds.");
        describe_gauge!("poll_last_run_ts", "Unix ts when a poll cycle last completed.");
        describe_gauge!("poll_series_len", "Distinct timestamps in the stored series.");
    });
}

/// One attribute's downgraded failure within a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub attribute: AttributeKind,
    pub error: FetchError,
}

/// What a cycle did, returned to the caller instead of being observable only
/// through log lines.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Distinct timestamps in this cycle's aggregated output.
    pub timestamps: usize,
    pub failures: Vec<FetchFailure>,
    /// False when the cycle produced zero samples and the store kept its
    /// previous snapshot.
    pub applied: bool,
}

/// Run one fetch→aggregate→replace cycle. The three attribute fetches run
/// concurrently; each failure is downgraded to an empty sequence for that
/// attribute, so this function itself has no failure path.
pub async fn run_once(source: &dyn SampleSource, store: &SeriesStore, last_n: u32) -> CycleReport {
    ensure_metrics_described();

    let (lum, temp, hum) = tokio::join!(
        source.fetch(AttributeKind::Luminosity, last_n),
        source.fetch(AttributeKind::Temperature, last_n),
        source.fetch(AttributeKind::Humidity, last_n),
    );

    let mut failures = Vec::new();
    let mut degrade = |attribute: AttributeKind, res: Result<Vec<Sample>, FetchError>| match res {
        Ok(samples) => samples,
        Err(error) => {
            tracing::warn!(
                target: "poll",
                attribute = %attribute,
                error = %error,
                source = source.name(),
                "fetch failed; attribute empty this cycle"
            );
            counter!("poll_fetch_errors_total", "kind" => error.kind()).increment(1);
            failures.push(FetchFailure { attribute, error });
            Vec::new()
        }
    };
    let lum = degrade(AttributeKind::Luminosity, lum);
    let temp = degrade(AttributeKind::Temperature, temp);
    let hum = degrade(AttributeKind::Humidity, hum);

    let series = aggregate::aggregate(&lum, &temp, &hum);
    let timestamps = series.len();
    let applied = store.replace(series);

    counter!("poll_cycles_total").increment(1);
    gauge!("poll_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
    gauge!("poll_series_len").set(store.len() as f64);

    CycleReport {
        timestamps,
        failures,
        applied,
    }
}
