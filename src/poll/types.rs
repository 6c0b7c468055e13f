// src/poll/types.rs
use serde::{Deserialize, Serialize};

/// The three quantities the historian tracks for the device. Extending this
/// set means adding a matching fetch call and aggregation column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Luminosity,
    Temperature,
    Humidity,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 3] = [
        AttributeKind::Luminosity,
        AttributeKind::Temperature,
        AttributeKind::Humidity,
    ];

    /// Attribute name as it appears in the historian URL path.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Luminosity => "luminosity",
            AttributeKind::Temperature => "temperature",
            AttributeKind::Humidity => "humidity",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw historian record. `recv_time` stays in the historian-native string
/// form; bucketing compares it verbatim, so sub-second precision differences
/// produce distinct buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub recv_time: String,
    pub value: f64,
}

/// Fetch failures are local to one attribute for one cycle. The pipeline
/// downgrades each to "no samples for this attribute"; they never abort a
/// cycle or reach the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Non-success HTTP status. `status` is 0 when the request never got a
    /// response (connect/transport failure).
    #[error("historian returned status {status}")]
    Transport { status: u16 },
    /// Transport succeeded but the payload is missing an expected nesting
    /// level or is not JSON at all.
    #[error("unexpected payload shape: {detail}")]
    Structure { detail: String },
    /// A record's attrValue did not parse as a number. Fails the whole fetch
    /// rather than inserting a corrupt sample.
    #[error("non-numeric attrValue {raw}")]
    ValueParse { raw: String },
}

impl FetchError {
    /// Label for the per-kind error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Structure { .. } => "structure",
            FetchError::ValueParse { .. } => "value_parse",
        }
    }
}

#[async_trait::async_trait]
pub trait SampleSource: Send + Sync {
    /// Request at most `last_n` most-recent samples for one attribute.
    async fn fetch(&self, attribute: AttributeKind, last_n: u32)
        -> Result<Vec<Sample>, FetchError>;
    fn name(&self) -> &'static str;
}
