// src/poll/historian.rs
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use serde::Deserialize;

use crate::config::HistorianConfig;
use crate::poll::types::{AttributeKind, FetchError, Sample, SampleSource};

/// STH-Comet raw-data payload. Every nesting level defaults to empty so a
/// missing field surfaces as a `Structure` error, not a deserialize failure.
#[derive(Debug, Deserialize)]
struct SthBody {
    #[serde(rename = "contextResponses", default)]
    context_responses: Vec<SthContextResponse>,
}

#[derive(Debug, Deserialize)]
struct SthContextResponse {
    #[serde(rename = "contextElement")]
    context_element: Option<SthContextElement>,
}

#[derive(Debug, Deserialize)]
struct SthContextElement {
    #[serde(default)]
    attributes: Vec<SthAttribute>,
}

#[derive(Debug, Deserialize)]
struct SthAttribute {
    #[serde(default)]
    values: Vec<SthValue>,
}

#[derive(Debug, Deserialize)]
struct SthValue {
    #[serde(rename = "recvTime")]
    recv_time: String,
    /// STH reports values as strings; some deployments send raw numbers.
    #[serde(rename = "attrValue")]
    attr_value: serde_json::Value,
}

/// One query per attribute per cycle against the historian's raw-data
/// endpoint. No retry, no backoff; the transport default timeout applies.
pub struct SthClient {
    cfg: HistorianConfig,
    client: Client,
}

impl SthClient {
    pub fn new(cfg: HistorianConfig) -> Self {
        Self {
            cfg,
            client: Client::new(),
        }
    }

    fn attribute_url(&self, attribute: AttributeKind) -> String {
        format!(
            "http://{}:{}/STH/v1/contextEntities/type/{}/id/{}/attributes/{}",
            self.cfg.host,
            self.cfg.port,
            self.cfg.entity_type,
            self.cfg.device_id,
            attribute.as_str()
        )
    }

    /// Map a raw historian body to samples. Public so fixture tests can
    /// exercise parsing without a live server.
    pub fn parse_body(body: &str) -> Result<Vec<Sample>, FetchError> {
        let parsed: SthBody = serde_json::from_str(body).map_err(|e| FetchError::Structure {
            detail: e.to_string(),
        })?;

        let values = parsed
            .context_responses
            .into_iter()
            .next()
            .and_then(|cr| cr.context_element)
            .and_then(|ce| ce.attributes.into_iter().next())
            .map(|attr| attr.values)
            .ok_or_else(|| FetchError::Structure {
                detail: "missing contextResponses/contextElement/attributes".to_string(),
            })?;

        let mut out = Vec::with_capacity(values.len());
        for v in values {
            let value = coerce_value(&v.attr_value)?;
            out.push(Sample {
                recv_time: v.recv_time,
                value,
            });
        }
        Ok(out)
    }
}

fn coerce_value(raw: &serde_json::Value) -> Result<f64, FetchError> {
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FetchError::ValueParse {
        raw: raw.to_string(),
    })
}

#[async_trait]
impl SampleSource for SthClient {
    async fn fetch(
        &self,
        attribute: AttributeKind,
        last_n: u32,
    ) -> Result<Vec<Sample>, FetchError> {
        let t0 = std::time::Instant::now();
        let url = self.attribute_url(attribute);

        let resp = self
            .client
            .get(&url)
            .query(&[("lastN", last_n)])
            .header("fiware-service", &self.cfg.service)
            .header("fiware-servicepath", &self.cfg.service_path)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Transport {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| FetchError::Transport {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
        })?;
        let samples = Self::parse_body(&body)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("poll_fetch_ms").record(ms);
        counter!("poll_samples_total", "attribute" => attribute.as_str())
            .increment(samples.len() as u64);
        Ok(samples)
    }

    fn name(&self) -> &'static str {
        "sth-comet"
    }
}
