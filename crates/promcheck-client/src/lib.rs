//! Prometheus HTTP API client, restricted to the range queries the replay
//! needs (`GET /api/v1/query_range`).

pub mod error;

use chrono::{DateTime, Utc};
use promcheck_common::types::{Matrix, Sample, Series};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration as StdDuration;

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

pub struct PromClient {
    base_url: String,
    client: reqwest::Client,
}

impl PromClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Evaluate `expr` over `[start, end]` at the given resolution step and
    /// return the matrix of labeled series.
    pub async fn query_range(
        &self,
        expr: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: StdDuration,
    ) -> Result<Matrix> {
        let url = format!("{}/api/v1/query_range", self.base_url);
        let start_s = start.timestamp().to_string();
        let end_s = end.timestamp().to_string();
        let step_s = step.as_secs().max(1).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", expr),
                ("start", start_s.as_str()),
                ("end", end_s.as_str()),
                ("step", step_s.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prometheus wraps query errors in its JSON envelope even on
            // 4xx/5xx; surface those as query errors when decodable.
            if let Ok(envelope) = serde_json::from_str::<QueryResponse>(&body) {
                if envelope.status != "success" {
                    return Err(error_from_envelope(envelope));
                }
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        decode_matrix(&body)
    }
}

// ---- Prometheus response envelope ----

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(rename = "resultType")]
    result_type: String,
    #[serde(default)]
    result: Vec<RangeSeries>,
}

#[derive(Debug, Deserialize)]
struct RangeSeries {
    #[serde(default)]
    metric: HashMap<String, String>,
    /// Samples as `[unix_seconds, "value"]` pairs.
    #[serde(default)]
    values: Vec<(f64, String)>,
}

fn error_from_envelope(envelope: QueryResponse) -> ClientError {
    ClientError::ErrorResponse {
        error_type: envelope.error_type.unwrap_or_default(),
        error: envelope.error.unwrap_or_default(),
    }
}

fn decode_matrix(body: &str) -> Result<Matrix> {
    let envelope: QueryResponse = serde_json::from_str(body)?;
    if envelope.status != "success" {
        return Err(error_from_envelope(envelope));
    }

    let data = envelope
        .data
        .ok_or_else(|| ClientError::Malformed("missing 'data' field".to_string()))?;
    if data.result_type != "matrix" {
        return Err(ClientError::UnexpectedResultType(data.result_type));
    }

    data.result.into_iter().map(series_from_raw).collect()
}

fn series_from_raw(raw: RangeSeries) -> Result<Series> {
    let mut samples = Vec::with_capacity(raw.values.len());
    for (ts, value) in raw.values {
        let timestamp = DateTime::from_timestamp_millis((ts * 1000.0) as i64)
            .ok_or_else(|| ClientError::InvalidSample(format!("timestamp {ts} out of range")))?;
        let value: f64 = value
            .parse()
            .map_err(|_| ClientError::InvalidSample(format!("non-numeric value '{value}'")))?;
        samples.push(Sample { timestamp, value });
    }
    Ok(Series {
        labels: raw.metric,
        samples,
    })
}
