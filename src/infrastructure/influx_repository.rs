// InfluxDB reading source implementation
use crate::application::reading_source::ReadingSource;
use crate::domain::reading::Reading;
use crate::domain::window::TimeWindow;
use crate::infrastructure::config::{InfluxSettings, prepare_query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const READINGS_QUERY: &str = concat!(
    "SELECT \"${field}\" FROM \"${measurement}\" WHERE \"${mill_tag}\" = '${mill}' ",
    "AND time >= now() - ${days}d ORDER BY time ASC"
);
const LIVE_RATE_QUERY: &str = concat!(
    "SELECT last(\"${field}\") FROM \"${measurement}\" WHERE \"${mill_tag}\" = '${mill}' ",
    "AND time >= now() - 15m"
);
const MILL_IDS_QUERY: &str = "SHOW TAG VALUES FROM \"${measurement}\" WITH KEY = \"${mill_tag}\"";

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    client: reqwest::Client,
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    measurement: String,
    mill_tag: String,
    field: String,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    #[allow(dead_code)]
    name: String,
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxRepository {
    pub fn new(settings: InfluxSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token,
            database: settings.database,
            retention_policy: settings.retention_policy,
            measurement: settings.measurement,
            mill_tag: settings.mill_tag,
            field: settings.field,
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&epoch=ms&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    fn render(&self, template: &str, mill_id: Option<&str>, days: Option<u32>) -> String {
        let mut vars = HashMap::new();
        vars.insert("measurement".to_string(), self.measurement.clone());
        vars.insert("mill_tag".to_string(), self.mill_tag.clone());
        vars.insert("field".to_string(), self.field.clone());
        if let Some(mill_id) = mill_id {
            vars.insert("mill".to_string(), mill_id.replace('\'', "\\'"));
        }
        if let Some(days) = days {
            vars.insert("days".to_string(), days.to_string());
        }
        prepare_query(template, &vars)
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        if let Some(result) = data.results.first() {
            if let Some(error) = &result.error {
                anyhow::bail!("InfluxDB query error: {}", error);
            }
        }

        Ok(data)
    }
}

/// Extract `(time, value)` rows. With `epoch=ms` the time column is an
/// integer; RFC 3339 strings are accepted too. Null values become gaps.
fn parse_readings(response: &InfluxQLResponse) -> Vec<Reading> {
    let mut readings = Vec::new();
    let Some(series) = response.results.first().and_then(|r| r.series.as_ref()) else {
        return readings;
    };

    for s in series {
        let time_idx = s.columns.iter().position(|c| c == "time").unwrap_or(0);
        let value_idx = if time_idx == 0 { 1 } else { 0 };

        for row in &s.values {
            let Some(timestamp) = row.get(time_idx).and_then(parse_time) else {
                continue;
            };
            let value = row.get(value_idx).and_then(|v| v.as_f64());
            readings.push(Reading { timestamp, value });
        }
    }

    readings
}

fn parse_time(value: &serde_json::Value) -> Option<chrono::DateTime<chrono::Utc>> {
    match value {
        serde_json::Value::Number(n) => {
            n.as_i64().and_then(chrono::DateTime::from_timestamp_millis)
        }
        serde_json::Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc)),
        _ => None,
    }
}

#[async_trait]
impl ReadingSource for InfluxRepository {
    async fn list_mill_ids(&self) -> Result<Vec<String>> {
        let query = self.render(MILL_IDS_QUERY, None, None);
        let response = self.execute_query(&query).await?;

        let mut ids = Vec::new();
        if let Some(series) = response.results.first().and_then(|r| r.series.as_ref()) {
            for s in series {
                for row in &s.values {
                    if let Some(id) = row.get(1).and_then(|v| v.as_str()) {
                        ids.push(id.to_string());
                    }
                }
            }
        }

        Ok(ids)
    }

    async fn fetch_readings(&self, mill_id: &str, window: TimeWindow) -> Result<Vec<Reading>> {
        let query = self.render(READINGS_QUERY, Some(mill_id), Some(window.days()));
        tracing::debug!("Executing readings query: {}", query);

        let response = self
            .execute_query(&query)
            .await
            .with_context(|| format!("Failed to fetch readings for mill {}", mill_id))?;
        let readings = parse_readings(&response);

        tracing::debug!("Fetched {} readings for mill {}", readings.len(), mill_id);
        Ok(readings)
    }

    async fn fetch_live_rate(&self, mill_id: &str) -> Result<Option<f64>> {
        let query = self.render(LIVE_RATE_QUERY, Some(mill_id), None);
        let response = self.execute_query(&query).await?;

        Ok(parse_readings(&response)
            .into_iter()
            .last()
            .and_then(|r| r.finite_value()))
    }
}
