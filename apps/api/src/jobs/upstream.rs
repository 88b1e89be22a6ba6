/// Upstream jobs client — the single point of entry for all calls to the
/// government job-search API. No other module may call it directly.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const UPSTREAM_TIMEOUT_SECS: u64 = 30;

// The upstream rejects requests without browser-like headers.
const UPSTREAM_ORIGIN: &str = "https://www.skillindiadigital.gov.in";
const UPSTREAM_ACCEPT: &str = "application/json, text/plain, */*";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Status { status: u16 },
}

/// Search filters forwarded to the upstream API, field names verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(rename = "PageNumber", default = "default_page_number")]
    pub page_number: u32,
    #[serde(rename = "PageSize", default = "default_page_size")]
    pub page_size: u32,
    #[serde(rename = "JobStatus", default = "default_job_status")]
    pub job_status: String,
    #[serde(rename = "Sector", default)]
    pub sector: Vec<String>,
    #[serde(rename = "Country", default)]
    pub country: Vec<String>,
    #[serde(rename = "State", default)]
    pub state: Vec<String>,
    #[serde(rename = "SourceSystem", default)]
    pub source_system: Vec<String>,
    #[serde(rename = "MinSalary", default)]
    pub min_salary: u64,
    #[serde(rename = "MaxSalary", default = "default_max_salary")]
    pub max_salary: u64,
    #[serde(rename = "Field", default = "default_sort_field")]
    pub field: String,
    #[serde(rename = "Order", default = "default_sort_order")]
    pub order: String,
}

fn default_page_number() -> u32 {
    1
}
fn default_page_size() -> u32 {
    10
}
fn default_job_status() -> String {
    "Active".to_string()
}
fn default_max_salary() -> u64 {
    999_999
}
fn default_sort_field() -> String {
    "postedOn".to_string()
}
fn default_sort_order() -> String {
    "desc".to_string()
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
            job_status: default_job_status(),
            sector: Vec::new(),
            country: Vec::new(),
            state: Vec::new(),
            source_system: Vec::new(),
            min_salary: 0,
            max_salary: default_max_salary(),
            field: default_sort_field(),
            order: default_sort_order(),
        }
    }
}

/// The upstream wraps every payload in a `Data` envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Data")]
    data: Option<Value>,
}

#[derive(Clone)]
pub struct JobsClient {
    client: Client,
    base_url: String,
}

impl JobsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }

    /// POST /api/jobs/filter — returns the `Data` payload
    /// (an object holding `Results` and paging metadata).
    pub async fn search(&self, filters: &SearchFilters) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(format!("{}/api/jobs/filter", self.base_url))
            .header("Content-Type", "application/json")
            .header("Accept", UPSTREAM_ACCEPT)
            .header("Origin", UPSTREAM_ORIGIN)
            .header("Referer", format!("{UPSTREAM_ORIGIN}/"))
            .json(filters)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream job search returned {status}");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: Envelope = response.json().await?;
        debug!(
            page = filters.page_number,
            size = filters.page_size,
            "Upstream job search succeeded"
        );
        Ok(envelope.data.unwrap_or(Value::Array(Vec::new())))
    }

    /// GET /api/jobs/{id} — `None` when the upstream has no record.
    pub async fn job(&self, id: &str) -> Result<Option<Value>, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/api/jobs/{id}", self.base_url))
            .header("Accept", UPSTREAM_ACCEPT)
            .header("Origin", UPSTREAM_ORIGIN)
            .header("Referer", format!("{UPSTREAM_ORIGIN}/"))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            warn!("Upstream job lookup returned {status}");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: Envelope = response.json().await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_serialize_with_upstream_field_names() {
        let filters = SearchFilters {
            sector: vec!["Healthcare".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["PageNumber"], 1);
        assert_eq!(json["PageSize"], 10);
        assert_eq!(json["JobStatus"], "Active");
        assert_eq!(json["Sector"][0], "Healthcare");
        assert_eq!(json["Field"], "postedOn");
    }

    #[test]
    fn test_filters_deserialize_fills_defaults() {
        let filters: SearchFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters.page_number, 1);
        assert_eq!(filters.max_salary, 999_999);
        assert!(filters.sector.is_empty());
    }

    #[test]
    fn test_envelope_tolerates_missing_data() {
        let envelope: Envelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_none());
    }
}
