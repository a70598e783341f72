use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single analytics event, as accepted by the ingestion backend.
///
/// Constructed fresh for every tracking call and handed to the transport
/// unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event_type: String,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub page_path: String,
    /// Referring page, empty when unknown.
    pub referrer: String,
    /// Client user agent, empty when unknown.
    pub user_agent: String,
    pub duration_ms: u64,
    pub products: Map<String, Value>,
    /// IANA time zone of the client, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub event_data: Map<String, Value>,
}
