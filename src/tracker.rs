use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use serde_json::{Map, Value};

use crate::client::{Error, EventSink, IngestionClient};
use crate::environment::Environment;
use crate::event::AnalyticsEvent;
use crate::identity::IdentityProvider;

/// Caller-supplied auxiliary event data.
///
/// May carry the override keys `userId`, `sessionId`, `durationMs` and
/// `products`; all remaining keys travel nested under `eventData`.
pub type EventData = Map<String, Value>;

const USER_ID: &str = "userId";
const SESSION_ID: &str = "sessionId";
const DURATION_MS: &str = "durationMs";
const PRODUCTS: &str = "products";

#[derive(Clone, Debug, clap::Args)]
#[command(next_help_heading = "Event tracking configuration")]
pub struct TrackerConfig {
    /// Base URL of the event ingestion endpoint. If not present, tracking will be disabled.
    #[arg(long = "tracking-endpoint", env = "TRACKING_ENDPOINT")]
    pub endpoint: Option<Url>,

    /// Request timeout for the ingestion endpoint.
    #[arg(long = "tracking-timeout", env = "TRACKING_TIMEOUT", default_value = "15s")]
    pub timeout: humantime::Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(15).into(),
        }
    }
}

pub struct Tracker {
    sink: Option<Arc<dyn EventSink>>,
    environment: Option<Arc<dyn Environment>>,
    identity: Arc<dyn IdentityProvider>,
}

impl Tracker {
    /// Create a tracker from configuration.
    ///
    /// Without a configured endpoint, tracking is disabled and events are
    /// dropped.
    pub fn new(
        config: TrackerConfig,
        environment: Option<Arc<dyn Environment>>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Arc<Self>, Error> {
        let sink = match config.endpoint {
            Some(endpoint) => {
                let client = reqwest::Client::builder().timeout(config.timeout.into()).build()?;
                Some(Arc::new(IngestionClient::new(client, endpoint)) as Arc<dyn EventSink>)
            }
            None => {
                log::info!("No tracking endpoint configured, analytics are disabled");
                None
            }
        };

        Ok(Arc::new(Self {
            sink,
            environment,
            identity,
        }))
    }

    /// Create a tracker over an existing sink.
    pub fn with_sink(
        sink: Arc<dyn EventSink>,
        environment: Option<Arc<dyn Environment>>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Arc<Self> {
        Arc::new(Self {
            sink: Some(sink),
            environment,
            identity,
        })
    }

    /// Assemble an analytics event from the ambient page state and the
    /// caller's event data, and forward it to the ingestion endpoint.
    ///
    /// Transport failures surface to the caller unmodified.
    pub async fn track(&self, event_type: impl Into<String>, mut event_data: EventData) -> Result<(), Error> {
        let event_type = event_type.into();

        let environment = match &self.environment {
            Some(environment) => environment,
            None => {
                log::warn!("No page environment, skipping tracking event: {event_type}");
                return Ok(());
            }
        };

        let user_id = match event_data.remove(USER_ID) {
            Some(Value::String(id)) if !id.is_empty() => id,
            None | Some(Value::Null) | Some(Value::String(_)) => self.identity.anonymous_user_id(),
            Some(other) => other.to_string(),
        };

        let session_id = match event_data.remove(SESSION_ID) {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => self.identity.session_id(),
        };

        let duration_ms = event_data
            .remove(DURATION_MS)
            .as_ref()
            .and_then(duration_override)
            .unwrap_or_else(|| round_ms(environment.elapsed()));

        let products = match event_data.remove(PRODUCTS) {
            Some(Value::Object(products)) => products,
            _ => Map::new(),
        };

        let event_data = if event_data.is_empty() {
            Map::new()
        } else {
            let mut nested = Map::new();
            nested.insert("eventData".to_string(), Value::Object(event_data));
            nested
        };

        let event = AnalyticsEvent {
            event_type,
            user_id,
            session_id,
            timestamp: Utc::now(),
            page_path: environment.page_path(),
            referrer: environment.referrer().unwrap_or_default(),
            user_agent: environment.user_agent().unwrap_or_default(),
            duration_ms,
            products,
            location: environment.timezone(),
            event_data,
        };

        match &self.sink {
            Some(sink) => sink.track(&[event]).await,
            None => Ok(()),
        }
    }
}

/// A usable `durationMs` override is a non-negative number; fractional
/// values are rounded.
fn duration_override(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(number) => number,
        _ => return None,
    };

    match number.as_u64() {
        Some(ms) => Some(ms),
        None => number.as_f64().filter(|ms| *ms >= 0.0).map(|ms| ms.round() as u64),
    }
}

fn round_ms(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}
