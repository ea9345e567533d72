use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Event,
    Exception,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub name: String,
    pub message: String,
    pub properties: serde_json::Value,
    pub timestamp_ms: u64,
}

/// Fire-and-forget analytics and error capture.
///
/// `capture_*` never blocks and never fails. With an endpoint configured and
/// a tokio runtime available, the event is posted from a spawned task;
/// otherwise it only goes to the log.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    endpoint: Option<String>,
    client: Option<reqwest::Client>,
}

impl Telemetry {
    pub fn new(endpoint: Option<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint,
            client: Some(client),
        }
    }

    /// Log-only telemetry.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn capture_exception(&self, name: &str, message: impl Into<String>) -> Uuid {
        let message = message.into();
        log::warn!("[telemetry] {name}: {message}");
        self.dispatch(EventKind::Exception, name, message, serde_json::Value::Null)
    }

    pub fn capture_event(&self, name: &str, properties: serde_json::Value) -> Uuid {
        log::debug!("[telemetry] event {name} {properties}");
        self.dispatch(EventKind::Event, name, String::new(), properties)
    }

    fn dispatch(
        &self,
        kind: EventKind,
        name: &str,
        message: String,
        properties: serde_json::Value,
    ) -> Uuid {
        let event = TelemetryEvent {
            id: Uuid::new_v4(),
            kind,
            name: name.to_string(),
            message,
            properties,
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        };
        let id = event.id;

        let (Some(endpoint), Some(client)) = (self.endpoint.clone(), self.client.clone()) else {
            return id;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::debug!("[telemetry] no runtime, event {id} kept local");
            return id;
        };

        handle.spawn(async move {
            let result = client.post(&endpoint).json(&event).send().await;
            match result {
                Ok(r) if r.status().is_success() => {}
                Ok(r) => log::debug!("[telemetry] {} rejected event {}", r.status(), event.id),
                Err(e) => log::debug!("[telemetry] delivery failed: {e}"),
            }
        });

        id
    }
}
