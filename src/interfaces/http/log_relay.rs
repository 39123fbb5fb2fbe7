use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, trace, warn};

/// Provenance tag stamped into every forwarded record.
pub const SOURCE_TAG: &str = "flutter_web";

/// A log record as emitted by the web client.
#[derive(Debug, Deserialize)]
pub struct ClientLogRecord {
    pub level: Option<String>,
    pub message: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Severity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Severity {
    /// Maps a client-supplied level to a sink severity. Missing or unknown
    /// levels forward as info.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("error") => Self::Error,
            Some("warn") => Self::Warn,
            Some("debug") => Self::Debug,
            Some("trace") => Self::Trace,
            _ => Self::Info,
        }
    }
}

/// Builds the record handed to the log sink: severity, message, and the
/// client metadata with the provenance tag stamped in. Any client-supplied
/// `source` is overwritten.
pub fn sink_record(record: ClientLogRecord) -> (Severity, String, Map<String, Value>) {
    let severity = Severity::parse(record.level.as_deref());
    let mut metadata = record.metadata;
    metadata.insert("source".to_string(), Value::String(SOURCE_TAG.to_string()));
    (severity, record.message, metadata)
}

/// The log relay: a stateless pass-through from the web client to the
/// process log sink. Delivery is at-most-once and best-effort; the response
/// never depends on a downstream sink.
pub fn router() -> Router {
    Router::new()
        .route("/log", post(relay_log))
        .route("/health", get(|| async { "ok" }))
}

async fn relay_log(Json(record): Json<ClientLogRecord>) -> impl IntoResponse {
    let (severity, message, metadata) = sink_record(record);
    let metadata = Value::Object(metadata);
    match severity {
        Severity::Error => error!(target: "client", metadata = %metadata, "{message}"),
        Severity::Warn => warn!(target: "client", metadata = %metadata, "{message}"),
        Severity::Info => info!(target: "client", metadata = %metadata, "{message}"),
        Severity::Debug => debug!(target: "client", metadata = %metadata, "{message}"),
        Severity::Trace => trace!(target: "client", metadata = %metadata, "{message}"),
    }
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn record(raw: &str) -> ClientLogRecord {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_sink_record_defaults_to_info_and_stamps_source() {
        let (severity, message, metadata) = sink_record(record(r#"{"message":"hi"}"#));
        assert_eq!(severity, Severity::Info);
        assert_eq!(message, "hi");
        assert_eq!(Value::Object(metadata), json!({"source": "flutter_web"}));
    }

    #[test]
    fn test_sink_record_keeps_metadata_and_overwrites_source() {
        let raw = r#"{"level":"warn","message":"slow","metadata":{"page":"home","source":"spoofed"}}"#;
        let (severity, _, metadata) = sink_record(record(raw));
        assert_eq!(severity, Severity::Warn);
        assert_eq!(
            Value::Object(metadata),
            json!({"page": "home", "source": "flutter_web"})
        );
    }

    #[test]
    fn test_unknown_level_forwards_as_info() {
        assert_eq!(Severity::parse(Some("shout")), Severity::Info);
        assert_eq!(Severity::parse(None), Severity::Info);
        assert_eq!(Severity::parse(Some("error")), Severity::Error);
    }

    #[tokio::test]
    async fn test_relay_acknowledges_with_ok() {
        let request = Request::builder()
            .method("POST")
            .uri("/log")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"hi"}"#))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_relay_rejects_record_without_message() {
        let request = Request::builder()
            .method("POST")
            .uri("/log")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"level":"info"}"#))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
