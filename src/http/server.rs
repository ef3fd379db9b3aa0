//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Bind server to listener and stop on shutdown
//! - Write the store snapshot once traffic has drained

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers::{create_record, health, list_records};
use crate::http::request::MakeRequestUuid;
use crate::lifecycle::startup::Services;
use crate::models::RecordManager;
use crate::observability::metrics;
use crate::signals::SlowReceiver;
use crate::store::MemoryStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordManager>,
    pub handler: Arc<SlowReceiver>,
}

/// HTTP server for the record service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    store: MemoryStore,
}

impl HttpServer {
    /// Create a new HTTP server from configuration and wired services.
    pub fn new(config: AppConfig, services: Services) -> Self {
        let state = AppState {
            records: services.records,
            handler: services.handler,
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store: services.store,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/create", any(create_record))
            .route("/records", get(list_records))
            .route("/health", get(health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(track_metrics))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Router with all layers, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then write the store snapshot.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            dispatch = %self.config.signals.dispatch,
            handler_delay_ms = self.config.signals.handler_delay_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Err(e) = self.store.save_to_file() {
            tracing::error!(error = %e, "Failed to write record snapshot");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{build_services, Shutdown};
    use crate::models::Record;
    use ::metrics::{
        Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString,
        Unit,
    };
    use axum::{body::Body, http::StatusCode};
    use std::sync::Mutex;
    use tower::ServiceExt;

    fn server(delay_ms: u64, request_secs: u64) -> HttpServer {
        let mut config = AppConfig::default();
        config.signals.handler_delay_ms = delay_ms;
        config.timeouts.request_secs = request_secs;
        let services = build_services(&config).unwrap();
        HttpServer::new(config, services)
    }

    #[tokio::test]
    async fn test_create_route_accepts_any_method() {
        let server = server(0, 5);
        for method in ["GET", "POST", "PUT"] {
            let request = axum::http::Request::builder()
                .method(method)
                .uri("/create")
                .body(Body::empty())
                .unwrap();
            let response = server.router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().contains_key("x-request-id"));
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let request = axum::http::Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();
        let response = server(0, 5).router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handler_longer_than_timeout_is_cut_off() {
        let request = axum::http::Request::builder()
            .uri("/create")
            .body(Body::empty())
            .unwrap();
        let response = server(1_500, 1).router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_snapshot_written_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut config = AppConfig::default();
        config.signals.handler_delay_ms = 0;
        config.store.snapshot_path = Some(path.to_string_lossy().into_owned());
        let services = build_services(&config).unwrap();
        let created = services.records.create("Test").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let server = HttpServer::new(config, services);
        let handle = tokio::spawn(server.run(listener, server_shutdown));

        shutdown.trigger();
        handle.await.unwrap().unwrap();

        let saved: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, vec![created]);
    }

    /// Keeps the keys of every counter incremented while installed.
    #[derive(Default)]
    struct CounterLog {
        keys: Arc<Mutex<Vec<Key>>>,
    }

    struct LoggedCounter {
        key: Key,
        keys: Arc<Mutex<Vec<Key>>>,
    }

    impl CounterFn for LoggedCounter {
        fn increment(&self, _value: u64) {
            self.keys.lock().unwrap().push(self.key.clone());
        }

        fn absolute(&self, _value: u64) {}
    }

    impl Recorder for CounterLog {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            Counter::from_arc(Arc::new(LoggedCounter {
                key: key.clone(),
                keys: self.keys.clone(),
            }))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_timed_out_request_is_counted() {
        let recorder = CounterLog::default();
        let keys = recorder.keys.clone();

        ::metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let request = axum::http::Request::builder()
                    .uri("/create")
                    .body(Body::empty())
                    .unwrap();
                let response = server(1_500, 1).router().oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
            });
        });

        let keys = keys.lock().unwrap();
        assert!(keys.iter().any(|key| {
            key.name() == "http_requests_total"
                && key
                    .labels()
                    .any(|label| label.key() == "status" && label.value() == "408")
        }));
    }
}
