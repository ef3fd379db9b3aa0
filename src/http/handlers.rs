//! Endpoint handlers.

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use crate::http::request::request_id;
use crate::http::response::AppError;
use crate::http::server::AppState;
use crate::models::{Record, RecordError, RecordManager};
use crate::observability::logging::ThreadLabel;

/// Name given to every record created through the endpoint.
pub const RECORD_NAME: &str = "Test";

/// Body returned by a successful create.
pub const CREATED_BODY: &str = "Model created";

/// Create one record.
///
/// The whole view body runs on one blocking worker thread, so inline
/// post-save receivers share its thread and hold up the response.
pub async fn create_record(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<&'static str, AppError> {
    let request_id = request_id(&headers).to_string();
    let records = state.records.clone();
    let span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        create_view(&records, &request_id)
    })
    .await??;

    Ok(CREATED_BODY)
}

/// Synchronous part of the create endpoint.
pub fn create_view(records: &RecordManager, request_id: &str) -> Result<Record, RecordError> {
    let current = ThreadLabel::current();
    tracing::info!(
        request_id = %request_id,
        thread = %current.name,
        thread_id = %current.id,
        "View running"
    );

    let record = records.create(RECORD_NAME)?;
    tracing::info!(request_id = %request_id, record_id = record.id, "Model created");
    Ok(record)
}

pub async fn list_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.records.all())
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
    pub handler_invocations: u64,
    pub dispatch: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records: state.records.count(),
        handler_invocations: state.handler.invocations(),
        dispatch: state.records.post_save().mode().as_str(),
    })
}
