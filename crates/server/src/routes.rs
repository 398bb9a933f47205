//! HTTP routes: health, sheet inspection and merge.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use keyfill_merge::{inspect_workbook, merge_workbook, MergeError, SheetSelection, WorkbookInfo};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Content type of the merged workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File name offered for download.
pub const OUTPUT_FILE_NAME: &str = "processed_file.xlsx";

pub const MATCH_COUNT_HEADER: HeaderName = HeaderName::from_static("x-match-count");
pub const MERGE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-merge-status");

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Sheet selection from the query string. Empty values mean "use the default".
#[derive(Debug, Default, Deserialize)]
pub struct MergeParams {
    pub target: Option<String>,
    pub source: Option<String>,
}

impl From<MergeParams> for SheetSelection {
    fn from(params: MergeParams) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        SheetSelection {
            target: non_empty(params.target),
            source: non_empty(params.source),
        }
    }
}

/// A merge error rendered as an HTTP response.
pub struct ApiError(MergeError);

impl From<MergeError> for ApiError {
    fn from(err: MergeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MergeError::Parse(_) => StatusCode::BAD_REQUEST,
            err if err.is_precondition() => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(kind = self.0.kind(), error = %self.0, "request failed");
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run blocking engine work off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, MergeError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| MergeError::Unclassified(format!("{e:?}")))?
        .map_err(ApiError::from)
}

/// List the sheets of the uploaded workbook with the default selection.
pub async fn sheets(body: Bytes) -> Result<Json<WorkbookInfo>, ApiError> {
    let info = blocking(move || inspect_workbook(&body)).await?;
    Ok(Json(info))
}

/// Merge the uploaded workbook and return the result as a download.
pub async fn merge(
    Query(params): Query<MergeParams>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let selection = SheetSelection::from(params);
    let outcome = blocking(move || merge_workbook(&body, &selection)).await?;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{OUTPUT_FILE_NAME}\""),
        ),
        (MATCH_COUNT_HEADER, outcome.matched_rows().to_string()),
        (MERGE_STATUS_HEADER, outcome.status.as_str().to_string()),
    ];
    Ok((StatusCode::OK, headers, outcome.bytes).into_response())
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sheets", post(sheets))
        .route("/merge", post(merge))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
