//! Admin import endpoints.
//!
//! ```text
//! POST /api/v1/imports/parse?filename=escala.pdf   (raw file body)
//! POST /api/v1/imports {"payload": {...}, "overwrite": false}
//! ```
//!
//! Both require an admin session; anonymous callers get 401 and members 403
//! before the parser or storage is touched.

use actix_web::http::header;
use actix_web::{HttpRequest, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ImportReport;
use crate::domain::ports::{ParsePreview, RosterDocument, SaveRosterRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::access_context;
use crate::inbound::http::schemas::{ErrorSchema, ImportReportSchema, ParsePreviewSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Upload size limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_FILENAME: &str = "roster";

/// Body limits for the import scope: raw uploads and the echoed payload.
pub fn configure_limits(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .app_data(web::JsonConfig::default().limit(MAX_UPLOAD_BYTES));
}

/// Upload metadata.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParseQuery {
    /// Original file name, forwarded to the parser.
    pub filename: Option<String>,
}

fn document_from(request: &HttpRequest, filename: Option<String>, body: web::Bytes) -> RosterDocument {
    let filename = filename
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_owned());
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    RosterDocument {
        filename,
        content_type,
        bytes: body.to_vec(),
    }
}

/// Send an uploaded PDF or CSV to the parser and return its preview.
#[utoipa::path(
    post,
    path = "/api/v1/imports/parse",
    params(ParseQuery),
    request_body(
        content = Vec<u8>,
        content_type = "application/octet-stream",
        description = "Raw PDF or CSV bytes, at most 10 MiB"
    ),
    responses(
        (status = 200, description = "Parser preview", body = ParsePreviewSchema),
        (status = 400, description = "Empty file or unusable parser output", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin only", body = ErrorSchema),
        (status = 413, description = "File too large"),
        (status = 503, description = "Parser unavailable", body = ErrorSchema)
    ),
    tags = ["imports"],
    operation_id = "parseRoster"
)]
#[post("/imports/parse")]
pub async fn parse_roster(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    query: web::Query<ParseQuery>,
    body: web::Bytes,
) -> ApiResult<web::Json<ParsePreview>> {
    let access = access_context(&state, &session).await?;
    let document = document_from(&request, query.into_inner().filename, body);
    let preview = state.imports.parse_document(&access, document).await?;
    Ok(web::Json(preview))
}

/// Save request body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SaveRosterBody {
    /// Preview JSON as returned by the parse endpoint.
    #[schema(value_type = Object)]
    pub payload: Value,
    /// Replace an existing schedule for the period.
    #[serde(default)]
    pub overwrite: bool,
}

impl From<SaveRosterBody> for SaveRosterRequest {
    fn from(body: SaveRosterBody) -> Self {
        Self {
            payload: body.payload,
            overwrite: body.overwrite,
        }
    }
}

/// Import report plus the status line.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SaveRosterResponse {
    /// Counts and outcome of the committed import, flattened into the body.
    #[serde(flatten)]
    #[schema(inline, value_type = ImportReportSchema)]
    pub report: ImportReport,
    /// Status line shown in the import panel.
    #[schema(example = "Schedule 03/2024 saved: 2 assignments written.")]
    pub message: String,
}

/// Persist a previewed payload.
#[utoipa::path(
    post,
    path = "/api/v1/imports",
    request_body = SaveRosterBody,
    responses(
        (status = 200, description = "Import committed", body = SaveRosterResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Admin only", body = ErrorSchema),
        (status = 409, description = "Schedule exists; resend with overwrite", body = ErrorSchema),
        (status = 500, description = "Storage rejected the import; message carries the database text", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["imports"],
    operation_id = "saveRoster"
)]
#[post("/imports")]
pub async fn save_roster(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<SaveRosterBody>,
) -> ApiResult<web::Json<SaveRosterResponse>> {
    let access = access_context(&state, &session).await?;
    let report = state.imports.save(&access, body.into_inner().into()).await?;
    let message = report.message();
    Ok(web::Json(SaveRosterResponse { report, message }))
}
