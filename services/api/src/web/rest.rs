//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use bytes::Bytes;
use formscan_core::domain::{AuthenticatedUser, MediaType};
use formscan_core::parser::parse_model_reply;
use formscan_core::ports::PortError;
use formscan_core::prompts::default_prompt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    info(title = "帳票データ化API", version = "1.0.0"),
    paths(
        health_handler,
        process_document_handler,
        get_prompt_handler,
        update_prompt_handler,
        test_prompt_handler,
        reset_prompt_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ProcessResponse,
            PromptResponse,
            PromptUpdate,
            MessageResponse,
            TestResponse,
        )
    ),
    tags(
        (name = "帳票データ化API", description = "Extracts structured data from uploaded invoices and delivery notes via a multimodal model.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// The payload sent after processing an uploaded document.
#[derive(Serialize, ToSchema)]
pub struct ProcessResponse {
    success: bool,
    document_type: String,
    /// Parsed model output, or `{"raw_text": ...}` when the reply was not valid JSON.
    #[schema(value_type = Object)]
    data: serde_json::Value,
    raw_response: String,
}

/// The currently effective prompt for one document type.
#[derive(Serialize, ToSchema)]
pub struct PromptResponse {
    document_type: String,
    prompt: Option<String>,
    is_custom: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct PromptUpdate {
    pub document_type: String,
    pub prompt: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    success: bool,
    message: String,
}

/// The raw, unparsed model reply from a prompt test run.
#[derive(Serialize, ToSchema)]
pub struct TestResponse {
    success: bool,
    result: String,
}

//=========================================================================================
// Multipart Helpers
//=========================================================================================

/// The fields of a document upload form: the file itself plus the optional
/// `document_type` and `prompt` text fields.
struct UploadForm {
    file_name: String,
    contents: Bytes,
    document_type: String,
    prompt: String,
}

/// Reads the multipart form, defaulting `document_type` to `"invoice"` and
/// `prompt` to empty, as the upload form does.
async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<UploadForm, (StatusCode, String)> {
    let mut file: Option<(String, Bytes)> = None;
    let mut document_type = "invoice".to_string();
    let mut prompt = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("untitled").to_string();
                let data = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to read file bytes: {}", e),
                    )
                })?;
                file = Some((name, data));
            }
            Some("document_type") => {
                document_type = field.text().await.map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to read multipart data: {}", e),
                    )
                })?;
            }
            Some("prompt") => {
                prompt = field.text().await.map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to read multipart data: {}", e),
                    )
                })?;
            }
            _ => {}
        }
    }

    let (file_name, contents) = file.ok_or((
        StatusCode::BAD_REQUEST,
        "Multipart form must include a file".to_string(),
    ))?;

    Ok(UploadForm {
        file_name,
        contents,
        document_type,
        prompt,
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Process an uploaded document with the caller's effective prompt.
///
/// Accepts a multipart/form-data request with a `file` part and an optional
/// `document_type` part (defaults to `invoice`). The model reply is parsed
/// as JSON on a best-effort basis and returned alongside the raw reply.
#[utoipa::path(
    post,
    path = "/api/process",
    request_body(content_type = "multipart/form-data", description = "The document to process (`file`, optional `document_type`)."),
    responses(
        (status = 200, description = "Document processed", body = ProcessResponse),
        (status = 400, description = "Unsupported file extension or unknown document type"),
        (status = 401, description = "Missing or invalid credential"),
        (status = 500, description = "Upstream model failure or missing API key")
    )
)]
pub async fn process_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let form = read_upload_form(multipart).await?;

    let media_type = MediaType::from_filename(&form.file_name).ok_or((
        StatusCode::BAD_REQUEST,
        "PDF、PNG、JPGファイルのみ対応".to_string(),
    ))?;

    let prompt = state
        .prompts
        .effective(&user.uid, &form.document_type)
        .ok_or((
            StatusCode::BAD_REQUEST,
            "無効なドキュメントタイプ".to_string(),
        ))?;

    let raw_response = state
        .vision
        .extract(&prompt, media_type, &form.contents)
        .await
        .map_err(|e| {
            error!("Document extraction failed: {:?}", e);
            upstream_error_response(e, "処理エラー")
        })?;

    let data = parse_model_reply(&raw_response);

    Ok(Json(ProcessResponse {
        success: true,
        document_type: form.document_type,
        data,
        raw_response,
    }))
}

/// Return the caller's effective prompt for a document type.
///
/// `prompt` is `null` when the type has neither an override nor a built-in
/// default.
#[utoipa::path(
    get,
    path = "/api/prompts/{document_type}",
    params(
        ("document_type" = String, Path, description = "Document type tag, e.g. `invoice` or `delivery`.")
    ),
    responses(
        (status = 200, description = "Effective prompt", body = PromptResponse),
        (status = 401, description = "Missing or invalid credential")
    )
)]
pub async fn get_prompt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(document_type): Path<String>,
) -> Json<PromptResponse> {
    let custom = state.prompts.override_for(&user.uid, &document_type);
    let is_custom = custom.is_some();
    let prompt = custom.or_else(|| default_prompt(&document_type).map(str::to_string));

    Json(PromptResponse {
        document_type,
        prompt,
        is_custom,
    })
}

/// Store a prompt override for the caller.
#[utoipa::path(
    put,
    path = "/api/prompts",
    request_body = PromptUpdate,
    responses(
        (status = 200, description = "Prompt stored", body = MessageResponse),
        (status = 401, description = "Missing or invalid credential")
    )
)]
pub async fn update_prompt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<PromptUpdate>,
) -> Json<MessageResponse> {
    state
        .prompts
        .set(&user.uid, &payload.document_type, &payload.prompt);

    Json(MessageResponse {
        success: true,
        message: "プロンプトを更新しました".to_string(),
    })
}

/// Run an extraction with a caller-supplied prompt and return the raw reply.
///
/// An empty `prompt` falls back to the built-in default for the document
/// type. The reply is returned unparsed. Unknown file extensions are not
/// rejected here; they are submitted as JPEG.
#[utoipa::path(
    post,
    path = "/api/prompts/test",
    request_body(content_type = "multipart/form-data", description = "The document to process (`file`, optional `document_type` and `prompt`)."),
    responses(
        (status = 200, description = "Raw model reply", body = TestResponse),
        (status = 401, description = "Missing or invalid credential"),
        (status = 500, description = "Upstream model failure or missing API key")
    )
)]
pub async fn test_prompt_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let form = read_upload_form(multipart).await?;

    let prompt = if form.prompt.is_empty() {
        default_prompt(&form.document_type).unwrap_or("").to_string()
    } else {
        form.prompt
    };

    let media_type = MediaType::from_filename(&form.file_name).unwrap_or(MediaType::Jpeg);

    let result = state
        .vision
        .extract(&prompt, media_type, &form.contents)
        .await
        .map_err(|e| {
            error!("Prompt test failed: {:?}", e);
            upstream_error_response(e, "テストエラー")
        })?;

    Ok(Json(TestResponse {
        success: true,
        result,
    }))
}

/// Remove the caller's prompt override, restoring the built-in default.
#[utoipa::path(
    delete,
    path = "/api/prompts/{document_type}",
    params(
        ("document_type" = String, Path, description = "Document type tag, e.g. `invoice` or `delivery`.")
    ),
    responses(
        (status = 200, description = "Override removed (no-op when none was stored)", body = MessageResponse),
        (status = 401, description = "Missing or invalid credential")
    )
)]
pub async fn reset_prompt_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(document_type): Path<String>,
) -> Json<MessageResponse> {
    state.prompts.reset(&user.uid, &document_type);

    Json(MessageResponse {
        success: true,
        message: "プロンプトをデフォルトにリセットしました".to_string(),
    })
}

/// Maps extraction-port failures to a server error, prefixing upstream and
/// unexpected causes the way the frontend expects. A missing API key keeps
/// its own message.
fn upstream_error_response(e: PortError, prefix: &str) -> (StatusCode, String) {
    match e {
        PortError::MissingCredential(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}: {}", prefix, other),
        ),
    }
}
