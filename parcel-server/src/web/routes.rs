//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::news::{NewsDraft, NewsPage};
use crate::tracking::{TrackError, TrackingRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `public_dir` is the static asset directory, served for every path that
/// is not an API route.
pub fn create_router(state: AppState, public_dir: &std::path::Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/track", post(track))
        .route("/api/carriers", get(list_carriers))
        .route(
            "/api/news",
            get(list_news)
                .post(create_news)
                .put(update_news)
                .delete(delete_news),
        )
        .route("/api/news-post", get(get_news_post))
        .route(
            "/api/parcel-updates",
            get(list_parcel_updates).post(write_parcel_update),
        )
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Run one tracking lookup through the upstream provider.
async fn track(
    State(state): State<AppState>,
    Json(body): Json<TrackRequestBody>,
) -> Result<Json<TrackResponse>, AppError> {
    let tracker = state.tracker.as_ref().ok_or(AppError::Config {
        message: "TRACK17_KEY not set".to_string(),
    })?;

    let request = TrackingRequest {
        number: body.number,
        carrier: body.carrier,
        carrier_text: body.carrier_text,
    };

    let report = tracker.track(&request).await?;
    Ok(Json(report.into()))
}

/// The raw carrier source document, as loaded at startup.
async fn list_carriers(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    match state.carriers.document() {
        Some(document) => Ok(Json(document.clone())),
        None => Err(AppError::Config {
            message: "carrier list unavailable".to_string(),
        }),
    }
}

/// One page of news post summaries.
async fn list_news(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Result<Json<NewsPage>, AppError> {
    let page = state.news.page(params.limit, params.offset).await?;
    Ok(Json(page))
}

/// Fetch one post by id or slug.
async fn get_news_post(
    State(state): State<AppState>,
    Query(params): Query<NewsPostParams>,
) -> Result<Json<PostResponse>, AppError> {
    let post = if let Some(raw) = params.id.as_deref().filter(|s| !s.is_empty()) {
        let id: i64 = raw.parse().map_err(|_| AppError::BadRequest {
            message: "id must be a number".to_string(),
        })?;
        state.news.find_by_id(id).await?
    } else if let Some(slug) = params.slug.as_deref().filter(|s| !s.is_empty()) {
        state.news.find_by_slug(slug).await?
    } else {
        return Err(AppError::BadRequest {
            message: "id or slug is required".to_string(),
        });
    };

    let post = post.ok_or(AppError::NotFound {
        message: "Post not found".to_string(),
    })?;
    Ok(Json(PostResponse { post }))
}

/// Create a post.
async fn create_news(
    State(state): State<AppState>,
    Json(body): Json<NewsWriteBody>,
) -> Result<Json<PostResponse>, AppError> {
    require_secret(
        state.config.news_secret.as_deref(),
        body.secret.as_deref(),
        "NEWS_SECRET",
    )?;

    let draft = news_draft(&body)?;
    let post = state.news.create(&draft).await?;
    Ok(Json(PostResponse { post }))
}

/// Replace a post's editable fields.
async fn update_news(
    State(state): State<AppState>,
    Json(body): Json<NewsWriteBody>,
) -> Result<Json<PostResponse>, AppError> {
    require_secret(
        state.config.news_secret.as_deref(),
        body.secret.as_deref(),
        "NEWS_SECRET",
    )?;

    let id = body.id.ok_or(AppError::BadRequest {
        message: "id is required".to_string(),
    })?;
    let draft = news_draft(&body)?;

    let post = state
        .news
        .update(id, &draft)
        .await?
        .ok_or(AppError::NotFound {
            message: "Post not found".to_string(),
        })?;
    Ok(Json(PostResponse { post }))
}

/// Delete a post.
async fn delete_news(
    State(state): State<AppState>,
    Json(body): Json<NewsWriteBody>,
) -> Result<Json<PostResponse>, AppError> {
    require_secret(
        state.config.news_secret.as_deref(),
        body.secret.as_deref(),
        "NEWS_SECRET",
    )?;

    let id = body.id.ok_or(AppError::BadRequest {
        message: "id is required".to_string(),
    })?;

    let post = state.news.delete(id).await?.ok_or(AppError::NotFound {
        message: "Post not found".to_string(),
    })?;
    Ok(Json(PostResponse { post }))
}

/// All status updates for a parcel.
async fn list_parcel_updates(
    State(state): State<AppState>,
    Query(params): Query<ParcelListParams>,
) -> Result<Json<ParcelUpdatesResponse>, AppError> {
    let code = normalized_code(params.code.as_deref()).ok_or(AppError::BadRequest {
        message: "code is required".to_string(),
    })?;

    let updates = state.parcel_updates.list(&code).await?;
    Ok(Json(ParcelUpdatesResponse { code, updates }))
}

/// Create, change or remove a status update, depending on `mode`.
async fn write_parcel_update(
    State(state): State<AppState>,
    Json(body): Json<ParcelWriteBody>,
) -> Result<Response, AppError> {
    require_secret(
        state.config.parcel_updates_secret.as_deref(),
        body.secret.as_deref(),
        "PARCEL_UPDATES_SECRET",
    )?;

    let mode = body.mode.as_deref().unwrap_or("").trim().to_uppercase();
    if mode.is_empty() {
        return Err(AppError::BadRequest {
            message: "mode is required".to_string(),
        });
    }

    let code = normalized_code(body.parcel_code.as_deref()).ok_or(AppError::BadRequest {
        message: "parcelCode is required".to_string(),
    })?;

    let target = body.update_id.or(body.data.id);
    let input = body.data.as_input();

    match mode.as_str() {
        "CREATE" => {
            let update = state.parcel_updates.create(&code, &input).await?;
            Ok(Json(ParcelUpdateChanged { code, update }).into_response())
        }
        "UPDATE" => {
            let update = state
                .parcel_updates
                .update(&code, target, &input)
                .await?
                .ok_or(AppError::NotFound {
                    message: "Update not found".to_string(),
                })?;
            Ok(Json(ParcelUpdateChanged { code, update }).into_response())
        }
        "DELETE" => {
            let removed = state
                .parcel_updates
                .delete(&code, target)
                .await?
                .ok_or(AppError::NotFound {
                    message: "Update not found".to_string(),
                })?;
            Ok(Json(ParcelUpdateRemoved { code, removed }).into_response())
        }
        _ => Err(AppError::BadRequest {
            message: "Unknown mode. Use CREATE, UPDATE or DELETE.".to_string(),
        }),
    }
}

/// Check a shared secret. Plain string equality: this gate is an editorial
/// convenience, not a credential scheme.
fn require_secret(
    configured: Option<&str>,
    provided: Option<&str>,
    variable: &str,
) -> Result<(), AppError> {
    let Some(expected) = configured else {
        return Err(AppError::Config {
            message: format!("{variable} not set"),
        });
    };
    if provided != Some(expected) {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Validate and normalize the editable fields of a news write body.
fn news_draft(body: &NewsWriteBody) -> Result<NewsDraft, AppError> {
    let title = body.title.as_deref().unwrap_or("").trim().to_string();
    let content_html = body.content_html.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() || content_html.is_empty() {
        return Err(AppError::BadRequest {
            message: "title and contentHtml are required".to_string(),
        });
    }

    Ok(NewsDraft {
        title,
        summary: trimmed_or_none(body.summary.as_deref()),
        cover_url: trimmed_or_none(body.cover_url.as_deref()),
        slug: trimmed_or_none(body.slug.as_deref()),
        content_html,
        published_at: body.published_at,
    })
}

/// Trimmed value, with empty collapsing to `None`.
fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trimmed parcel code, with empty collapsing to `None`.
fn normalized_code(code: Option<&str>) -> Option<String> {
    trimmed_or_none(code)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The request was malformed or incomplete.
    BadRequest { message: String },
    /// Shared-secret check failed.
    Unauthorized,
    /// The requested row does not exist.
    NotFound { message: String },
    /// Required server-side configuration is missing.
    Config { message: String },
    /// The upstream provider reported a failure; its status is propagated.
    Upstream {
        status: Option<u16>,
        message: String,
        detail: Option<Value>,
    },
    /// Anything else.
    Internal { message: String },
}

impl From<TrackError> for AppError {
    fn from(e: TrackError) -> Self {
        match e {
            TrackError::Validation(message) => AppError::BadRequest { message },
            TrackError::Configuration(message) => AppError::Config { message },
            TrackError::Upstream {
                status,
                message,
                detail,
            } => AppError::Upstream {
                status,
                message,
                detail,
            },
            TrackError::Transport(e) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None)
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message, None),
            AppError::Config { message } => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
            AppError::Upstream {
                status,
                message,
                detail,
            } => {
                // The provider's status is passed through verbatim, even an
                // OK status carrying a structured error list.
                let status = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, message, detail)
            }
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        if status.is_server_error() {
            error!("[{status}] {message}");
        } else {
            warn!("[{status}] {message}");
        }

        (status, Json(ErrorBody { error: message, detail })).into_response()
    }
}
