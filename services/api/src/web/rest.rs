//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the JSON API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ErrorBody, HttpError};
use crate::web::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use blog_core::{NewPost, Post, SystemMetrics};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_posts_handler,
        create_post_handler,
        time_handler,
        system_handler,
    ),
    components(
        schemas(PostResponse, CreatePostRequest, TimeResponse, SystemInfoResponse, ErrorBody)
    ),
    tags(
        (name = "Blog API", description = "Posts, server clock and host metrics.")
    )
)]
pub struct ApiDoc;

/// The served API document, titled for this service and versioned with the crate.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Montreal Explorer Blog API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A post as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    /// ISO-8601, UTC.
    pub created_at: String,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            created_at: post.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// The body of `POST /api/blog`. Every field is required and must be non-empty.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeResponse {
    pub montreal_time: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemInfoResponse {
    #[serde(rename = "Service Version")]
    pub service_version: String,
    #[serde(rename = "Operating System")]
    pub operating_system: String,
    #[serde(rename = "CPU Usage")]
    pub cpu_usage: String,
    #[serde(rename = "Memory Usage")]
    pub memory_usage: String,
    #[serde(rename = "Server Uptime (seconds)")]
    pub uptime_seconds: u64,
}

impl From<SystemMetrics> for SystemInfoResponse {
    fn from(metrics: SystemMetrics) -> Self {
        Self {
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            operating_system: metrics.platform,
            cpu_usage: format!("{:.1}%", metrics.cpu_percent),
            memory_usage: format!("{:.1}%", metrics.memory_percent),
            uptime_seconds: metrics.uptime_seconds,
        }
    }
}

impl SystemInfoResponse {
    /// Label/value pairs in display order, for the home page.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Service Version", self.service_version.clone()),
            ("Operating System", self.operating_system.clone()),
            ("CPU Usage", self.cpu_usage.clone()),
            ("Memory Usage", self.memory_usage.clone()),
            ("Server Uptime (seconds)", self.uptime_seconds.to_string()),
        ]
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every post, newest first.
#[utoipa::path(
    get,
    path = "/api/blog",
    responses(
        (status = 200, description = "All posts, newest first", body = [PostResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_posts_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostResponse>>, HttpError> {
    let posts = app_state.posts.list_all().await?;
    Ok(Json(posts.iter().map(PostResponse::from).collect()))
}

/// Create a new post.
///
/// The body is read as raw bytes so that an unparseable payload is answered
/// with the same 400 as a payload with missing fields.
#[utoipa::path(
    post,
    path = "/api/blog",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "A required field is missing or empty", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_post_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<PostResponse>), HttpError> {
    let request: CreatePostRequest =
        serde_json::from_slice(&body).map_err(|e| HttpError::Parse(e.to_string()))?;

    let new_post = NewPost::from_parts(request.title, request.content, request.author)?;
    let post = app_state.posts.create(new_post).await?;
    info!("Created post {} by {}", post.id, post.author);

    Ok((StatusCode::CREATED, Json(PostResponse::from(&post))))
}

/// Current local time in the configured zone.
#[utoipa::path(
    get,
    path = "/api/time",
    responses(
        (status = 200, description = "Formatted local time", body = TimeResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn time_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<TimeResponse>, HttpError> {
    let montreal_time = app_state
        .clock
        .now_formatted()
        .await
        .map_err(|e| HttpError::Internal(format!("clock: {}", e)))?;
    Ok(Json(TimeResponse { montreal_time }))
}

/// Host metrics.
#[utoipa::path(
    get,
    path = "/api/system",
    responses(
        (status = 200, description = "CPU, memory and uptime figures", body = SystemInfoResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn system_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<SystemInfoResponse>, HttpError> {
    let metrics = app_state
        .metrics
        .snapshot()
        .await
        .map_err(|e| HttpError::Internal(format!("metrics: {}", e)))?;
    Ok(Json(SystemInfoResponse::from(metrics)))
}

/// Fallback for every unmatched route.
pub async fn not_found_handler() -> HttpError {
    HttpError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_doc_describes_every_json_route() {
        let doc = api_doc();
        assert_eq!(doc.info.title, "Montreal Explorer Blog API");
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
        for path in ["/api/blog", "/api/time", "/api/system"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(!doc.paths.paths.contains_key("/login"));
    }
}
