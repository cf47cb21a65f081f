//! HTTP surface: the dashboard page, the shared-password gate and the JSON
//! CRUD endpoints the page talks to.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::model::{BugWithVersion, Version, VersionRecord};
use crate::stats::{self, DashboardStats};
use crate::store::Store;
use crate::ui;

pub struct AppState {
    pub store: Store,
    /// Hex sha256 digest of the shared dashboard password.
    pub password_hash: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/auth", post(authenticate))
        .route("/api/versions", get(list_versions).post(create_version))
        .route(
            "/api/versions/:id",
            patch(toggle_offline).delete(delete_version),
        )
        .route("/api/bugs", get(list_bugs).post(create_bug))
        .route("/api/bugs/:id", delete(delete_bug))
        .route("/api/stats", get(dashboard_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dashboard_page() -> Html<&'static str> {
    Html(ui::DASHBOARD_HTML)
}

#[derive(Deserialize)]
struct AuthRequest {
    password: Option<String>,
}

async fn authenticate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<Value>> {
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::Validation("password required".into()))?;

    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    if digest == state.password_hash {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(Error::Unauthorized)
    }
}

async fn list_versions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<VersionRecord>>> {
    Ok(Json(state.store.list_versions().await?))
}

#[derive(Deserialize)]
struct CreateVersionRequest {
    version: Option<String>,
    release_date: Option<DateTime<Utc>>,
}

async fn create_version(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVersionRequest>,
) -> Result<Json<Version>> {
    let missing = || Error::Validation("version and release_date are required".into());
    let label = req
        .version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(missing)?
        .to_string();
    let release_date = req.release_date.ok_or_else(missing)?;

    let version = state.store.create_version(&label, release_date).await?;
    tracing::info!(version = %version.version, "version created");
    Ok(Json(version))
}

#[derive(Deserialize)]
struct ToggleRequest {
    is_offline: bool,
}

async fn toggle_offline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<Version>> {
    let version = state
        .store
        .set_offline(&id, req.is_offline, Utc::now())
        .await?;
    tracing::info!(version = %version.version, offline = req.is_offline, "status toggled");
    Ok(Json(version))
}

async fn delete_version(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.store.delete_version(&id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn list_bugs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BugWithVersion>>> {
    Ok(Json(state.store.list_bugs().await?))
}

#[derive(Deserialize)]
struct CreateBugRequest {
    title: Option<String>,
    description: Option<String>,
    developer_code: Option<String>,
    version_id: Option<String>,
}

async fn create_bug(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBugRequest>,
) -> Result<Json<BugWithVersion>> {
    let (title, description, code, version_id) =
        match (req.title, req.description, req.developer_code, req.version_id) {
            (Some(t), Some(d), Some(c), Some(v))
                if !t.is_empty() && !d.is_empty() && !v.is_empty() =>
            {
                (t, d, c, v)
            }
            _ => return Err(Error::Validation("all fields are required".into())),
        };

    if code.chars().count() != 3 {
        return Err(Error::Validation(
            "developer code must be exactly 3 characters".into(),
        ));
    }

    let bug = state
        .store
        .create_bug(&version_id, &title, &description, &code.to_uppercase())
        .await?;
    Ok(Json(bug))
}

async fn delete_bug(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.store.delete_bug(&id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn dashboard_stats(State(state): State<Arc<AppState>>) -> Result<Json<DashboardStats>> {
    let versions = state.store.list_versions().await?;
    Ok(Json(stats::dashboard_stats(&versions)))
}
