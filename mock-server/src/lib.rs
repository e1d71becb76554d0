use std::{collections::{BTreeMap, HashMap}, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DELETE_CONFIRMATION: &str = r#"{"message":"Target deleted successfully"}"#;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Tags")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct CreateTarget {
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Tags")]
    pub tags: BTreeMap<String, String>,
}

/// PUT carries the full target; the `ID` in the body is ignored in favour
/// of the path.
#[derive(Deserialize)]
pub struct UpdateTarget {
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Tags")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn header_value(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.username, self.password))
        )
    }
}

/// Pair up optional username and password settings. Setting only one of
/// them is an error rather than a silently unauthenticated server.
pub fn credentials_from(
    username: Option<String>,
    password: Option<String>,
) -> Result<Option<Credentials>, &'static str> {
    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(Credentials { username, password })),
        (None, None) => Ok(None),
        (Some(_), None) => Err("username is set but password is missing"),
        (None, Some(_)) => Err("password is set but username is missing"),
    }
}

pub type Db = Arc<RwLock<HashMap<String, Target>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    credentials: Option<Arc<Credentials>>,
}

/// Router without authentication.
pub fn app() -> Router {
    router(None)
}

/// Router that rejects requests lacking matching Basic credentials.
pub fn app_with_credentials(credentials: Credentials) -> Router {
    router(Some(credentials))
}

fn router(credentials: Option<Credentials>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(HashMap::new())),
        credentials: credentials.map(Arc::new),
    };
    Router::new()
        .route("/targets", post(create_target))
        .route("/target/{id}", get(get_target))
        .route("/targets/{id}", put(update_target).delete(delete_target))
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: Option<Credentials>) -> Result<(), std::io::Error> {
    axum::serve(listener, router(credentials)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let Some(credentials) = &state.credentials else {
        return Ok(());
    };
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if provided == Some(credentials.header_value().as_str()) {
        Ok(())
    } else {
        debug!("rejecting request with missing or wrong credentials");
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn create_target(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateTarget>,
) -> Result<Json<Target>, StatusCode> {
    authorize(&state, &headers)?;
    let target = Target {
        id: Uuid::new_v4().to_string(),
        endpoint: input.endpoint,
        tags: input.tags,
    };
    state.db.write().await.insert(target.id.clone(), target.clone());
    info!(id = %target.id, "created target");
    Ok(Json(target))
}

async fn get_target(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Target>, StatusCode> {
    authorize(&state, &headers)?;
    let targets = state.db.read().await;
    targets.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_target(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateTarget>,
) -> Result<Json<Target>, StatusCode> {
    authorize(&state, &headers)?;
    let mut targets = state.db.write().await;
    let target = targets.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    target.endpoint = input.endpoint;
    target.tags = input.tags;
    info!(id = %id, "updated target");
    Ok(Json(target.clone()))
}

async fn delete_target(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], &'static str), StatusCode> {
    authorize(&state, &headers)?;
    let mut targets = state.db.write().await;
    targets.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    info!(id = %id, "deleted target");
    Ok(([(header::CONTENT_TYPE, "application/json")], DELETE_CONFIRMATION))
}
