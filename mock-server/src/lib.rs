use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const TAGS: [&str; 3] = ["rust", "http", "json"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
    #[serde(skip)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct Envelope<T> {
    pub user: T,
}

/// Registered users keyed by email.
pub type Db = Arc<RwLock<HashMap<String, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/tags", get(list_tags).options(tag_options))
        .route("/api/users", post(register))
        .route(
            "/api/user",
            get(current_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/api/status/{code}", any(status))
        .route("/api/echo", any(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock server listening");
    axum::serve(listener, app()).await
}

fn errors(status: StatusCode, field: &str, message: &str) -> Response {
    (status, Json(json!({ "errors": { field: [message] } }))).into_response()
}

fn token_of(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authentication")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Token "))
}

async fn list_tags() -> Json<Value> {
    Json(json!({ "tags": TAGS }))
}

async fn tag_options() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::ALLOW, "GET, HEAD, OPTIONS")])
}

async fn register(State(db): State<Db>, Json(input): Json<Envelope<NewUser>>) -> Response {
    let input = input.user;
    let mut users = db.write().await;
    if users.contains_key(&input.email) {
        return errors(StatusCode::UNPROCESSABLE_ENTITY, "email", "has already been taken");
    }
    if input.password.is_empty() {
        return errors(StatusCode::UNPROCESSABLE_ENTITY, "password", "can't be blank");
    }
    let user = User {
        id: Uuid::new_v4(),
        username: input.username,
        email: input.email,
        token: Uuid::new_v4().simple().to_string(),
        password: input.password,
    };
    tracing::debug!(email = %user.email, "registered user");
    users.insert(user.email.clone(), user.clone());
    (StatusCode::CREATED, Json(json!({ "user": user }))).into_response()
}

async fn current_user(State(db): State<Db>, headers: HeaderMap) -> Response {
    let users = db.read().await;
    match token_of(&headers).and_then(|t| users.values().find(|u| u.token == t)) {
        Some(user) => Json(json!({ "user": user })).into_response(),
        None => errors(StatusCode::UNAUTHORIZED, "body", "unauthorized"),
    }
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Envelope<UserChanges>>,
) -> Response {
    let mut users = db.write().await;
    let Some(email) = token_of(&headers)
        .and_then(|t| users.values().find(|u| u.token == t))
        .map(|u| u.email.clone())
    else {
        return errors(StatusCode::UNAUTHORIZED, "body", "unauthorized");
    };
    let changes = input.user;
    if let Some(new_email) = &changes.email {
        if *new_email != email && users.contains_key(new_email) {
            return errors(StatusCode::UNPROCESSABLE_ENTITY, "email", "has already been taken");
        }
    }
    let Some(mut user) = users.remove(&email) else {
        return errors(StatusCode::UNAUTHORIZED, "body", "unauthorized");
    };
    if let Some(username) = changes.username {
        user.username = username;
    }
    if let Some(email) = changes.email {
        user.email = email;
    }
    users.insert(user.email.clone(), user.clone());
    Json(json!({ "user": user })).into_response()
}

async fn delete_user(State(db): State<Db>, headers: HeaderMap) -> Response {
    let mut users = db.write().await;
    let email = token_of(&headers)
        .and_then(|t| users.values().find(|u| u.token == t))
        .map(|u| u.email.clone());
    match email {
        Some(email) => {
            users.remove(&email);
            StatusCode::NO_CONTENT.into_response()
        }
        None => errors(StatusCode::UNAUTHORIZED, "body", "unauthorized"),
    }
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, Json(json!({ "status": code }))).into_response(),
        Err(_) => errors(StatusCode::BAD_REQUEST, "code", "not a status code"),
    }
}

/// Reflects the request back as JSON: method, raw query, lowercased headers
/// and the body (parsed if it is JSON, else as a string, else null).
async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: String) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
        })
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "headers": headers,
        "body": body,
    }))
}
