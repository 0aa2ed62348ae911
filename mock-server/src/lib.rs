//! In-memory stand-in for the to-do backend.
//!
//! Serves the same routes and envelopes as the real service so client tests
//! can run over real HTTP: `{"message"}` for auth and delete, `{"todos"}` for
//! listing, `{"todo"}` for create/update and `{"error"}` on every failure.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug)]
struct StoredTodo {
    email: String,
    todo: Todo,
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub email: Option<String>,
}

#[derive(Default)]
struct Store {
    users: HashMap<String, String>,
    todos: Vec<StoredTodo>,
}

type Db = Arc<RwLock<Store>>;

/// Error reply: `status` with body `{"error": message}`.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: &'static str,
}

impl Failure {
    fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for Failure {
    fn from(_: JsonRejection) -> Self {
        Failure::new(StatusCode::BAD_REQUEST, "invalid payload")
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/healthz", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn register(
    State(db): State<Db>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), Failure> {
    let Json(input) = payload?;
    let email = normalize_email(&input.email);
    let password = input.password.trim().to_string();
    if email.is_empty() || password.is_empty() {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "email and password are required"));
    }

    let mut store = db.write().await;
    if store.users.contains_key(&email) {
        return Err(Failure::new(StatusCode::CONFLICT, "user already exists"));
    }
    info!(%email, "registered user");
    store.users.insert(email, password);
    Ok((StatusCode::CREATED, Json(json!({ "message": "user registered" }))))
}

async fn login(
    State(db): State<Db>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<serde_json::Value>, Failure> {
    let Json(input) = payload?;
    let email = normalize_email(&input.email);
    let password = input.password.trim();

    let store = db.read().await;
    match store.users.get(&email) {
        Some(stored) if !password.is_empty() && stored == password => {
            Ok(Json(json!({ "message": "login successful" })))
        }
        _ => Err(Failure::new(StatusCode::UNAUTHORIZED, "invalid credentials")),
    }
}

async fn list_todos(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<serde_json::Value> {
    let email = query.email.as_deref().map(normalize_email).unwrap_or_default();
    let store = db.read().await;
    let todos: Vec<&Todo> = store
        .todos
        .iter()
        .filter(|stored| email.is_empty() || stored.email == email)
        .map(|stored| &stored.todo)
        .collect();
    Json(json!({ "todos": todos }))
}

async fn create_todo(
    State(db): State<Db>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), Failure> {
    let Json(input) = payload?;
    let email = normalize_email(&input.email);
    let title = input.title.trim().to_string();
    if email.is_empty() || title.is_empty() {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "email and title are required"));
    }

    let todo = Todo {
        id: Uuid::new_v4().simple().to_string(),
        title,
        completed: false,
    };
    db.write().await.todos.push(StoredTodo {
        email,
        todo: todo.clone(),
    });
    Ok((StatusCode::CREATED, Json(json!({ "todo": todo }))))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<serde_json::Value>, Failure> {
    let Json(input) = payload?;
    if input.title.is_none() && input.completed.is_none() {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "nothing to update"));
    }

    let mut store = db.write().await;
    let stored = store
        .todos
        .iter_mut()
        .find(|stored| stored.todo.id == id)
        .ok_or(Failure::new(StatusCode::NOT_FOUND, "todo not found"))?;
    if let Some(title) = input.title {
        stored.todo.title = title;
    }
    if let Some(completed) = input.completed {
        stored.todo.completed = completed;
    }
    Ok(Json(json!({ "todo": stored.todo })))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Failure> {
    let mut store = db.write().await;
    let before = store.todos.len();
    store.todos.retain(|stored| stored.todo.id != id);
    if store.todos.len() == before {
        return Err(Failure::new(StatusCode::NOT_FOUND, "todo not found"));
    }
    Ok(Json(json!({ "message": "todo deleted" })))
}
