use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const STATUSES: [&str; 3] = ["created", "processing", "done"];
pub const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Todo {
    #[serde(rename = "ID")]
    pub id: i64,
    pub task: String,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub priority: String,
}

/// Empty fields keep the stored value.
#[derive(Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub task: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorItem {
    pub code: String,
    pub message: String,
}

/// Failure rendered as the `{ "errors": [...] }` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("todo {id} not found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match self.status {
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            _ => "INTERNAL_SERVER_ERROR",
        };
        let body = ErrorBody {
            errors: vec![ErrorItem {
                code: code.to_string(),
                message: self.message,
            }],
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    router(Db::default())
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/api/v1/healthz", get(healthz))
        .route("/api/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/api/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid todo id {raw:?}")))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

async fn healthz() -> Json<Data<&'static str>> {
    Json(Data { data: "ok" })
}

async fn list_todos(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<Data<Vec<Todo>>> {
    let task = query.task.filter(|t| !t.is_empty());
    let status = query.status.filter(|s| !s.is_empty());
    let store = db.read().await;
    let todos = store
        .todos
        .values()
        .filter(|todo| task.as_deref().is_none_or(|t| todo.task.contains(t)))
        .filter(|todo| status.as_deref().is_none_or(|s| todo.status == s))
        .cloned()
        .collect();
    Json(Data { data: todos })
}

async fn create_todo(
    State(db): State<Db>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Data<Todo>>), ApiError> {
    let input = json_body(body)?;
    if input.task.is_empty() {
        return Err(ApiError::bad_request("task cannot be empty"));
    }
    if !PRIORITIES.contains(&input.priority.as_str()) {
        return Err(ApiError::bad_request("invalid priority not accepted"));
    }

    let mut store = db.write().await;
    store.next_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: store.next_id,
        task: input.task,
        status: "created".to_string(),
        priority: input.priority,
        created_at: now,
        updated_at: now,
    };
    store.todos.insert(todo.id, todo.clone());
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(Data { data: todo })))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Data<Todo>>, ApiError> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    let todo = store.todos.get(&id).cloned().ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(Data { data: todo }))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Data<Todo>>, ApiError> {
    let id = parse_id(&id)?;
    let input = json_body(body)?;
    if !input.status.is_empty() && !STATUSES.contains(&input.status.as_str()) {
        return Err(ApiError::bad_request("invalid status not accepted"));
    }

    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or_else(|| ApiError::not_found(id))?;
    if !input.task.is_empty() {
        todo.task = input.task;
    }
    if !input.status.is_empty() {
        todo.status = input.status;
    }
    todo.updated_at = Utc::now();
    tracing::debug!(id, "updated todo");
    Ok(Json(Data { data: todo.clone() }))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store.todos.remove(&id).ok_or_else(|| ApiError::not_found(id))?;
    tracing::debug!(id, "deleted todo");
    Ok(Json("Deleted successfully"))
}
