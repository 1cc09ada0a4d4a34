//! Domain DTOs for the todo API.
//!
//! # Design
//! The backend serializes its records with capitalized field names (`ID`,
//! `Task`, ...) while request payloads use lowercase keys. These types mirror
//! that schema but are defined independently from the mock-server crate;
//! integration tests catch schema drift. Every `TodoService` operation is
//! generic, so callers that do not want the typed model can pass
//! `serde_json::Value` straight through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a todo.
pub type TodoId = i64;

/// Progress of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Created,
    Processing,
    Done,
}

/// Priority chosen when a todo is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Todo {
    #[serde(rename = "ID")]
    pub id: TodoId,
    pub task: String,
    pub status: Status,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new todo. The backend always starts it in
/// `Status::Created`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub task: String,
    pub priority: Priority,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Success body of the backend: `{ "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub data: T,
}

/// Failure body of the backend: `{ "errors": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_uses_backend_field_names() {
        let json = r#"{
            "ID": 7,
            "Task": "write report",
            "Status": "processing",
            "Priority": "high",
            "CreatedAt": "2024-05-01T10:00:00+09:00",
            "UpdatedAt": "2024-05-02T01:30:00Z"
        }"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id, 7);
        assert_eq!(todo.task, "write report");
        assert_eq!(todo.status, Status::Processing);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.created_at.to_rfc3339(), "2024-05-01T01:00:00+00:00");
    }

    #[test]
    fn update_todo_omits_unset_fields() {
        let input = UpdateTodo {
            task: None,
            status: Some(Status::Done),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "done" }));
    }

    #[test]
    fn create_todo_rejects_unknown_priority() {
        let result: Result<CreateTodo, _> =
            serde_json::from_str(r#"{"task":"x","priority":"urgent"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn error_envelope_tolerates_missing_errors() {
        let envelope: ErrorEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.errors.is_empty());
    }
}
