//! Error types for the todo API client.
//!
//! # Design
//! A non-2xx response is the only HTTP failure kind. It carries the operation
//! and the numeric status, and displays as `Failed to <operation>: <status>`,
//! the message the UI shows to users. Transport failures are wrapped without
//! altering their message so callers see what the HTTP stack reported.

use std::fmt;

use thiserror::Error;

/// Boxed error produced by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The four operations of the todo API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Fetch => write!(f, "fetch todos"),
            Operation::Create => write!(f, "create todo"),
            Operation::Update => write!(f, "update todo"),
            Operation::Delete => write!(f, "delete todo"),
        }
    }
}

/// Errors returned by `TodoClient` and `TodoService`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("Failed to {operation}: {status}")]
    Http { operation: Operation, status: u16 },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of an `Http` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
