//! Client-side data-access layer for the todo API.
//!
//! # Overview
//! `TodoService` lists, creates, updates and deletes todos against a backend
//! rooted at `/api/v1/todos`. Underneath, `TodoClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network
//! (host-does-IO pattern); a `Transport` performs the round-trip.
//! `StatusMessage` shows a transient status line through a caller-supplied
//! sink.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the HTTP contract is testable as data.
//! - Payloads are generic: `serde_json::Value` passes bodies through as-is,
//!   the DTOs in `types` give the backend's typed schema.
//! - Diagnostics go through an injected `Logger`, `tracing` by default.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod service;
pub mod status;
pub mod transport;
pub mod types;

pub use client::{TodoClient, API_PATH};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Operation, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use service::TodoService;
pub use status::{StatusMessage, StatusSink, STATUS_MESSAGE_TTL};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CreateTodo, Envelope, ErrorDetail, ErrorEnvelope, Priority, Status, Todo, TodoId, UpdateTodo,
};
