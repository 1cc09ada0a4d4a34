//! Async data-access layer for the todo API.
//!
//! # Design
//! `TodoService` pairs the stateless `TodoClient` with a `Transport` and a
//! `Logger`. Each operation builds the request, awaits the transport, checks
//! the status and decodes the body, logging before the request and after a
//! successful decode. Bodies are decoded to `serde_json::Value` first, logged
//! as compact JSON (object keys come out sorted, not in the order the backend
//! sent them), then converted to the caller's type. There are no retries and
//! no state between calls.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::logger::{Logger, TracingLogger};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Debug, Clone)]
pub struct TodoService<T, L = TracingLogger> {
    client: TodoClient,
    transport: T,
    logger: L,
}

impl<T: Transport> TodoService<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: TodoClient::new(base_url),
            transport,
            logger: TracingLogger,
        }
    }
}

impl TodoService<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport =
            ReqwestTransport::with_timeout(config.request_timeout).map_err(ApiError::Transport)?;
        Ok(Self::new(&config.base_url, transport))
    }
}

impl<T: Transport, L: Logger> TodoService<T, L> {
    /// Replaces the logger, keeping client and transport.
    pub fn with_logger<M: Logger>(self, logger: M) -> TodoService<T, M> {
        TodoService {
            client: self.client,
            transport: self.transport,
            logger,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport
            .execute(request)
            .await
            .map_err(ApiError::Transport)
    }

    /// Lists all todos; resolves to the `data` field of the response.
    pub async fn fetch_todos<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        self.logger.log("Fetching todos...");
        let response = self.send(self.client.build_fetch_todos()).await?;
        let data: Value = self.client.parse_fetch_todos(response)?;
        self.logger.log(&format!("Fetched todos: {data}"));
        from_value(data)
    }

    pub async fn create_todo<B, R>(&self, todo: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.build_create_todo(todo)?;
        self.logger
            .log(&format!("Creating todo: {}", request.body.as_deref().unwrap_or_default()));
        let response = self.send(request).await?;
        let result: Value = self.client.parse_create_todo(response)?;
        self.logger.log(&format!("Created todo response: {result}"));
        from_value(result)
    }

    pub async fn update_todo<B, R>(&self, id: impl Display, todo: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.build_update_todo(&id, todo)?;
        self.logger.log(&format!(
            "Updating todo with ID {id}: {}",
            request.body.as_deref().unwrap_or_default()
        ));
        let response = self.send(request).await?;
        let result: Value = self.client.parse_update_todo(response)?;
        self.logger.log(&format!("Updated todo response: {result}"));
        from_value(result)
    }

    pub async fn delete_todo<R: DeserializeOwned>(&self, id: impl Display) -> Result<R, ApiError> {
        self.logger
            .log(&format!("Attempting to delete todo with ID: {id}"));
        let response = self.send(self.client.build_delete_todo(&id)).await?;
        if !response.is_success() {
            self.logger
                .log(&format!("Failed to delete todo, status: {}", response.status));
        }
        let result: Value = self.client.parse_delete_todo(response)?;
        self.logger.log(&format!("Deleted todo response: {result}"));
        from_value(result)
    }
}

fn from_value<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value).map_err(ApiError::Decode)
}
