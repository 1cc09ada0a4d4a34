//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `TodoService` drives the round-trip through a `Transport`; tests can drive
//! it by hand.
//!
//! Payload and result types are generic. `serde_json::Value` passes bodies
//! through untouched; the DTOs in `types` give the typed view.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Envelope;

/// Path of the todo collection, relative to the backend origin.
pub const API_PATH: &str = "/api/v1/todos";

const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{API_PATH}", self.base_url)
    }

    fn item_url(&self, id: impl Display) -> String {
        format!("{}{API_PATH}/{id}", self.base_url)
    }

    pub fn build_fetch_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo<B>(&self, todo: &B) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.collection_url(),
            headers: json_headers(),
            body: Some(encode(todo)?),
        })
    }

    pub fn build_update_todo<B>(&self, id: impl Display, todo: &B) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.item_url(id),
            headers: json_headers(),
            body: Some(encode(todo)?),
        })
    }

    /// The backend expects the JSON content type even on body-less deletes.
    pub fn build_delete_todo(&self, id: impl Display) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.item_url(id),
            headers: json_headers(),
            body: None,
        }
    }

    /// Returns the `data` field of the response envelope.
    pub fn parse_fetch_todos<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, Operation::Fetch)?;
        let envelope: Envelope<T> = decode(&response.body)?;
        Ok(envelope.data)
    }

    pub fn parse_create_todo<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, Operation::Create)?;
        decode(&response.body)
    }

    pub fn parse_update_todo<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, Operation::Update)?;
        decode(&response.body)
    }

    pub fn parse_delete_todo<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response, Operation::Delete)?;
        decode(&response.body)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string())]
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(ApiError::Encode)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::Decode)
}

/// Any non-2xx status fails the operation; the body is not inspected.
fn check_status(response: &HttpResponse, operation: Operation) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        operation,
        status: response.status,
    })
}
