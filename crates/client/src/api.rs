//! HTTP access to `/api/v1/books`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ClientError;
use crate::model::{Book, BookId, BookPayload};

/// Operations the controller needs from the catalog service.
#[async_trait]
pub trait BooksApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, ClientError>;

    async fn get(&self, id: BookId) -> Result<Book, ClientError>;

    async fn create(&self, payload: &BookPayload) -> Result<Book, ClientError>;

    /// Partial update (`PATCH`); returns the server's acknowledgment.
    async fn update(&self, id: BookId, payload: &BookPayload) -> Result<String, ClientError>;

    /// Full replace (`PUT`); returns the server's acknowledgment.
    async fn replace(&self, id: BookId, payload: &BookPayload) -> Result<String, ClientError>;

    async fn delete(&self, id: BookId) -> Result<String, ClientError>;
}

/// `BooksApi` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpBooksApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBooksApi {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8080/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: BookId) -> String {
        format!("{}/books/{id}", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    message: String,
}

#[async_trait]
impl BooksApi for HttpBooksApi {
    async fn list(&self) -> Result<Vec<Book>, ClientError> {
        let response = self.http.get(self.books_url()).send().await?;
        decode(response).await
    }

    async fn get(&self, id: BookId) -> Result<Book, ClientError> {
        let response = self.http.get(self.book_url(id)).send().await?;
        decode(response).await
    }

    async fn create(&self, payload: &BookPayload) -> Result<Book, ClientError> {
        let response = self.http.post(self.books_url()).json(payload).send().await?;
        decode(response).await
    }

    async fn update(&self, id: BookId, payload: &BookPayload) -> Result<String, ClientError> {
        let response = self
            .http
            .patch(self.book_url(id))
            .json(payload)
            .send()
            .await?;
        decode::<Acknowledgement>(response).await.map(|ack| ack.message)
    }

    async fn replace(&self, id: BookId, payload: &BookPayload) -> Result<String, ClientError> {
        let response = self
            .http
            .put(self.book_url(id))
            .json(payload)
            .send()
            .await?;
        decode::<Acknowledgement>(response).await.map(|ack| ack.message)
    }

    async fn delete(&self, id: BookId) -> Result<String, ClientError> {
        let response = self.http.delete(self.book_url(id)).send().await?;
        decode::<Acknowledgement>(response).await.map(|ack| ack.message)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await?;
    Err(error_from_body(status, &body))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    fields: BTreeMap<String, Vec<String>>,
}

/// Map a non-2xx response onto the client error taxonomy.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|envelope| envelope.error.message.clone())
        .unwrap_or_else(|| format!("HTTP Error! Status: {}", status.as_u16()));

    match status {
        StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation {
            message,
            fields: parsed
                .map(|envelope| envelope.error.fields)
                .unwrap_or_default(),
        },
        StatusCode::NOT_FOUND => ClientError::NotFound { message },
        status => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}
