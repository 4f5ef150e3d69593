use serde::{Deserialize, Serialize};

pub type BookId = i64;

/// A book as served by the API. `published_date` is kept as sent (ISO-8601).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published_date: String,
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published_date: String,
}
