//! Wire representation of stored books.

use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde::Serialize;

use super::models::{Book, BookId};

/// One book as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResource {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published_date: String,
}

impl From<Book> for BookResource {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            description: book.description,
            published_date: iso_timestamp(book.published_date),
        }
    }
}

/// Books in storage order, serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BookCollection(pub Vec<BookResource>);

impl From<Vec<Book>> for BookCollection {
    fn from(books: Vec<Book>) -> Self {
        Self(books.into_iter().map(BookResource::from).collect())
    }
}

/// Plain acknowledgment body for update and delete.
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgement {
    pub message: &'static str,
}

/// `1965-08-01` becomes `1965-08-01T00:00:00Z`.
fn iso_timestamp(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(id: BookId, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Herbert".to_string(),
            genre: "Sci-Fi".to_string(),
            description: "Desert planet".to_string(),
            published_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
        }
    }

    #[test]
    fn single_resource_uses_wire_field_names() {
        let value = serde_json::to_value(BookResource::from(book(7, "Dune"))).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Dune",
                "author": "Herbert",
                "genre": "Sci-Fi",
                "description": "Desert planet",
                "publishedDate": "1965-08-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn collection_is_a_bare_array_in_order() {
        let collection = BookCollection::from(vec![book(2, "Dune"), book(1, "Emma")]);
        let value = serde_json::to_value(collection).unwrap();
        let titles: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Dune", "Emma"]);
    }
}
