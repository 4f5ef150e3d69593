use chrono::NaiveDate;

/// Primary key of a stored book.
pub type BookId = i64;

/// A stored book row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    /// Calendar date projected from the wire `publishedDate`.
    pub published_date: NaiveDate,
}

/// A fully validated field set, used for create and full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published_date: NaiveDate,
}

/// Validated fields of a partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub published_date: Option<NaiveDate>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.missing().len() == BookField::ALL.len()
    }

    /// Fields this patch does not touch.
    pub fn missing(&self) -> Vec<BookField> {
        BookField::ALL
            .into_iter()
            .filter(|field| match field {
                BookField::Title => self.title.is_none(),
                BookField::Author => self.author.is_none(),
                BookField::Genre => self.genre.is_none(),
                BookField::Description => self.description.is_none(),
                BookField::PublishedDate => self.published_date.is_none(),
            })
            .collect()
    }
}

impl From<NewBook> for BookPatch {
    fn from(book: NewBook) -> Self {
        Self {
            title: Some(book.title),
            author: Some(book.author),
            genre: Some(book.genre),
            description: Some(book.description),
            published_date: Some(book.published_date),
        }
    }
}

/// The client-editable fields of a book, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Genre,
    Description,
    PublishedDate,
}

impl BookField {
    pub const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::Description,
        BookField::PublishedDate,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::Description => "description",
            BookField::PublishedDate => "publishedDate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_untouched_fields_in_wire_order() {
        let patch = BookPatch {
            genre: Some("Fantasy".to_string()),
            ..BookPatch::default()
        };
        assert_eq!(
            patch.missing(),
            vec![
                BookField::Title,
                BookField::Author,
                BookField::Description,
                BookField::PublishedDate
            ]
        );
        assert!(!patch.is_empty());
        assert!(BookPatch::default().is_empty());
    }
}
