//! The create/edit book form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{Book, BookPayload};

/// Soft limit on description length. Exceeding it is flagged, never blocked;
/// the server does not enforce it.
pub const DESCRIPTION_LIMIT: usize = 250;

/// Editable fields, in the order the form shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Author,
    Genre,
    Description,
    PublishedDate,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Title,
        FormField::Author,
        FormField::Genre,
        FormField::Description,
        FormField::PublishedDate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Author => "Author",
            FormField::Genre => "Genre",
            FormField::Description => "Description",
            FormField::PublishedDate => "Published Date",
        }
    }

    /// Name used in request bodies and server error maps.
    pub const fn wire_name(self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Author => "author",
            FormField::Genre => "genre",
            FormField::Description => "description",
            FormField::PublishedDate => "publishedDate",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    title: String,
    author: String,
    genre: String,
    description: String,
    published_date: String,
}

impl BookForm {
    /// Every field empty; genre unselected.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Seed from an existing record, with the date reduced to `YYYY-MM-DD`.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            description: book.description.clone(),
            published_date: normalize_date(&book.published_date)
                .unwrap_or_else(|| book.published_date.clone()),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Author => &self.author,
            FormField::Genre => &self.genre,
            FormField::Description => &self.description,
            FormField::PublishedDate => &self.published_date,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Author => self.author = value,
            FormField::Genre => self.genre = value,
            FormField::Description => self.description = value,
            FormField::PublishedDate => self.published_date = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::blank();
    }

    /// Live character count shown under the description box.
    pub fn description_count(&self) -> usize {
        self.description.chars().count()
    }

    pub fn description_exceeds_limit(&self) -> bool {
        self.description_count() > DESCRIPTION_LIMIT
    }

    /// `Character Count: 12/250`
    pub fn description_counter(&self) -> String {
        format!(
            "Character Count: {}/{}",
            self.description_count(),
            DESCRIPTION_LIMIT
        )
    }

    pub fn to_payload(&self) -> BookPayload {
        BookPayload {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            description: self.description.clone(),
            published_date: self.published_date.clone(),
        }
    }
}

/// Reduce an ISO-8601 date or date-time to `YYYY-MM-DD`, keeping the calendar
/// date as written.
pub fn normalize_date(raw: &str) -> Option<String> {
    parse_calendar_date(raw).map(|date| date.format("%Y-%m-%d").to_string())
}

pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ts| ts.date())
        })
}
