//! Filter, sort and paginate state for the catalog table.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::form::parse_calendar_date;
use crate::model::Book;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Title,
    Author,
    Genre,
    Description,
    PublishedDate,
    Action,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Id,
        Column::Title,
        Column::Author,
        Column::Genre,
        Column::Description,
        Column::PublishedDate,
        Column::Action,
    ];

    pub const fn header(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Title => "Title",
            Column::Author => "Author",
            Column::Genre => "Genre",
            Column::Description => "Description",
            Column::PublishedDate => "Published Date",
            Column::Action => "Action",
        }
    }

    pub const fn sortable(self) -> bool {
        !matches!(self, Column::Action)
    }

    /// Direction applied the first time a column is sorted.
    pub const fn first_direction(self) -> SortDirection {
        match self {
            Column::Id => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    /// Raw value the global filter and the sort key work on. `None` for `Action`.
    pub fn filter_value(self, book: &Book) -> Option<String> {
        match self {
            Column::Id => Some(book.id.to_string()),
            Column::Title => Some(book.title.clone()),
            Column::Author => Some(book.author.clone()),
            Column::Genre => Some(book.genre.clone()),
            Column::Description => Some(book.description.clone()),
            Column::PublishedDate => Some(
                parse_calendar_date(&book.published_date)
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| book.published_date.clone()),
            ),
            Column::Action => None,
        }
    }

    /// Rendered cell text.
    pub fn cell_text(self, book: &Book) -> String {
        match self {
            Column::PublishedDate => parse_calendar_date(&book.published_date)
                .map(format_long_date)
                .unwrap_or_else(|| book.published_date.clone()),
            Column::Action => "Edit | Delete".to_string(),
            column => column.filter_value(book).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header indicator.
    pub const fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<Book>,
    /// Rows left after filtering, across all pages.
    pub filtered_count: usize,
    pub page_index: usize,
    pub page_count: usize,
}

impl PageView {
    /// `Page 1 of 3`
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count)
    }
}

/// Client-only view state. Never persisted; the visible rows are always derived
/// from the cached collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    sorting: Option<SortSpec>,
    global_filter: String,
    page_index: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sorting: None,
            global_filter: String::new(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn sorting(&self) -> Option<SortSpec> {
        self.sorting
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Cycle `column` through first direction, the other direction and unsorted.
    /// Returns `false` and leaves the state alone for unsortable columns.
    pub fn toggle_sort(&mut self, column: Column) -> bool {
        if !column.sortable() {
            return false;
        }

        self.sorting = match self.sorting {
            Some(spec) if spec.column == column => {
                if spec.direction == column.first_direction() {
                    Some(SortSpec {
                        column,
                        direction: spec.direction.flip(),
                    })
                } else {
                    None
                }
            }
            _ => Some(SortSpec {
                column,
                direction: column.first_direction(),
            }),
        };
        self.page_index = 0;
        true
    }

    pub fn set_sorting(&mut self, sorting: Option<SortSpec>) {
        self.sorting = sorting.filter(|spec| spec.column.sortable());
        self.page_index = 0;
    }

    pub fn set_global_filter(&mut self, filter: impl Into<String>) {
        self.global_filter = filter.into();
        self.page_index = 0;
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self, page_count: usize) -> bool {
        self.page_index + 1 < page_count
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next_page(&mut self, page_count: usize) {
        if self.can_next_page(page_count) {
            self.page_index += 1;
        }
    }

    pub fn last_page(&mut self, page_count: usize) {
        self.page_index = page_count.saturating_sub(1);
    }

    /// Jump to a zero-based page, clamped into range.
    pub fn go_to_page(&mut self, page_index: usize, page_count: usize) {
        self.page_index = page_index;
        self.clamp_page(page_count);
    }

    /// Keep the page index in range after the row set changed.
    pub fn clamp_page(&mut self, page_count: usize) {
        self.page_index = self.page_index.min(page_count.saturating_sub(1));
    }

    pub fn page_count(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size).max(1)
    }

    /// Filter, then sort, then paginate `rows`. The page index is clamped into
    /// range for the returned view but the state itself is not touched.
    pub fn view(&self, rows: &[Book]) -> PageView {
        let mut visible: Vec<&Book> = rows.iter().filter(|book| self.matches(book)).collect();

        if let Some(spec) = self.sorting {
            visible.sort_by(|a, b| {
                let ordering = compare_cells(spec.column, a, b);
                match spec.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let filtered_count = visible.len();
        let page_count = self.page_count(filtered_count);
        let page_index = self.page_index.min(page_count - 1);
        let rows = visible
            .into_iter()
            .skip(page_index * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();

        PageView {
            rows,
            filtered_count,
            page_index,
            page_count,
        }
    }

    pub fn visible_rows(&self, rows: &[Book]) -> Vec<Book> {
        self.view(rows).rows
    }

    fn matches(&self, book: &Book) -> bool {
        let needle = self.global_filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        Column::ALL
            .iter()
            .filter_map(|column| column.filter_value(book))
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

fn compare_cells(column: Column, a: &Book, b: &Book) -> Ordering {
    match column {
        Column::Id => a.id.cmp(&b.id),
        column => {
            let left = column.filter_value(a).unwrap_or_default();
            let right = column.filter_value(b).unwrap_or_default();
            alphanumeric(&left, &right)
        }
    }
}

/// Case-insensitive comparison where digit runs compare by value, so `Book 9`
/// sorts before `Book 10`.
fn alphanumeric(left: &str, right: &str) -> Ordering {
    let left = chunks(&left.to_lowercase());
    let right = chunks(&right.to_lowercase());

    for (a, b) in left.iter().zip(right.iter()) {
        let ordering = match (a, b) {
            (Chunk::Number(x), Chunk::Number(y)) => x.cmp(y),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk {
    Number(u128),
    Text(String),
}

fn chunks(value: &str) -> Vec<Chunk> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for ch in value.chars() {
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            out.push(finish_chunk(std::mem::take(&mut current), in_digits));
        }
        in_digits = is_digit;
        current.push(ch);
    }
    if !current.is_empty() {
        out.push(finish_chunk(current, in_digits));
    }
    out
}

fn finish_chunk(raw: String, digits: bool) -> Chunk {
    if digits {
        match raw.parse() {
            Ok(number) => Chunk::Number(number),
            Err(_) => Chunk::Text(raw),
        }
    } else {
        Chunk::Text(raw)
    }
}

/// `August 1st, 1965`
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {day}{suffix}, {}", date.format("%B"), date.year())
}
