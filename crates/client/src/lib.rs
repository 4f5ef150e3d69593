//! Client side of the bookshelf catalog.
//!
//! Everything a table front end needs: an API client, a tag-keyed query cache,
//! the filter/sort/paginate table state, the book form and the modal controller
//! that ties mutations to cache invalidation.

pub mod api;
pub mod cache;
pub mod controller;
pub mod error;
pub mod form;
pub mod genres;
pub mod modal;
pub mod model;
pub mod table;

pub use api::{BooksApi, HttpBooksApi};
pub use cache::{QueryCache, BOOKS_QUERY};
pub use controller::CatalogController;
pub use error::ClientError;
pub use form::{BookForm, FormField, DESCRIPTION_LIMIT};
pub use modal::ModalState;
pub use model::{Book, BookId, BookPayload};
pub use table::{Column, PageView, SortDirection, SortSpec, TableState};
