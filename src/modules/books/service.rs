use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_http::error::AppError;

use super::models::{Book, BookId, BookPatch, NewBook};

const SELECT_COLUMNS: &str = "SELECT id, title, author, genre, description, published_date FROM books";

/// CRUD operations over the `books` table.
#[derive(Debug, Clone)]
pub struct BookService {
    db: Database,
}

impl BookService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every stored book, oldest id first.
    pub async fn list(&self) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(self.db.pool())
            .await
            .context("failed to list books")?;
        Ok(books)
    }

    pub async fn create(&self, book: NewBook) -> Result<Book, AppError> {
        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, genre, description, published_date)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, title, author, genre, description, published_date",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(book.published_date)
        .fetch_one(self.db.pool())
        .await
        .context("failed to insert book")?;

        tracing::info!(book_id = created.id, "book created");
        Ok(created)
    }

    pub async fn find(&self, id: BookId) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .context("failed to load book")?
            .ok_or_else(|| not_found(id))
    }

    /// Overwrite every editable field.
    pub async fn replace(&self, id: BookId, book: NewBook) -> Result<Book, AppError> {
        self.patch(id, BookPatch::from(book)).await
    }

    /// Overwrite only the fields present in `patch`, in a single statement so
    /// concurrent patches to different fields both land. An empty patch writes
    /// nothing.
    pub async fn patch(&self, id: BookId, patch: BookPatch) -> Result<Book, AppError> {
        if patch.is_empty() {
            tracing::debug!(book_id = id, "patch carries no editable fields");
            return self.find(id).await;
        }

        let book = sqlx::query_as::<_, Book>(
            "UPDATE books
             SET title = COALESCE(?, title),
                 author = COALESCE(?, author),
                 genre = COALESCE(?, genre),
                 description = COALESCE(?, description),
                 published_date = COALESCE(?, published_date)
             WHERE id = ?
             RETURNING id, title, author, genre, description, published_date",
        )
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.genre)
        .bind(patch.description)
        .bind(patch.published_date)
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .context("failed to update book")?
        .ok_or_else(|| not_found(id))?;

        tracing::info!(book_id = id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: BookId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("failed to delete book")?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(self.db.pool())
            .await
            .context("failed to count books")?;
        Ok(count)
    }
}

fn not_found(id: BookId) -> AppError {
    AppError::not_found(format!("Book {id} not found"))
}
