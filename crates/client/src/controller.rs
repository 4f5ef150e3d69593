//! Ties the table, the modals and the cache to the books API.

use std::sync::Arc;

use crate::api::BooksApi;
use crate::cache::{QueryCache, BOOKS_QUERY};
use crate::error::ClientError;
use crate::modal::ModalState;
use crate::model::{Book, BookId};
use crate::table::{PageView, TableState};

pub type BookCache = QueryCache<Arc<Vec<Book>>>;

/// Catalog screen state. Driven by one task at a time; every mutation that
/// succeeds invalidates the `books` query so the next read refetches.
pub struct CatalogController<A: BooksApi + ?Sized> {
    api: Arc<A>,
    cache: Arc<BookCache>,
    table: TableState,
    modal: ModalState,
    error: Option<String>,
}

impl<A: BooksApi + ?Sized> CatalogController<A> {
    pub fn new(api: Arc<A>, cache: Arc<BookCache>, page_size: usize) -> Self {
        Self {
            api,
            cache,
            table: TableState::new(page_size),
            modal: ModalState::Closed,
            error: None,
        }
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableState {
        &mut self.table
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut ModalState {
        &mut self.modal
    }

    /// Message from the last failed submission, shown inside the open modal.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The cached collection, fetched on a miss.
    pub async fn books(&self) -> Result<Arc<Vec<Book>>, ClientError> {
        let api = Arc::clone(&self.api);
        self.cache
            .fetch_with(BOOKS_QUERY, || async move { api.list().await.map(Arc::new) })
            .await
    }

    /// Current page of the table over the cached collection.
    pub async fn page(&mut self) -> Result<PageView, ClientError> {
        let books = self.books().await?;
        let view = self.table.view(&books);
        self.table.clamp_page(view.page_count);
        Ok(view)
    }

    pub fn open_create(&mut self) {
        self.error = None;
        self.modal = ModalState::creating();
    }

    pub fn open_edit(&mut self, book: &Book) {
        self.error = None;
        self.modal = ModalState::editing(book);
    }

    pub fn open_delete(&mut self, id: BookId) {
        self.error = None;
        self.modal = ModalState::Deleting(id);
    }

    /// Close whatever is open, discarding unsaved form input.
    pub fn close(&mut self) {
        self.error = None;
        self.modal = ModalState::Closed;
    }

    /// Submit the create or edit form. On failure the modal stays open with the
    /// server's message.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let result = match &self.modal {
            ModalState::Creating(form) => {
                let payload = form.to_payload();
                self.api.create(&payload).await.map(|book| {
                    tracing::info!(id = book.id, "book created");
                })
            }
            ModalState::Editing { id, form } => {
                let (id, payload) = (*id, form.to_payload());
                self.api.update(id, &payload).await.map(|message| {
                    tracing::info!(id, %message, "book updated");
                })
            }
            _ => return Err(ClientError::NoActiveModal),
        };

        match result {
            Ok(()) => {
                self.cache.invalidate(BOOKS_QUERY).await;
                self.close();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "book submission failed");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Delete the record the delete modal targets. On failure the error is
    /// logged and the modal stays as it was.
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        let ModalState::Deleting(id) = self.modal else {
            return Err(ClientError::NoActiveModal);
        };

        match self.api.delete(id).await {
            Ok(message) => {
                tracing::info!(id, %message, "book deleted");
                self.cache.invalidate(BOOKS_QUERY).await;
                self.close();
                Ok(())
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to delete book");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use crate::model::BookPayload;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        books: Mutex<Vec<Book>>,
        list_calls: AtomicUsize,
    }

    impl FakeApi {
        fn with(books: Vec<Book>) -> Arc<Self> {
            Arc::new(Self {
                books: Mutex::new(books),
                list_calls: AtomicUsize::new(0),
            })
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn check(payload: &BookPayload) -> Result<(), ClientError> {
            let mut fields = BTreeMap::new();
            for (name, value) in [("title", &payload.title), ("author", &payload.author)] {
                if value.trim().is_empty() {
                    fields.insert(
                        name.to_string(),
                        vec![format!("The {name} field is required.")],
                    );
                }
            }
            let first = fields.values().next().map(|messages| messages[0].clone());
            match first {
                Some(message) => Err(ClientError::Validation { message, fields }),
                None => Ok(()),
            }
        }

        fn missing(id: BookId) -> ClientError {
            ClientError::NotFound {
                message: format!("Book {id} not found"),
            }
        }
    }

    #[async_trait]
    impl BooksApi for FakeApi {
        async fn list(&self) -> Result<Vec<Book>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.books.lock().unwrap().clone())
        }

        async fn get(&self, id: BookId) -> Result<Book, ClientError> {
            let books = self.books.lock().unwrap();
            books
                .iter()
                .find(|book| book.id == id)
                .cloned()
                .ok_or_else(|| Self::missing(id))
        }

        async fn create(&self, payload: &BookPayload) -> Result<Book, ClientError> {
            Self::check(payload)?;
            let mut books = self.books.lock().unwrap();
            let id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;
            let book = Book {
                id,
                title: payload.title.clone(),
                author: payload.author.clone(),
                genre: payload.genre.clone(),
                description: payload.description.clone(),
                published_date: format!("{}T00:00:00Z", payload.published_date),
            };
            books.push(book.clone());
            Ok(book)
        }

        async fn update(&self, id: BookId, payload: &BookPayload) -> Result<String, ClientError> {
            Self::check(payload)?;
            let mut books = self.books.lock().unwrap();
            let book = books
                .iter_mut()
                .find(|book| book.id == id)
                .ok_or_else(|| Self::missing(id))?;
            book.title = payload.title.clone();
            book.author = payload.author.clone();
            book.genre = payload.genre.clone();
            book.description = payload.description.clone();
            book.published_date = format!("{}T00:00:00Z", payload.published_date);
            Ok("Book updated successfully".to_string())
        }

        async fn replace(&self, id: BookId, payload: &BookPayload) -> Result<String, ClientError> {
            self.update(id, payload).await
        }

        async fn delete(&self, id: BookId) -> Result<String, ClientError> {
            let mut books = self.books.lock().unwrap();
            let before = books.len();
            books.retain(|book| book.id != id);
            if books.len() == before {
                return Err(Self::missing(id));
            }
            Ok("Book deleted successfully".to_string())
        }
    }

    fn dune() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: "Sci-Fi".to_string(),
            description: "Desert planet".to_string(),
            published_date: "1965-08-01T00:00:00Z".to_string(),
        }
    }

    fn controller(api: Arc<FakeApi>) -> CatalogController<FakeApi> {
        CatalogController::new(api, Arc::new(QueryCache::new()), 10)
    }

    fn fill(controller: &mut CatalogController<FakeApi>, values: [(FormField, &str); 5]) {
        let form = controller.modal_mut().form_mut().unwrap();
        for (field, value) in values {
            form.set(field, value);
        }
    }

    #[tokio::test]
    async fn reads_are_cached_until_a_mutation() {
        let api = FakeApi::with(vec![dune()]);
        let mut catalog = controller(Arc::clone(&api));

        catalog.page().await.unwrap();
        catalog.page().await.unwrap();
        assert_eq!(api.list_calls(), 1);

        catalog.open_delete(1);
        catalog.confirm_delete().await.unwrap();
        let page = catalog.page().await.unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn create_with_long_description_closes_and_refetches() {
        let api = FakeApi::with(Vec::new());
        let mut catalog = controller(Arc::clone(&api));
        assert!(catalog.books().await.unwrap().is_empty());

        catalog.open_create();
        let description = "x".repeat(300);
        fill(
            &mut catalog,
            [
                (FormField::Title, "Dune"),
                (FormField::Author, "Herbert"),
                (FormField::Genre, "Sci-Fi"),
                (FormField::Description, description.as_str()),
                (FormField::PublishedDate, "1965-08-01"),
            ],
        );
        assert!(catalog.modal().form().unwrap().description_exceeds_limit());

        catalog.submit().await.unwrap();
        assert_eq!(catalog.modal(), &ModalState::Closed);

        let books = catalog.books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].description.len(), 300);
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn rejected_create_keeps_modal_open_with_message() {
        let api = FakeApi::with(Vec::new());
        let mut catalog = controller(Arc::clone(&api));

        catalog.open_create();
        fill(
            &mut catalog,
            [
                (FormField::Title, "Dune"),
                (FormField::Author, ""),
                (FormField::Genre, "Sci-Fi"),
                (FormField::Description, "Desert planet"),
                (FormField::PublishedDate, "1965-08-01"),
            ],
        );

        let err = catalog.submit().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(matches!(catalog.modal(), ModalState::Creating(_)));
        assert_eq!(catalog.error(), Some("The author field is required."));
        assert!(api.books.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_sends_seeded_form_and_invalidates() {
        let api = FakeApi::with(vec![dune()]);
        let mut catalog = controller(Arc::clone(&api));
        let books = catalog.books().await.unwrap();

        catalog.open_edit(&books[0]);
        assert_eq!(
            catalog.modal().form().unwrap().get(FormField::PublishedDate),
            "1965-08-01"
        );
        catalog
            .modal_mut()
            .form_mut()
            .unwrap()
            .set(FormField::Genre, "Classic");
        catalog.submit().await.unwrap();

        let book = api.get(1).await.unwrap();
        assert_eq!(book.genre, "Classic");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.published_date, "1965-08-01T00:00:00Z");
        assert_eq!(catalog.books().await.unwrap()[0].genre, "Classic");
    }

    #[tokio::test]
    async fn failed_delete_leaves_state_unchanged() {
        let api = FakeApi::with(vec![dune()]);
        let mut catalog = controller(Arc::clone(&api));
        catalog.books().await.unwrap();

        catalog.open_delete(99);
        let err = catalog.confirm_delete().await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
        assert_eq!(catalog.modal(), &ModalState::Deleting(99));

        catalog.books().await.unwrap();
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn actions_without_a_matching_modal_are_rejected() {
        let mut catalog = controller(FakeApi::with(Vec::new()));
        assert!(matches!(
            catalog.submit().await,
            Err(ClientError::NoActiveModal)
        ));

        catalog.open_create();
        assert!(matches!(
            catalog.confirm_delete().await,
            Err(ClientError::NoActiveModal)
        ));
        assert!(catalog.modal().is_open());
    }

    #[tokio::test]
    async fn page_clamps_after_rows_disappear() {
        let books: Vec<Book> = (1..=11)
            .map(|id| Book { id, ..dune() })
            .collect();
        let api = FakeApi::with(books);
        let mut catalog = controller(Arc::clone(&api));

        let count = catalog.page().await.unwrap().page_count;
        catalog.table_mut().last_page(count);
        assert_eq!(catalog.page().await.unwrap().rows.len(), 1);

        catalog.open_delete(11);
        catalog.confirm_delete().await.unwrap();
        let page = catalog.page().await.unwrap();
        assert_eq!(page.page_index, 0);
        assert_eq!(catalog.table().page_index(), 0);
    }
}
