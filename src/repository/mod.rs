//! Repository layer for book storage

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{error::AppResult, models::Book};

pub use books::PgBookRepository;
pub use memory::InMemoryBookRepository;

/// Book storage keyed by ISBN.
///
/// Each call is atomic with respect to a single ISBN.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, in insertion order
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    /// Store a new book in one step; `None` when the ISBN is already taken
    async fn insert(&self, book: &Book) -> AppResult<Option<Book>>;

    /// Insert or replace the book stored under `book.isbn`
    async fn save(&self, book: &Book) -> AppResult<Book>;

    /// No-op when the ISBN is absent
    async fn delete_by_isbn(&self, isbn: &str) -> AppResult<()>;

    async fn delete_all(&self) -> AppResult<()>;

    /// Check the backing store is reachable
    async fn ping(&self) -> AppResult<()>;
}
