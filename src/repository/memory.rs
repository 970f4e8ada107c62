//! In-memory book storage, used when no database is configured

use async_trait::async_trait;
use indexmap::{map::Entry, IndexMap};
use tokio::sync::RwLock;

use super::BookRepository;
use crate::{error::AppResult, models::Book};

/// Books kept in insertion order behind a single lock
#[derive(Default)]
pub struct InMemoryBookRepository {
    books: RwLock<IndexMap<String, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        Ok(self.books.read().await.contains_key(isbn))
    }

    async fn insert(&self, book: &Book) -> AppResult<Option<Book>> {
        match self.books.write().await.entry(book.isbn.clone()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => Ok(Some(slot.insert(book.clone()).clone())),
        }
    }

    async fn save(&self, book: &Book) -> AppResult<Book> {
        // Replacing an entry keeps its original position
        self.books
            .write()
            .await
            .insert(book.isbn.clone(), book.clone());
        Ok(book.clone())
    }

    async fn delete_by_isbn(&self, isbn: &str) -> AppResult<()> {
        self.books.write().await.shift_remove(isbn);
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        self.books.write().await.clear();
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
