//! Book catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Book,
    repository::BookRepository,
};

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// List every book in the catalog
    pub async fn view_book_list(&self) -> AppResult<Vec<Book>> {
        self.repository.find_all().await
    }

    /// Get a book by ISBN
    pub async fn view_book_details(&self, isbn: &str) -> AppResult<Book> {
        self.repository
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::BookNotFound(isbn.to_string()))
    }

    /// Add a new book. Fails when the ISBN is already in the catalog.
    pub async fn add_book_to_catalog(&self, book: Book) -> AppResult<Book> {
        book.validate()?;

        match self.repository.insert(&book).await? {
            Some(saved) => {
                tracing::info!(isbn = %saved.isbn, "Book added to catalog");
                Ok(saved)
            }
            None => Err(AppError::BookAlreadyExists(book.isbn)),
        }
    }

    /// Replace title, author and price of the book stored under `isbn`.
    ///
    /// When no book has that ISBN, the book is added under it instead.
    pub async fn edit_book_details(&self, isbn: &str, book: Book) -> AppResult<Book> {
        book.validate()?;

        match self.repository.find_by_isbn(isbn).await? {
            Some(existing) => {
                let updated = book.with_isbn(existing.isbn);
                let saved = self.repository.save(&updated).await?;
                tracing::info!(isbn = %saved.isbn, "Book details updated");
                Ok(saved)
            }
            None => {
                tracing::debug!(isbn, "Book not in catalog, adding it");
                self.add_book_to_catalog(book.with_isbn(isbn)).await
            }
        }
    }

    /// Remove a book. Removing an unknown ISBN is not an error.
    pub async fn remove_book_from_catalog(&self, isbn: &str) -> AppResult<()> {
        self.repository.delete_by_isbn(isbn).await?;
        tracing::info!(isbn, "Book removed from catalog");
        Ok(())
    }

    /// Probe the underlying storage
    pub async fn check_storage(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryBookRepository, MockBookRepository};
    use mockall::predicate::eq;

    fn book(isbn: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: "Title".to_string(),
            author: "Author".to_string(),
            price: 9.90,
        }
    }

    fn service(repo: MockBookRepository) -> BookService {
        BookService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_view_existing_book() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_by_isbn()
            .with(eq("1234567890"))
            .times(1)
            .returning(|isbn| Ok(Some(book(isbn))));

        let found = service(repo).view_book_details("1234567890").await.unwrap();
        assert_eq!(found, book("1234567890"));
    }

    #[tokio::test]
    async fn test_view_missing_book() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_by_isbn()
            .with(eq("1234561235"))
            .times(1)
            .returning(|_| Ok(None));

        let err = service(repo).view_book_details("1234561235").await.unwrap_err();
        assert!(matches!(err, AppError::BookNotFound(isbn) if isbn == "1234561235"));
    }

    #[tokio::test]
    async fn test_add_existing_book_is_rejected_without_saving() {
        let mut repo = MockBookRepository::new();
        repo.expect_insert()
            .withf(|b| b.isbn == "1234561232")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_save().never();

        let err = service(repo)
            .add_book_to_catalog(book("1234561232"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BookAlreadyExists(isbn) if isbn == "1234561232"));
    }

    #[tokio::test]
    async fn test_add_new_book() {
        let mut repo = MockBookRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|b| Ok(Some(b.clone())));

        let saved = service(repo).add_book_to_catalog(book("1234567890")).await.unwrap();
        assert_eq!(saved, book("1234567890"));
    }

    #[tokio::test]
    async fn test_add_invalid_book_never_touches_storage() {
        let repo = MockBookRepository::new();
        let invalid = Book { price: 0.0, ..book("a123") };

        let err = service(repo).add_book_to_catalog(invalid).await.unwrap_err();
        let violations = match err {
            AppError::Validation(violations) => violations,
            other => panic!("expected a validation error, got {:?}", other),
        };
        assert_eq!(
            violations.messages(),
            vec!["The ISBN format must be valid.", "The book price must be greater than zero."]
        );
    }

    #[tokio::test]
    async fn test_edit_existing_book_keeps_stored_isbn() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_by_isbn()
            .with(eq("1234567890"))
            .returning(|isbn| Ok(Some(book(isbn))));
        repo.expect_insert().never();
        repo.expect_save()
            .withf(|b| b.isbn == "1234567890" && b.title == "New Title")
            .times(1)
            .returning(|b| Ok(b.clone()));

        let edit = Book {
            title: "New Title".to_string(),
            ..book("9999999999")
        };
        let updated = service(repo).edit_book_details("1234567890", edit).await.unwrap();
        assert_eq!(updated.isbn, "1234567890");
        assert_eq!(updated.title, "New Title");
    }

    #[tokio::test]
    async fn test_edit_missing_book_adds_it() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_by_isbn().returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|b| b.isbn == "1234567890")
            .times(1)
            .returning(|b| Ok(Some(b.clone())));

        let created = service(repo)
            .edit_book_details("1234567890", book("1234567890"))
            .await
            .unwrap();
        assert_eq!(created, book("1234567890"));
    }

    #[tokio::test]
    async fn test_edit_invalid_book_never_touches_storage() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_by_isbn().never();
        repo.expect_insert().never();
        repo.expect_save().never();

        let invalid = Book { price: -1.0, ..book("1234567890") };
        let err = service(repo)
            .edit_book_details("1234567890", invalid)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_of_same_isbn_create_once() {
        let repository = Arc::new(InMemoryBookRepository::new());
        let service = BookService::new(repository.clone());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let candidate = Book {
                        title: format!("Title {}", i),
                        ..book("1234567890")
                    };
                    service.add_book_to_catalog(candidate).await
                })
            })
            .collect();

        let mut created = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(book) => created.push(book),
                Err(AppError::BookAlreadyExists(isbn)) => assert_eq!(isbn, "1234567890"),
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(created.len(), 1);
        let stored = repository.find_all().await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let mut repo = MockBookRepository::new();
        repo.expect_delete_by_isbn()
            .with(eq("1234567890"))
            .times(2)
            .returning(|_| Ok(()));

        let service = service(repo);
        service.remove_book_from_catalog("1234567890").await.unwrap();
        service.remove_book_from_catalog("1234567890").await.unwrap();
    }

    #[tokio::test]
    async fn test_storage_errors_are_not_masked() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_all()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let err = service(repo).view_book_list().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
