//! PostgreSQL book storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookRepository;
use crate::{error::AppResult, models::Book};

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT isbn, title, author, price FROM book ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            "SELECT isbn, title, author, price FROM book WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM book WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert(&self, book: &Book) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO book (isbn, title, author, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (isbn) DO NOTHING
            RETURNING isbn, title, author, price
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save(&self, book: &Book) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO book (isbn, title, author, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (isbn) DO UPDATE
               SET title = EXCLUDED.title,
                   author = EXCLUDED.author,
                   price = EXCLUDED.price,
                   updated_at = NOW()
            RETURNING isbn, title, author, price
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_by_isbn(&self, isbn: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            tracing::debug!(isbn, "No book to delete");
        }
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM book").execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
