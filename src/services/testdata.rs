//! Sample catalog content for local runs

use crate::{error::AppResult, models::Book, repository::BookRepository};

/// Books seeded when `catalog.testdata` is enabled
pub fn sample_books() -> Vec<Book> {
    vec![
        Book {
            isbn: "1234567891".to_string(),
            title: "Northern Lights".to_string(),
            author: "Lyra Silverstar".to_string(),
            price: 9.90,
        },
        Book {
            isbn: "1234567892".to_string(),
            title: "Polar Journey".to_string(),
            author: "Iorek Polarson".to_string(),
            price: 12.90,
        },
    ]
}

/// Wipe the store, then insert the sample books
pub async fn load_test_data(repository: &dyn BookRepository) -> AppResult<()> {
    repository.delete_all().await?;
    let books = sample_books();
    for book in &books {
        book.validate()?;
        repository.save(book).await?;
    }
    tracing::info!("Loaded {} sample books", books.len());
    Ok(())
}
