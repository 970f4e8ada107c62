//! Book model and its validation rules

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;

/// ISBN-10 or ISBN-13, digits only
static ISBN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{10}|[0-9]{13})$").expect("valid ISBN pattern"));

/// Catalog book, identified by its ISBN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// ISBN-10 or ISBN-13 (digits only)
    #[schema(example = "1234567891")]
    pub isbn: String,
    pub title: String,
    pub author: String,
    /// Strictly positive
    #[schema(example = 9.90)]
    pub price: f64,
}

/// Book as received on the wire, before validation.
///
/// Every field is optional so that a missing or `null` value is reported as a
/// violation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct BookRequest {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Name of the offending field
    pub field: String,
    pub message: String,
}

/// All rules a book failed, in rule order
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid book: {}", join_messages(.violations))]
pub struct BookValidationError {
    pub violations: Vec<Violation>,
}

impl BookValidationError {
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

struct Rule {
    field: &'static str,
    message: &'static str,
    holds: fn(&BookRequest) -> bool,
}

fn is_defined(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Evaluated in order, all of them, on every validation
static RULES: &[Rule] = &[
    Rule {
        field: "isbn",
        message: "The book ISBN must be defined.",
        holds: |b| is_defined(&b.isbn),
    },
    Rule {
        field: "isbn",
        message: "The ISBN format must be valid.",
        holds: |b| b.isbn.as_deref().map_or(true, |isbn| ISBN_PATTERN.is_match(isbn)),
    },
    Rule {
        field: "title",
        message: "The book title must be defined.",
        holds: |b| is_defined(&b.title),
    },
    Rule {
        field: "author",
        message: "The book author must be defined.",
        holds: |b| is_defined(&b.author),
    },
    Rule {
        field: "price",
        message: "The book price must be defined.",
        holds: |b| b.price.is_some(),
    },
    Rule {
        field: "price",
        message: "The book price must be greater than zero.",
        holds: |b| b.price.map_or(true, |price| price > 0.0),
    },
];

impl BookRequest {
    /// Every rule this request breaks
    pub fn violations(&self) -> Vec<Violation> {
        RULES
            .iter()
            .filter(|rule| !(rule.holds)(self))
            .map(|rule| Violation {
                field: rule.field.to_string(),
                message: rule.message.to_string(),
            })
            .collect()
    }
}

impl From<&Book> for BookRequest {
    fn from(book: &Book) -> Self {
        Self {
            isbn: Some(book.isbn.clone()),
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            price: Some(book.price),
        }
    }
}

impl TryFrom<BookRequest> for Book {
    type Error = BookValidationError;

    fn try_from(request: BookRequest) -> Result<Self, Self::Error> {
        let violations = request.violations();

        // A missing field always breaks its "must be defined" rule
        let BookRequest {
            isbn: Some(isbn),
            title: Some(title),
            author: Some(author),
            price: Some(price),
        } = request
        else {
            return Err(BookValidationError { violations });
        };

        if !violations.is_empty() {
            return Err(BookValidationError { violations });
        }

        Ok(Book { isbn, title, author, price })
    }
}

impl Book {
    /// Build a book from raw values, reporting every broken rule at once
    pub fn build(
        isbn: Option<String>,
        title: Option<String>,
        author: Option<String>,
        price: Option<f64>,
    ) -> Result<Self, BookValidationError> {
        Book::try_from(BookRequest { isbn, title, author, price })
    }

    /// Re-check an already constructed book
    pub fn validate(&self) -> Result<(), BookValidationError> {
        let violations = BookRequest::from(self).violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(BookValidationError { violations })
        }
    }

    /// Same book under another ISBN
    pub fn with_isbn(self, isbn: impl Into<String>) -> Self {
        Self { isbn: isbn.into(), ..self }
    }
}
