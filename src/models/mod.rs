//! Data models for the catalog service

pub mod book;

pub use book::{Book, BookRequest, BookValidationError, Violation};
