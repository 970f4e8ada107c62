//! Business logic services

pub mod catalog;
pub mod testdata;

use std::sync::Arc;

use crate::repository::BookRepository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::BookService,
}

impl Services {
    /// Create all services on top of the given book storage
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            catalog: catalog::BookService::new(repository),
        }
    }
}
