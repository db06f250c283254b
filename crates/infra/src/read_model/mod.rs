//! Entity stores backing the screens.

pub mod repository;

pub use repository::{InMemoryRepository, Repository, RepositoryError};
