//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for tasks and categories.
//! - Isolate SQLite query details from store/facade orchestration.
//!
//! # Invariants
//! - Repository writes must validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   transport errors.
//! - Both backends (SQLite and preferences blob) satisfy the same traits.

use crate::db::DbError;
use crate::model::category::CategoryValidationError;
use crate::model::todo::TodoValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod category_repo;
pub mod todo_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    TodoValidation(TodoValidationError),
    CategoryValidation(CategoryValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TodoValidation(err) => write!(f, "{err}"),
            Self::CategoryValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TodoValidation(err) => Some(err),
            Self::CategoryValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::TodoValidation(value)
    }
}

impl From<CategoryValidationError> for RepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::CategoryValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
