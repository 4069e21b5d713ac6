#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;

pub use repository::{
    ExerciseCatalog, InMemoryRepository, SavedSession, SessionRepository, SessionRow, Storage,
    StorageError,
};
