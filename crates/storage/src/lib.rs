#![forbid(unsafe_code)]

pub mod blob;
pub mod repository;
pub mod sqlite;

pub use repository::{PerformanceRepository, ProgressRepository, Storage, StorageError};
