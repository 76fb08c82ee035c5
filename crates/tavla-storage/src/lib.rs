//! Storage abstraction for tavla.
//!
//! Backend crates (e.g. tavla-store-memory) implement [`ProjectStore`] so the
//! service layer doesn't depend on any specific database engine or schema
//! details.

mod specs;
mod store;

pub use specs::*;
pub use store::*;

use thiserror::Error;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("backend error: {0}")]
    Backend(String),
}
