//! Domain model for tavla: the Project aggregate and its value objects.
//!
//! The aggregate keeps an append-only revision log; every membership
//! mutation appends exactly one revision before it is considered complete.

mod ids;
mod project;
mod role;

pub use ids::*;
pub use project::*;
pub use role::*;
