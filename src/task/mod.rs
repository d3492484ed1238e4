//! Tasks and the operations over them
//!
//! The store persists tasks; the query and render modules are pure
//! functions over task lists.

pub mod model;
pub mod query;
pub mod render;
pub mod store;

// Re-export main types
pub use model::*;
pub use query::*;
pub use render::*;
pub use store::*;
