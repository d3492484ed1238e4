//! Configuration handling
//!
//! This module locates yata's data directory and reads and writes
//! `config.yml`, including the persisted sync credential.

pub mod parse;
pub mod paths;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use paths::*;
pub use schema::*;
pub use types::*;
