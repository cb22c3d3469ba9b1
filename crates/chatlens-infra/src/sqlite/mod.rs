//! SQLite storage for chatlens.

pub mod embedding;
pub mod pool;
