pub mod api;
pub mod cache;
pub mod models;

pub use rusqlite;
