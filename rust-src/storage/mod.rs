//! Storage layer for usage samples and app state.

mod database;

pub use database::{Store, StoreStats};
