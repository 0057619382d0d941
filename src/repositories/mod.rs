//! Document store repositories
//!
//! Provides the data access layer between request payloads and store
//! operations.

pub mod entries;

pub use entries::{Entry, EntryPayload, EntryRepository, IngredientPayload};
