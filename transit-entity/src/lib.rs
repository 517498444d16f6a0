//! # transit-entity
//!
//! Entity model and store contracts for transit.
//!
//! This crate provides:
//! - The language-aware entity model
//! - A plain-data entity query representation
//! - The `EntityStore` and `LanguageProvider` collaborator contracts
//! - `MemoryStore`, an in-memory reference store for tests and embedding

pub mod entity;
pub mod error;
pub mod query;
pub mod store;

pub use entity::Entity;
pub use error::StoreError;
pub use query::{Condition, EntityQuery, Operator};
pub use store::{EntityStore, FixedLanguages, LanguageProvider, MemoryStore};
