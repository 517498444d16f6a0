//! # transit-core
//!
//! Transition rule contract and registry for transit.
//!
//! This crate provides:
//! - Transition definitions (static rule metadata)
//! - The `TransitionRule` trait
//! - The priority-ordered rule registry with lazy instantiation
//! - `FieldSwitchRule`, a reusable field-value transition

pub mod definition;
pub mod error;
pub mod field;
pub mod registry;
pub mod rule;

pub use definition::TransitionDefinition;
pub use error::{CoreError, RuleError};
pub use field::FieldSwitchRule;
pub use registry::{RuleFactory, RuleRegistry, RuleRegistryBuilder};
pub use rule::{Narrowing, TransitionRule};
