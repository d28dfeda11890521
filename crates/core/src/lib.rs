//! `copurchase-core`: foundation building blocks shared by every crate.
//!
//! This crate contains **pure** primitives (no IO): the error model, identifiers,
//! money, and the insertion-ordered map used for deterministic iteration.

pub mod error;
pub mod id;
pub mod money;
pub mod ordered;

pub use error::{DomainError, DomainResult};
pub use id::{CatalogKey, CustomerId};
pub use money::Money;
pub use ordered::OrderedMap;
