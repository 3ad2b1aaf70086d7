//! Domain types shared across the microblog crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` converts at the edge.

pub mod id;
pub mod pagination;
pub mod validation;
