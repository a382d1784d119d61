//! Derive macros for rndi.
//!
//! Re-exports the procedural macros of `rndi-macros` so users depend on a
//! regular library crate.

pub use rndi_macros::Injectable;
