//! # rndi support
//!
//! Shared utilities for the rndi crates.
//!
//! This crate provides:
//! - Text rendering for error messages

pub mod rendering;
