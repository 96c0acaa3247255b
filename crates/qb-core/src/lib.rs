//! # qb-core
//!
//! Core types for Quotebook.
//!
//! This crate provides:
//! - `Quote`: a submitted quote, as stored on disk
//! - `AddQuoteForm`: the submission form (quote fields plus the shared password)
//! - Validator registration for the shared password
//! - The rendering policy for quotes: image detection, autolinking and escaping

pub mod quote;
pub mod render;
pub mod validators;

pub use quote::{AddQuoteForm, Quote};
