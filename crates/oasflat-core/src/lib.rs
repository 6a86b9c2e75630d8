//! Swagger 2.0 document model and inline schema flattening.
//!
//! Load a document with [`parse::from_yaml`] or [`parse::from_json`], run
//! [`transform::flatten`] (or an [`InlineModelResolver`] configured from
//! [`config::FlattenConfig`]) and hand the rewritten document to whatever
//! consumes named definitions.

pub mod config;
pub mod error;
pub mod parse;
pub mod transform;

pub use transform::InlineModelResolver;
