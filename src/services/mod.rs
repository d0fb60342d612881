//! Service layer.
//!
//! Orchestrates the conversion pipeline: export reader, entry mapper,
//! attachment resolver, import invoker, and run reporter.

mod import;

pub use import::{ImportOptions, ImportService, RunReport};
