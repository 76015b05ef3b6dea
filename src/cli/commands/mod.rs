//! CLI command implementations.

pub mod backfill;
pub mod run;
pub mod validate;
