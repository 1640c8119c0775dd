//! Catalog SQL: identifiers from config only, values as parameters.

mod builder;
pub use builder::*;
