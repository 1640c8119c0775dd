//! Request extractors.

pub mod payload;
pub use payload::JsonObject;
