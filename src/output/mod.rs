//! Output module
//!
//! Persists each fetched collection as a JSON array named after its id.

mod writer;

pub use writer::{sanitize, write_collection, JsonWriter, JsonWriterConfig};

#[cfg(test)]
mod tests;
