//! Error types for the corpus service

use thiserror::Error;

/// Exactly two failure kinds exist at runtime: a resource that is absent
/// (which lookups degrade around) and a corpus file that does not parse
/// (which fails the single request needing it).
#[derive(Error, Debug)]
pub enum TafsirError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed corpus file: {0}")]
    Malformed(String),
}

impl serde::Serialize for TafsirError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
