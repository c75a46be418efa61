//! Lookup domain - remote remedy lookups and their failures

mod error;
mod source;

pub use error::{FetchError, NetworkError};
pub use source::{LookupKind, RemedySource};

#[cfg(test)]
pub use source::MockRemedySource;
