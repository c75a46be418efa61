//! Remedy domain - records returned by the lookup endpoints

mod normalize;
mod record;

pub use normalize::{normalize_payload, normalize_record};
pub use record::{LookupPayload, Proving, RemedyRecord};
