//! Lookup infrastructure - HTTP source and the caching lookup service

mod http_source;
mod service;

pub use http_source::{HttpRemedySource, HttpSourceConfig};
pub use service::{LookupServiceConfig, RemedyLookupService};
