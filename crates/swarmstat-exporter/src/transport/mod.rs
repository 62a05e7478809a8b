//! HTTP handlers: the scrape endpoint and the ingest API.

pub mod ingest;
pub mod scrape;
