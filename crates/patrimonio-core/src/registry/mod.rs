//! Client for the remote registry service.

mod client;
mod types;

pub use client::RegistryClient;
pub use types::{Ack, ListFilters, RecordPage, RecordSink};
