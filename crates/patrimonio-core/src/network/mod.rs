//! HTTP transport and connectivity signal.

mod client;
mod connectivity;

pub use client::{host_of, HttpClient};
pub use connectivity::{ConnectivitySignal, SharedConnectivity};
