// Adapters layer: concrete implementations for external systems.
// Currently only the HTTP admin API client.

pub mod http;

pub use http::HttpProductApi;
