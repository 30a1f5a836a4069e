// src/fetch/mod.rs
// =============================================================================
// The HTTP capability every other module depends on.
//
// Submodules:
// - http: GET-as-text and HEAD existence checks on top of reqwest
// =============================================================================

mod http;

pub use http::Fetcher;
