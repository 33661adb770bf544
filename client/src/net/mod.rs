//! Networking for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` adapts `gloo-net` to the session crate's `HttpClient` seam; request
//! building, bearer attachment and response decoding happen in `session`.

pub mod api;
