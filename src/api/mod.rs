//! HTTP access to the turismo REST backend.

mod client;

pub use client::ApiClient;
