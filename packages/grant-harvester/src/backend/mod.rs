//! Persistence of discovered sources to the grants backend.

pub mod client;

pub use client::BackendClient;
