//! Service layer module
//!
//! Contains the request builders, the HTTP client and the answer stream decoder

pub mod builder;
pub mod client;
pub mod stream;

pub use builder::*;
pub use client::{ExaClient, HttpTransport, Transport};
pub use stream::{StreamDecoder, StreamSummary};
