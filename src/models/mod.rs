//! Data models module
//!
//! Defines request and response data structures for the Exa API

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
