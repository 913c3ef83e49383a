//! Request and response payloads.
pub mod body;
pub mod response;
