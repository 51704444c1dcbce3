//! Infrastructure layer for DocLens.
//!
//! Contains implementations of the service traits defined in `doclens-core`:
//! REST adapters for identity and chat history sharing one cookie-carrying
//! HTTP client, the client config loader and the saved session cookie.

pub mod config;
pub mod http;
pub mod session_file;
