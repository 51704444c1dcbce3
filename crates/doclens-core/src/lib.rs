//! Client logic and port (trait) definitions for DocLens.
//!
//! This crate defines the ports the infrastructure layer implements
//! (`IdentityService`, `ChatHistoryService`, `Navigator`) and the client core
//! built on them: session gating, route protection, simulated streaming, and
//! the chat view. It depends only on `doclens-types` -- never on
//! `doclens-infra` or any HTTP crate.

pub mod chat;
pub mod route;
pub mod session;
pub mod stream;
