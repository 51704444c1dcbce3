//! Shared domain types for DocLens.
//!
//! This crate contains the core domain types used across the DocLens client:
//! User, SessionState, RouteClass, chat Message/ChatHistory, client config,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, secrecy, thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod route;
pub mod session;
pub mod user;
