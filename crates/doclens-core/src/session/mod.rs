//! Session resolution and route gating.
//!
//! `SessionGate` runs the one-shot identity check and owns the only writer
//! of the shared `SessionStore`; everything else reads the store.

pub mod gate;
pub mod identity;
pub mod store;
