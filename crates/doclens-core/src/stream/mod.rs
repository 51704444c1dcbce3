//! Simulated incremental text reveal.

pub mod renderer;
