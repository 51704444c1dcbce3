//! Route classification, protection rule, and the reactive controller.

pub mod controller;
pub mod navigator;
pub mod rules;
