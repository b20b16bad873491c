//! # Upstream Providers
//!
//! Clients for the text-generation services the relay forwards prompts to.

pub mod ai;
pub mod factory;
