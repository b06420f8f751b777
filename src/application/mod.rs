//! Application layer - the gateway facade
//!
//! This module wires the parameter builder, signing strategies, dispatcher
//! and normalizer into the public operations.

pub mod gateway;

pub use gateway::Gateway;
