//! Stochastic minute-resolution electricity demand simulator.

pub mod appliances;
/// TOML scenario configuration and presets.
pub mod config;
pub mod error;
/// Daily profile generation, orchestration and aggregation.
pub mod sim;
