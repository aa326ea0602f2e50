//! Command orchestrators
//!
//! Orchestrators contain the business logic for CLI commands, keeping
//! main.rs focused on argument parsing and dispatch.

pub mod refresh_orchestrator;
