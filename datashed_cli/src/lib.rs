//! Datashed CLI library
//!
//! Command-line front end for the datashed cache refresher: configuration
//! management, orchestration, and terminal progress rendering.

pub mod config;
pub mod orchestrators;
pub mod progress;
pub mod terminal;
