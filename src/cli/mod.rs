//! CLI infrastructure for the xxo trainer
//!
//! This module provides the `train` and `play` commands used by the `xxo`
//! binary.

pub mod commands;
pub mod config;
pub mod output;
