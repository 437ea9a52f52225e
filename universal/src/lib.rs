//! Universal archive aggregation library.
//!
//! This crate combines the packaged archives produced by several independent
//! build modules into one consolidated distributable. It is used by the
//! `universal-jar` CLI binary and can be embedded in other build drivers that
//! want the same task wiring.
//!
//! # Modules
//!
//! - [`aggregation`] - The aggregation task that merges and publishes module outputs
//! - [`archive`] - Archive merging, naming, and publication
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution abstraction
//! - [`config`] - Project configuration loaded from `universal.toml`
//! - [`error`] - Semantic error types for configuration, tasks, and builds
//! - [`graph`] - Task dependency graph with wave-parallel execution
//! - [`lifecycle`] - The `build` lifecycle task and whole-build entry points
//! - [`logging`] - Stderr subscriber that forwards `log` records
//! - [`module`] - Module identity and per-module packaging tasks
//! - [`module_name`] - Semantic wrapper for module names
//! - [`output`] - Progress and summary formatting for the CLI

pub mod aggregation;
pub mod archive;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod logging;
pub mod module;
pub mod module_name;
pub mod output;

#[cfg(test)]
pub(crate) mod test_utils;
