//! schemalens - an interactive shell for documenting database schemas.
//!
//! This library exposes the core modules for use in the binary and in
//! integration tests.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod options;
pub mod session;
pub mod shell;
pub mod traversal;
