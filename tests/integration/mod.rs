//! End-to-end session tests.

pub mod common;
pub mod config_test;
pub mod execute_test;
pub mod session_test;
pub mod shell_test;
