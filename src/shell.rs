//! Run the storage and scheduler CLIs as child processes
//!
//! Every external call goes through a [`runner::CommandRunner`], so stages can be run for real,
//! as a dry run, or against a scripted fake in tests.

/// Describe a command line without running it
pub mod invocation;

/// Execute invocations with a time limit, or pretend to
pub mod runner;

/// Quote values embedded in rendered shell text
pub mod quote;
