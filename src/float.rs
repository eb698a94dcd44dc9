//! Drive the `float` job scheduler CLI
//!
//! `float` prints unstructured text, so everything scraped from its output lives in [`parse`],
//! pinned by tests to literal samples. If the CLI's output format drifts those tests break
//! instead of jobs being silently misparsed.

/// Lifecycle actions accepted by `manage`
pub mod action;

/// Render `float submit` commands from the embedded template
pub mod command;

/// Extract job IDs, hosts and tokens from `float` output
pub mod parse;

/// Submit one job per roster entry
pub mod submit;

/// Resolve the browser URL of each submitted job
pub mod session;

/// Suspend, resume or cancel jobs
pub mod manage;
