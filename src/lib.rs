//! Per-student cloud notebook sessions for a course
//!
//! A course runs four stages, each reading and writing plain CSV files:
//! `provision` creates a storage directory per student, `submit` starts one job per student,
//! `get_url` works out how to reach each job, and `manage` suspends, resumes or cancels them.

/// Parse command line arguments
pub mod cli;

/// Roster and job CSV files
pub mod roster;

/// Run external commands
pub mod shell;

/// Bounded, order-preserving per-row execution
pub mod batch;

/// Submit profiles and their schema
pub mod profile;

/// Student directories in object storage
pub mod storage;

/// Jobs on the float scheduler
pub mod float;
