//! Roster files and the CSV records handed from one stage to the next

/// Student display names and the identifiers derived from them
pub mod entry;

/// Read headerless CSV inputs
pub mod read;

/// Write stage outputs
pub mod write;
