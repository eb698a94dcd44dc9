use std::fmt;

use clap::ValueEnum;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Action {
    Suspend,
    Resume,
    Cancel,
}

/// Suspend and cancel skip float's confirmation and graceful shutdown with `-f`. Resuming a job
/// that isn't running needs no forcing, so resume never gets the flag.
impl Action {
    pub fn forced(&self) -> bool {
        match self {
            Action::Suspend | Action::Cancel => true,
            Action::Resume => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Suspend => write!(f, "suspend"),
            Action::Resume => write!(f, "resume"),
            Action::Cancel => write!(f, "cancel"),
        }
    }
}
