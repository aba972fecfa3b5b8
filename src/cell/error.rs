//! Cell errors.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`SerializedCell`](super::SerializedCell) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CellError {
    /// The owner task has stopped; the value is no longer reachable.
    #[error("cell owner task has stopped")]
    Closed,

    /// No lease was granted within the configured acquire timeout.
    #[error("timed out after {0:?} waiting for exclusive access")]
    Timeout(Duration),
}
