//! Exclusive lease handed out by the cell owner.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tokio::sync::oneshot;

use super::{CellError, Lease, WriteBack};

/// Exclusive access to the value of a [`SerializedCell`](super::SerializedCell).
///
/// The owner task serves no other caller until the guard is handed back.
/// [`commit`](CellGuard::commit) waits for the owner to accept the value and
/// reports a reclaimed lease; [`release`](CellGuard::release) and dropping
/// the guard write back without confirmation.
pub struct CellGuard<T> {
    // Only `None` once the guard has been consumed.
    value: Option<T>,
    write_back: Option<oneshot::Sender<WriteBack<T>>>,
    lease_timeout: Option<Duration>,
}

impl<T> CellGuard<T> {
    pub(crate) fn new(lease: Lease<T>) -> Self {
        Self {
            value: Some(lease.value),
            write_back: Some(lease.write_back),
            lease_timeout: lease.lease_timeout,
        }
    }

    /// Hand the value back and wait until the owner has stored it.
    ///
    /// Fails with [`CellError::Timeout`] if the owner reclaimed the lease
    /// first, in which case the value held here was discarded.
    pub async fn commit(mut self) -> Result<(), CellError> {
        let (accepted_tx, accepted) = oneshot::channel();
        let sent = match (self.value.take(), self.write_back.take()) {
            (Some(value), Some(write_back)) => write_back
                .send(WriteBack {
                    value,
                    accepted: accepted_tx,
                })
                .is_ok(),
            _ => false,
        };

        if sent && accepted.await.is_ok() {
            return Ok(());
        }
        Err(match self.lease_timeout {
            Some(limit) => CellError::Timeout(limit),
            None => CellError::Closed,
        })
    }

    /// Hand the (possibly modified) value back without waiting.
    pub fn release(self) {
        drop(self);
    }

    /// End the lease without writing back; the owner keeps its value.
    pub(crate) fn into_value(mut self) -> Option<T> {
        self.write_back = None;
        self.value.take()
    }
}

impl<T> Deref for CellGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
            .as_ref()
            .expect("lease value is present until the guard is consumed")
    }
}

impl<T> DerefMut for CellGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value
            .as_mut()
            .expect("lease value is present until the guard is consumed")
    }
}

impl<T: fmt::Debug> fmt::Debug for CellGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellGuard")
            .field("value", &self.value)
            .field("lease_timeout", &self.lease_timeout)
            .finish()
    }
}

impl<T> Drop for CellGuard<T> {
    fn drop(&mut self) {
        if let (Some(value), Some(write_back)) = (self.value.take(), self.write_back.take()) {
            let (accepted, _) = oneshot::channel();
            // Fails only if the owner already reclaimed the lease or stopped.
            let _ = write_back.send(WriteBack { value, accepted });
        }
    }
}
