//! Serialized access to a single shared value.
//!
//! A [`SerializedCell`] keeps its value inside a background owner task.
//! Callers never touch the value directly: they ask the owner for an
//! exclusive lease, work on the leased copy and hand it back. While a lease
//! is out the owner serves nothing else, so every critical section runs
//! alone without a lock object being shared between callers.
//!
//! ```text
//!          acquire              release
//!   Idle ───────────▶ Held ───────────────▶ Idle
//!                       │  lease timeout
//!                       └─────────────────▶ Idle (value unchanged)
//! ```
//!
//! Acquire requests queue on a channel of capacity one, which is the closest
//! tokio gets to an unbuffered handoff. Waiters are woken in channel order;
//! no stricter fairness is promised.

pub mod error;
mod guard;

pub use error::CellError;
pub use guard::CellGuard;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

/// Bounds on the lease handshake. `None` waits forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellConfig {
    /// How long a caller waits for the owner to grant a lease.
    pub acquire_timeout: Option<Duration>,
    /// How long the owner waits for a granted lease to come back before
    /// reclaiming it. A reclaimed lease leaves the value as it was and its
    /// [`CellGuard::commit`] fails with [`CellError::Timeout`].
    pub lease_timeout: Option<Duration>,
}

/// A granted lease: a copy of the value plus the way back to the owner.
pub(crate) struct Lease<T> {
    pub(crate) value: T,
    pub(crate) write_back: oneshot::Sender<WriteBack<T>>,
    pub(crate) lease_timeout: Option<Duration>,
}

/// A value returned by a lease holder; `accepted` fires once it is stored.
pub(crate) struct WriteBack<T> {
    pub(crate) value: T,
    pub(crate) accepted: oneshot::Sender<()>,
}

enum Request<T> {
    Acquire(oneshot::Sender<Lease<T>>),
    Stop(oneshot::Sender<()>),
}

/// Handle to a value owned by a background task.
///
/// Handles are cheap to clone; all clones talk to the same owner. The owner
/// exits on [`stop`](Self::stop) or once every handle is dropped.
pub struct SerializedCell<T> {
    requests: mpsc::Sender<Request<T>>,
    config: CellConfig,
}

impl<T> Clone for SerializedCell<T> {
    fn clone(&self) -> Self {
        Self {
            requests: self.requests.clone(),
            config: self.config,
        }
    }
}

impl<T> SerializedCell<T>
where
    T: Clone + Send + 'static,
{
    /// Spawn an owner task holding `initial`, with unbounded waits.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, CellConfig::default())
    }

    /// Spawn an owner task holding `initial`.
    pub fn with_config(initial: T, config: CellConfig) -> Self {
        let (requests, inbox) = mpsc::channel(1);
        tokio::spawn(run_owner(initial, inbox, config.lease_timeout));
        Self { requests, config }
    }

    /// The timeouts this handle was built with.
    pub fn config(&self) -> CellConfig {
        self.config
    }

    /// Wait for exclusive access to the value.
    ///
    /// Every other caller is blocked until the returned guard is released
    /// or dropped, unless the owner was configured with a lease timeout.
    pub async fn acquire(&self) -> Result<CellGuard<T>, CellError> {
        let lease = match self.config.acquire_timeout {
            Some(limit) => tokio::time::timeout(limit, self.request_lease())
                .await
                .map_err(|_| CellError::Timeout(limit))??,
            None => self.request_lease().await?,
        };
        Ok(CellGuard::new(lease))
    }

    async fn request_lease(&self) -> Result<Lease<T>, CellError> {
        let (reply, grant) = oneshot::channel();
        self.requests
            .send(Request::Acquire(reply))
            .await
            .map_err(|_| CellError::Closed)?;
        grant.await.map_err(|_| CellError::Closed)
    }

    /// Return a copy of the current value.
    pub async fn get(&self) -> Result<T, CellError> {
        let guard = self.acquire().await?;
        guard.into_value().ok_or(CellError::Closed)
    }

    /// Replace the current value.
    ///
    /// Any `get` that starts after this returns observes `value` or a later
    /// write. Fails with [`CellError::Timeout`] if the lease was reclaimed
    /// before the write reached the owner.
    pub async fn set(&self, value: T) -> Result<(), CellError> {
        let mut guard = self.acquire().await?;
        *guard = value;
        guard.commit().await
    }

    /// Terminate the owner task.
    ///
    /// Waits behind any lease already granted or queued. Once this returns,
    /// every `get`/`set` on any handle fails with [`CellError::Closed`].
    /// Calling it again returns `Closed`.
    pub async fn stop(&self) -> Result<(), CellError> {
        let (reply, ack) = oneshot::channel();
        self.requests
            .send(Request::Stop(reply))
            .await
            .map_err(|_| CellError::Closed)?;
        ack.await.map_err(|_| CellError::Closed)
    }

    /// Whether the owner task has gone away.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

async fn run_owner<T>(
    mut value: T,
    mut inbox: mpsc::Receiver<Request<T>>,
    lease_timeout: Option<Duration>,
) where
    T: Clone + Send + 'static,
{
    tracing::debug!(?lease_timeout, "cell owner started");

    while let Some(request) = inbox.recv().await {
        match request {
            Request::Acquire(reply) => {
                let (write_back, returned) = oneshot::channel();
                let lease = Lease {
                    value: value.clone(),
                    write_back,
                    lease_timeout,
                };
                if reply.send(lease).is_err() {
                    tracing::debug!("lease requester left before the grant");
                    continue;
                }
                if let Some(returned) = wait_for_release(returned, lease_timeout).await {
                    value = returned.value;
                    let _ = returned.accepted.send(());
                }
            }
            Request::Stop(ack) => {
                // Dropping the inbox fails every queued and future request.
                drop(inbox);
                tracing::debug!("cell owner stopped");
                let _ = ack.send(());
                return;
            }
        }
    }

    tracing::debug!("all cell handles dropped, owner exiting");
}

/// Held state: nothing else is served until the lease comes back. A lease
/// ended without a write-back leaves the value unchanged.
async fn wait_for_release<T>(
    returned: oneshot::Receiver<WriteBack<T>>,
    lease_timeout: Option<Duration>,
) -> Option<WriteBack<T>> {
    let outcome = match lease_timeout {
        Some(limit) => match tokio::time::timeout(limit, returned).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(?limit, "lease not released in time, reclaiming");
                return None;
            }
        },
        None => returned.await,
    };

    match outcome {
        Ok(write_back) => Some(write_back),
        Err(_) => {
            tracing::trace!("lease ended without a write-back");
            None
        }
    }
}
