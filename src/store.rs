//! The single timestamp the service exposes.

use crate::cell::{CellConfig, CellError, SerializedCell};
use crate::timestamp::TimestampValue;

/// A [`SerializedCell`] holding one [`TimestampValue`].
///
/// Starts at [`TimestampValue::ZERO`]. Performs no validation: anything that
/// reaches it is already a valid point in time.
#[derive(Clone)]
pub struct TimestampStore {
    cell: SerializedCell<TimestampValue>,
}

impl TimestampStore {
    pub fn new() -> Self {
        Self::with_config(CellConfig::default())
    }

    pub fn with_config(config: CellConfig) -> Self {
        Self {
            cell: SerializedCell::with_config(TimestampValue::ZERO, config),
        }
    }

    pub async fn get_timestamp(&self) -> Result<TimestampValue, CellError> {
        self.cell.get().await
    }

    pub async fn set_timestamp(&self, timestamp: TimestampValue) -> Result<(), CellError> {
        self.cell.set(timestamp).await?;
        tracing::debug!(
            %timestamp,
            at = ?timestamp.to_datetime(),
            "timestamp stored"
        );
        Ok(())
    }

    /// Stop the owner task. See [`SerializedCell::stop`].
    pub async fn stop(&self) -> Result<(), CellError> {
        self.cell.stop().await
    }

    pub fn is_closed(&self) -> bool {
        self.cell.is_closed()
    }
}

impl Default for TimestampStore {
    fn default() -> Self {
        Self::new()
    }
}
