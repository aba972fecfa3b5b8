//! # Timestamp Service
//!
//! One mutable point in time, readable and writable over HTTP.
//!
//! The value lives in a [`SerializedCell`]: a background owner task that
//! hands out exclusive leases over channels instead of sharing a lock.
//! [`TimestampStore`] specializes it to [`TimestampValue`], and
//! [`server`] exposes the store as `GET`/`POST /timestamp`.

pub mod cell;
pub mod client;
pub mod server;
pub mod store;
pub mod timestamp;

pub use cell::{CellConfig, CellError, CellGuard, SerializedCell};
pub use client::{ClientError, TimestampClient};
pub use store::TimestampStore;
pub use timestamp::{ParseTimestampError, TimestampValue};
