//! Refresh cycles and atomic publication of lineup and guide.

mod error;
mod gateway;
mod scheduler;

pub use error::{RefreshError, RefreshFailure, RefreshTarget};
pub use gateway::{Gateway, Published, RefreshMode, RefreshOutcome, RefreshReport, Snapshot};
pub use scheduler::spawn_refresh_task;
