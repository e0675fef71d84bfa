//! SQLite storage for the Visio status-check feature.
//!
//! Provides connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the status-check queries. Transcripts are not
//! stored here; they live in memory in `visio-transcripts`.

mod migrations;
mod pool;
mod status;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError, IN_MEMORY};
pub use status::{insert_status_check, list_status_checks, StatusError, MAX_STATUS_CHECKS};
