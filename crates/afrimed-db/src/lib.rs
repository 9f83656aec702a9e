//! Database layer for AfriMed Assist.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode
//! initialization, and embedded SQL migrations. The only table in scope is
//! `users`, created through the versioned migrations managed here; its
//! `UNIQUE(email)` constraint is what the provisioning upsert in
//! `afrimed-users` relies on.
//!
//! SQLite with WAL mode keeps the deployment to a single process with no
//! external database, which matches the access pattern: rare writes (first
//! provisioning visit per user) and cheap indexed reads.

mod migrations;
mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool, DbRuntimeSettings};
