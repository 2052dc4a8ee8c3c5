//! Database initialization
//!
//! Opens (or creates) the shared SQLite database and applies the
//! trainer schema. Safe to call on every startup.

mod init;

pub use init::{create_submissions_table, create_trainings_table, init_database};
