//! Pipeline tests for the updater
//!
//! Each test builds a small set of CSV snapshots in a temporary directory
//! and runs the full update against it.

pub mod full_update;
