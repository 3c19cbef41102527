//! sql-notebook - run SQL against PostgreSQL from markdown notes.
//!
//! This library exposes the core modules for use in the binary and in
//! integration tests.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod journal;
pub mod logging;
pub mod query;
pub mod server;
