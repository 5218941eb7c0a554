//! Sales reports: a terminal catalog of analytical SQL reports.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod menu;
pub mod query;
pub mod render;
pub mod reports;
