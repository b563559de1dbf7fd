//! Core engine modules for repairtrack.

pub mod config;
pub mod db;
pub mod progress;
pub mod repo;
pub mod resolver;
pub mod tracking;
pub mod types;
