//! Repair tracking for a device repair shop.
//!
//! The heart of the crate is [`engine::progress::project`], which turns a
//! repair's status and timestamps into the progress bar and timeline a
//! customer sees. Around it sit a small `SQLite` repair store and the
//! tracking lookup that feeds records through the projection.

pub mod engine;
