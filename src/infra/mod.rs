//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (SQLite, git, filesystem)
//! and the pure diff plumbing built on top of parsed patches.

pub mod app_config;
pub mod db;
pub mod diff;
pub mod hash;
pub mod vcs;
