//! Personal project bookkeeping.
//!
//! Projects live as directories under a configured root, each carrying a
//! `details.json` sidecar with its metadata. See [`repository::ProjectRepository`]
//! for the operations and [`config::Config`] for where the root comes from.

pub mod config;
pub mod models;
pub mod render;
pub mod repository;
