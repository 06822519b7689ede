//! Shared kernel: models used by every feature

pub mod models;
