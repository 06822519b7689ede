//! Feature modules

pub mod lifecycle;
