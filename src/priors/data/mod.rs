//! Static configuration and injected data sources.

pub mod config;
pub mod repo;
pub mod transcript;
