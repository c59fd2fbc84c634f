//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod launcher;
pub mod sqlite_adapter;
pub mod web;
