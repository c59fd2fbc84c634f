//! Core domain types and logic.

pub mod error;
pub mod ohlcv;
pub mod page;
pub mod sentiment;
pub mod symbol;
pub mod widget;
pub mod settings;
