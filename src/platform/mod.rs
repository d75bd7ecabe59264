//! Platform abstraction layer
//!
//! Handles browser/native differences. Only storage needs it today; timing
//! and input go through the browser loop in `main.rs`.

pub mod storage;
