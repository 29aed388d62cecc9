//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, a directory of JSON files natively)
//! - Wall-clock time
//! - The wasm-bindgen bridge the page drives

pub mod storage;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;
