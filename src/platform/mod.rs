//! Platform layer
//!
//! The simulation takes time and input as plain values; this layer is where
//! the browser supplies them. Native builds drive `Game` directly (see the
//! headless runner in `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;
