#![no_std]

//! In-memory stand-ins for the external contracts strategies talk to.
//! Used as a dev-dependency only; several mocks share entry point names,
//! so the crate is never built for wasm.

#[cfg(not(target_family = "wasm"))]
mod lending;
#[cfg(not(target_family = "wasm"))]
mod position_manager;
#[cfg(not(target_family = "wasm"))]
mod swap_adapter;
#[cfg(not(target_family = "wasm"))]
mod vault;

#[cfg(not(target_family = "wasm"))]
pub use lending::*;
#[cfg(not(target_family = "wasm"))]
pub use position_manager::*;
#[cfg(not(target_family = "wasm"))]
pub use swap_adapter::*;
#[cfg(not(target_family = "wasm"))]
pub use vault::*;
