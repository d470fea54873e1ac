#![no_std]

//! Building blocks shared by every strategy contract.
//!
//! A strategy contract keeps its own `DataKey` enum for specialization
//! state; everything common lives under [`BaseKey`] in the same instance
//! storage. Variant names of the two enums must not overlap.

pub mod access;
pub mod config;
pub mod prepay;
pub mod rewards;
pub mod token;
pub mod upgrade;

pub use access::*;
pub use config::*;
pub use prepay::*;
pub use rewards::*;
pub use token::*;
pub use upgrade::*;
