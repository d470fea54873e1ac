#![no_std]

pub mod full_math;
pub mod liquidity_math;
pub mod position_value;
pub mod share_math;
pub mod tick_math;

pub use full_math::*;
pub use liquidity_math::*;
pub use position_value::*;
pub use share_math::*;
pub use tick_math::*;
