#![no_std]

mod error;
mod position;
mod registry;
mod strategy;
mod timelock;

pub use error::*;
pub use position::*;
pub use registry::*;
pub use strategy::*;
pub use timelock::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited by u128 representation of the sqrt price
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// Maximum sqrt price (at MAX_TICK)
/// sqrt(1.0001^443636) * 2^96, bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Denominator for fee and ratio values expressed in basis points
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Profit sharing can never take more than half of a harvest
pub const MAX_PROFIT_SHARING_BPS: u32 = 5_000;

/// Scale of token weights reported by the position valuer (1e18 = 100%)
pub const WEIGHT_SCALE: u128 = 1_000_000_000_000_000_000;

/// Default waiting period between announcing and committing a change (12 hours)
pub const DEFAULT_MIN_DELAY: u64 = 12 * 60 * 60;

/// Shortest upgrade delay a strategy accepts (1 hour)
pub const MIN_UPGRADE_DELAY: u64 = 60 * 60;

/// Ledger-count TTLs shared by every contract in the workspace
pub const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
pub const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
pub const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
pub const PERSISTENT_TTL_EXTEND: u32 = 518400;
