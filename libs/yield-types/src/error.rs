use soroban_sdk::contracterror;

/// Error codes shared by every contract in the protocol.
///
/// A single enum keeps the codes stable when a failure crosses a contract
/// boundary, e.g. a strategy error surfacing through `Vault::harvest`.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum YieldError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    /// Committing an announced change before its waiting period elapsed
    TooEarly = 4,
    /// Executing a scheduled upgrade or action before it is ready
    NotReady = 5,
    AlreadyExecuted = 6,
    InsufficientShares = 7,
    InsufficientAllowance = 8,
    TransferFailed = 9,
    PathNotFound = 10,
    OutOfRange = 11,
    RebalanceNotNeeded = 12,
    InvalidAmount = 13,
    NoStrategy = 14,
    NothingScheduled = 15,
    DelayTooShort = 16,
    PredecessorNotMet = 17,
    UnknownOperation = 18,
    AlreadyScheduled = 19,
    InvalidPath = 20,
    UnderlyingMismatch = 21,
    InvalidRatio = 22,
    SlippageExceeded = 23,
    StrategyMismatch = 24,
    VenueNotFound = 25,
    InvalidConfig = 26,
}
