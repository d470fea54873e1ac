// ============================================================================
// CERTORA SUNBEAM FORMAL VERIFICATION SPECIFICATIONS
// ============================================================================
//
// Formal rules for the vault's share accounting.
//
// STRUCTURE:
//
// - share_specs.rs : deposit / redeem pricing and rounding direction
// - slot_specs.rs  : strategy slot announce / commit timing
//
// USAGE:
// - Unit tests: cargo test -p vault
// - Certora build: cargo build --features certora -p vault
// - Verification: certoraSorobanProver vault.conf
//
// ============================================================================

pub mod share_specs;
pub mod slot_specs;
