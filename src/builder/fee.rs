//! Fee estimation and dust policy (§4.4). Kaspa has no fee market in scope
//! here -- this crate only ever applies a flat, caller-configurable
//! sompi-per-byte rate.

/// 1 KAS = 10^8 sompi.
pub const SOMPI_PER_KAS: u64 = 100_000_000;

/// Kaspa's fixed max supply, in sompi, used as the ceiling for
/// `Error::InvalidAmount` (§7).
pub const MAX_SUPPLY_SOMPI: u64 = 21_000_000 * SOMPI_PER_KAS;

/// Below this, a change output is dropped and its value folded into the fee
/// instead (§4.4 outputs rule, testable property #9).
pub const DUST_THRESHOLD_SOMPI: u64 = 1_000;

/// Floor a `TransactionBuilder` enforces on any fee, explicit or estimated
/// (§4.4: "enforce `min_fee <= fee <= max_fee_configured`"). Shares the dust
/// threshold's value: a fee that wouldn't even clear dust is not a
/// meaningful network fee.
pub const MIN_FEE_SOMPI: u64 = DUST_THRESHOLD_SOMPI;

/// Applied when a caller does not supply an explicit fee rate.
pub const DEFAULT_FEE_RATE: u64 = 1_000;

/// Sane ceiling a `TxBuilderConfig` defaults to when the caller doesn't pick
/// one explicitly: well above any plausible single-transaction fee, while
/// still well under `MAX_SUPPLY_SOMPI`.
pub const DEFAULT_MAX_FEE: u64 = 10_000 * SOMPI_PER_KAS;

const BYTES_PER_INPUT: u64 = 150;
const BYTES_PER_OUTPUT: u64 = 35;
const BASE_OVERHEAD_BYTES: u64 = 10;

/// Estimates a transaction fee from its shape (§4.4):
/// `(inputs * 150 + outputs * 35 + 10) * fee_rate_per_byte`.
pub fn estimate_fee(num_inputs: usize, num_outputs: usize, fee_rate_per_byte: u64) -> u64 {
    let size = num_inputs as u64 * BYTES_PER_INPUT
        + num_outputs as u64 * BYTES_PER_OUTPUT
        + BASE_OVERHEAD_BYTES;
    size * fee_rate_per_byte
}

/// KRC20 reveal-transaction fee policy (§4.5): deploy pays the heaviest
/// reveal fee, mint a tenth of that, everything else a negligible flat fee.
pub fn krc20_reveal_fee(op: &str) -> u64 {
    match op {
        "deploy" => 1_000 * SOMPI_PER_KAS,
        "mint" => 1 * SOMPI_PER_KAS,
        _ => 1_000,
    }
}
